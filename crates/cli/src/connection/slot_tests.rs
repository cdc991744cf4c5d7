// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::slot::{Detach, Slot};
use std::cell::RefCell;
use std::rc::Rc;

/// Records lifecycle calls so ordering can be asserted.
struct Probe {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl Detach for Probe {
    fn detach(self) {
        self.log.borrow_mut().push(format!("detach {}", self.name));
    }
}

fn probe(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Probe {
    log.borrow_mut().push(format!("create {}", name));
    Probe {
        name,
        log: Rc::clone(log),
    }
}

#[test]
fn replace_detaches_old_before_creating_new() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut slot = Slot::empty();

    slot.replace_with(|| Ok::<_, ()>(probe("a", &log))).unwrap();
    slot.replace_with(|| Ok::<_, ()>(probe("b", &log))).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["create a", "detach a", "create b"]
    );
    assert!(slot.is_occupied());
}

#[test]
fn failed_replace_leaves_slot_empty() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut slot = Slot::empty();

    slot.replace_with(|| Ok::<_, ()>(probe("a", &log))).unwrap();
    let result = slot.replace_with(|| Err::<Probe, _>("boom"));

    assert_eq!(result, Err("boom"));
    assert!(!slot.is_occupied());
    assert_eq!(*log.borrow(), vec!["create a", "detach a"]);
}

#[test]
fn clear_runs_farewell_then_detaches() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut slot = Slot::empty();
    slot.replace_with(|| Ok::<_, ()>(probe("a", &log))).unwrap();

    let farewell_log = Rc::clone(&log);
    assert!(slot.clear_with(|p| farewell_log.borrow_mut().push(format!("close {}", p.name))));
    assert!(!slot.clear_with(|_| {}));

    assert_eq!(*log.borrow(), vec!["create a", "close a", "detach a"]);
}
