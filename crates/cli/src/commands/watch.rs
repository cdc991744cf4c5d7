// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::led_label;
use crate::error::Result;
use crate::session::{SessionHandle, SessionState};

/// Prints status and LED changes until Ctrl-C or the session ends.
pub async fn run(handle: &SessionHandle) -> Result<()> {
    let mut state = handle.subscribe();
    let mut last = *state.borrow_and_update();
    print_lines(&describe_change(None, last));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = *state.borrow_and_update();
                print_lines(&describe_change(Some(last), next));
                last = next;
            }
        }
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Lines describing what changed between two states.
///
/// The LED is only shown once the peer has reported it.
pub(crate) fn describe_change(prev: Option<SessionState>, next: SessionState) -> Vec<String> {
    let mut lines = Vec::new();
    if prev.map(|p| p.status) != Some(next.status) {
        lines.push(format!("status: {}", next.status));
    }
    let led_changed = match prev {
        Some(p) => p.store != next.store || (p.reports == 0 && next.reports > 0),
        None => next.reports > 0,
    };
    if led_changed {
        lines.push(format!("led: {}", led_label(next.store.led_on)));
    }
    lines
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
