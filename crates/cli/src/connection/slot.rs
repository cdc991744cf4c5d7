// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusively-owned resource slot.
//!
//! A slot holds at most one live resource. Replacing or clearing it always
//! detaches the previous resource first, so two live resources never coexist.

/// A resource that can be cut off from everything it reports to.
pub(crate) trait Detach {
    /// Stops all further event delivery and releases the resource.
    fn detach(self);
}

pub(crate) struct Slot<T: Detach> {
    current: Option<T>,
}

impl<T: Detach> Slot<T> {
    pub(crate) fn empty() -> Self {
        Slot { current: None }
    }

    pub(crate) fn is_occupied(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn get_mut(&mut self) -> Option<&mut T> {
        self.current.as_mut()
    }

    /// Detaches the current resource, then installs the one built by `make`.
    ///
    /// When `make` fails the slot is left empty.
    pub(crate) fn replace_with<E>(&mut self, make: impl FnOnce() -> Result<T, E>) -> Result<(), E> {
        self.clear_with(|_| {});
        self.current = Some(make()?);
        Ok(())
    }

    /// Runs `farewell` on the current resource, then detaches it.
    ///
    /// Returns false if the slot was already empty.
    pub(crate) fn clear_with(&mut self, farewell: impl FnOnce(&mut T)) -> bool {
        match self.current.take() {
            Some(mut old) => {
                farewell(&mut old);
                old.detach();
                true
            }
            None => false,
        }
    }
}
