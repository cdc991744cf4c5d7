// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Application store and the pure reducers that update it.
//!
//! The store survives reconnects: a dropped channel never resets it, and the
//! connect-time query overwrites it with the peer's authoritative state.

use serde::{Deserialize, Serialize};

use crate::protocol::{ClientMessage, ServerMessage};

/// Application state mirrored from the peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Whether the LED is lit.
    pub led_on: bool,
}

impl Store {
    /// Reduces an inbound message into a new store.
    ///
    /// Only state reports change the store; every other tag leaves it as is.
    pub fn apply(self, msg: &ServerMessage) -> Store {
        match *msg {
            ServerMessage::LedStatus { status } => Store { led_on: status },
            ServerMessage::Ping | ServerMessage::Unknown => self,
        }
    }

    /// Reduces an outbound message into a new store (optimistic local update).
    pub fn apply_local(self, msg: &ClientMessage) -> Store {
        match *msg {
            ClientMessage::SetLedStatus { status } => Store { led_on: status },
            ClientMessage::Pong | ClientMessage::QueryLedStatus => self,
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
