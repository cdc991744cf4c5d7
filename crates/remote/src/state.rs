// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Holds the LED state shared by every connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ledlink_core::ServerMessage;
use tokio::sync::broadcast;
use tracing::info;

/// Shared server state containing the LED and the broadcast fanout.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// Whether the LED is lit.
    led_on: AtomicBool,
    /// Broadcast channel for notifying clients of LED changes.
    broadcast_tx: broadcast::Sender<ServerMessage>,
}

impl ServerState {
    /// Creates a new server state with the LED in the given state.
    pub fn new(led_on: bool) -> Self {
        let (broadcast_tx, _) = broadcast::channel(64);
        ServerState {
            inner: Arc::new(ServerStateInner {
                led_on: AtomicBool::new(led_on),
                broadcast_tx,
            }),
        }
    }

    pub fn led_on(&self) -> bool {
        self.inner.led_on.load(Ordering::SeqCst)
    }

    /// Switches the LED and tells every connected client.
    pub fn set_led(&self, on: bool) {
        self.inner.led_on.store(on, Ordering::SeqCst);
        info!("LED status {}", if on { "ON" } else { "OFF" });
        let _ = self
            .inner
            .broadcast_tx
            .send(ServerMessage::led_status(on));
    }

    /// Subscribe to broadcast messages.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.inner.broadcast_tx.subscribe()
    }
}
