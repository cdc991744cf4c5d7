// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Message-level adapter between the LED protocol and the connection.

use ledlink_core::{ClientMessage, ServerMessage, Store};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::config::ConnectionConfig;
use crate::connection::{
    ConnectionEvent, ConnectionManager, ConnectionStatus, Connector, TransportEvent,
};
use crate::error::Result;

/// Snapshot of what a session knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub status: ConnectionStatus,
    pub store: Store,
    /// Number of LED state reports received from the peer.
    pub reports: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            status: ConnectionStatus::Disconnected,
            store: Store::default(),
            reports: 0,
        }
    }
}

/// An LED session over one connection manager.
///
/// Every input method handles the manager's output before returning, so the
/// store and status are always current when the call completes.
pub struct Session<C: Connector> {
    manager: ConnectionManager<C>,
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
    store: Store,
    status: ConnectionStatus,
    reports: u64,
}

impl<C: Connector> Session<C> {
    pub fn new(config: ConnectionConfig, connector: C) -> Self {
        let (manager, events) = ConnectionManager::new(config, connector);
        Session {
            manager,
            events,
            store: Store::default(),
            status: ConnectionStatus::Disconnected,
            reports: 0,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        self.manager.config()
    }

    pub fn manager(&self) -> &ConnectionManager<C> {
        &self.manager
    }

    pub fn store(&self) -> Store {
        self.store
    }

    /// Last status reported by the manager.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            status: self.status,
            store: self.store,
            reports: self.reports,
        }
    }

    pub fn keepalive_deadline(&self) -> Option<Instant> {
        self.manager.keepalive_deadline()
    }

    pub fn start(&mut self) {
        self.manager.start();
    }

    pub fn suspend(&mut self) {
        self.manager.suspend();
    }

    pub fn resume(&mut self) {
        self.manager.resume();
    }

    /// Closes the connection for good.
    pub fn close(&mut self, now: Instant) {
        self.manager.close(now);
        self.process_events();
    }

    /// Sends a message to the peer and applies it to the local store.
    ///
    /// The store is only touched once the message has been handed to the
    /// transport (or dropped in diagnostic mode).
    pub fn send(&mut self, msg: ClientMessage) -> Result<()> {
        let json = msg.to_json()?;
        self.manager.send_text(json)?;
        self.store = self.store.apply_local(&msg);
        Ok(())
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.manager.on_tick(now);
        self.process_events();
    }

    pub fn on_keepalive(&mut self, now: Instant) {
        self.manager.on_keepalive(now);
        self.process_events();
    }

    /// Waits for the next event from the current transport handle.
    pub async fn next_transport_event(&mut self) -> TransportEvent {
        self.manager.next_transport_event().await
    }

    pub fn handle_transport_event(&mut self, event: TransportEvent, now: Instant) {
        self.manager.handle_transport_event(event, now);
        self.process_events();
    }

    /// Handles every transport event already queued. Returns how many there were.
    ///
    /// The manager's output is drained after each event, so reactions see the
    /// connection as it was when that event arrived.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Some(event) = self.manager.try_next_transport_event() {
            self.handle_transport_event(event, now);
            handled += 1;
        }
        handled
    }

    /// Drains the manager's output.
    fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ConnectionEvent::Status(status) => self.on_status(status),
                ConnectionEvent::Text(raw) => self.on_text(&raw),
                ConnectionEvent::Binary(data) => {
                    trace!(len = data.len(), "ignoring binary payload");
                }
            }
        }
    }

    fn on_status(&mut self, status: ConnectionStatus) {
        self.status = status;
        if status == ConnectionStatus::Connected {
            if let Err(e) = self.send(ClientMessage::QueryLedStatus) {
                warn!(error = %e, "failed to query LED status");
            }
        }
    }

    fn on_text(&mut self, raw: &str) {
        let msg = match ServerMessage::from_json(raw) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, raw, "dropping malformed message");
                return;
            }
        };
        match msg {
            ServerMessage::Ping => {
                if let Err(e) = self.send(ClientMessage::Pong) {
                    warn!(error = %e, "failed to answer ping");
                }
            }
            ServerMessage::LedStatus { status } => {
                debug!(status, "LED status reported");
                self.reports += 1;
            }
            ServerMessage::Unknown => debug!(raw, "ignoring unknown message"),
        }
        self.store = self.store.apply(&msg);
    }
}
