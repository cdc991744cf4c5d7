// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnection and liveness state machine.
//!
//! The manager never blocks and never sleeps. It reacts to three inputs, each
//! handled to completion before the next:
//! - the background clock ([`ConnectionManager::on_tick`]), which starts
//!   connect attempts once the backoff delay has elapsed
//! - transport events from the current handle
//!   ([`ConnectionManager::handle_transport_event`])
//! - the keepalive deadline ([`ConnectionManager::on_keepalive`])
//!
//! Every input takes the current time as an argument, so the whole machine can
//! be driven by a simulated clock. Output is delivered as [`ConnectionEvent`]s
//! on the channel returned by [`ConnectionManager::new`].

use std::fmt;
use std::time::Duration;

use ledlink_core::{LIVENESS_PING, LIVENESS_PONG};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use super::slot::{Detach, Slot};
use super::transport::{Connector, EventSink, Frame, TransportEvent, TransportHandle};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// Coarse connection status visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    /// No connection and no attempt in flight.
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// The transport is open.
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
        };
        f.write_str(s)
    }
}

/// Events sent from the manager to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The status changed, or a live connection was torn down.
    Status(ConnectionStatus),
    /// A text payload arrived (liveness replies are filtered out).
    Text(String),
    /// A binary payload arrived.
    Binary(Vec<u8>),
}

/// Internal lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Connecting,
    Connected,
    /// Terminal: entered by `close()`.
    Shutdown,
}

/// Inputs of the lifecycle transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Attempt,
    Opened,
    Lost,
    Shutdown,
}

impl Phase {
    fn next(self, input: Input) -> Phase {
        match (self, input) {
            (Phase::Shutdown, _) | (_, Input::Shutdown) => Phase::Shutdown,
            (_, Input::Attempt) => Phase::Connecting,
            (Phase::Connecting, Input::Opened) => Phase::Connected,
            (phase, Input::Opened) => phase,
            (_, Input::Lost) => Phase::Idle,
        }
    }

    fn status(self) -> ConnectionStatus {
        match self {
            Phase::Connecting => ConnectionStatus::Connecting,
            Phase::Connected => ConnectionStatus::Connected,
            Phase::Idle | Phase::Shutdown => ConnectionStatus::Disconnected,
        }
    }
}

/// A transport handle together with the only receiver of its events.
struct Link<H> {
    handle: H,
    events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl<H> Detach for Link<H> {
    fn detach(mut self) {
        // Closing the receiver makes every later emit from this handle a no-op
        self.events.close();
    }
}

/// Owns the connection to the peer and keeps it alive.
pub struct ConnectionManager<C: Connector> {
    config: ConnectionConfig,
    connector: C,
    phase: Phase,
    started: bool,
    suspended: bool,
    unsuccessful_attempts: u32,
    last_attempt: Option<Instant>,
    last_message: Option<Instant>,
    link: Slot<Link<C::Handle>>,
    keepalive: Option<Instant>,
    /// Last status reported to the owner.
    reported: ConnectionStatus,
    events: mpsc::UnboundedSender<ConnectionEvent>,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a new connection manager.
    ///
    /// Returns the manager and a receiver for connection events.
    pub fn new(
        config: ConnectionConfig,
        connector: C,
    ) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (events, event_rx) = mpsc::unbounded_channel();
        let manager = ConnectionManager {
            config,
            connector,
            phase: Phase::Idle,
            started: false,
            suspended: false,
            unsuccessful_attempts: 0,
            last_attempt: None,
            last_message: None,
            link: Slot::empty(),
            keepalive: None,
            reported: ConnectionStatus::Disconnected,
            events,
        };
        (manager, event_rx)
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Lets the background clock start connecting. Idempotent.
    pub fn start(&mut self) {
        if !self.started && self.phase != Phase::Shutdown {
            self.started = true;
            info!(url = %self.config.url, "connection manager started");
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Stops the background clock from starting new attempts.
    ///
    /// An open connection stays open.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Allows the background clock to start attempts again.
    pub fn resume(&mut self) {
        if self.phase == Phase::Shutdown {
            debug!("resume ignored, manager is closed");
            return;
        }
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Returns true once `close()` has been called.
    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Shutdown
    }

    /// Current status, derived from the lifecycle state.
    pub fn status(&self) -> ConnectionStatus {
        self.phase.status()
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Number of consecutive failed attempts since the last successful open.
    pub fn unsuccessful_attempts(&self) -> u32 {
        self.unsuccessful_attempts
    }

    /// Delay the background clock waits between attempts right now.
    pub fn retry_delay(&self) -> Duration {
        self.config.backoff.delay_for(self.unsuccessful_attempts)
    }

    /// Earliest time the next connect attempt may start.
    pub fn next_attempt_at(&self) -> Option<Instant> {
        self.last_attempt.map(|at| at + self.retry_delay())
    }

    /// Returns true while a transport handle is installed.
    pub fn has_transport(&self) -> bool {
        self.link.is_occupied()
    }

    /// When the keepalive timer fires next, if armed.
    pub fn keepalive_deadline(&self) -> Option<Instant> {
        self.keepalive
    }

    /// Background clock tick: reports a stale status and starts an attempt
    /// when one is due.
    pub fn on_tick(&mut self, now: Instant) {
        if !self.started {
            return;
        }
        self.update_status();
        if self.should_connect(now) {
            self.connect(now);
        }
    }

    fn should_connect(&self, now: Instant) -> bool {
        if self.phase != Phase::Idle || self.suspended {
            return false;
        }
        match self.last_attempt {
            Some(at) => now.saturating_duration_since(at) >= self.retry_delay(),
            None => true,
        }
    }

    fn connect(&mut self, now: Instant) {
        self.phase = self.phase.next(Input::Attempt);
        self.last_attempt = Some(now);
        self.update_status();
        debug!(
            url = %self.config.url,
            attempts = self.unsuccessful_attempts,
            "connecting"
        );

        let connector = &mut self.connector;
        let url = &self.config.url;
        let opened = self.link.replace_with(|| {
            let (sink, events) = EventSink::channel();
            connector
                .open(url, sink)
                .map(|handle| Link { handle, events })
        });

        if let Err(e) = opened {
            debug!(error = %e, "failed to start connection");
            self.phase = self.phase.next(Input::Lost);
            self.unsuccessful_attempts = self.unsuccessful_attempts.saturating_add(1);
        }
    }

    /// Waits for the next event from the current transport handle.
    ///
    /// Never completes while there is no handle. A handle whose event source
    /// vanished without a final event is reported as closed.
    pub async fn next_transport_event(&mut self) -> TransportEvent {
        match self.link.get_mut() {
            Some(link) => link
                .events
                .recv()
                .await
                .unwrap_or(TransportEvent::Closed),
            None => std::future::pending().await,
        }
    }

    /// Takes the next event the current handle has already queued, if any.
    pub fn try_next_transport_event(&mut self) -> Option<TransportEvent> {
        let link = self.link.get_mut()?;
        match link.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(TransportEvent::Closed),
        }
    }

    /// Handles every event already queued by the current handle.
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Some(event) = self.try_next_transport_event() {
            self.handle_transport_event(event, now);
            handled += 1;
        }
        handled
    }

    /// Applies one event from the current transport handle.
    pub fn handle_transport_event(&mut self, event: TransportEvent, now: Instant) {
        match event {
            TransportEvent::Open => {
                debug!(url = %self.config.url, "transport open");
                self.unsuccessful_attempts = 0;
                self.phase = self.phase.next(Input::Opened);
                self.last_message = Some(now);
                self.last_attempt = Some(now);
                self.arm_keepalive(now);
                self.update_status();
            }
            TransportEvent::Error(reason) => {
                debug!(%reason, "transport error");
                self.teardown(now, true);
                self.unsuccessful_attempts = self.unsuccessful_attempts.saturating_add(1);
                self.last_attempt = Some(now);
            }
            TransportEvent::Closed => {
                debug!("transport closed");
                self.teardown(now, false);
            }
            TransportEvent::Text(text) => {
                self.touch(now);
                if text == LIVENESS_PONG {
                    trace!("liveness reply");
                    return;
                }
                self.emit(ConnectionEvent::Text(text));
            }
            TransportEvent::Binary(data) => {
                self.touch(now);
                self.emit(ConnectionEvent::Binary(data));
            }
        }
    }

    /// Keepalive timer: probes a quiet connection or declares it dead.
    ///
    /// Does nothing unless the timer is armed and its deadline has passed.
    pub fn on_keepalive(&mut self, now: Instant) {
        match self.keepalive {
            Some(deadline) if now >= deadline => self.keepalive = None,
            _ => return,
        }
        if self.phase != Phase::Connected {
            return;
        }

        let silent_for = self
            .last_message
            .map(|at| now.saturating_duration_since(at));
        match silent_for {
            Some(silence) if silence <= self.config.keepalive_timeout => {
                if let Err(e) = self.send_frame(Frame::Text(LIVENESS_PING.to_string())) {
                    debug!(error = %e, "failed to send liveness probe");
                }
                self.arm_keepalive(now);
            }
            _ => {
                warn!(
                    timeout_ms = self.config.keepalive_timeout.as_millis() as u64,
                    "no traffic from peer, closing connection"
                );
                self.teardown(now, true);
            }
        }
    }

    /// Sends a text frame on the open connection.
    pub fn send_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.send_frame(Frame::Text(text.into()))
    }

    /// Sends a binary frame on the open connection.
    pub fn send_binary(&mut self, data: impl Into<Vec<u8>>) -> Result<()> {
        self.send_frame(Frame::Binary(data.into()))
    }

    fn send_frame(&mut self, frame: Frame) -> Result<()> {
        let link = match self.link.get_mut() {
            Some(link) if self.phase == Phase::Connected => link,
            _ => {
                if self.config.diagnostic_sends {
                    debug!(?frame, "not connected, dropping message");
                    return Ok(());
                }
                return Err(Error::NotConnected);
            }
        };
        link.handle.send(frame)?;
        Ok(())
    }

    /// Shuts the manager down for good.
    ///
    /// Closes the transport if one is open and guarantees that no further
    /// connect attempt is made.
    pub fn close(&mut self, now: Instant) {
        if self.phase == Phase::Shutdown {
            return;
        }
        info!("closing connection manager");
        self.suspended = true;
        self.phase = self.phase.next(Input::Shutdown);
        self.teardown(now, true);
    }

    /// Tears down the current connection.
    ///
    /// `call_close` is false when the transport reported the close itself.
    fn teardown(&mut self, now: Instant, call_close: bool) {
        self.phase = self.phase.next(Input::Lost);
        self.last_attempt = Some(now);
        self.keepalive = None;
        // A link only exists while Connecting or Connected, so losing one
        // always changes the status and reports Disconnected here.
        self.update_status();

        self.link.clear_with(|link| {
            if call_close {
                link.handle.close();
            }
        });
    }

    fn touch(&mut self, now: Instant) {
        self.last_message = Some(now);
        if self.phase == Phase::Connected {
            self.arm_keepalive(now);
        }
    }

    fn arm_keepalive(&mut self, now: Instant) {
        self.keepalive = Some(now + self.config.keepalive_interval);
    }

    /// Reports the derived status if it differs from the last report.
    fn update_status(&mut self) {
        let status = self.status();
        if status == self.reported {
            return;
        }
        self.reported = status;
        info!(%status, "connection status");
        self.emit(ConnectionEvent::Status(status));
    }

    fn emit(&self, event: ConnectionEvent) {
        let _ = self.events.send(event);
    }
}
