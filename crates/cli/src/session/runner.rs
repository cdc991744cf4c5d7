// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Async driver for a [`Session`].
//!
//! One task owns the session and multiplexes its inputs with `tokio::select!`:
//! the background clock, the current transport's events, the keepalive
//! deadline and commands from the [`SessionHandle`]. Each input is handled to
//! completion before the next one is looked at.

use ledlink_core::ClientMessage;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::adapter::{Session, SessionState};
use crate::connection::Connector;
use crate::error::{Error, Result};

/// Requests from a handle to the session task.
enum Command {
    Send(ClientMessage, oneshot::Sender<Result<()>>),
    Suspend,
    Resume,
}

/// Controls a session running on its own task.
///
/// Dropping the handle closes the session as well, without waiting for it to
/// finish.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SessionState>,
    cancel: CancellationToken,
    task: JoinHandle<SessionState>,
}

/// Starts `session` on a new task of the current runtime.
pub fn spawn<C>(session: Session<C>) -> SessionHandle
where
    C: Connector + Send + 'static,
    C::Handle: Send + 'static,
{
    let (commands, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state) = watch::channel(session.state());
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run(session, command_rx, state_tx, cancel.clone()));
    SessionHandle {
        commands,
        state,
        cancel,
        task,
    }
}

impl SessionHandle {
    /// Sends a message to the peer.
    ///
    /// Fails with [`Error::NotConnected`] while there is no open connection
    /// (unless diagnostic sends are enabled).
    pub async fn send(&self, msg: ClientMessage) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Send(msg, reply))
            .map_err(|_| Error::SessionClosed)?;
        reply_rx.await.map_err(|_| Error::SessionClosed)?
    }

    /// Stops new connect attempts. An open connection stays open.
    pub fn suspend(&self) -> Result<()> {
        self.command(Command::Suspend)
    }

    /// Allows connect attempts again.
    pub fn resume(&self) -> Result<()> {
        self.command(Command::Resume)
    }

    fn command(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::SessionClosed)
    }

    /// Latest published state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Watches state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Closes the session and waits for its task to finish.
    ///
    /// Returns the final state.
    pub async fn close(self) -> Result<SessionState> {
        self.cancel.cancel();
        self.task.await.map_err(|_| Error::SessionClosed)
    }
}

async fn run<C: Connector>(
    mut session: Session<C>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<SessionState>,
    cancel: CancellationToken,
) -> SessionState {
    let mut clock = tokio::time::interval(session.config().tick_interval);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    session.start();

    loop {
        let keepalive = session.keepalive_deadline();

        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            command = commands.recv() => match command {
                Some(command) => handle_command(&mut session, command),
                None => break,
            },

            event = session.next_transport_event() => {
                session.handle_transport_event(event, Instant::now());
            }

            _ = tokio::time::sleep_until(keepalive.unwrap_or_else(Instant::now)), if keepalive.is_some() => {
                session.on_keepalive(Instant::now());
            }

            _ = clock.tick() => session.on_tick(Instant::now()),
        }

        publish(&state, session.state());
    }

    session.close(Instant::now());
    let last = session.state();
    publish(&state, last);
    info!("session closed");
    last
}

fn handle_command<C: Connector>(session: &mut Session<C>, command: Command) {
    match command {
        Command::Send(msg, reply) => {
            let result = session.send(msg);
            if reply.send(result).is_err() {
                debug!(?msg, "sender went away before the reply");
            }
        }
        Command::Suspend => session.suspend(),
        Command::Resume => session.resume(),
    }
}

fn publish(state: &watch::Sender<SessionState>, next: SessionState) {
    state.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
}
