// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for WebSocket communication.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Fake transports for unit testing
//!
//! Opening a transport is synchronous and only fails for requests that can
//! never succeed (a malformed endpoint, no runtime). Everything that happens
//! afterwards (the handshake completing, frames arriving, the socket dying)
//! is reported asynchronously as a [`TransportEvent`] through the handle's own
//! [`EventSink`].

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint can never be connected to.
    #[error("invalid endpoint: {0}")]
    InvalidUrl(String),

    /// Connection could not be started.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Something that happened on a transport handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is established.
    Open,
    /// A text frame arrived.
    Text(String),
    /// A binary frame arrived.
    Binary(Vec<u8>),
    /// The connection failed; no further events follow.
    Error(String),
    /// The connection closed; no further events follow.
    Closed,
}

/// An outbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

/// Delivery endpoint for one handle's events.
///
/// Each handle gets its own sink. Once the receiving side is dropped the
/// handle is detached and [`EventSink::emit`] silently goes nowhere.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl EventSink {
    /// Creates a sink and the receiver its events arrive on.
    pub fn channel() -> (EventSink, mpsc::UnboundedReceiver<TransportEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventSink { tx }, rx)
    }

    /// Delivers an event. Returns false if the handle has been detached.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Returns true once nobody listens to this sink any more.
    pub fn is_detached(&self) -> bool {
        self.tx.is_closed()
    }

    /// Completes when the sink is detached.
    pub async fn detached(&self) {
        self.tx.closed().await
    }
}

/// Opens transport handles.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with fake implementations.
pub trait Connector {
    type Handle: TransportHandle;

    /// Starts connecting to `url`, reporting progress through `events`.
    ///
    /// Returns an error only when the attempt cannot even be started.
    fn open(&mut self, url: &Url, events: EventSink) -> TransportResult<Self::Handle>;
}

/// A live (or still connecting) transport handle.
pub trait TransportHandle {
    /// Queues a frame for sending.
    fn send(&mut self, frame: Frame) -> TransportResult<()>;

    /// Asks the transport to close the connection.
    fn close(&mut self);
}

/// WebSocket connector using tokio-tungstenite.
///
/// Each handle runs on its own task in the current tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    /// Create a new WebSocket connector.
    pub fn new() -> Self {
        WebSocketConnector
    }
}

/// Commands from a handle to its socket task.
#[derive(Debug)]
enum Outbound {
    Frame(Frame),
    Close,
}

/// Handle to a WebSocket connection task.
///
/// Dropping the handle ends the task and the connection with it.
#[derive(Debug)]
pub struct WebSocketHandle {
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl Connector for WebSocketConnector {
    type Handle = WebSocketHandle;

    fn open(&mut self, url: &Url, events: EventSink) -> TransportResult<WebSocketHandle> {
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(TransportError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        let request = url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        if url.scheme() == "wss" {
            install_crypto_provider();
        }

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        runtime.spawn(run_socket(request, events, outbound_rx));
        Ok(WebSocketHandle { outbound })
    }
}

impl TransportHandle for WebSocketHandle {
    fn send(&mut self, frame: Frame) -> TransportResult<()> {
        self.outbound
            .send(Outbound::Frame(frame))
            .map_err(|_| TransportError::ConnectionClosed)
    }

    fn close(&mut self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}

/// Installs the process-wide rustls provider that `wss` handshakes use.
fn install_crypto_provider() {
    // Already installed is fine
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Drives one WebSocket connection until it ends or is abandoned.
async fn run_socket(
    request: Request,
    events: EventSink,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
) {
    let ws = tokio::select! {
        result = tokio_tungstenite::connect_async(request) => match result {
            Ok((ws, _)) => ws,
            Err(e) => {
                events.emit(TransportEvent::Error(e.to_string()));
                return;
            }
        },
        // Abandoned before the handshake finished
        _ = events.detached() => return,
    };

    if !events.emit(TransportEvent::Open) {
        return;
    }

    let (mut sink, mut stream) = ws.split();
    loop {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(Outbound::Frame(frame)) => {
                    let message = match frame {
                        Frame::Text(text) => Message::Text(text.into()),
                        Frame::Binary(data) => Message::Binary(data.into()),
                    };
                    if let Err(e) = sink.send(message).await {
                        events.emit(TransportEvent::Error(e.to_string()));
                        return;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = sink.close().await;
                    return;
                }
            },
            incoming = stream.next() => {
                let delivered = match incoming {
                    Some(Ok(Message::Text(text))) => {
                        events.emit(TransportEvent::Text(text.as_str().to_owned()))
                    }
                    Some(Ok(Message::Binary(data))) => {
                        events.emit(TransportEvent::Binary(data.to_vec()))
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        events.emit(TransportEvent::Closed);
                        return;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        events.emit(TransportEvent::Error(e.to_string()));
                        return;
                    }
                };
                if !delivered {
                    // Detached while open
                    let _ = sink.close().await;
                    return;
                }
            }
        }
    }
}
