// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Handles client connections, message routing, and broadcast fanout.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use ledlink_core::{ClientMessage, ServerMessage, LIVENESS_PING, LIVENESS_PONG};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Instant, Interval};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::state::ServerState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-connection behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Interval of application-level pings, if any.
    pub ping_interval: Option<Duration>,
}

/// Run the WebSocket server on the given address.
pub async fn run(
    addr: SocketAddr,
    state: ServerState,
    options: Options,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);
    serve(listener, state, options)
        .await
        .map_err(|e| e as Box<dyn std::error::Error>)?;
    Ok(())
}

/// Accepts connections on `listener` until accepting fails.
pub(crate) async fn serve(
    listener: TcpListener,
    state: ServerState,
    options: Options,
) -> Result<(), BoxError> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state, options).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
    options: Options,
) -> Result<(), BoxError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    // Subscribe to broadcasts
    let mut broadcast_rx = state.subscribe();

    let mut ping = options
        .ping_interval
        .map(|every| tokio::time::interval_at(Instant::now() + every, every));

    loop {
        tokio::select! {
            // Handle incoming messages from client
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_client_text(text.as_str(), &state) {
                            ws_sink.send(Message::Text(reply.into())).await?;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {} disconnected", peer_addr);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        ws_sink.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(_)) => {
                        // Ignore other message types (Binary, Pong, Frame)
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        info!("Client {} stream ended", peer_addr);
                        break;
                    }
                }
            }

            // Handle broadcast messages to send to client
            broadcast = broadcast_rx.recv() => {
                match broadcast {
                    Ok(msg) => {
                        let json = msg.to_json()?;
                        if let Err(e) = ws_sink.send(Message::Text(json.into())).await {
                            warn!("Failed to send broadcast to {}: {}", peer_addr, e);
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Client {} lagged by {} messages", peer_addr, n);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }

            // Application-level handshake probe
            _ = next_ping(&mut ping) => {
                let json = ServerMessage::Ping.to_json()?;
                ws_sink.send(Message::Text(json.into())).await?;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

async fn next_ping(ping: &mut Option<Interval>) {
    match ping {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Process a client text frame and return an optional direct reply.
///
/// LED changes are answered through the broadcast, which reaches the sender
/// as well.
pub(crate) fn handle_client_text(text: &str, state: &ServerState) -> Option<String> {
    if text == LIVENESS_PING {
        return Some(LIVENESS_PONG.to_string());
    }

    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            debug!("Ignoring message {:?}: {}", text, e);
            return None;
        }
    };
    debug!("Received message: {:?}", msg);

    match msg {
        ClientMessage::QueryLedStatus => match ServerMessage::led_status(state.led_on()).to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                error!("Failed to encode LED status: {}", e);
                None
            }
        },
        ClientMessage::SetLedStatus { status } => {
            state.set_led(status);
            None
        }
        ClientMessage::Pong => {
            info!("Pong received");
            None
        }
    }
}
