// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use ledlink::config::{endpoint_from_origin, ConnectionConfig, Profile};
use ledlink_core::{ClientMessage, ServerMessage, LIVENESS_PING, LIVENESS_PONG};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// Generous wait for anything that involves real sockets.
pub const WAIT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct PeerState {
    led: AtomicBool,
    silent: AtomicBool,
    accepted: AtomicUsize,
    received: std::sync::Mutex<Vec<String>>,
}

/// In-process LED peer speaking the same protocol as the device.
pub struct Peer {
    addr: SocketAddr,
    state: Arc<PeerState>,
    kick: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl Peer {
    pub async fn start() -> Peer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::serve(listener)
    }

    /// Starts a peer on an address a previous peer used.
    pub async fn start_on(addr: SocketAddr) -> Peer {
        let listener = TcpListener::bind(addr).await.unwrap();
        Self::serve(listener)
    }

    fn serve(listener: TcpListener) -> Peer {
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(PeerState::default());
        let (kick, _) = broadcast::channel(4);
        let task = tokio::spawn(accept_loop(listener, Arc::clone(&state), kick.clone()));
        Peer {
            addr,
            state,
            kick,
            task,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Fast client settings pointing at this peer.
    pub fn config(&self) -> ConnectionConfig {
        let url = endpoint_from_origin(&self.origin()).unwrap();
        let mut config = ConnectionConfig::for_profile(Profile::Production, url);
        config.tick_interval = Duration::from_millis(20);
        config.keepalive_interval = Duration::from_millis(100);
        config.keepalive_timeout = Duration::from_millis(300);
        config
    }

    pub fn led(&self) -> bool {
        self.state.led.load(Ordering::SeqCst)
    }

    pub fn set_led(&self, on: bool) {
        self.state.led.store(on, Ordering::SeqCst);
    }

    /// Stops answering anything, including liveness probes.
    pub fn set_silent(&self, silent: bool) {
        self.state.silent.store(silent, Ordering::SeqCst);
    }

    /// Number of WebSocket connections accepted so far.
    pub fn accepted(&self) -> usize {
        self.state.accepted.load(Ordering::SeqCst)
    }

    /// Every text frame received, in order.
    pub fn received(&self) -> Vec<String> {
        self.state.received.lock().unwrap().clone()
    }

    /// Closes every open connection from the peer side.
    pub fn disconnect_all(&self) {
        let _ = self.kick.send(());
    }

    /// Shuts the peer down, closing its connections.
    pub async fn stop(self) {
        self.disconnect_all();
        self.task.abort();
        let _ = self.task.await;
    }
}

async fn accept_loop(listener: TcpListener, state: Arc<PeerState>, kick: broadcast::Sender<()>) {
    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(serve_client(stream, Arc::clone(&state), kick.subscribe()));
    }
}

async fn serve_client(stream: TcpStream, state: Arc<PeerState>, mut kick: broadcast::Receiver<()>) {
    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    state.accepted.fetch_add(1, Ordering::SeqCst);

    loop {
        tokio::select! {
            incoming = ws.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                    Some(Ok(_)) => continue,
                };
                state.received.lock().unwrap().push(text.clone());
                if state.silent.load(Ordering::SeqCst) {
                    continue;
                }
                if let Some(reply) = reply_to(&text, &state) {
                    if ws.send(Message::Text(reply.into())).await.is_err() {
                        return;
                    }
                }
            }
            _ = kick.recv() => {
                let _ = ws.close(None).await;
                return;
            }
        }
    }
}

fn reply_to(text: &str, state: &PeerState) -> Option<String> {
    if text == LIVENESS_PING {
        return Some(LIVENESS_PONG.to_string());
    }
    match ClientMessage::from_json(text).ok()? {
        ClientMessage::QueryLedStatus => {}
        ClientMessage::SetLedStatus { status } => state.led.store(status, Ordering::SeqCst),
        ClientMessage::Pong => return None,
    }
    ServerMessage::led_status(state.led.load(Ordering::SeqCst))
        .to_json()
        .ok()
}
