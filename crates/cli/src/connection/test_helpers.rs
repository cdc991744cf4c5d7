// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for connection and session tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use url::Url;

use super::transport::{
    Connector, EventSink, Frame, TransportError, TransportEvent, TransportHandle, TransportResult,
};
use crate::config::{ConnectionConfig, Profile};

/// Everything recorded about one opened handle.
struct FakeHandleState {
    url: Url,
    sink: EventSink,
    sent: Vec<Frame>,
    closed: bool,
}

#[derive(Default)]
struct FakeState {
    handles: Vec<FakeHandleState>,
    failures_left: u32,
}

/// Fake connector for testing without real sockets.
///
/// Clones share state, so a test can keep one clone to inject events into any
/// handle the manager opened, including handles it has since replaced.
#[derive(Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `n` opens fail synchronously.
    pub fn fail_next_opens(&self, n: u32) {
        self.state.lock().unwrap().failures_left = n;
    }

    /// Number of handles opened so far.
    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().handles.len()
    }

    /// Delivers an event from handle `index`. Returns false if it was detached.
    pub fn emit(&self, index: usize, event: TransportEvent) -> bool {
        self.state.lock().unwrap().handles[index].sink.emit(event)
    }

    /// Delivers an event from the most recently opened handle.
    pub fn emit_latest(&self, event: TransportEvent) -> bool {
        let index = self.opened() - 1;
        self.emit(index, event)
    }

    pub fn is_detached(&self, index: usize) -> bool {
        self.state.lock().unwrap().handles[index].sink.is_detached()
    }

    pub fn was_closed(&self, index: usize) -> bool {
        self.state.lock().unwrap().handles[index].closed
    }

    pub fn url(&self, index: usize) -> Url {
        self.state.lock().unwrap().handles[index].url.clone()
    }

    pub fn sent(&self, index: usize) -> Vec<Frame> {
        self.state.lock().unwrap().handles[index].sent.clone()
    }

    /// Text frames sent on handle `index`.
    pub fn sent_texts(&self, index: usize) -> Vec<String> {
        self.sent(index)
            .into_iter()
            .filter_map(|frame| match frame {
                Frame::Text(text) => Some(text),
                Frame::Binary(_) => None,
            })
            .collect()
    }
}

/// Handle produced by [`FakeConnector`].
pub struct FakeHandle {
    index: usize,
    state: Arc<Mutex<FakeState>>,
}

impl Connector for FakeConnector {
    type Handle = FakeHandle;

    fn open(&mut self, url: &Url, events: EventSink) -> TransportResult<FakeHandle> {
        let mut state = self.state.lock().unwrap();
        if state.failures_left > 0 {
            state.failures_left -= 1;
            return Err(TransportError::ConnectionFailed("fake failure".into()));
        }
        state.handles.push(FakeHandleState {
            url: url.clone(),
            sink: events,
            sent: Vec::new(),
            closed: false,
        });
        Ok(FakeHandle {
            index: state.handles.len() - 1,
            state: Arc::clone(&self.state),
        })
    }
}

impl TransportHandle for FakeHandle {
    fn send(&mut self, frame: Frame) -> TransportResult<()> {
        let mut state = self.state.lock().unwrap();
        let handle = &mut state.handles[self.index];
        if handle.closed {
            return Err(TransportError::ConnectionClosed);
        }
        handle.sent.push(frame);
        Ok(())
    }

    fn close(&mut self) {
        self.state.lock().unwrap().handles[self.index].closed = true;
    }
}

/// Production settings pointing at a test endpoint.
pub fn test_config() -> ConnectionConfig {
    ConnectionConfig::for_profile(Profile::Production, Url::parse("ws://peer.test/ws").unwrap())
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
