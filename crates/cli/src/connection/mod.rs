// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent connection to the peer.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ ConnectionManager │────►│  Connector  │────►│    Peer     │
//! │  (state machine)  │◄────│   (trait)   │◄────│   Server    │
//! └───────────────────┘     └─────────────┘     └─────────────┘
//!          │
//!          ▼
//!   ConnectionEvent (status / text / binary)
//! ```
//!
//! # Features
//!
//! - Tiered backoff between connect attempts
//! - Transport liveness probing with a forced close on silence
//! - At most one live transport handle; superseded handles are detached
//! - Injectable connector for testing

mod backoff;
mod manager;
mod slot;
mod transport;

pub use backoff::{Backoff, BackoffTier};
pub use manager::{ConnectionEvent, ConnectionManager, ConnectionStatus};
pub use transport::{
    Connector, EventSink, Frame, TransportError, TransportEvent, TransportHandle,
    TransportResult, WebSocketConnector, WebSocketHandle,
};

#[cfg(test)]
pub(crate) mod test_helpers;



#[cfg(test)]
mod slot_tests;
