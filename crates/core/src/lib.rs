// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ledlink-core: Shared library for the ledlink client and peer server
//!
//! This crate provides the wire protocol spoken over the persistent channel
//! and the application store that inbound messages are reduced into.

pub mod error;
pub mod protocol;
pub mod store;

pub use error::{Error, Result};
pub use protocol::{is_liveness_sentinel, ClientMessage, ServerMessage, LIVENESS_PING, LIVENESS_PONG};
pub use store::Store;
