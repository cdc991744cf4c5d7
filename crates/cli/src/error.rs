// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::connection::TransportError;

/// All possible errors that can occur in the ledlink library.
///
/// Transport failures during steady-state operation never surface here; they
/// are absorbed by the reconnect path and only show up as status changes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not connected\n  hint: wait for the connection status to become 'connected' before sending")]
    NotConnected,

    #[error("session closed")]
    SessionClosed,

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ledlink_core::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {0}s waiting for the peer")]
    Timeout(u64),
}

/// A specialized Result type for ledlink operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
