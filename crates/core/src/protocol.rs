// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for client-peer communication.
//!
//! Every protocol message is a JSON text frame carrying a `type` tag:
//! - Client sends LED updates, state queries and handshake replies
//! - Peer sends state reports and handshake pings
//!
//! The bare text frames `"ping"` and `"pong"` are transport liveness probes.
//! They live outside the JSON envelope and are never decoded as messages.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Liveness probe sent by the client when the channel has been quiet.
pub const LIVENESS_PING: &str = "ping";

/// Liveness reply sent by the peer in answer to [`LIVENESS_PING`].
pub const LIVENESS_PONG: &str = "pong";

/// Returns true if the text frame is one of the transport liveness probes.
pub fn is_liveness_sentinel(text: &str) -> bool {
    text == LIVENESS_PING || text == LIVENESS_PONG
}

/// Messages sent from client to peer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Reply to a peer-initiated [`ServerMessage::Ping`].
    Pong,

    /// Switch the LED on or off.
    SetLedStatus {
        /// Desired LED state.
        status: bool,
    },

    /// Ask the peer for the authoritative LED state.
    ///
    /// Sent on every (re)connect.
    QueryLedStatus,
}

/// Messages sent from peer to client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Application-level handshake; the client answers with a Pong.
    Ping,

    /// Report of the current LED state.
    LedStatus {
        /// Whether the LED is lit.
        status: bool,
    },

    /// Any tag this client does not understand.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Creates a SetLedStatus message.
    pub fn set_led(status: bool) -> Self {
        ClientMessage::SetLedStatus { status }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        reject_sentinel(s)?;
        Ok(serde_json::from_str(s)?)
    }
}

impl ServerMessage {
    /// Creates a LedStatus message.
    pub fn led_status(status: bool) -> Self {
        ServerMessage::LedStatus { status }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes the message from JSON.
    ///
    /// Unrecognised tags decode to [`ServerMessage::Unknown`]; malformed JSON
    /// is an error.
    pub fn from_json(s: &str) -> Result<Self> {
        reject_sentinel(s)?;
        Ok(serde_json::from_str(s)?)
    }
}

fn reject_sentinel(s: &str) -> Result<()> {
    if is_liveness_sentinel(s) {
        return Err(Error::Sentinel(s.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
