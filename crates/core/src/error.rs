// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ledlink-core operations.

use thiserror::Error;

/// All possible errors that can occur in ledlink-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("liveness sentinel '{0}' is not a protocol message")]
    Sentinel(String),
}

/// A specialized Result type for ledlink-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
