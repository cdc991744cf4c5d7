// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod set;
pub mod status;
pub mod watch;

use std::path::Path;
use std::time::Duration;

use crate::config::{Config, ConnectionConfig, Profile};
use crate::connection::WebSocketConnector;
use crate::error::{Error, Result};
use crate::session::{spawn, Session, SessionHandle, SessionState};

/// Resolves connection settings from the config file and command-line overrides.
///
/// Without an explicit path, `ledlink.toml` in the working directory is used
/// when it exists.
pub fn load_config(
    path: Option<&Path>,
    origin: Option<&str>,
    profile: Option<Profile>,
) -> Result<ConnectionConfig> {
    let file = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&std::env::current_dir()?)?,
    };
    file.resolve(origin, profile)
}

/// Starts a session against a real peer.
pub fn open(config: ConnectionConfig) -> SessionHandle {
    spawn(Session::new(config, WebSocketConnector::new()))
}

/// Waits until the session state satisfies `ready`.
///
/// Fails with [`Error::Timeout`] after `timeout_secs`.
pub async fn wait_until(
    handle: &SessionHandle,
    timeout_secs: u64,
    ready: impl FnMut(&SessionState) -> bool,
) -> Result<SessionState> {
    let mut state = handle.subscribe();
    let waited = tokio::time::timeout(Duration::from_secs(timeout_secs), state.wait_for(ready)).await;
    match waited {
        Ok(Ok(state)) => Ok(*state),
        Ok(Err(_)) => Err(Error::SessionClosed),
        Err(_) => Err(Error::Timeout(timeout_secs)),
    }
}

/// Human-readable LED state.
pub fn led_label(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
