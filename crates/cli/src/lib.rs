// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ledlink - persistent connection to an LED peer.
//!
//! This crate keeps a WebSocket connection to a small peer device alive and
//! mirrors the device's LED state locally.
//!
//! # Main Components
//!
//! - [`connection::ConnectionManager`] - reconnection and liveness state machine
//! - [`session::Session`] - LED protocol on top of the connection
//! - [`session::spawn`] - runs a session on a tokio task
//! - [`config`] - profiles, `ledlink.toml` and endpoint derivation
//! - [`Error`] - Error types for all operations
//!
//! # Example
//!
//! ```rust,ignore
//! use ledlink::config::Config;
//! use ledlink::connection::WebSocketConnector;
//! use ledlink::session::{spawn, Session};
//!
//! let config = Config::default().resolve(Some("http://192.168.4.1"), None)?;
//! let handle = spawn(Session::new(config, WebSocketConnector::new()));
//! let mut state = handle.subscribe();
//! state.wait_for(|s| s.reports > 0).await?;
//! println!("LED on: {}", handle.state().store.led_on);
//! handle.close().await?;
//! ```

mod cli;

pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod session;

pub use cli::{Cli, Command, LedState};
pub use error::{Error, Result};

/// Execute a CLI invocation. This is the main entry point for the binary and
/// provides a testable way to run commands without process execution.
pub async fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref(), cli.origin.as_deref(), cli.profile)?;
    let handle = commands::open(config);

    let result = match cli.command {
        Command::Watch => commands::watch::run(&handle).await,
        Command::Status { timeout_secs } => commands::status::run(&handle, timeout_secs)
            .await
            .map(|on| println!("{}", commands::led_label(on))),
        Command::Set {
            state,
            timeout_secs,
        } => commands::set::run(&handle, state.is_on(), timeout_secs)
            .await
            .map(|on| println!("{}", commands::led_label(on))),
    };

    handle.close().await?;
    result
}
