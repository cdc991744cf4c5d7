// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ledlink-remote: LED peer server.
//!
//! Serves the WebSocket endpoint LED clients connect to, answers liveness
//! probes and LED queries, and fans state changes out to every client.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// ledlink-remote: LED peer server
#[derive(Parser, Debug)]
#[command(name = "ledlink-remote")]
#[command(about = "WebSocket LED peer for ledlink clients")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Send an application Ping to each client at this interval
    #[arg(long)]
    ping_interval_secs: Option<u64>,

    /// Initial LED state
    #[arg(long)]
    led_on: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    info!("Starting ledlink-remote server");
    info!("  Bind address: {}", args.bind);
    if let Some(secs) = args.ping_interval_secs {
        info!("  Ping interval: {}s", secs);
    }

    let options = server::Options {
        ping_interval: args
            .ping_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
    };
    let state = state::ServerState::new(args.led_on);

    server::run(args.bind, state, options).await?;

    Ok(())
}
