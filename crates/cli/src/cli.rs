// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Profile;

const QUICKSTART_HELP: &str = "\
Get started:
  ledlink-remote --bind 127.0.0.1:7890   Run a peer locally
  ledlink --origin http://127.0.0.1:7890 watch
  ledlink set on                         Switch the LED on";

/// Default time `status` and `set` wait for the peer.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "ledlink")]
#[command(version, about = "Keep a persistent connection to an LED peer and control it")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Config file (defaults to ./ledlink.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Peer origin, e.g. http://192.168.4.1
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Timing profile
    #[arg(long, global = true, value_enum)]
    pub profile: Option<Profile>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print connection and LED changes until interrupted
    Watch,

    /// Print the LED state reported by the peer
    Status {
        /// Seconds to wait for the peer
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },

    /// Switch the LED on or off
    Set {
        /// Desired state
        #[arg(value_enum)]
        state: LedState,

        /// Seconds to wait for the peer
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
}

/// LED state as given on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LedState {
    On,
    Off,
}

impl LedState {
    pub fn is_on(self) -> bool {
        self == LedState::On
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
