// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is read from an optional `ledlink.toml` and includes:
//! - `origin`: The peer's origin (e.g., "http://ledlink.local") the endpoint is derived from
//! - `profile`: `development` or `production`, selecting keepalive and send defaults
//! - Optional overrides for the tick period, keepalive timings and backoff tiers

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::connection::{Backoff, BackoffTier};
use crate::error::{Error, Result};

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "ledlink.toml";

/// Origin used when neither the config file nor the command line names one.
pub const DEFAULT_ORIGIN: &str = "http://localhost:7890";

/// Fixed path of the WebSocket endpoint on the peer.
pub const ENDPOINT_PATH: &str = "/ws";

/// Deployment profile.
///
/// Development uses longer keepalive timeouts to tolerate debugger pauses and
/// downgrades sends while disconnected to a logged no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Development,
    #[default]
    Production,
}

/// Settings consumed by the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// WebSocket endpoint of the peer.
    pub url: Url,
    /// Period of the background clock that drives reconnection.
    pub tick_interval: Duration,
    /// Quiet period after which a liveness probe is sent.
    pub keepalive_interval: Duration,
    /// Silence after which the connection is presumed dead.
    pub keepalive_timeout: Duration,
    /// Delay between connect attempts, by consecutive failure count.
    pub backoff: Backoff,
    /// Log and drop sends while disconnected instead of failing.
    pub diagnostic_sends: bool,
}

impl ConnectionConfig {
    /// Creates the default settings for a profile.
    pub fn for_profile(profile: Profile, url: Url) -> Self {
        let (keepalive_interval, keepalive_timeout) = match profile {
            Profile::Development => (Duration::from_secs(20), Duration::from_secs(40)),
            Profile::Production => (Duration::from_secs(5), Duration::from_secs(15)),
        };
        ConnectionConfig {
            url,
            tick_interval: Duration::from_millis(200),
            keepalive_interval,
            keepalive_timeout,
            backoff: Backoff::default(),
            diagnostic_sends: profile == Profile::Development,
        }
    }

    /// Checks the timing invariants the manager relies on.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(Error::Config("tick interval must be positive".to_string()));
        }
        if self.keepalive_interval.is_zero() {
            return Err(Error::Config(
                "keepalive interval must be positive".to_string(),
            ));
        }
        if self.keepalive_timeout <= self.keepalive_interval {
            return Err(Error::Config(format!(
                "keepalive timeout ({}ms) must exceed keepalive interval ({}ms)",
                self.keepalive_timeout.as_millis(),
                self.keepalive_interval.as_millis()
            )));
        }
        Ok(())
    }
}

/// Contents of `ledlink.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the peer, e.g. `http://ledlink.local:80`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Deployment profile (default: production).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// Background clock period in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_ms: Option<u64>,
    /// Liveness probe interval in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keepalive_interval_ms: Option<u64>,
    /// Liveness timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keepalive_timeout_ms: Option<u64>,
    /// Overrides the profile's handling of sends while disconnected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_sends: Option<bool>,
    /// Backoff tiers, lowest attempt count first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backoff: Vec<BackoffTier>,
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `ledlink.toml` from `dir` if present, otherwise the defaults.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the file settings into connection settings.
    ///
    /// `origin` and `profile` take precedence over the file when given.
    pub fn resolve(&self, origin: Option<&str>, profile: Option<Profile>) -> Result<ConnectionConfig> {
        let origin = origin
            .or(self.origin.as_deref())
            .unwrap_or(DEFAULT_ORIGIN);
        let profile = profile.or(self.profile).unwrap_or_default();

        let mut config = ConnectionConfig::for_profile(profile, endpoint_from_origin(origin)?);
        if let Some(ms) = self.tick_ms {
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.keepalive_interval_ms {
            config.keepalive_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.keepalive_timeout_ms {
            config.keepalive_timeout = Duration::from_millis(ms);
        }
        if let Some(diagnostic) = self.diagnostic_sends {
            config.diagnostic_sends = diagnostic;
        }
        if !self.backoff.is_empty() {
            config.backoff = Backoff::new(self.backoff.clone())?;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Derives the WebSocket endpoint from a page origin.
///
/// `http` maps to `ws` and `https` to `wss`; host and port are kept and the
/// path is always [`ENDPOINT_PATH`].
pub fn endpoint_from_origin(origin: &str) -> Result<Url> {
    let mut url = Url::parse(origin)
        .map_err(|e| Error::Config(format!("invalid origin '{}': {}", origin, e)))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(Error::Config(format!(
                "invalid origin '{}': unsupported scheme '{}'",
                origin, other
            )))
        }
    };
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::Config(format!("invalid origin '{}': missing host", origin)));
    }
    url.set_scheme(scheme)
        .map_err(|()| Error::Config(format!("invalid origin '{}'", origin)))?;
    url.set_path(ENDPOINT_PATH);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
