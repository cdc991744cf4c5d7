// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tiered reconnect backoff.
//!
//! The delay between attempts is a step function of the number of consecutive
//! failed attempts. Early failures retry quickly; long outages settle into a
//! slow steady-state poll.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One step of the backoff table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffTier {
    /// Failure count from which this tier applies.
    pub min_attempts: u32,
    /// Delay between attempts in milliseconds.
    pub delay_ms: u64,
}

impl BackoffTier {
    pub const fn new(min_attempts: u32, delay_ms: u64) -> Self {
        BackoffTier {
            min_attempts,
            delay_ms,
        }
    }
}

/// Default tiers: 0-2 failures → 500ms, 3-5 → 4s, 6-9 → 10s, 10+ → 30s.
const DEFAULT_TIERS: [BackoffTier; 4] = [
    BackoffTier::new(0, 500),
    BackoffTier::new(3, 4_000),
    BackoffTier::new(6, 10_000),
    BackoffTier::new(10, 30_000),
];

/// Validated backoff table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    tiers: Vec<BackoffTier>,
}

impl Backoff {
    /// Builds a backoff table.
    ///
    /// The first tier must start at zero failures, thresholds must strictly
    /// increase and delays must never decrease.
    pub fn new(tiers: Vec<BackoffTier>) -> Result<Self> {
        match tiers.first() {
            Some(first) if first.min_attempts == 0 => {}
            Some(_) => {
                return Err(Error::Config(
                    "first backoff tier must start at 0 attempts".to_string(),
                ))
            }
            None => return Err(Error::Config("backoff table is empty".to_string())),
        }
        for pair in tiers.windows(2) {
            if pair[1].min_attempts <= pair[0].min_attempts {
                return Err(Error::Config(format!(
                    "backoff thresholds must increase: {} after {}",
                    pair[1].min_attempts, pair[0].min_attempts
                )));
            }
            if pair[1].delay_ms < pair[0].delay_ms {
                return Err(Error::Config(format!(
                    "backoff delays must not decrease: {}ms after {}ms",
                    pair[1].delay_ms, pair[0].delay_ms
                )));
            }
        }
        Ok(Backoff { tiers })
    }

    /// Returns the delay to wait after `attempts` consecutive failures.
    pub fn delay_for(&self, attempts: u32) -> Duration {
        self.tiers
            .iter()
            .rev()
            .find(|tier| attempts >= tier.min_attempts)
            .map(|tier| Duration::from_millis(tier.delay_ms))
            .unwrap_or_default()
    }

    pub fn tiers(&self) -> &[BackoffTier] {
        &self.tiers
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            tiers: DEFAULT_TIERS.to_vec(),
        }
    }
}
