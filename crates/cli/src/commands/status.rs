// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::wait_until;
use crate::error::Result;
use crate::session::SessionHandle;

/// Waits for the peer's answer to the connect-time query.
///
/// Returns whether the LED is on.
pub async fn run(handle: &SessionHandle, timeout_secs: u64) -> Result<bool> {
    let state = wait_until(handle, timeout_secs, |s| s.reports > 0).await?;
    Ok(state.store.led_on)
}
