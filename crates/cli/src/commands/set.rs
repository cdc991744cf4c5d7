// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use ledlink_core::ClientMessage;
use tracing::warn;

use super::wait_until;
use crate::error::{Error, Result};
use crate::session::SessionHandle;

/// Switches the LED and waits for the peer to report the new state.
///
/// The connect-time handshake is awaited first so that its reply cannot be
/// mistaken for the confirmation. Returns whether the LED is on.
pub async fn run(handle: &SessionHandle, on: bool, timeout_secs: u64) -> Result<bool> {
    let synced = wait_until(handle, timeout_secs, |s| s.reports > 0).await?;

    handle.send(ClientMessage::set_led(on)).await?;

    match wait_until(handle, timeout_secs, |s| s.reports > synced.reports).await {
        Ok(state) => Ok(state.store.led_on),
        Err(Error::Timeout(secs)) => {
            warn!(secs, "peer did not confirm the new LED state");
            Ok(handle.state().store.led_on)
        }
        Err(e) => Err(e),
    }
}
