// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use ledlink_core::Store;

use super::*;
use crate::connection::ConnectionStatus;

fn state(status: ConnectionStatus, led_on: bool, reports: u64) -> SessionState {
    SessionState {
        status,
        store: Store { led_on },
        reports,
    }
}

#[test]
fn initial_state_shows_status_only() {
    let lines = describe_change(None, SessionState::default());
    assert_eq!(lines, vec!["status: disconnected"]);
}

#[test]
fn first_report_shows_led_even_when_off() {
    let prev = state(ConnectionStatus::Connected, false, 0);
    let next = state(ConnectionStatus::Connected, false, 1);
    assert_eq!(describe_change(Some(prev), next), vec!["led: off"]);
}

#[test]
fn status_and_led_change_together() {
    let prev = state(ConnectionStatus::Connecting, false, 0);
    let next = state(ConnectionStatus::Connected, true, 1);
    assert_eq!(
        describe_change(Some(prev), next),
        vec!["status: connected", "led: on"]
    );
}

#[test]
fn repeated_report_prints_nothing() {
    let prev = state(ConnectionStatus::Connected, true, 1);
    let next = state(ConnectionStatus::Connected, true, 2);
    assert!(describe_change(Some(prev), next).is_empty());
}

#[test]
fn disconnect_keeps_last_led() {
    let prev = state(ConnectionStatus::Connected, true, 3);
    let next = state(ConnectionStatus::Disconnected, true, 3);
    assert_eq!(describe_change(Some(prev), next), vec!["status: disconnected"]);
}
