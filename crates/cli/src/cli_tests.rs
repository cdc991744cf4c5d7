// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

#[test]
fn parses_watch_with_globals() {
    let cli = Cli::try_parse_from([
        "ledlink",
        "--origin",
        "http://10.0.0.2",
        "--profile",
        "development",
        "-v",
        "watch",
    ])
    .unwrap();
    assert_eq!(cli.command, Command::Watch);
    assert_eq!(cli.origin.as_deref(), Some("http://10.0.0.2"));
    assert_eq!(cli.profile, Some(Profile::Development));
    assert!(cli.verbose);
}

#[test]
fn globals_are_accepted_after_subcommand() {
    let cli = Cli::try_parse_from(["ledlink", "status", "--config", "x.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    assert_eq!(
        cli.command,
        Command::Status {
            timeout_secs: DEFAULT_TIMEOUT_SECS
        }
    );
}

#[parameterized(
    on = { "on", LedState::On },
    off = { "off", LedState::Off },
)]
fn parses_set(arg: &str, expected: LedState) {
    let cli = Cli::try_parse_from(["ledlink", "set", arg, "--timeout-secs", "3"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Set {
            state: expected,
            timeout_secs: 3
        }
    );
}

#[parameterized(
    bad_state = { &["ledlink", "set", "maybe"] },
    bad_profile = { &["ledlink", "--profile", "staging", "watch"] },
    missing_command = { &["ledlink"] },
)]
fn rejects_invalid_arguments(args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn led_state_is_on() {
    assert!(LedState::On.is_on());
    assert!(!LedState::Off.is_on());
}

#[test]
fn command_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
