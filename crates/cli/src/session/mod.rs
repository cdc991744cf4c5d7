// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! LED session on top of the connection manager.
//!
//! [`Session`] speaks the JSON message protocol over a
//! [`ConnectionManager`](crate::connection::ConnectionManager): it queries the
//! LED state on every connect, answers application pings, and keeps a local
//! [`Store`](ledlink_core::Store) up to date. [`spawn`] drives a session on a
//! tokio task and hands back a [`SessionHandle`].

mod adapter;
mod runner;

pub use adapter::{Session, SessionState};
pub use runner::{spawn, SessionHandle};
