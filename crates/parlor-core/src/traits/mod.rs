// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the session core consumes.
//!
//! The core never talks to the network, the host page, or the router
//! directly: implementations of these traits are injected into the
//! controller, which keeps the session logic testable with mocks.

pub mod config;
pub mod host;
pub mod transport;

pub use config::ConfigSource;
pub use host::{HostNotifier, Navigator};
pub use transport::Transport;
