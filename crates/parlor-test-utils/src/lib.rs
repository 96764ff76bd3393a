// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parlor integration tests.
//!
//! Provides mock collaborators and harness infrastructure for fast,
//! deterministic tests without a live messaging backend.
//!
//! # Components
//!
//! - [`MockTransport`] - Scripted history pages, failure injection, call recording
//! - [`MockHost`] / [`MockNavigator`] - Host notification and navigation capture
//! - [`MockConfigSource`] - Fixed settings snapshots
//! - [`TestHarness`] - A fully wired controller stack over the mocks

pub mod harness;
pub mod mock_host;
pub mod mock_transport;

pub use harness::{wire_call_end, wire_call_start, wire_text, wire_trigger, TestHarness};
pub use mock_host::{MockConfigSource, MockHost, MockNavigator};
pub use mock_transport::MockTransport;
