// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Room/session controller for the Parlor live-chat widget.
//!
//! Maintains the in-memory conversation state for a single chat room and
//! mediates between the realtime transport and the rendering/host layer:
//! merging realtime pushes with paginated history into one consistent,
//! order-preserving message list while tracking the orthogonal call
//! lifecycle derived from the same event stream.
//!
//! The entry point is [`RoomController`], operating over an injected
//! [`SessionStore`].

pub mod call;
pub mod commands;
pub mod controller;
pub mod merge;
pub mod normalize;
pub mod redact;
pub mod store;
pub mod unread;

pub use call::LoadTransition;
pub use commands::Command;
pub use controller::RoomController;
pub use store::{SessionState, SessionStore};
