// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parlor live-chat widget session core.
//!
//! This crate provides the error type, domain and wire types, and the
//! collaborator traits (transport, host notification, navigation, config)
//! consumed by the `parlor-room` session controller.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParlorError;
pub use types::{
    Agent, AgentPayload, Alert, CallRecord, CallStatus, HostEvent, IncomingCallAlert, Message,
    MessageKind, QueueInfo, Room, RoomEvent, Route, Sender, SoundState, UserInfo, WidgetSettings,
    WireMessage, WireSender, WireTimestamp,
};

pub use traits::{ConfigSource, HostNotifier, Navigator, Transport};
