// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime transport trait for the messaging backend.

use async_trait::async_trait;

use crate::error::ParlorError;
use crate::types::{Agent, WireMessage};

/// Connection to the realtime messaging backend.
///
/// Subscription management and fetches live here; inbound pushes for a
/// subscribed room are delivered by the wiring layer as
/// [`crate::types::RoomEvent`]s. The core assumes `unsubscribe_all` is safe
/// to call when nothing is subscribed.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Subscribes to a room's event stream.
    async fn subscribe_room(&self, rid: &str) -> Result<(), ParlorError>;

    /// Tears down every active subscription.
    async fn unsubscribe_all(&self) -> Result<(), ParlorError>;

    /// Fetches a page of room history, newest first.
    ///
    /// `limit: None` requests the backend's default page size.
    async fn load_messages(
        &self,
        rid: &str,
        limit: Option<usize>,
    ) -> Result<Vec<WireMessage>, ParlorError>;

    /// Fetches the agent record currently serving a room.
    async fn agent(&self, rid: &str) -> Result<Agent, ParlorError>;

    /// Asks the backend to capture a conversation transcript.
    async fn request_transcript(&self, rid: &str) -> Result<(), ParlorError>;
}
