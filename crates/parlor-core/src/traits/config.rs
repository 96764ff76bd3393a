// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait.

use async_trait::async_trait;

use crate::error::ParlorError;
use crate::types::WidgetSettings;

/// Provides the settings snapshot the session core consumes.
///
/// Reloaded on chat close so a mid-conversation settings change (e.g. the
/// agent-privacy flag) takes effect for the next room.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<WidgetSettings, ParlorError>;
}
