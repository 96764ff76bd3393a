// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ConfigSource` implementation backed by the file/env loader.

use async_trait::async_trait;
use tracing::debug;

use parlor_core::error::ParlorError;
use parlor_core::traits::ConfigSource;
use parlor_core::types::WidgetSettings;

use crate::load_and_validate;

/// Loads [`WidgetSettings`] from the XDG config hierarchy on every call.
///
/// The session core re-reads settings on chat close, so edits to
/// `parlor.toml` take effect without re-embedding the widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConfigSource;

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn load(&self) -> Result<WidgetSettings, ParlorError> {
        let config = load_and_validate().map_err(|errors| {
            let rendered = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            ParlorError::Config(rendered)
        })?;

        let settings = config.widget_settings();
        debug!(
            hide_agent_info = settings.hide_agent_info,
            sound_enabled = settings.sound_enabled,
            "widget settings loaded"
        );
        Ok(settings)
    }
}
