// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Parlor widget.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

use parlor_core::types::WidgetSettings;

/// Top-level Parlor configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParlorConfig {
    /// Visitor-facing widget behavior settings.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Realtime transport settings.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl ParlorConfig {
    /// The settings snapshot the session core consumes.
    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            hide_agent_info: self.settings.hide_agent_info,
            sound_enabled: self.settings.sound_enabled,
            transcript_on_close: self.settings.transcript_on_close,
        }
    }
}

/// Widget behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Redact agent identity from messages shown to the visitor.
    #[serde(default)]
    pub hide_agent_info: bool,

    /// Play a notification sound for new messages from other participants.
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,

    /// Offer a transcript when the conversation closes.
    #[serde(default = "default_transcript_on_close")]
    pub transcript_on_close: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            hide_agent_info: false,
            sound_enabled: default_sound_enabled(),
            transcript_on_close: default_transcript_on_close(),
        }
    }
}

fn default_sound_enabled() -> bool {
    true
}

fn default_transcript_on_close() -> bool {
    true
}

/// Realtime transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Base URL of the messaging backend. `None` leaves endpoint selection
    /// to the embedding page.
    #[serde(default)]
    pub server_url: Option<String>,

    /// Request timeout for history and agent fetches.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
