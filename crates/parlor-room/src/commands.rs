// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend-issued commands.
//!
//! Commands arrive as messages of the `command` type with the command name
//! in the body. The set is closed: anything unrecognized becomes the
//! `Unknown` variant, which the controller logs instead of silently
//! dropping.

use strum::EnumString;

/// A recognized backend command.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum Command {
    /// Offer the visitor a conversation transcript.
    #[strum(serialize = "promptTranscript")]
    PromptTranscript,
    /// Anything the widget does not implement, preserved for logging.
    #[strum(default)]
    Unknown(String),
}

impl Command {
    /// Parses a command message body. Never fails: unrecognized names map
    /// to [`Command::Unknown`].
    pub fn from_body(body: &str) -> Self {
        let name = body.trim();
        name.parse()
            .unwrap_or_else(|_| Self::Unknown(name.to_string()))
    }
}
