// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parlor widget session core.

use thiserror::Error;

/// The primary error type used across the Parlor collaborator traits and
/// session operations.
#[derive(Debug, Error)]
pub enum ParlorError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failures (subscription, history fetch, agent fetch, transcript).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A call-state transition could not be derived from a message
    /// (e.g. a call-start event missing its provider payload).
    #[error("call state error: {0}")]
    CallState(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParlorError {
    /// Wraps an arbitrary error as a transport failure with context.
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let e = ParlorError::Transport {
            message: "history fetch failed".into(),
            source: None,
        };
        assert_eq!(e.to_string(), "transport error: history fetch failed");

        let e = ParlorError::CallState("no join url".into());
        assert_eq!(e.to_string(), "call state error: no join url");
    }

    #[test]
    fn transport_helper_preserves_source() {
        let e = ParlorError::transport("agent fetch", std::io::Error::other("boom"));
        match e {
            ParlorError::Transport { message, source } => {
                assert_eq!(message, "agent fetch");
                assert!(source.is_some());
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }
}
