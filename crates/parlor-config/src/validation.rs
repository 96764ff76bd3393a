// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as recognized log levels and sane transport timeouts.

use crate::diagnostic::ConfigError;
use crate::model::ParlorConfig;

const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParlorConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate log level is recognized
    let level = config.log.level.trim();
    if !KNOWN_LOG_LEVELS.contains(&level) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{level}` is not one of: {}",
                KNOWN_LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate transport timeout is non-zero
    if config.transport.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "transport.timeout_secs must be at least 1".to_string(),
        });
    }

    // Validate server_url, when set, is non-empty and carries a scheme
    if let Some(url) = &config.transport.server_url {
        let url = url.trim();
        if url.is_empty() {
            errors.push(ConfigError::Validation {
                message: "transport.server_url must not be empty when set".to_string(),
            });
        } else if !(url.starts_with("ws://")
            || url.starts_with("wss://")
            || url.starts_with("http://")
            || url.starts_with("https://"))
        {
            errors.push(ConfigError::Validation {
                message: format!(
                    "transport.server_url `{url}` must start with ws://, wss://, http:// or https://"
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
