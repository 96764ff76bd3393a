// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent-identity redaction.
//!
//! When a room is configured to hide agent info, messages from anyone but
//! the local user keep only the sender's identifier. Applied on both the
//! realtime and history paths, before messages reach session state.

use parlor_core::types::{Message, Sender, UserInfo};

/// Strips sender identity when the privacy flag is set and the sender is
/// not the local user. Pure; a no-op when the flag is off.
pub fn redact(message: Message, local_user: Option<&UserInfo>, hide_agent_info: bool) -> Message {
    if !hide_agent_info {
        return message;
    }

    let is_local = local_user.is_some_and(|u| u.id == message.sender.id);
    if is_local {
        return message;
    }

    Message {
        sender: Sender::id_only(message.sender.id),
        ..message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_message(sender_id: &str) -> Message {
        Message {
            id: "m1".into(),
            rid: None,
            ts: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            kind: None,
            msg: "hello".into(),
            sender: Sender {
                id: sender_id.into(),
                username: Some("ada".into()),
            },
            edited_at: None,
            end_ts: None,
            custom_fields: None,
            trigger: false,
        }
    }

    fn visitor() -> UserInfo {
        UserInfo {
            id: "visitor-1".into(),
            username: Some("visitor".into()),
        }
    }

    #[test]
    fn noop_when_flag_is_off() {
        let message = make_message("agent-1");
        let out = redact(message.clone(), Some(&visitor()), false);
        assert_eq!(out, message);
    }

    #[test]
    fn strips_identity_of_other_senders() {
        let out = redact(make_message("agent-1"), Some(&visitor()), true);
        assert_eq!(out.sender.id, "agent-1");
        assert!(out.sender.username.is_none());
        // Everything else survives
        assert_eq!(out.msg, "hello");
    }

    #[test]
    fn keeps_local_user_identity() {
        let out = redact(make_message("visitor-1"), Some(&visitor()), true);
        assert_eq!(out.sender.username.as_deref(), Some("ada"));
    }

    #[test]
    fn redacts_everything_without_local_user() {
        let out = redact(make_message("agent-1"), None, true);
        assert!(out.sender.username.is_none());
    }
}
