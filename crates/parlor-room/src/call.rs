// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call state machine.
//!
//! Call status is derived from the message stream plus one room-level
//! snapshot field, so a tab opened mid-call can recover the state with no
//! live events yet: `None -> Ringing -> InProgress -> Ended`, with
//! `InProgressDifferentTab` reachable only from load-time reconciliation.
//!
//! The functions here are pure derivations; the controller commits their
//! results through the session store.

use chrono::{DateTime, Utc};

use parlor_core::error::ParlorError;
use parlor_core::types::{CallRecord, CallStatus, IncomingCallAlert, Message, MessageKind};

/// Custom-field key carrying the late-joinable provider's join URL.
const JITSI_CALL_URL_FIELD: &str = "jitsiCallUrl";

/// What load-time reconciliation decided.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadTransition {
    /// Leave call state untouched.
    Keep,
    /// A call is live in another session context; no ringing banner.
    DifferentTab {
        provider: MessageKind,
        time: DateTime<Utc>,
        url: Option<String>,
    },
    /// Re-run the incoming-call transition for this message.
    Ring(Message),
}

/// Derives the ringing banner and call record for a call-start message.
///
/// Fails when the message cannot yield a consistent alert (late-joinable
/// provider without its join URL); the caller degrades that to a visible
/// error alert, never a dropped message.
pub fn incoming_call(message: &Message) -> Result<(IncomingCallAlert, CallRecord), ParlorError> {
    let provider = match &message.kind {
        Some(kind) if kind.is_call_start() => kind.clone(),
        other => {
            return Err(ParlorError::CallState(format!(
                "message {} is not a call start (type {other:?})",
                message.id
            )));
        }
    };

    let url = join_url(message)?;

    Ok((
        IncomingCallAlert {
            show: true,
            provider,
            caller_username: message.sender.username.clone(),
            rid: message.rid.clone(),
            time: Some(message.ts),
            call_id: Some(message.id.clone()),
            url,
        },
        CallRecord {
            status: CallStatus::Ringing,
            time: message.ts,
        },
    ))
}

/// The newest call-start message of a chronologically ordered list.
pub fn latest_call_message(messages: &[Message]) -> Option<&Message> {
    messages
        .iter()
        .rev()
        .find(|m| m.kind.as_ref().is_some_and(MessageKind::is_call_start))
}

/// Reconciles call state after a history load.
///
/// Idempotent with respect to an already-ongoing call: if one is active,
/// nothing in the loaded history may override it.
pub fn reconcile_on_load(
    ongoing: Option<&CallRecord>,
    snapshot_status: Option<CallStatus>,
    messages: &[Message],
) -> LoadTransition {
    if ongoing.is_some_and(|c| c.status.is_ongoing()) {
        return LoadTransition::Keep;
    }

    let Some(latest) = latest_call_message(messages) else {
        return LoadTransition::Keep;
    };

    let provider = match &latest.kind {
        Some(kind) => kind.clone(),
        None => return LoadTransition::Keep,
    };

    // A late-joinable link means the call is live somewhere regardless of
    // what the room snapshot says.
    if provider.joinable_from_other_tabs() {
        return LoadTransition::DifferentTab {
            provider,
            time: latest.ts,
            url: join_url(latest).ok().flatten(),
        };
    }

    match snapshot_status {
        Some(CallStatus::InProgress) => LoadTransition::DifferentTab {
            provider,
            time: latest.ts,
            url: None,
        },
        Some(CallStatus::Ringing) => LoadTransition::Ring(latest.clone()),
        _ => LoadTransition::Keep,
    }
}

/// Extracts the provider-specific join URL from a call-start message.
///
/// Only the late-joinable provider carries one; its absence there is an
/// error. The live-ringing provider never has a URL.
fn join_url(message: &Message) -> Result<Option<String>, ParlorError> {
    match &message.kind {
        Some(MessageKind::JitsiCallStarted) => {
            let url = message
                .custom_fields
                .as_ref()
                .and_then(|cf| cf.get(JITSI_CALL_URL_FIELD))
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    ParlorError::CallState(format!(
                        "call-start message {} carries no join url",
                        message.id
                    ))
                })?;
            Ok(Some(url.to_string()))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parlor_core::types::Sender;

    fn make_message(id: &str, millis: i64, kind: Option<MessageKind>) -> Message {
        Message {
            id: id.to_string(),
            rid: Some("room-1".into()),
            ts: Utc.timestamp_millis_opt(millis).unwrap(),
            kind,
            msg: String::new(),
            sender: Sender {
                id: "agent-1".into(),
                username: Some("ada".into()),
            },
            edited_at: None,
            end_ts: None,
            custom_fields: None,
            trigger: false,
        }
    }

    fn jitsi_start(id: &str, millis: i64, url: Option<&str>) -> Message {
        let mut message = make_message(id, millis, Some(MessageKind::JitsiCallStarted));
        if let Some(url) = url {
            message.custom_fields = Some(serde_json::json!({ JITSI_CALL_URL_FIELD: url }));
        }
        message
    }

    #[test]
    fn webrtc_start_rings_with_visible_alert() {
        let message = make_message("c1", 100, Some(MessageKind::WebRtcCallStarted));
        let (alert, record) = incoming_call(&message).unwrap();
        assert!(alert.show);
        assert_eq!(alert.provider, MessageKind::WebRtcCallStarted);
        assert_eq!(alert.caller_username.as_deref(), Some("ada"));
        assert!(alert.url.is_none());
        assert_eq!(record.status, CallStatus::Ringing);
        assert_eq!(record.time, message.ts);
    }

    #[test]
    fn jitsi_start_carries_join_url() {
        let message = jitsi_start("c1", 100, Some("https://meet.example/room-1"));
        let (alert, _) = incoming_call(&message).unwrap();
        assert_eq!(alert.url.as_deref(), Some("https://meet.example/room-1"));
    }

    #[test]
    fn jitsi_start_without_url_is_an_error() {
        let message = jitsi_start("c1", 100, None);
        let err = incoming_call(&message).unwrap_err();
        assert!(matches!(err, ParlorError::CallState(_)));
    }

    #[test]
    fn non_call_message_is_rejected() {
        let message = make_message("m1", 100, None);
        assert!(incoming_call(&message).is_err());
    }

    #[test]
    fn latest_call_message_picks_newest() {
        let messages = vec![
            make_message("c1", 100, Some(MessageKind::WebRtcCallStarted)),
            make_message("m1", 200, None),
            jitsi_start("c2", 300, Some("https://meet.example/x")),
            make_message("m2", 400, None),
        ];
        assert_eq!(latest_call_message(&messages).map(|m| m.id.as_str()), Some("c2"));
    }

    #[test]
    fn ongoing_call_blocks_reconciliation() {
        let ongoing = CallRecord {
            status: CallStatus::Ringing,
            time: Utc.timestamp_millis_opt(50).unwrap(),
        };
        let messages = vec![jitsi_start("c1", 100, Some("https://meet.example/x"))];
        assert_eq!(
            reconcile_on_load(Some(&ongoing), None, &messages),
            LoadTransition::Keep
        );
    }

    #[test]
    fn ended_call_does_not_block_reconciliation() {
        let ended = CallRecord {
            status: CallStatus::Ended,
            time: Utc.timestamp_millis_opt(50).unwrap(),
        };
        let messages = vec![jitsi_start("c1", 100, Some("https://meet.example/x"))];
        assert!(matches!(
            reconcile_on_load(Some(&ended), None, &messages),
            LoadTransition::DifferentTab { .. }
        ));
    }

    #[test]
    fn joinable_provider_wins_regardless_of_snapshot() {
        let messages = vec![jitsi_start("c1", 100, Some("https://meet.example/x"))];
        let transition = reconcile_on_load(None, None, &messages);
        match transition {
            LoadTransition::DifferentTab { provider, url, .. } => {
                assert_eq!(provider, MessageKind::JitsiCallStarted);
                assert_eq!(url.as_deref(), Some("https://meet.example/x"));
            }
            other => panic!("expected DifferentTab, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_in_progress_yields_different_tab_without_url() {
        let messages = vec![make_message("c1", 100, Some(MessageKind::WebRtcCallStarted))];
        let transition = reconcile_on_load(None, Some(CallStatus::InProgress), &messages);
        match transition {
            LoadTransition::DifferentTab { provider, url, .. } => {
                assert_eq!(provider, MessageKind::WebRtcCallStarted);
                assert!(url.is_none());
            }
            other => panic!("expected DifferentTab, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_ringing_replays_incoming_call() {
        let messages = vec![make_message("c1", 100, Some(MessageKind::WebRtcCallStarted))];
        let transition = reconcile_on_load(None, Some(CallStatus::Ringing), &messages);
        assert!(matches!(transition, LoadTransition::Ring(m) if m.id == "c1"));
    }

    #[test]
    fn no_call_messages_keeps_state() {
        let messages = vec![make_message("m1", 100, None)];
        assert_eq!(
            reconcile_on_load(None, Some(CallStatus::InProgress), &messages),
            LoadTransition::Keep
        );
    }
}
