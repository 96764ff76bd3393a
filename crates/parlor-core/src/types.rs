// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the session core and its collaborators.
//!
//! Domain types (`Message`, `CallRecord`, `Agent`, ...) are what the session
//! state holds after normalization. Wire types (`WireMessage`,
//! `WireTimestamp`) mirror the realtime backend's JSON shape and only exist
//! at the transport boundary.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default lifetime for self-expiring alerts.
pub const ALERT_TIMEOUT_MS: u64 = 5000;

/// Local widget participant identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// A message sender. After redaction only `id` survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Sender {
    /// Sender reduced to its identifier only.
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
        }
    }
}

/// Agent record for a room, as delivered by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// When set, the agent's identity must not reach the embedding host
    /// or the visitor-facing state.
    #[serde(default)]
    pub hidden_info: bool,
}

/// Agent payload delivered to the embedding host.
///
/// Identity fields are withheld entirely when the agent is marked hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub hidden_info: bool,
}

impl From<&Agent> for AgentPayload {
    fn from(agent: &Agent) -> Self {
        if agent.hidden_info {
            return Self {
                hidden_info: true,
                ..Self::default()
            };
        }
        Self {
            username: agent.username.clone(),
            name: agent.name.clone(),
            status: agent.status.clone(),
            hidden_info: false,
        }
    }
}

/// Room snapshot identifying the active conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    /// Last-known call status recorded server-side. Used only for load-time
    /// call reconciliation when a tab opens mid-call.
    #[serde(default)]
    pub call_status: Option<CallStatus>,
    #[serde(default)]
    pub served_by: Option<Sender>,
}

impl Room {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            call_status: None,
            served_by: None,
        }
    }
}

/// A visitor's place in the waiting queue before agent assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueInfo {
    pub spot: u32,
    #[serde(default)]
    pub message: Option<String>,
}

/// Lifecycle status of a room's call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CallStatus {
    Ringing,
    InProgress,
    /// The call is live, but joined from another session context (tab).
    InProgressDifferentTab,
    Ended,
}

impl CallStatus {
    /// Whether a call in this status is still active and must not be
    /// overridden by load-time reconciliation.
    pub fn is_ongoing(self) -> bool {
        matches!(
            self,
            Self::Ringing | Self::InProgress | Self::InProgressDifferentTab
        )
    }
}

/// The single active call of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub status: CallStatus,
    pub time: DateTime<Utc>,
}

/// Banner state for an incoming or joinable call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCallAlert {
    /// Whether the ringing banner is shown. Hidden for calls already in
    /// progress in another tab.
    pub show: bool,
    pub provider: MessageKind,
    pub caller_username: Option<String>,
    pub rid: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub call_id: Option<String>,
    /// Join URL, present only for providers with late-joinable links.
    pub url: Option<String>,
}

/// Ephemeral, self-expiring notice surfaced to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: String,
    pub content: String,
    pub is_error: bool,
    pub timeout_ms: u64,
}

impl Alert {
    /// A timed, dismissible error alert with a fresh id.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            is_error: true,
            timeout_ms: ALERT_TIMEOUT_MS,
        }
    }
}

/// Sound notification state: an enable flag plus a one-shot play trigger
/// that the rendering layer clears after playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundState {
    pub enabled: bool,
    pub play: bool,
}

impl Default for SoundState {
    fn default() -> Self {
        Self {
            enabled: true,
            play: false,
        }
    }
}

/// Settings snapshot the session core consumes from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSettings {
    /// When set, agent identity is redacted from messages of other senders.
    pub hide_agent_info: bool,
    /// Initial value for the sound-on-new-message policy.
    pub sound_enabled: bool,
    /// Capture a transcript when the conversation closes.
    pub transcript_on_close: bool,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            hide_agent_info: false,
            sound_enabled: true,
            transcript_on_close: true,
        }
    }
}

/// Parameters used when creating a new room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoomParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

/// Recognized message type tags.
///
/// Unrecognized tags are preserved verbatim in `Other` rather than dropped,
/// so system messages the core does not act on still reach the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
pub enum MessageKind {
    #[strum(serialize = "livechat-close")]
    Close,
    #[strum(serialize = "command")]
    Command,
    #[strum(serialize = "livechat_webrtc_video_call")]
    WebRtcCallStarted,
    #[strum(serialize = "jitsi_call_started")]
    JitsiCallStarted,
    #[strum(default)]
    Other(String),
}

impl MessageKind {
    /// Parses a wire type tag. Never fails: unknown tags map to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse()
            .unwrap_or_else(|_| Self::Other(tag.to_string()))
    }

    /// Whether this tag starts a call.
    pub fn is_call_start(&self) -> bool {
        matches!(self, Self::WebRtcCallStarted | Self::JitsiCallStarted)
    }

    /// Whether this provider's join link stays valid for late joiners,
    /// as opposed to one requiring live ringing state.
    pub fn joinable_from_other_tabs(&self) -> bool {
        matches!(self, Self::JitsiCallStarted)
    }
}

/// A normalized message as held in session state.
///
/// Invariants maintained by the merger: `id` is unique within the list and
/// the list stays sorted ascending by `ts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub rid: Option<String>,
    pub ts: DateTime<Utc>,
    pub kind: Option<MessageKind>,
    pub msg: String,
    pub sender: Sender,
    pub edited_at: Option<DateTime<Utc>>,
    /// End timestamp of a call this message terminates.
    pub end_ts: Option<DateTime<Utc>>,
    pub custom_fields: Option<serde_json::Value>,
    /// Proactively-shown greeting message, retained across history reloads.
    pub trigger: bool,
}

impl Message {
    /// Whether the renderer displays this message as a bubble.
    /// Control messages (close, command, unrecognized system types) are not
    /// rendered and never count toward unread or sound.
    pub fn is_renderable(&self) -> bool {
        matches!(
            self.kind,
            None | Some(MessageKind::WebRtcCallStarted) | Some(MessageKind::JitsiCallStarted)
        )
    }

    /// Converts back to the wire shape with canonical RFC3339 timestamps.
    pub fn to_wire(&self) -> WireMessage {
        WireMessage {
            id: self.id.clone(),
            kind: self.kind.as_ref().map(|k| k.to_string()),
            sender: Some(WireSender {
                id: self.sender.id.clone(),
                username: self.sender.username.clone(),
            }),
            msg: Some(self.msg.clone()),
            ts: Some(WireTimestamp::Rfc3339(self.ts.to_rfc3339())),
            rid: self.rid.clone(),
            custom_fields: self.custom_fields.clone(),
            end_ts: self.end_ts.map(|t| WireTimestamp::Rfc3339(t.to_rfc3339())),
            edited_at: self
                .edited_at
                .map(|t| WireTimestamp::Rfc3339(t.to_rfc3339())),
            trigger: self.trigger,
        }
    }
}

/// Raw inbound message in the realtime backend's JSON shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "u", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<WireSender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<WireTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    #[serde(
        rename = "customFields",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_fields: Option<serde_json::Value>,
    #[serde(rename = "endTs", default, skip_serializing_if = "Option::is_none")]
    pub end_ts: Option<WireTimestamp>,
    #[serde(rename = "editedAt", default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<WireTimestamp>,
    #[serde(default)]
    pub trigger: bool,
}

/// Sender block of a wire message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSender {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Timestamp as it appears on the wire: epoch milliseconds, an RFC3339
/// string, or a Mongo-style `{"$date": ...}` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Millis(i64),
    Rfc3339(String),
    Wrapped {
        #[serde(rename = "$date")]
        millis: i64,
    },
}

impl WireTimestamp {
    /// Converts to a canonical UTC timestamp. `None` if out of range or
    /// unparseable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) | Self::Wrapped { millis: ms } => {
                Utc.timestamp_millis_opt(*ms).single()
            }
            Self::Rfc3339(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Realtime events delivered for a subscribed room.
///
/// A closed set: the wiring layer maps raw subscription callbacks onto these
/// variants, so unknown event names cannot silently register handlers.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    Message(WireMessage),
    Typing { username: String, typing: bool },
    AgentChange(Agent),
    AgentStatusChange(String),
    QueuePositionChange(QueueInfo),
}

/// Events delivered to the embedding host page.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ChatEnded,
    AssignAgent(AgentPayload),
    AgentStatusChange(AgentPayload),
    QueuePositionChange(QueueInfo),
}

impl HostEvent {
    /// The callback name the host page listens on.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChatEnded => "chat-ended",
            Self::AssignAgent(_) => "assign-agent",
            Self::AgentStatusChange(_) => "agent-status-change",
            Self::QueuePositionChange(_) => "queue-position-change",
        }
    }
}

/// Widget-internal navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Route {
    #[strum(serialize = "/")]
    Home,
    #[strum(serialize = "/chat-finished")]
    ChatFinished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_kind_round_trips_known_tags() {
        for tag in [
            "livechat-close",
            "command",
            "livechat_webrtc_video_call",
            "jitsi_call_started",
        ] {
            let kind = MessageKind::from_tag(tag);
            assert_eq!(kind.to_string(), tag);
        }
    }

    #[test]
    fn message_kind_preserves_unknown_tags() {
        let kind = MessageKind::from_tag("uj");
        assert_eq!(kind, MessageKind::Other("uj".to_string()));
        assert!(!kind.is_call_start());
    }

    #[test]
    fn only_jitsi_is_joinable_from_other_tabs() {
        assert!(MessageKind::JitsiCallStarted.joinable_from_other_tabs());
        assert!(!MessageKind::WebRtcCallStarted.joinable_from_other_tabs());
    }

    #[test]
    fn call_status_ongoing_covers_active_states() {
        assert!(CallStatus::Ringing.is_ongoing());
        assert!(CallStatus::InProgress.is_ongoing());
        assert!(CallStatus::InProgressDifferentTab.is_ongoing());
        assert!(!CallStatus::Ended.is_ongoing());
    }

    #[test]
    fn call_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&CallStatus::InProgressDifferentTab).unwrap();
        assert_eq!(json, "\"in_progress_different_tab\"");
        let parsed: CallStatus = serde_json::from_str("\"ringing\"").unwrap();
        assert_eq!(parsed, CallStatus::Ringing);
    }

    #[test]
    fn wire_timestamp_converts_all_shapes() {
        let millis = WireTimestamp::Millis(1_700_000_000_000);
        let wrapped = WireTimestamp::Wrapped {
            millis: 1_700_000_000_000,
        };
        let iso = WireTimestamp::Rfc3339("2023-11-14T22:13:20Z".to_string());

        let a = millis.to_datetime().unwrap();
        let b = wrapped.to_datetime().unwrap();
        let c = iso.to_datetime().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn wire_timestamp_rejects_garbage_string() {
        let bad = WireTimestamp::Rfc3339("not-a-date".to_string());
        assert!(bad.to_datetime().is_none());
    }

    #[test]
    fn wire_message_deserializes_backend_shape() {
        let json = serde_json::json!({
            "_id": "msg-1",
            "t": "jitsi_call_started",
            "u": { "_id": "agent-1", "username": "ada" },
            "msg": "call started",
            "ts": 1_700_000_000_000i64,
            "rid": "room-1",
            "customFields": { "jitsiCallUrl": "https://meet.example/room-1" }
        });
        let wire: WireMessage = serde_json::from_value(json).unwrap();
        assert_eq!(wire.id, "msg-1");
        assert_eq!(wire.kind.as_deref(), Some("jitsi_call_started"));
        assert_eq!(wire.sender.as_ref().unwrap().username.as_deref(), Some("ada"));
        assert!(wire.ts.unwrap().to_datetime().is_some());
    }

    #[test]
    fn agent_payload_withholds_identity_when_hidden() {
        let agent = Agent {
            id: "a1".into(),
            username: Some("ada".into()),
            name: Some("Ada".into()),
            status: Some("online".into()),
            hidden_info: true,
        };
        let payload = AgentPayload::from(&agent);
        assert!(payload.hidden_info);
        assert!(payload.username.is_none());
        assert!(payload.name.is_none());
        assert!(payload.status.is_none());
    }

    #[test]
    fn host_event_names_match_host_contract() {
        assert_eq!(HostEvent::ChatEnded.name(), "chat-ended");
        assert_eq!(
            HostEvent::AssignAgent(AgentPayload::default()).name(),
            "assign-agent"
        );
    }

    #[test]
    fn routes_render_as_paths() {
        assert_eq!(Route::Home.to_string(), "/");
        assert_eq!(Route::ChatFinished.to_string(), "/chat-finished");
    }
}
