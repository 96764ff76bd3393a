// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end session tests.
//!
//! `TestHarness` assembles a complete controller stack over mock
//! collaborators, plus wire-message builders for scripting realtime events
//! and history pages.

use std::sync::Arc;

use parlor_core::types::{Agent, Room, UserInfo, WidgetSettings, WireMessage, WireSender, WireTimestamp};
use parlor_room::{RoomController, SessionStore};

use crate::mock_host::{MockConfigSource, MockHost, MockNavigator};
use crate::mock_transport::MockTransport;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    user: Option<UserInfo>,
    settings: WidgetSettings,
    room: Option<Room>,
    agent: Option<Agent>,
    pages: Vec<Vec<WireMessage>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            user: Some(UserInfo {
                id: "visitor-1".to_string(),
                username: Some("visitor".to_string()),
            }),
            settings: WidgetSettings::default(),
            room: None,
            agent: None,
            pages: Vec::new(),
        }
    }

    /// Sets the local widget user (default: `visitor-1`).
    pub fn with_user(mut self, user: Option<UserInfo>) -> Self {
        self.user = user;
        self
    }

    /// Sets the widget settings snapshot.
    pub fn with_settings(mut self, settings: WidgetSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Opens the harness with this room already set.
    pub fn with_room(mut self, room: Room) -> Self {
        self.room = Some(room);
        self
    }

    /// Scripts the agent record the transport returns.
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Scripts a history page (newest first, as the backend delivers).
    pub fn with_page(mut self, page: Vec<WireMessage>) -> Self {
        self.pages.push(page);
        self
    }

    pub async fn build(self) -> TestHarness {
        let store = Arc::new(SessionStore::new(self.user, self.settings));
        if let Some(room) = self.room {
            store.update(|s| s.room = Some(room)).await;
        }

        let transport = Arc::new(MockTransport::new());
        if let Some(agent) = self.agent {
            transport.set_agent(agent).await;
        }
        for page in self.pages {
            transport.push_page(page).await;
        }

        let host = Arc::new(MockHost::new());
        let navigator = Arc::new(MockNavigator::new());
        let config = Arc::new(MockConfigSource::new(self.settings));

        let controller = Arc::new(RoomController::new(
            store.clone(),
            transport.clone(),
            host.clone(),
            navigator.clone(),
            config.clone(),
        ));

        TestHarness {
            store,
            controller,
            transport,
            host,
            navigator,
            config,
        }
    }
}

/// A fully wired controller over mock collaborators.
///
/// The controller is shared so tests can spawn concurrent operations
/// against the same session.
pub struct TestHarness {
    pub store: Arc<SessionStore>,
    pub controller: Arc<RoomController>,
    pub transport: Arc<MockTransport>,
    pub host: Arc<MockHost>,
    pub navigator: Arc<MockNavigator>,
    pub config: Arc<MockConfigSource>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }
}

/// A plain text wire message.
pub fn wire_text(id: &str, millis: i64, sender_id: &str, username: &str) -> WireMessage {
    WireMessage {
        id: id.to_string(),
        sender: Some(WireSender {
            id: sender_id.to_string(),
            username: Some(username.to_string()),
        }),
        msg: Some(format!("text of {id}")),
        ts: Some(WireTimestamp::Millis(millis)),
        rid: Some("room-1".to_string()),
        ..WireMessage::default()
    }
}

/// A call-start wire message of the given provider type tag.
pub fn wire_call_start(id: &str, millis: i64, tag: &str) -> WireMessage {
    let mut wire = wire_text(id, millis, "agent-1", "ada");
    wire.kind = Some(tag.to_string());
    wire.msg = None;
    if tag == "jitsi_call_started" {
        wire.custom_fields = Some(serde_json::json!({
            "jitsiCallUrl": format!("https://meet.example/{id}")
        }));
    }
    wire
}

/// A call-end wire message (carries an explicit end timestamp).
pub fn wire_call_end(id: &str, millis: i64) -> WireMessage {
    let mut wire = wire_text(id, millis, "agent-1", "ada");
    wire.msg = None;
    wire.end_ts = Some(WireTimestamp::Millis(millis));
    wire
}

/// A greeting/trigger wire message.
pub fn wire_trigger(id: &str, millis: i64) -> WireMessage {
    let mut wire = wire_text(id, millis, "bot-1", "greeter");
    wire.trigger = true;
    wire
}
