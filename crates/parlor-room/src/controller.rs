// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Room session controller.
//!
//! `RoomController` mediates between the realtime transport and the session
//! store: it consumes [`RoomEvent`]s for the subscribed room, runs history
//! and pagination loads, and drives the room lifecycle
//! (`open_room`/`enter_room`/`close_room`). Side effects toward the
//! embedding host and the widget router go through the injected
//! [`HostNotifier`] and [`Navigator`].
//!
//! Every inbound message passes, in order: normalization, redaction, the
//! ordered merge, call/command routing, and the unread/sound policy.

use std::sync::Arc;

use tracing::{debug, warn};

use parlor_core::error::ParlorError;
use parlor_core::traits::{ConfigSource, HostNotifier, Navigator, Transport};
use parlor_core::types::{
    Agent, AgentPayload, Alert, CallRecord, CallStatus, HostEvent, IncomingCallAlert, Message,
    MessageKind, Room, RoomEvent, RoomParams, Route, UserInfo, WireMessage,
};

use crate::call::{self, LoadTransition};
use crate::commands::Command;
use crate::merge;
use crate::normalize::{normalize, normalize_batch};
use crate::redact::redact;
use crate::store::SessionStore;
use crate::unread;

/// How much the requested page grows on each `load_more`.
const PAGE_GROWTH: usize = 10;

/// Custom-field key a close message uses to indicate the transcript was
/// already requested elsewhere.
const TRANSCRIPT_REQUESTED_FIELD: &str = "transcriptRequested";

/// Controller for a single room's session.
///
/// All collaborators are injected; the controller holds no connection or UI
/// state of its own beyond the shared [`SessionStore`].
pub struct RoomController {
    store: Arc<SessionStore>,
    transport: Arc<dyn Transport>,
    host: Arc<dyn HostNotifier>,
    navigator: Arc<dyn Navigator>,
    config: Arc<dyn ConfigSource>,
}

impl RoomController {
    pub fn new(
        store: Arc<SessionStore>,
        transport: Arc<dyn Transport>,
        host: Arc<dyn HostNotifier>,
        navigator: Arc<dyn Navigator>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            store,
            transport,
            host,
            navigator,
            config,
        }
    }

    /// The shared session store, for renderers and embedders.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Explicit room-opened transition.
    ///
    /// The first unset-to-set transition resets all room-scoped state and
    /// navigates home exactly once (the cross-tab "room created" signal).
    /// Setting the same or a newer room snapshot afterwards just updates it.
    pub async fn open_room(&self, room: Room) {
        let newly_opened = self
            .store
            .update(|s| {
                let newly_opened = s.room.is_none();
                if newly_opened {
                    s.reset_room_scope();
                }
                s.room = Some(room);
                newly_opened
            })
            .await;

        if newly_opened {
            debug!("room opened");
            self.navigator.navigate(Route::Home);
        }
    }

    /// Subscribes to the active room's event stream and hydrates the agent.
    ///
    /// Re-entering is idempotent per room: all prior subscriptions are torn
    /// down before resubscribing, so listeners never accumulate. If the room
    /// snapshot says an agent serves it but none is held locally, the agent
    /// record is fetched and announced to the host; a held queue position is
    /// re-announced.
    pub async fn enter_room(&self) -> Result<(), ParlorError> {
        let (rid, served_by, has_agent, queue_info) = self
            .store
            .read(|s| {
                (
                    s.room.as_ref().map(|r| r.id.clone()),
                    s.room.as_ref().and_then(|r| r.served_by.clone()),
                    s.agent.is_some(),
                    s.queue_info.clone(),
                )
            })
            .await;

        let Some(rid) = rid else {
            return Ok(());
        };

        self.transport.unsubscribe_all().await?;
        self.transport.subscribe_room(&rid).await?;
        debug!(rid = %rid, "subscribed to room");

        if !has_agent && served_by.is_some() {
            let agent = self.transport.agent(&rid).await?;
            let payload = AgentPayload::from(&agent);
            self.store
                .update(|s| {
                    s.agent = Some(agent);
                    s.queue_info = None;
                })
                .await;
            self.host.notify(HostEvent::AssignAgent(payload));
        }

        if let Some(queue_info) = queue_info {
            self.host.notify(HostEvent::QueuePositionChange(queue_info));
        }

        Ok(())
    }

    /// Ends the conversation: optional transcript capture, settings reload,
    /// host notification, navigation to the finished view, and session
    /// teardown.
    ///
    /// `transcript_requested` skips capture when the caller already
    /// requested a transcript elsewhere.
    pub async fn close_room(&self, transcript_requested: bool) -> Result<(), ParlorError> {
        let (rid, transcript_on_close) = self
            .store
            .read(|s| {
                (
                    s.room.as_ref().map(|r| r.id.clone()),
                    s.settings.transcript_on_close,
                )
            })
            .await;

        if !transcript_requested && transcript_on_close {
            if let Some(rid) = &rid {
                self.transport.request_transcript(rid).await?;
            }
        }

        let settings = self.config.load().await?;
        self.store.update(|s| s.settings = settings).await;

        self.host.notify(HostEvent::ChatEnded);
        self.navigator.navigate(Route::ChatFinished);

        self.transport.unsubscribe_all().await?;
        self.store
            .update(|s| {
                s.room = None;
                s.reset_room_scope();
            })
            .await;
        Ok(())
    }

    /// Room-creation parameters carrying the preselected default agent.
    pub async fn default_room_params(&self) -> RoomParams {
        let agent_id = self
            .store
            .read(|s| s.default_agent.as_ref().map(|a| a.id.clone()))
            .await;
        RoomParams { agent_id }
    }

    /// Clears the one-shot sound trigger after the renderer played it.
    pub async fn sound_played(&self) {
        self.store.update(|s| s.sound.play = false).await;
    }

    /// Handles one realtime event for the subscribed room.
    pub async fn handle_event(&self, event: RoomEvent) -> Result<(), ParlorError> {
        match event {
            RoomEvent::Message(wire) => self.handle_message(wire).await,
            RoomEvent::Typing { username, typing } => {
                self.store
                    .update(|s| unread::apply_typing(s, &username, typing))
                    .await;
                Ok(())
            }
            RoomEvent::AgentChange(agent) => {
                self.assign_agent(agent).await;
                Ok(())
            }
            RoomEvent::AgentStatusChange(status) => {
                let payload = self
                    .store
                    .update(|s| {
                        let agent = s.agent.as_mut()?;
                        agent.status = Some(status.clone());
                        Some(AgentPayload::from(&*agent))
                    })
                    .await;
                if let Some(payload) = payload {
                    self.host.notify(HostEvent::AgentStatusChange(payload));
                }
                Ok(())
            }
            RoomEvent::QueuePositionChange(queue_info) => {
                self.store
                    .update(|s| s.queue_info = Some(queue_info.clone()))
                    .await;
                self.host.notify(HostEvent::QueuePositionChange(queue_info));
                Ok(())
            }
        }
    }

    /// Loads the room's history page and replaces the message list.
    ///
    /// Retained greeting messages are folded into the fetched batch; the
    /// result is normalized, redacted, chronologically ordered, and marked
    /// read. Afterwards the room is (re)entered and call state is
    /// reconciled from the loaded list. `loading` resets on every exit
    /// path; a superseded load leaves the flag to its successor.
    pub async fn load_history(&self) -> Result<(), ParlorError> {
        let (rid, snapshot_status, ongoing, greetings, local_user, hide) = self
            .store
            .read(|s| {
                (
                    s.room.as_ref().map(|r| r.id.clone()),
                    s.room.as_ref().and_then(|r| r.call_status),
                    s.ongoing_call.clone(),
                    s.messages
                        .iter()
                        .filter(|m| m.trigger)
                        .cloned()
                        .collect::<Vec<_>>(),
                    s.user.clone(),
                    s.settings.hide_agent_info,
                )
            })
            .await;

        let Some(rid) = rid else {
            return Ok(());
        };

        self.store.update(|s| s.loading = true).await;
        let generation = self.store.begin_load();

        let result = self
            .load_history_inner(
                &rid,
                generation,
                snapshot_status,
                ongoing,
                greetings,
                local_user,
                hide,
            )
            .await;

        self.store
            .update_if_load_current(generation, |s| s.loading = false)
            .await;
        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn load_history_inner(
        &self,
        rid: &str,
        generation: u64,
        snapshot_status: Option<CallStatus>,
        ongoing: Option<CallRecord>,
        greetings: Vec<Message>,
        local_user: Option<UserInfo>,
        hide: bool,
    ) -> Result<(), ParlorError> {
        let fetched = self.transport.load_messages(rid, None).await?;

        let mut batch: Vec<Message> = normalize_batch(&fetched)
            .into_iter()
            .map(|m| redact(m, local_user.as_ref(), hide))
            .collect();
        batch.extend(greetings);
        let messages = merge::rebuild(batch);

        self.enter_room().await?;

        let committed = self
            .store
            .update_if_load_current(generation, |s| {
                s.messages = messages.clone();
                s.no_more_messages = false;
                unread::mark_all_read(s);
            })
            .await;

        if !committed {
            debug!(generation, "discarding stale history load");
            return Ok(());
        }

        match call::reconcile_on_load(ongoing.as_ref(), snapshot_status, &messages) {
            LoadTransition::Keep => {}
            LoadTransition::DifferentTab {
                provider,
                time,
                url,
            } => {
                debug!(provider = %provider, "call in progress in a different tab");
                self.store
                    .update(|s| {
                        s.ongoing_call = Some(CallRecord {
                            status: CallStatus::InProgressDifferentTab,
                            time,
                        });
                        s.incoming_call_alert = Some(IncomingCallAlert {
                            show: false,
                            provider,
                            caller_username: None,
                            rid: None,
                            time: None,
                            call_id: None,
                            url,
                        });
                    })
                    .await;
            }
            LoadTransition::Ring(message) => self.process_incoming_call(&message).await,
        }

        Ok(())
    }

    /// Fetches a grown page and replaces the message list with it.
    ///
    /// The backend exposes no has-more flag: a shortfall against the
    /// requested `len + 10` is the end-of-history signal. Replacement, not
    /// merge, is the contract; callers needing continuity reconcile
    /// upstream.
    pub async fn load_more(&self) -> Result<(), ParlorError> {
        let (rid, no_more, current_len, local_user, hide) = self
            .store
            .read(|s| {
                (
                    s.room.as_ref().map(|r| r.id.clone()),
                    s.no_more_messages,
                    s.messages.len(),
                    s.user.clone(),
                    s.settings.hide_agent_info,
                )
            })
            .await;

        let Some(rid) = rid else {
            return Ok(());
        };
        if no_more {
            return Ok(());
        }

        self.store.update(|s| s.loading = true).await;
        let generation = self.store.begin_load();

        let result = self
            .load_more_inner(&rid, generation, current_len, local_user, hide)
            .await;

        self.store
            .update_if_load_current(generation, |s| s.loading = false)
            .await;
        result
    }

    async fn load_more_inner(
        &self,
        rid: &str,
        generation: u64,
        current_len: usize,
        local_user: Option<UserInfo>,
        hide: bool,
    ) -> Result<(), ParlorError> {
        let limit = current_len + PAGE_GROWTH;
        let fetched = self.transport.load_messages(rid, Some(limit)).await?;

        let batch: Vec<Message> = normalize_batch(&fetched)
            .into_iter()
            .map(|m| redact(m, local_user.as_ref(), hide))
            .collect();
        let fetched_count = batch.len();
        let messages = merge::rebuild(batch);

        let committed = self
            .store
            .update_if_load_current(generation, |s| {
                s.messages = messages;
                s.no_more_messages = limit > fetched_count;
            })
            .await;

        if !committed {
            debug!(generation, "discarding stale pagination load");
        }
        Ok(())
    }

    /// Full inbound pipeline for one realtime message.
    async fn handle_message(&self, wire: WireMessage) -> Result<(), ParlorError> {
        let Some(message) = normalize(&wire) else {
            return Ok(());
        };

        let (local_user, hide) = self
            .store
            .read(|s| (s.user.clone(), s.settings.hide_agent_info))
            .await;
        let message = redact(message, local_user.as_ref(), hide);

        self.store
            .update(|s| {
                let list = std::mem::take(&mut s.messages);
                s.messages = merge::upsert(list, message.clone());
            })
            .await;

        self.route_message(&message).await?;

        if !message.is_renderable() {
            return Ok(());
        }
        // Edits never count as new activity.
        if message.edited_at.is_some() {
            return Ok(());
        }

        self.store
            .update(|s| {
                unread::process_unread(s);
                unread::maybe_play_sound(s, &message);
            })
            .await;

        Ok(())
    }

    /// Routes a merged message by kind: close, command, call end, call start.
    async fn route_message(&self, message: &Message) -> Result<(), ParlorError> {
        match &message.kind {
            Some(MessageKind::Close) => {
                let transcript_requested = message
                    .custom_fields
                    .as_ref()
                    .and_then(|cf| cf.get(TRANSCRIPT_REQUESTED_FIELD))
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                self.close_room(transcript_requested).await
            }
            Some(MessageKind::Command) => self.dispatch_command(message).await,
            _ if message.end_ts.is_some() => {
                self.store
                    .update(|s| {
                        s.ongoing_call = Some(CallRecord {
                            status: CallStatus::Ended,
                            time: message.ts,
                        });
                        s.incoming_call_alert = None;
                    })
                    .await;
                Ok(())
            }
            Some(kind) if kind.is_call_start() => {
                self.process_incoming_call(message).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn dispatch_command(&self, message: &Message) -> Result<(), ParlorError> {
        match Command::from_body(&message.msg) {
            Command::PromptTranscript => {
                let rid = self
                    .store
                    .read(|s| s.room.as_ref().map(|r| r.id.clone()))
                    .await;
                if let Some(rid) = rid {
                    self.transport.request_transcript(&rid).await?;
                }
                Ok(())
            }
            Command::Unknown(name) => {
                debug!(command = %name, "ignoring unrecognized command");
                Ok(())
            }
        }
    }

    /// Incoming-call transition. Non-fatal: a failure to derive the alert
    /// degrades to a timed error alert and the session continues.
    async fn process_incoming_call(&self, message: &Message) {
        let already_ongoing = self
            .store
            .read(|s| s.ongoing_call.as_ref().is_some_and(|c| c.status.is_ongoing()))
            .await;
        if already_ongoing {
            debug!(message_id = %message.id, "call already ongoing, ignoring call start");
            return;
        }

        match call::incoming_call(message) {
            Ok((alert, record)) => {
                self.store
                    .update(|s| {
                        s.incoming_call_alert = Some(alert);
                        s.ongoing_call = Some(record);
                    })
                    .await;
            }
            Err(err) => {
                warn!(message_id = %message.id, error = %err, "failed to derive incoming call state");
                self.store
                    .update(|s| {
                        s.alerts
                            .push(Alert::error("Could not retrieve call information"));
                    })
                    .await;
            }
        }
    }

    async fn assign_agent(&self, agent: Agent) {
        let payload = AgentPayload::from(&agent);
        self.store
            .update(|s| {
                s.agent = Some(agent);
                s.queue_info = None;
            })
            .await;
        self.host.notify(HostEvent::AssignAgent(payload));
    }
}
