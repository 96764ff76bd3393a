// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session state container.
//!
//! `SessionState` is the single shared mutable resource of the widget core.
//! It is owned by a `SessionStore` that is injected into every component
//! (never a module-level singleton), so tests run isolated instances and
//! multiple rooms could coexist if ever needed.
//!
//! Every mutation goes through [`SessionStore::update`], which runs a
//! non-suspending closure under the state lock. The lock is never held
//! across an await: operations that need I/O read a snapshot, await, then
//! commit against fresh state.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use parlor_core::types::{
    Agent, Alert, CallRecord, IncomingCallAlert, Message, QueueInfo, Room, SoundState, UserInfo,
    WidgetSettings,
};

/// In-memory conversation state for a single chat room.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub room: Option<Room>,
    /// Ordered ascending by timestamp; ids unique. Maintained by the merger.
    pub messages: Vec<Message>,
    /// Usernames currently typing.
    pub typing: Vec<String>,
    pub agent: Option<Agent>,
    /// Preselected agent used when creating a new room.
    pub default_agent: Option<Agent>,
    pub queue_info: Option<QueueInfo>,
    pub ongoing_call: Option<CallRecord>,
    pub incoming_call_alert: Option<IncomingCallAlert>,
    pub sound: SoundState,
    pub user: Option<UserInfo>,
    pub alerts: Vec<Alert>,
    pub unread_count: usize,
    pub last_read_message_id: Option<String>,
    pub loading: bool,
    pub no_more_messages: bool,
    pub settings: WidgetSettings,
}

impl SessionState {
    pub fn new(user: Option<UserInfo>, settings: WidgetSettings) -> Self {
        Self {
            user,
            sound: SoundState {
                enabled: settings.sound_enabled,
                play: false,
            },
            settings,
            ..Self::default()
        }
    }

    /// Clears everything scoped to a single room. Called when `room`
    /// transitions from unset to set; identity, settings, and widget-level
    /// alerts survive.
    pub fn reset_room_scope(&mut self) {
        self.messages.clear();
        self.typing.clear();
        self.agent = None;
        self.queue_info = None;
        self.ongoing_call = None;
        self.incoming_call_alert = None;
        self.unread_count = 0;
        self.last_read_message_id = None;
        self.loading = false;
        self.no_more_messages = false;
        self.sound.play = false;
    }
}

/// Injectable container serializing all access to [`SessionState`].
///
/// Also hands out load generations: each history/pagination load takes a
/// monotonically increasing generation and commits only while still current,
/// so a stale in-flight fetch that completes after a newer one is discarded.
#[derive(Debug)]
pub struct SessionStore {
    state: Mutex<SessionState>,
    load_generation: AtomicU64,
}

impl SessionStore {
    pub fn new(user: Option<UserInfo>, settings: WidgetSettings) -> Self {
        Self {
            state: Mutex::new(SessionState::new(user, settings)),
            load_generation: AtomicU64::new(0),
        }
    }

    /// The serialized state-update entry point. The closure must not
    /// suspend; read-modify-write happens entirely under the lock.
    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Reads from the current state without mutating it.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionState) -> R,
    {
        let state = self.state.lock().await;
        f(&state)
    }

    /// A full copy of the current state, for assertions and snapshots.
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Starts a new load operation, superseding any load still in flight.
    pub fn begin_load(&self) -> u64 {
        self.load_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies `f` only if `generation` is still the newest load.
    /// Returns whether the update was applied.
    pub async fn update_if_load_current<F>(&self, generation: u64, f: F) -> bool
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.state.lock().await;
        if self.load_generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        f(&mut state);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_store_applies_settings() {
        let settings = WidgetSettings {
            sound_enabled: false,
            ..WidgetSettings::default()
        };
        let store = SessionStore::new(None, settings);
        let state = store.snapshot().await;
        assert!(!state.sound.enabled);
        assert!(state.room.is_none());
        assert!(state.messages.is_empty());
    }

    #[tokio::test]
    async fn update_returns_closure_result() {
        let store = SessionStore::new(None, WidgetSettings::default());
        let count = store
            .update(|s| {
                s.typing.push("ada".into());
                s.typing.len()
            })
            .await;
        assert_eq!(count, 1);
        assert_eq!(store.read(|s| s.typing.clone()).await, vec!["ada"]);
    }

    #[tokio::test]
    async fn stale_load_generation_is_discarded() {
        let store = SessionStore::new(None, WidgetSettings::default());

        let first = store.begin_load();
        let second = store.begin_load();
        assert!(second > first);

        // The superseded load must not commit.
        assert!(!store.update_if_load_current(first, |s| s.loading = false).await);
        // The newest load commits normally.
        assert!(store.update_if_load_current(second, |s| s.loading = false).await);
    }

    #[tokio::test]
    async fn reset_room_scope_keeps_identity_and_settings() {
        let user = UserInfo {
            id: "visitor-1".into(),
            username: Some("visitor".into()),
        };
        let settings = WidgetSettings {
            hide_agent_info: true,
            ..WidgetSettings::default()
        };
        let store = SessionStore::new(Some(user), settings);
        store
            .update(|s| {
                s.typing.push("ada".into());
                s.unread_count = 3;
                s.no_more_messages = true;
                s.reset_room_scope();
            })
            .await;

        let state = store.snapshot().await;
        assert!(state.typing.is_empty());
        assert_eq!(state.unread_count, 0);
        assert!(!state.no_more_messages);
        assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some("visitor-1"));
        assert!(state.settings.hide_agent_info);
    }
}
