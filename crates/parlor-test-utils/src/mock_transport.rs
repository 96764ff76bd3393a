// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements `Transport` with scripted history pages,
//! optional failure injection, an optional gate to hold a fetch in flight,
//! and full call recording for assertions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use parlor_core::error::ParlorError;
use parlor_core::traits::Transport;
use parlor_core::types::{Agent, WireMessage};

/// A mock realtime transport.
///
/// History fetches pop scripted pages in FIFO order; an exhausted script
/// yields empty pages. Every call is recorded for assertion.
#[derive(Default)]
pub struct MockTransport {
    pages: Mutex<VecDeque<Vec<WireMessage>>>,
    agent: Mutex<Option<Agent>>,
    fail_next_load: AtomicBool,
    /// When set, the next `load_messages` call parks until notified.
    gate: Mutex<Option<Arc<Notify>>>,

    subscribed: Mutex<Vec<String>>,
    unsubscribe_count: AtomicUsize,
    load_limits: Mutex<Vec<Option<usize>>>,
    transcript_requests: Mutex<Vec<String>>,
    /// Interleaved record of subscribe/unsubscribe calls, for ordering
    /// assertions.
    wiring_log: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next history page returned by `load_messages`.
    pub async fn push_page(&self, page: Vec<WireMessage>) {
        self.pages.lock().await.push_back(page);
    }

    /// Sets the agent record returned by `agent()`.
    pub async fn set_agent(&self, agent: Agent) {
        *self.agent.lock().await = Some(agent);
    }

    /// Makes the next `load_messages` call fail with a transport error.
    pub fn fail_next_load(&self) {
        self.fail_next_load.store(true, Ordering::SeqCst);
    }

    /// Holds the next `load_messages` call until the returned handle is
    /// notified. Used to exercise interleaved loads.
    pub async fn gate_next_load(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().await = Some(notify.clone());
        notify
    }

    pub async fn subscribed_rooms(&self) -> Vec<String> {
        self.subscribed.lock().await.clone()
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribe_count.load(Ordering::SeqCst)
    }

    pub async fn load_limits(&self) -> Vec<Option<usize>> {
        self.load_limits.lock().await.clone()
    }

    pub async fn transcript_requests(&self) -> Vec<String> {
        self.transcript_requests.lock().await.clone()
    }

    /// Subscribe/unsubscribe calls in arrival order, e.g.
    /// `["unsubscribe_all", "subscribe:room-1"]`.
    pub async fn wiring_log(&self) -> Vec<String> {
        self.wiring_log.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn subscribe_room(&self, rid: &str) -> Result<(), ParlorError> {
        self.subscribed.lock().await.push(rid.to_string());
        self.wiring_log.lock().await.push(format!("subscribe:{rid}"));
        Ok(())
    }

    async fn unsubscribe_all(&self) -> Result<(), ParlorError> {
        self.unsubscribe_count.fetch_add(1, Ordering::SeqCst);
        self.wiring_log
            .lock()
            .await
            .push("unsubscribe_all".to_string());
        Ok(())
    }

    async fn load_messages(
        &self,
        _rid: &str,
        limit: Option<usize>,
    ) -> Result<Vec<WireMessage>, ParlorError> {
        self.load_limits.lock().await.push(limit);

        let gate = self.gate.lock().await.take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_next_load.swap(false, Ordering::SeqCst) {
            return Err(ParlorError::Transport {
                message: "scripted load failure".into(),
                source: None,
            });
        }

        Ok(self.pages.lock().await.pop_front().unwrap_or_default())
    }

    async fn agent(&self, rid: &str) -> Result<Agent, ParlorError> {
        self.agent
            .lock()
            .await
            .clone()
            .ok_or_else(|| ParlorError::Transport {
                message: format!("no agent scripted for room {rid}"),
                source: None,
            })
    }

    async fn request_transcript(&self, rid: &str) -> Result<(), ParlorError> {
        self.transcript_requests.lock().await.push(rid.to_string());
        Ok(())
    }
}
