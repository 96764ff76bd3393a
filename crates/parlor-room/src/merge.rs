// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered, deduplicated message list maintenance.
//!
//! The message list invariants: ids unique, timestamps ascending. `upsert`
//! preserves them for single realtime arrivals, `rebuild` establishes them
//! for whole history batches.

use parlor_core::types::Message;

/// Upserts a message by id.
///
/// An existing id is replaced in place (edit semantics), keeping its slot.
/// A new id is inserted at the position that preserves ascending timestamp
/// order; equal timestamps keep arrival order.
pub fn upsert(mut messages: Vec<Message>, message: Message) -> Vec<Message> {
    if let Some(existing) = messages.iter_mut().find(|m| m.id == message.id) {
        *existing = message;
        return messages;
    }

    let idx = messages.partition_point(|m| m.ts <= message.ts);
    messages.insert(idx, message);
    messages
}

/// Rebuilds a chronologically ordered, deduplicated list from an arbitrary
/// batch (e.g. history page + retained greetings). For duplicate ids, the
/// later entry in the batch wins.
pub fn rebuild(batch: Vec<Message>) -> Vec<Message> {
    batch.into_iter().fold(Vec::new(), upsert)
}
