// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event normalization.
//!
//! Converts raw wire messages into the canonical [`Message`] shape before
//! anything downstream sees them. Malformed events (missing id or sender,
//! unparseable timestamp) are dropped silently; normalization failures never
//! surface an alert.

use tracing::debug;

use parlor_core::types::{Message, MessageKind, Sender, WireMessage};

/// Normalizes a raw inbound message, or drops it when validation fails.
///
/// Idempotent: a message converted back to the wire shape and normalized
/// again yields an equivalent value.
pub fn normalize(wire: &WireMessage) -> Option<Message> {
    if wire.id.is_empty() {
        debug!("dropping message without id");
        return None;
    }

    let Some(sender) = wire.sender.as_ref() else {
        debug!(message_id = %wire.id, "dropping message without sender");
        return None;
    };

    let Some(ts) = wire.ts.as_ref().and_then(|t| t.to_datetime()) else {
        debug!(message_id = %wire.id, "dropping message with unparseable timestamp");
        return None;
    };

    Some(Message {
        id: wire.id.clone(),
        rid: wire.rid.clone(),
        ts,
        kind: wire.kind.as_deref().map(MessageKind::from_tag),
        msg: wire.msg.clone().unwrap_or_default(),
        sender: Sender {
            id: sender.id.clone(),
            username: sender.username.clone(),
        },
        edited_at: wire.edited_at.as_ref().and_then(|t| t.to_datetime()),
        end_ts: wire.end_ts.as_ref().and_then(|t| t.to_datetime()),
        custom_fields: wire.custom_fields.clone(),
        trigger: wire.trigger,
    })
}

/// Normalizes a batch, dropping entries that fail validation.
pub fn normalize_batch(batch: &[WireMessage]) -> Vec<Message> {
    batch.iter().filter_map(normalize).collect()
}
