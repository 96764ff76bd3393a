// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification side effects: unread counter, sound policy, typing set.
//!
//! These run after a message has passed redaction and call routing. Edited
//! messages are excluded upstream by the controller; edits never count as
//! new activity.

use parlor_core::types::Message;

use crate::store::SessionState;

/// Recomputes the unread counter: renderable messages after the last-read
/// marker that were not authored by the local user. With no marker, the
/// whole list counts.
pub fn process_unread(state: &mut SessionState) {
    let start = state
        .last_read_message_id
        .as_deref()
        .and_then(|id| state.messages.iter().position(|m| m.id == id))
        .map(|idx| idx + 1)
        .unwrap_or(0);

    let local_id = state.user.as_ref().map(|u| u.id.as_str());
    state.unread_count = state.messages[start..]
        .iter()
        .filter(|m| m.is_renderable() && Some(m.sender.id.as_str()) != local_id)
        .count();
}

/// Marks the whole list as read, anchoring the marker to the newest message.
pub fn mark_all_read(state: &mut SessionState) {
    state.last_read_message_id = state.messages.last().map(|m| m.id.clone());
    state.unread_count = 0;
}

/// Sets the one-shot play trigger when sound is enabled and the message was
/// authored by someone else. The rendering layer clears the flag after
/// playing.
pub fn maybe_play_sound(state: &mut SessionState, message: &Message) {
    if !state.sound.enabled {
        return;
    }
    if state
        .user
        .as_ref()
        .is_some_and(|u| u.id == message.sender.id)
    {
        return;
    }
    state.sound.play = true;
}

/// Applies a typing event to the typing set. The local user's own typing
/// and typing while agent info is hidden are ignored; starts are
/// dedup-inserted, stops remove.
pub fn apply_typing(state: &mut SessionState, username: &str, typing: bool) {
    if state
        .user
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .is_some_and(|u| u == username)
    {
        return;
    }

    if state.agent.as_ref().is_some_and(|a| a.hidden_info) {
        return;
    }

    if typing {
        if !state.typing.iter().any(|u| u == username) {
            state.typing.push(username.to_string());
        }
    } else {
        state.typing.retain(|u| u != username);
    }
}
