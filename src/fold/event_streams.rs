//! Pin, mute, subscription, and thread-membership event lists. These
//! record kinds are never folded into an entity state map — they pass
//! straight through in merge order, pin/unpin pairs preserved, with
//! **no** pending-mutation buffering: a `thread_pin` merge-ordered
//! before its thread's creation record is still emitted, unlike
//! `thread_update`/`message_update`.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePinEvent {
    pub message_guid: String,
    pub agent_id: String,
    pub kind: String,
    pub ts: i64,
}

pub fn fold_message_pins(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<MessagePinEvent> {
    envelopes
        .into_iter()
        .filter(|e| matches!(e.type_.as_str(), "message_pin" | "message_unpin"))
        .filter_map(|e| {
            Some(MessagePinEvent {
                message_guid: string_field(&e.fields, "message_guid")?,
                agent_id: string_field(&e.fields, "agent_id").unwrap_or_default(),
                kind: e.type_.clone(),
                ts: i64_field(&e.fields, "ts").unwrap_or(0),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMembershipEvent {
    pub thread_id: String,
    pub agent_id: String,
    pub kind: String,
    pub ts: i64,
}

/// `thread_subscribe` / `thread_unsubscribe` / `thread_message` /
/// `thread_message_remove`.
pub fn fold_thread_membership(
    envelopes: impl IntoIterator<Item = Envelope>,
) -> Vec<ThreadMembershipEvent> {
    envelopes
        .into_iter()
        .filter(|e| {
            matches!(
                e.type_.as_str(),
                "thread_subscribe" | "thread_unsubscribe" | "thread_message" | "thread_message_remove"
            )
        })
        .filter_map(|e| {
            Some(ThreadMembershipEvent {
                thread_id: string_field(&e.fields, "thread_id")?,
                agent_id: string_field(&e.fields, "agent_id").unwrap_or_default(),
                kind: e.type_.clone(),
                ts: i64_field(&e.fields, "ts").unwrap_or(0),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadPinEvent {
    pub thread_id: String,
    pub message_guid: Option<String>,
    pub kind: String,
    pub ts: i64,
}

pub fn fold_thread_pins(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<ThreadPinEvent> {
    envelopes
        .into_iter()
        .filter(|e| matches!(e.type_.as_str(), "thread_pin" | "thread_unpin"))
        .filter_map(|e| {
            Some(ThreadPinEvent {
                thread_id: string_field(&e.fields, "thread_id")?,
                message_guid: string_field(&e.fields, "message_guid"),
                kind: e.type_.clone(),
                ts: i64_field(&e.fields, "ts").unwrap_or(0),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMuteEvent {
    pub thread_id: String,
    pub agent_id: String,
    pub kind: String,
    pub ts: i64,
}

pub fn fold_thread_mutes(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<ThreadMuteEvent> {
    envelopes
        .into_iter()
        .filter(|e| matches!(e.type_.as_str(), "thread_mute" | "thread_unmute"))
        .filter_map(|e| {
            Some(ThreadMuteEvent {
                thread_id: string_field(&e.fields, "thread_id")?,
                agent_id: string_field(&e.fields, "agent_id").unwrap_or_default(),
                kind: e.type_.clone(),
                ts: i64_field(&e.fields, "ts").unwrap_or(0),
            })
        })
        .collect()
}
