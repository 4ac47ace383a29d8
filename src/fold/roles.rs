//! Same treatment as
//! [`super::faves`]: `role_hold`, `role_drop`, `role_play`, `role_stop`
//! flow straight through as an event list. `role_release` is a
//! tombstone by name only — it is emitted as a synthetic
//! `role_drop`-shaped record rather than suppressing anything, since
//! roles have no fold map to suppress.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};

const SYNTHETIC_KIND: &str = "role_drop";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleEvent {
    pub agent_id: String,
    pub role: String,
    pub kind: String,
    pub ts: i64,
}

pub fn fold_roles(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<RoleEvent> {
    envelopes
        .into_iter()
        .filter_map(|e| match e.type_.as_str() {
            "role_hold" | "role_drop" | "role_play" | "role_stop" => Some(RoleEvent {
                agent_id: string_field(&e.fields, "agent_id")?,
                role: string_field(&e.fields, "role").unwrap_or_default(),
                kind: e.type_.clone(),
                ts: i64_field(&e.fields, "ts").unwrap_or(0),
            }),
            "role_release" => Some(RoleEvent {
                agent_id: string_field(&e.fields, "agent_id")?,
                role: string_field(&e.fields, "role").unwrap_or_default(),
                kind: SYNTHETIC_KIND.to_string(),
                ts: i64_field(&e.fields, "ts").unwrap_or(0),
            }),
            _ => None,
        })
        .collect()
}
