//! Last-writer-wins map keyed by `(agent_id, home)`; each
//! `ghost_cursor` event fully replaces the prior entry for its key (it
//! is a snapshot, not a mutation with presence/absence semantics).
//! `cursor_clear` deletes the entry.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostCursor {
    pub agent_id: String,
    pub home: String,
    pub message_guid: Option<String>,
    pub ts: i64,
}

fn cursor_key(agent_id: &str, home: &str) -> String {
    format!("{agent_id}\u{0}{home}")
}

/// Entries are returned in last-writer-wins merge order — the order in
/// which their key last changed, not alphabetic or insertion order; no
/// spec invariant pins a particular output order for this family.
pub fn fold_ghost_cursors(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<GhostCursor> {
    let mut order: Vec<String> = Vec::new();
    let mut map: std::collections::HashMap<String, GhostCursor> = std::collections::HashMap::new();

    for env in envelopes {
        match env.type_.as_str() {
            "ghost_cursor" => {
                let Some(agent_id) = string_field(&env.fields, "agent_id") else {
                    continue;
                };
                let home = string_field(&env.fields, "home").unwrap_or_default();
                let key = cursor_key(&agent_id, &home);
                if !map.contains_key(&key) {
                    order.push(key.clone());
                }
                map.insert(
                    key,
                    GhostCursor {
                        agent_id,
                        home,
                        message_guid: string_field(&env.fields, "message_guid"),
                        ts: i64_field(&env.fields, "ts").unwrap_or(0),
                    },
                );
            }
            "cursor_clear" => {
                let Some(agent_id) = string_field(&env.fields, "agent_id") else {
                    continue;
                };
                let home = string_field(&env.fields, "home").unwrap_or_default();
                let key = cursor_key(&agent_id, &home);
                map.remove(&key);
            }
            _ => {}
        }
    }

    order.into_iter().filter_map(|key| map.remove(&key)).collect()
}
