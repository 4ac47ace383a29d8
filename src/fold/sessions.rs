//! Builds the
//! (`session_start`, optional `session_end`) pair per `session_id`,
//! first occurrence winning insertion order, and emits most-recent
//! session first. `session_heartbeat` carries no data this
//! materializer reports on.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTrigger {
    pub session_id: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub exit_code: Option<i64>,
    pub duration_ms: Option<i64>,
}

pub fn fold_session_triggers(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<SessionTrigger> {
    let mut order: Vec<String> = Vec::new();
    let mut map: std::collections::HashMap<String, SessionTrigger> = std::collections::HashMap::new();

    for env in envelopes {
        match env.type_.as_str() {
            "session_start" => {
                let Some(session_id) = string_field(&env.fields, "session_id") else {
                    continue;
                };
                if map.contains_key(&session_id) {
                    continue;
                }
                order.push(session_id.clone());
                map.insert(
                    session_id.clone(),
                    SessionTrigger {
                        session_id,
                        started_at: i64_field(&env.fields, "started_at").unwrap_or(0),
                        ended_at: None,
                        exit_code: None,
                        duration_ms: None,
                    },
                );
            }
            "session_end" => {
                let Some(session_id) = string_field(&env.fields, "session_id") else {
                    continue;
                };
                if let Some(trigger) = map.get_mut(&session_id) {
                    trigger.ended_at = i64_field(&env.fields, "ended_at");
                    trigger.exit_code = i64_field(&env.fields, "exit_code");
                    trigger.duration_ms = i64_field(&env.fields, "duration_ms");
                }
            }
            _ => {}
        }
    }

    order
        .into_iter()
        .rev()
        .filter_map(|id| map.remove(&id))
        .collect()
}
