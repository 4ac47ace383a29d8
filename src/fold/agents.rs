//! Two distinct record families share this module because they
//! describe the same conceptual entity from two storage layouts: the
//! legacy/runtime `agent` record (mutated by `agent_update` and
//! `presence_event`) and the multi-machine `agent_descriptor` record
//! (last-writer-wins, emitted sorted by id). `session_start` /
//! `session_end` / `session_heartbeat` and the presence event list
//! itself are folded by [`super::sessions`] and [`super::presence`]
//! respectively.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};
use crate::fold::EntityFold;
use crate::nullable::probe;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub display_name: Option<String>,
    pub kind: Option<String>,
    pub presence: Option<String>,
    pub ts: i64,
}

/// Legacy/runtime agent fold: `agent` creation, `agent_update` and
/// `presence_event` mutations. No tombstone kind exists for agents.
pub fn fold_agents(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<Agent> {
    let mut fold: EntityFold<Agent> = EntityFold::new();

    for env in envelopes {
        match env.type_.as_str() {
            "agent" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                fold.note_created(&id);
                let agent = Agent {
                    id: id.clone(),
                    display_name: string_field(&env.fields, "display_name"),
                    kind: string_field(&env.fields, "kind"),
                    presence: string_field(&env.fields, "presence"),
                    ts: i64_field(&env.fields, "ts").unwrap_or(0),
                };
                fold.set(&id, agent);
                for pending in fold.take_pending(&id) {
                    apply_mutation(&mut fold, &pending);
                }
            }
            "agent_update" | "presence_event" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                if fold.contains(&id) {
                    apply_mutation(&mut fold, &env);
                } else {
                    fold.buffer_pending(&id, env);
                }
            }
            _ => {}
        }
    }

    fold.finish()
}

fn apply_mutation(fold: &mut EntityFold<Agent>, env: &Envelope) {
    let Some(id) = string_field(&env.fields, "id") else {
        return;
    };
    let Some(agent) = fold.get_mut(&id) else {
        return;
    };

    match env.type_.as_str() {
        "agent_update" => {
            probe::<String>(&env.fields, "display_name").apply(&mut agent.display_name);
            probe::<String>(&env.fields, "kind").apply(&mut agent.kind);
        }
        "presence_event" => {
            if let Some(presence) = string_field(&env.fields, "presence") {
                agent.presence = Some(presence);
            }
        }
        _ => {}
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub agent_id: String,
    pub display_name: Option<String>,
    pub kind: Option<String>,
    pub last_seen_at: Option<i64>,
}

/// Multi-machine agent descriptor fold: per-field last-writer-wins per
/// `agent_id` (an absent field on a later event leaves the prior value
/// in place, same as every other mutation in this crate), emitted
/// sorted by id.
pub fn fold_agent_descriptors(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<AgentDescriptor> {
    let mut fold: EntityFold<AgentDescriptor> = EntityFold::new();

    for env in envelopes {
        if env.type_ != "agent_descriptor" {
            continue;
        }
        let Some(agent_id) = string_field(&env.fields, "agent_id") else {
            continue;
        };
        fold.note_created(&agent_id);
        if let Some(descriptor) = fold.get_mut(&agent_id) {
            probe::<String>(&env.fields, "display_name").apply(&mut descriptor.display_name);
            probe::<String>(&env.fields, "kind").apply(&mut descriptor.kind);
            probe::<i64>(&env.fields, "last_seen_at").apply(&mut descriptor.last_seen_at);
        } else {
            fold.set(
                &agent_id,
                AgentDescriptor {
                    agent_id: agent_id.clone(),
                    display_name: string_field(&env.fields, "display_name"),
                    kind: string_field(&env.fields, "kind"),
                    last_seen_at: i64_field(&env.fields, "last_seen_at"),
                },
            );
        }
    }

    fold.finish_sorted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::parse_envelope;

    fn envs(lines: &[&str]) -> Vec<Envelope> {
        lines.iter().filter_map(|l| parse_envelope(l)).collect()
    }

    #[test]
    fn presence_event_updates_presence_in_place() {
        let agents = fold_agents(envs(&[
            r#"{"type":"agent","id":"a1","display_name":"Ava","ts":1}"#,
            r#"{"type":"presence_event","id":"a1","presence":"away"}"#,
        ]));
        assert_eq!(agents[0].presence, Some("away".to_string()));
    }

    #[test]
    fn agent_update_nullability_on_kind() {
        let agents = fold_agents(envs(&[
            r#"{"type":"agent","id":"a1","kind":"human","ts":1}"#,
            r#"{"type":"agent_update","id":"a1","kind":null}"#,
        ]));
        assert_eq!(agents[0].kind, None);
    }

    #[test]
    fn descriptors_emitted_sorted_by_agent_id() {
        let descriptors = fold_agent_descriptors(envs(&[
            r#"{"type":"agent_descriptor","agent_id":"zeta","last_seen_at":1}"#,
            r#"{"type":"agent_descriptor","agent_id":"alpha","last_seen_at":2}"#,
        ]));
        let ids: Vec<&str> = descriptors.iter().map(|d| d.agent_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn descriptor_is_last_writer_wins() {
        let descriptors = fold_agent_descriptors(envs(&[
            r#"{"type":"agent_descriptor","agent_id":"a1","display_name":"old","last_seen_at":1}"#,
            r#"{"type":"agent_descriptor","agent_id":"a1","display_name":"new","last_seen_at":2}"#,
        ]));
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].display_name, Some("new".to_string()));
    }

    #[test]
    fn descriptor_merge_is_per_field_not_whole_record() {
        let descriptors = fold_agent_descriptors(envs(&[
            r#"{"type":"agent_descriptor","agent_id":"a1","display_name":"Ava","kind":"human","last_seen_at":1}"#,
            r#"{"type":"agent_descriptor","agent_id":"a1","last_seen_at":2}"#,
        ]));
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].display_name, Some("Ava".to_string()));
        assert_eq!(descriptors[0].kind, Some("human".to_string()));
        assert_eq!(descriptors[0].last_seen_at, Some(2));
    }
}
