//! Reactions: both the `reaction` event-record stream (never folded
//! into state, exposed as a merge-ordered list per message) and the
//! normalization helper shared by that stream and the `reactions`
//! field on `message_update`.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub message_guid: String,
    pub agent_id: String,
    pub emoji: String,
    pub reacted_at: i64,
}

/// All `reaction` events across every message, already in merge order
/// because the caller fed us envelopes produced by [`crate::order`]
/// (reactions sort primarily on `reacted_at`, falling back to `ts`).
pub fn fold_reaction_events(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<ReactionEvent> {
    envelopes
        .into_iter()
        .filter(|e| e.type_ == "reaction")
        .filter_map(|e| {
            Some(ReactionEvent {
                message_guid: string_field(&e.fields, "message_guid")?,
                agent_id: string_field(&e.fields, "agent_id").unwrap_or_default(),
                emoji: string_field(&e.fields, "emoji")?.to_lowercase(),
                reacted_at: i64_field(&e.fields, "reacted_at")
                    .or_else(|| i64_field(&e.fields, "ts"))
                    .unwrap_or(0),
            })
        })
        .collect()
}

/// Emoji in merge (reacted_at-ascending) order for a single message —
/// the emoji-arrival-order shape downstream callers check against.
pub fn reactions_for_message(events: &[ReactionEvent], message_guid: &str) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.message_guid == message_guid)
        .map(|e| e.emoji.clone())
        .collect()
}

/// Canonical form of an emoji -> agent-ids reactions map: lower-cased
/// emoji keys, deduplicated and lexicographically sorted agent ids,
/// empty-after-dedup emoji entries dropped. Used uniformly by both the
/// legacy and merged fold paths.
pub fn normalize_reactions_map(
    raw: HashMap<String, Vec<String>>,
) -> HashMap<String, Vec<String>> {
    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    for (emoji, agents) in raw {
        let emoji = emoji.to_lowercase();
        let entry = out.entry(emoji).or_default();
        entry.extend(agents);
    }
    for agents in out.values_mut() {
        let mut seen = HashSet::new();
        agents.retain(|a| seen.insert(a.clone()));
        agents.sort();
    }
    out.retain(|_, agents| !agents.is_empty());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::parse_envelope;

    #[test]
    fn multi_machine_reaction_ordering() {
        // already merge-ordered (beta's reacted_at=100 sorts before alpha's 200)
        let envelopes: Vec<Envelope> = [
            r#"{"type":"reaction","message_guid":"m1","agent_id":"b","emoji":":heart:","reacted_at":100}"#,
            r#"{"type":"reaction","message_guid":"m1","agent_id":"a","emoji":":+1:","reacted_at":200}"#,
        ]
        .iter()
        .filter_map(|l| parse_envelope(l))
        .collect();

        let events = fold_reaction_events(envelopes);
        assert_eq!(
            reactions_for_message(&events, "m1"),
            vec![":heart:".to_string(), ":+1:".to_string()]
        );
    }

    #[test]
    fn normalize_dedups_and_sorts_agents_and_lowercases_emoji() {
        let mut raw = HashMap::new();
        raw.insert(
            ":+1:".to_string(),
            vec!["b".to_string(), "a".to_string(), "a".to_string()],
        );
        raw.insert("UPPER".to_string(), vec![]);
        let normalized = normalize_reactions_map(raw);
        assert_eq!(
            normalized.get(":+1:"),
            Some(&vec!["a".to_string(), "b".to_string()])
        );
        assert!(!normalized.contains_key("upper"));
    }
}
