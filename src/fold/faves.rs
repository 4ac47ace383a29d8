//! `agent_fave`, `agent_unfave`, and `fave_remove` are flattened to a
//! linear event list in merge order. Despite `fave_remove` reading
//! like a tombstone kind, there is no fold map here for it to
//! suppress — this family's per-record rule overrides the generic
//! tombstone contract. Deriving a current "is-faved?" set from this
//! list is left to the downstream projection.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaveEvent {
    pub agent_id: String,
    pub target_id: String,
    pub kind: String,
    pub ts: i64,
}

pub fn fold_faves(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<FaveEvent> {
    envelopes
        .into_iter()
        .filter(|e| matches!(e.type_.as_str(), "agent_fave" | "agent_unfave" | "fave_remove"))
        .filter_map(|e| {
            Some(FaveEvent {
                agent_id: string_field(&e.fields, "agent_id")?,
                target_id: string_field(&e.fields, "target_id").unwrap_or_default(),
                kind: e.type_.clone(),
                ts: i64_field(&e.fields, "ts").unwrap_or(0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::parse_envelope;

    fn envs(lines: &[&str]) -> Vec<Envelope> {
        lines.iter().filter_map(|l| parse_envelope(l)).collect()
    }

    #[test]
    fn add_remove_readd_preserved_as_event_list() {
        let events = fold_faves(envs(&[
            r#"{"type":"agent_fave","agent_id":"a1","target_id":"t1","ts":1}"#,
            r#"{"type":"fave_remove","agent_id":"a1","target_id":"t1","ts":2}"#,
            r#"{"type":"agent_fave","agent_id":"a1","target_id":"t1","ts":3}"#,
        ]));
        let kinds: Vec<&str> = events.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["agent_fave", "fave_remove", "agent_fave"]);
    }
}
