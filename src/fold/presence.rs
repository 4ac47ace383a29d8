//! Every `presence_event`
//! is kept — no deduplication, unlike the in-place `presence` field
//! update folded by [`super::agents::fold_agents`] — and the list is
//! reversed for most-recent-first output.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub agent_id: String,
    pub presence: String,
    pub ts: i64,
}

pub fn fold_presence_events(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<PresenceEvent> {
    let mut events: Vec<PresenceEvent> = envelopes
        .into_iter()
        .filter(|e| e.type_ == "presence_event")
        .filter_map(|e| {
            Some(PresenceEvent {
                agent_id: string_field(&e.fields, "id")
                    .or_else(|| string_field(&e.fields, "agent_id"))?,
                presence: string_field(&e.fields, "presence").unwrap_or_default(),
                ts: i64_field(&e.fields, "ts").unwrap_or(0),
            })
        })
        .collect();
    events.reverse();
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::parse_envelope;

    fn envs(lines: &[&str]) -> Vec<Envelope> {
        lines.iter().filter_map(|l| parse_envelope(l)).collect()
    }

    #[test]
    fn reversed_for_most_recent_first_no_dedup() {
        let events = fold_presence_events(envs(&[
            r#"{"type":"presence_event","id":"a1","presence":"online","ts":1}"#,
            r#"{"type":"presence_event","id":"a1","presence":"away","ts":2}"#,
            r#"{"type":"presence_event","id":"a1","presence":"online","ts":3}"#,
        ]));
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].presence, "online");
        assert_eq!(events[0].ts, 3);
        assert_eq!(events[2].ts, 1);
    }
}
