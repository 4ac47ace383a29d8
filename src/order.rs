//! Lifts raw machine lines into ordered
//! events by extracting an event-type-specific timestamp and a per-line
//! sequence number, then sorting with the canonical 4-key comparator
//! `(ts, machine, seq, index)`.
//!
//! The timestamp field list below is the one place the fold engine
//! cares which record kind it's looking at before dispatch proper —
//! everything else treats `ts`-like fields as opaque. Kinds not listed
//! fall back to `ts` alone.

use serde_json::{Map, Value};

use crate::envelope::{parse_envelope, Envelope};
use crate::shared_log::MachineLine;

fn ts_field_candidates(type_: &str) -> &'static [&'static str] {
    match type_ {
        "message_update" => &["edited_at", "archived_at", "ts"],
        "thread_update" => &["last_activity_at", "ts"],
        "reaction" => &["reacted_at", "ts"],
        "session_start" => &["started_at", "ts"],
        "session_end" => &["ended_at", "ts"],
        "permission_update" => &["responded_at", "ts"],
        _ => &["ts"],
    }
}

/// First present non-null timestamp field for this record kind; `0` if
/// none of the candidates are present.
pub fn extract_timestamp(type_: &str, fields: &Map<String, Value>) -> i64 {
    for field in ts_field_candidates(type_) {
        if let Some(v) = fields.get(*field) {
            if !v.is_null() {
                if let Some(n) = v.as_i64() {
                    return n;
                }
            }
        }
    }
    0
}

/// The writer-stamped per-machine monotonic counter, falling back to
/// the line's in-file index when absent.
pub fn extract_seq(fields: &Map<String, Value>, fallback_index: usize) -> i64 {
    fields
        .get("seq")
        .and_then(Value::as_i64)
        .unwrap_or(fallback_index as i64)
}

pub struct OrderedLine {
    pub envelope: Envelope,
    pub machine: String,
    pub index: usize,
    pub ts: i64,
    pub seq: i64,
}

/// Parses and sorts a batch of machine lines into merge order. Lines
/// that fail to parse as an envelope are dropped — a malformed line is
/// a local, silent recovery, never a reason to abort the fold.
pub fn order_machine_lines(lines: Vec<MachineLine>) -> Vec<OrderedLine> {
    let mut ordered: Vec<OrderedLine> = lines
        .into_iter()
        .filter_map(|ml| {
            let envelope = parse_envelope(&ml.line)?;
            let ts = extract_timestamp(&envelope.type_, &envelope.fields);
            let seq = extract_seq(&envelope.fields, ml.index);
            Some(OrderedLine {
                envelope,
                machine: ml.machine,
                index: ml.index,
                ts,
                seq,
            })
        })
        .collect();

    ordered.sort_by(|a, b| {
        a.ts.cmp(&b.ts)
            .then_with(|| a.machine.cmp(&b.machine))
            .then_with(|| a.seq.cmp(&b.seq))
            .then_with(|| a.index.cmp(&b.index))
    });

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_log::MachineLine;

    fn ml(machine: &str, index: usize, line: &str) -> MachineLine {
        MachineLine {
            line: line.to_string(),
            machine: machine.to_string(),
            index,
        }
    }

    #[test]
    fn sorts_by_timestamp_first() {
        let lines = vec![
            ml("alpha", 0, r#"{"type":"reaction","reacted_at":200}"#),
            ml("beta", 0, r#"{"type":"reaction","reacted_at":100}"#),
        ];
        let ordered = order_machine_lines(lines);
        assert_eq!(ordered[0].machine, "beta");
        assert_eq!(ordered[1].machine, "alpha");
    }

    #[test]
    fn ties_break_by_machine_then_seq_then_index() {
        let lines = vec![
            ml("beta", 5, r#"{"type":"x","ts":10,"seq":1}"#),
            ml("alpha", 3, r#"{"type":"x","ts":10,"seq":2}"#),
            ml("alpha", 2, r#"{"type":"x","ts":10,"seq":1}"#),
        ];
        let ordered = order_machine_lines(lines);
        let machines_seqs: Vec<(String, i64)> = ordered
            .iter()
            .map(|o| (o.machine.clone(), o.seq))
            .collect();
        assert_eq!(
            machines_seqs,
            vec![
                ("alpha".to_string(), 1),
                ("alpha".to_string(), 2),
                ("beta".to_string(), 1),
            ]
        );
    }

    #[test]
    fn missing_timestamp_defaults_to_zero() {
        let lines = vec![ml("alpha", 0, r#"{"type":"x"}"#)];
        assert_eq!(order_machine_lines(lines)[0].ts, 0);
    }

    #[test]
    fn malformed_line_is_dropped() {
        let lines = vec![ml("alpha", 0, "not json")];
        assert!(order_machine_lines(lines).is_empty());
    }
}
