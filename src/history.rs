//! Reconstructs a message's version history and counts its effective
//! edits. Both read the merge-ordered `message` /
//! `message_update` stream for a single target ID, not the folded
//! [`crate::fold::messages`] map — they reconstruct history the fold
//! discards once it settles on current state.

use crate::envelope::{i64_field, string_field};
use crate::error::{FoldError, FoldResult};
use crate::nullable::{probe, Field};
use crate::order::OrderedLine;

#[derive(Debug, Clone, PartialEq)]
pub struct MessageVersion {
    pub version: u32,
    pub body: String,
    pub ts: i64,
    pub reason: Option<String>,
    pub is_original: bool,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageHistory {
    pub id: String,
    pub versions: Vec<MessageVersion>,
    pub version_count: usize,
    pub is_archived: bool,
}

struct Candidate {
    body: String,
    ts: i64,
    seq: i64,
    reason: Option<String>,
    is_original: bool,
}

pub fn message_history(lines: &[OrderedLine], id: &str) -> FoldResult<MessageHistory> {
    let creation = lines
        .iter()
        .find(|l| l.envelope.type_ == "message" && string_field(&l.envelope.fields, "id").as_deref() == Some(id));

    let Some(creation) = creation else {
        return Err(FoldError::MessageNotFound { id: id.to_string() });
    };

    let original_ts = creation.ts;
    let mut candidates = vec![Candidate {
        body: string_field(&creation.envelope.fields, "body").unwrap_or_default(),
        ts: original_ts,
        seq: creation.seq,
        reason: string_field(&creation.envelope.fields, "reason"),
        is_original: true,
    }];

    let mut archived_at: Option<i64> = None;

    for line in lines {
        if line.envelope.type_ != "message_update" {
            continue;
        }
        if string_field(&line.envelope.fields, "id").as_deref() != Some(id) {
            continue;
        }
        if let Field::Value(ts) = probe::<i64>(&line.envelope.fields, "archived_at") {
            archived_at = Some(ts);
        } else if let Field::Null = probe::<i64>(&line.envelope.fields, "archived_at") {
            archived_at = None;
        }

        if let Field::Value(body) = probe::<String>(&line.envelope.fields, "body") {
            let ts = i64_field(&line.envelope.fields, "edited_at").unwrap_or(original_ts);
            candidates.push(Candidate {
                body,
                ts,
                seq: line.seq,
                reason: string_field(&line.envelope.fields, "reason"),
                is_original: false,
            });
        }
    }

    candidates.sort_by(|a, b| a.ts.cmp(&b.ts).then_with(|| a.seq.cmp(&b.seq)));

    let count = candidates.len();
    let versions = candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| MessageVersion {
            version: (i + 1) as u32,
            body: c.body,
            ts: c.ts,
            reason: c.reason,
            is_original: c.is_original,
            is_current: i + 1 == count,
        })
        .collect();

    Ok(MessageHistory {
        id: id.to_string(),
        versions,
        version_count: count,
        is_archived: archived_at.is_some(),
    })
}

/// Counts effective edits — a
/// body edit, not an archive-only update — with a backfill for the
/// case where the current view shows an edit the raw count missed.
pub fn edit_count(lines: &[OrderedLine], id: &str, current_edited_at: Option<i64>) -> usize {
    let mut count = 0usize;
    for line in lines {
        if line.envelope.type_ != "message_update" {
            continue;
        }
        if string_field(&line.envelope.fields, "id").as_deref() != Some(id) {
            continue;
        }
        let edited_at_present = matches!(
            probe::<i64>(&line.envelope.fields, "edited_at"),
            Field::Value(_)
        );
        let body_without_archive = matches!(probe::<String>(&line.envelope.fields, "body"), Field::Value(_))
            && !matches!(
                probe::<i64>(&line.envelope.fields, "archived_at"),
                Field::Value(_)
            );
        if edited_at_present || body_without_archive {
            count += 1;
        }
    }

    if count == 0 && current_edited_at.is_some() {
        return 1;
    }
    count
}
