//! `question` / `question_update`. No
//! tombstone kind exists for questions, and updates are plain
//! field-presence overwrites — no null-clearing semantics for this family.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};
use crate::fold::EntityFold;

const DEFAULT_STATUS: &str = "unasked";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: Option<String>,
    pub status: String,
    pub asked_by: Option<String>,
    pub answer: Option<String>,
    pub ts: i64,
}

pub fn fold_questions(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<Question> {
    let mut fold: EntityFold<Question> = EntityFold::new();

    for env in envelopes {
        match env.type_.as_str() {
            "question" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                fold.note_created(&id);
                let question = Question {
                    id: id.clone(),
                    text: string_field(&env.fields, "text"),
                    status: string_field(&env.fields, "status")
                        .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                    asked_by: string_field(&env.fields, "asked_by"),
                    answer: string_field(&env.fields, "answer"),
                    ts: i64_field(&env.fields, "ts").unwrap_or(0),
                };
                fold.set(&id, question);
                for pending in fold.take_pending(&id) {
                    apply_update(&mut fold, &pending);
                }
            }
            "question_update" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                if fold.contains(&id) {
                    apply_update(&mut fold, &env);
                } else {
                    fold.buffer_pending(&id, env);
                }
            }
            _ => {}
        }
    }

    fold.finish()
}

fn apply_update(fold: &mut EntityFold<Question>, env: &Envelope) {
    let Some(id) = string_field(&env.fields, "id") else {
        return;
    };
    let Some(question) = fold.get_mut(&id) else {
        return;
    };

    if let Some(text) = string_field(&env.fields, "text") {
        question.text = Some(text);
    }
    if let Some(status) = string_field(&env.fields, "status") {
        question.status = status;
    }
    if let Some(asked_by) = string_field(&env.fields, "asked_by") {
        question.asked_by = Some(asked_by);
    }
    if let Some(answer) = string_field(&env.fields, "answer") {
        question.answer = Some(answer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::parse_envelope;

    fn envs(lines: &[&str]) -> Vec<Envelope> {
        lines.iter().filter_map(|l| parse_envelope(l)).collect()
    }

    #[test]
    fn default_status_is_unasked() {
        let qs = fold_questions(envs(&[r#"{"type":"question","id":"q1","ts":1}"#]));
        assert_eq!(qs[0].status, "unasked");
    }

    #[test]
    fn update_overwrites_answer_and_status() {
        let qs = fold_questions(envs(&[
            r#"{"type":"question","id":"q1","text":"why?","ts":1}"#,
            r#"{"type":"question_update","id":"q1","answer":"because","status":"answered"}"#,
        ]));
        assert_eq!(qs[0].answer, Some("because".to_string()));
        assert_eq!(qs[0].status, "answered");
    }

    #[test]
    fn pending_update_applied_on_creation() {
        let qs = fold_questions(envs(&[
            r#"{"type":"question_update","id":"q1","status":"answered"}"#,
            r#"{"type":"question","id":"q1","ts":1}"#,
        ]));
        assert_eq!(qs[0].status, "answered");
    }
}
