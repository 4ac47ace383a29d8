//! `permission_request`
//! creation, `permission_update` sets `chosen_index`, `responded_by`,
//! `responded_at`. No tombstone kind.

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, string_vec_field, Envelope};
use crate::fold::EntityFold;
use crate::nullable::probe;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRequest {
    pub id: String,
    pub agent_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub requested_at: i64,
    pub chosen_index: Option<i64>,
    pub responded_by: Option<String>,
    pub responded_at: Option<i64>,
}

pub fn fold_permissions(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<PermissionRequest> {
    let mut fold: EntityFold<PermissionRequest> = EntityFold::new();

    for env in envelopes {
        match env.type_.as_str() {
            "permission_request" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                fold.note_created(&id);
                let request = PermissionRequest {
                    id: id.clone(),
                    agent_id: string_field(&env.fields, "agent_id").unwrap_or_default(),
                    prompt: string_field(&env.fields, "prompt").unwrap_or_default(),
                    options: string_vec_field(&env.fields, "options").unwrap_or_default(),
                    requested_at: i64_field(&env.fields, "requested_at").unwrap_or(0),
                    chosen_index: None,
                    responded_by: None,
                    responded_at: None,
                };
                fold.set(&id, request);
                for pending in fold.take_pending(&id) {
                    apply_update(&mut fold, &pending);
                }
            }
            "permission_update" => {
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

fn apply_update(fold: &mut EntityFold<PermissionRequest>, env: &Envelope) {
    let Some(id) = string_field(&env.fields, "id") else {
        return;
    };
    let Some(request) = fold.get_mut(&id) else {
        return;
    };

    probe::<i64>(&env.fields, "chosen_index").apply(&mut request.chosen_index);
    probe::<String>(&env.fields, "responded_by").apply(&mut request.responded_by);
    probe::<i64>(&env.fields, "responded_at").apply(&mut request.responded_at);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::parse_envelope;

    fn envs(lines: &[&str]) -> Vec<Envelope> {
        lines.iter().filter_map(|l| parse_envelope(l)).collect()
    }

    #[test]
    fn update_sets_response_fields() {
        let reqs = fold_permissions(envs(&[
            r#"{"type":"permission_request","id":"p1","agent_id":"a1","prompt":"ok?","options":["yes","no"],"requested_at":1}"#,
            r#"{"type":"permission_update","id":"p1","chosen_index":0,"responded_by":"a2","responded_at":5}"#,
        ]));
        assert_eq!(reqs[0].chosen_index, Some(0));
        assert_eq!(reqs[0].responded_by, Some("a2".to_string()));
        assert_eq!(reqs[0].responded_at, Some(5));
    }

    #[test]
    fn pending_update_applied_on_creation() {
        let reqs = fold_permissions(envs(&[
            r#"{"type":"permission_update","id":"p1","chosen_index":1}"#,
            r#"{"type":"permission_request","id":"p1","agent_id":"a1","prompt":"ok?","requested_at":1}"#,
        ]));
        assert_eq!(reqs[0].chosen_index, Some(1));
    }
}
