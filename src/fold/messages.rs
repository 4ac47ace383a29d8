//! Handles `message` / `message_update`
//! / `message_move` / `message_delete`. The event-record kinds that
//! live in the same file (`message_pin`, `message_unpin`, `reaction`)
//! are folded separately by [`super::event_streams`] and
//! [`super::reactions`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::envelope::{i64_field, string_field, Envelope};
use crate::fold::EntityFold;
use crate::nullable::{probe, Field};

const DEFAULT_HOME: &str = "room";
const DELETED_BODY: &str = "[deleted]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from_agent: String,
    pub home: String,
    pub body: String,
    pub msg_type: String,
    pub ts: i64,
    pub edited_at: Option<i64>,
    pub archived_at: Option<i64>,
    pub reactions: HashMap<String, Vec<String>>,
}

impl Message {
    fn deleted_placeholder(id: &str, tombstone_ts: i64) -> Self {
        Message {
            id: id.to_string(),
            from_agent: String::new(),
            home: DEFAULT_HOME.to_string(),
            body: DELETED_BODY.to_string(),
            msg_type: String::new(),
            ts: 0,
            edited_at: None,
            archived_at: Some(tombstone_ts),
            reactions: HashMap::new(),
        }
    }
}

/// Tracks the tombstone timestamp so a delete that arrives before its
/// creation record can still stamp `archived_at` correctly once the
/// creation shows up.
pub fn fold_messages(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<Message> {
    let mut fold: EntityFold<Message> = EntityFold::new();
    let mut tombstone_ts: HashMap<String, i64> = HashMap::new();

    for env in envelopes {
        match env.type_.as_str() {
            "message" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                fold.note_created(&id);
                if fold.is_deleted(&id) {
                    if !fold.contains(&id) {
                        let ts = tombstone_ts.get(&id).copied().unwrap_or(0);
                        fold.set(&id, Message::deleted_placeholder(&id, ts));
                    }
                    continue;
                }
                let msg = Message {
                    id: id.clone(),
                    from_agent: string_field(&env.fields, "from_agent").unwrap_or_default(),
                    home: string_field(&env.fields, "home").unwrap_or_else(|| DEFAULT_HOME.to_string()),
                    body: string_field(&env.fields, "body").unwrap_or_default(),
                    msg_type: string_field(&env.fields, "msg_type").unwrap_or_default(),
                    ts: i64_field(&env.fields, "ts").unwrap_or(0),
                    edited_at: None,
                    archived_at: None,
                    reactions: HashMap::new(),
                };
                fold.set(&id, msg);
                for pending in fold.take_pending(&id) {
                    apply_mutation(&mut fold, &pending);
                }
            }
            "message_update" | "message_move" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                if fold.is_deleted(&id) {
                    continue;
                }
                if fold.contains(&id) {
                    apply_mutation(&mut fold, &env);
                } else {
                    fold.buffer_pending(&id, env);
                }
            }
            "message_delete" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                let ts = i64_field(&env.fields, "ts").unwrap_or(0);
                tombstone_ts.insert(id.clone(), ts);
                fold.mark_deleted(&id);
                if let Some(msg) = fold.get_mut(&id) {
                    msg.body = DELETED_BODY.to_string();
                    msg.archived_at = Some(ts);
                }
            }
            _ => {}
        }
    }

    fold.finish()
}

fn apply_mutation(fold: &mut EntityFold<Message>, env: &Envelope) {
    let Some(id) = string_field(&env.fields, "id") else {
        return;
    };
    let Some(msg) = fold.get_mut(&id) else {
        return;
    };

    match env.type_.as_str() {
        "message_update" => {
            if let Field::Value(body) = probe::<String>(&env.fields, "body") {
                msg.body = body;
            }
            probe::<i64>(&env.fields, "edited_at").apply(&mut msg.edited_at);
            probe::<i64>(&env.fields, "archived_at").apply(&mut msg.archived_at);
            match probe::<HashMap<String, Vec<String>>>(&env.fields, "reactions") {
                Field::Value(reactions) => {
                    msg.reactions = crate::fold::reactions::normalize_reactions_map(reactions);
                }
                Field::Null => msg.reactions = HashMap::new(),
                Field::Absent => {}
            }
        }
        "message_move" => {
            if let Some(new_home) = string_field(&env.fields, "new_home") {
                msg.home = new_home;
            }
        }
        _ => {}
    }
}
