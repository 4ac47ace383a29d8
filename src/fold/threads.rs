//! Handles `thread` / `thread_update` /
//! `thread_delete`. Membership and subscription events living in the
//! same file are folded separately by [`super::event_streams`].

use serde::{Deserialize, Serialize};

use crate::envelope::{bool_field, i64_field, string_field, Envelope};
use crate::fold::EntityFold;
use crate::nullable::probe;

const DEFAULT_STATUS: &str = "open";
const ARCHIVED_STATUS: &str = "archived";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub name: Option<String>,
    pub status: String,
    pub type_: Option<String>,
    pub parent_thread: Option<String>,
    pub anchor_message_guid: Option<String>,
    pub anchor_hidden: Option<bool>,
    pub last_activity_at: Option<i64>,
    pub ts: i64,
}

pub fn fold_threads(envelopes: impl IntoIterator<Item = Envelope>) -> Vec<Thread> {
    let mut fold: EntityFold<Thread> = EntityFold::new();

    for env in envelopes {
        match env.type_.as_str() {
            "thread" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                fold.note_created(&id);
                if fold.is_deleted(&id) {
                    if !fold.contains(&id) {
                        fold.set(&id, Thread::archived_placeholder(&id));
                    }
                    continue;
                }
                let thread = Thread {
                    id: id.clone(),
                    name: string_field(&env.fields, "name"),
                    status: string_field(&env.fields, "status")
                        .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                    type_: string_field(&env.fields, "type"),
                    parent_thread: string_field(&env.fields, "parent_thread"),
                    anchor_message_guid: string_field(&env.fields, "anchor_message_guid"),
                    anchor_hidden: bool_field(&env.fields, "anchor_hidden"),
                    last_activity_at: i64_field(&env.fields, "last_activity_at"),
                    ts: i64_field(&env.fields, "ts").unwrap_or(0),
                };
                fold.set(&id, thread);
                for pending in fold.take_pending(&id) {
                    apply_mutation(&mut fold, &pending);
                }
            }
            "thread_update" => {
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
            "thread_delete" => {
                let Some(id) = string_field(&env.fields, "id") else {
                    continue;
                };
                fold.mark_deleted(&id);
                if let Some(thread) = fold.get_mut(&id) {
                    thread.status = ARCHIVED_STATUS.to_string();
                }
            }
            _ => {}
        }
    }

    fold.finish()
}

impl Thread {
    fn archived_placeholder(id: &str) -> Self {
        Thread {
            id: id.to_string(),
            name: None,
            status: ARCHIVED_STATUS.to_string(),
            type_: None,
            parent_thread: None,
            anchor_message_guid: None,
            anchor_hidden: None,
            last_activity_at: None,
            ts: 0,
        }
    }
}

fn apply_mutation(fold: &mut EntityFold<Thread>, env: &Envelope) {
    let Some(id) = string_field(&env.fields, "id") else {
        return;
    };
    let Some(thread) = fold.get_mut(&id) else {
        return;
    };

    probe::<String>(&env.fields, "name").apply(&mut thread.name);
    if let crate::nullable::Field::Value(status) = probe::<String>(&env.fields, "status") {
        thread.status = status;
    }
    probe::<String>(&env.fields, "type").apply(&mut thread.type_);
    probe::<String>(&env.fields, "parent_thread").apply(&mut thread.parent_thread);
    probe::<String>(&env.fields, "anchor_message_guid").apply(&mut thread.anchor_message_guid);
    probe::<bool>(&env.fields, "anchor_hidden").apply(&mut thread.anchor_hidden);
    probe::<i64>(&env.fields, "last_activity_at").apply(&mut thread.last_activity_at);
}
