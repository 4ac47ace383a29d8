//! For each public read, selects the legacy or multi-machine path from
//! the project layout's storage-mode flag. Legacy paths skip the
//! ordering step entirely and fold in raw file order; multi-machine
//! paths merge every machine's file through [`crate::order`] first.
//!
//! The runtime agents log (agents, session triggers, presence events)
//! is the one exception: `GetLocalRuntimePath` is always a single,
//! unmerged, per-host file regardless of storage mode, so those three
//! reads never go through the mode router at all.

use std::path::Path;

use crate::envelope::{parse_envelope, Envelope};
use crate::error::FoldResult;
use crate::fold::agents::{fold_agent_descriptors, fold_agents, Agent, AgentDescriptor};
use crate::fold::event_streams::{
    fold_message_pins, fold_thread_membership, fold_thread_mutes, fold_thread_pins,
    MessagePinEvent, ThreadMembershipEvent, ThreadMuteEvent, ThreadPinEvent,
};
use crate::fold::faves::{fold_faves, FaveEvent};
use crate::fold::ghost_cursors::{fold_ghost_cursors, GhostCursor};
use crate::fold::messages::{fold_messages, Message};
use crate::fold::permissions::{fold_permissions, PermissionRequest};
use crate::fold::presence::{fold_presence_events, PresenceEvent};
use crate::fold::questions::{fold_questions, Question};
use crate::fold::reactions::{fold_reaction_events, ReactionEvent};
use crate::fold::roles::{fold_roles, RoleEvent};
use crate::fold::sessions::{fold_session_triggers, SessionTrigger};
use crate::fold::threads::{fold_threads, Thread};
use crate::history::{self, MessageHistory};
use crate::layout::{
    ProjectLayout, AGENT_STATE_FILE, MESSAGES_FILE, PERMISSIONS_FILE, QUESTIONS_FILE, THREADS_FILE,
};
use crate::line_source::read_lines;
use crate::order::{extract_seq, extract_timestamp, order_machine_lines, OrderedLine};
use crate::shared_log::load_shared_lines;

fn mode_routed_envelopes(
    layout: &dyn ProjectLayout,
    project_path: &Path,
    file_name: &str,
) -> FoldResult<Vec<Envelope>> {
    if layout.is_multi_machine_mode(project_path) {
        let machine_lines = load_shared_lines(layout, project_path, file_name)?;
        Ok(order_machine_lines(machine_lines)
            .into_iter()
            .map(|o| o.envelope)
            .collect())
    } else {
        let path = layout.legacy_dir(project_path).join(file_name);
        let lines = read_lines(&path)?;
        Ok(lines.iter().filter_map(|l| parse_envelope(l)).collect())
    }
}

/// Same mode split as [`mode_routed_envelopes`] but retains `ts`/`seq`
/// per line for the history materializers' own stable re-sort. Legacy
/// mode still does not sort across lines — only ordering *within* the
/// `message_history`/`edit_count` call itself reorders anything.
fn mode_routed_ordered(
    layout: &dyn ProjectLayout,
    project_path: &Path,
    file_name: &str,
) -> FoldResult<Vec<OrderedLine>> {
    if layout.is_multi_machine_mode(project_path) {
        let machine_lines = load_shared_lines(layout, project_path, file_name)?;
        Ok(order_machine_lines(machine_lines))
    } else {
        let path = layout.legacy_dir(project_path).join(file_name);
        let lines = read_lines(&path)?;
        Ok(lines
            .into_iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let envelope = parse_envelope(&line)?;
                let ts = extract_timestamp(&envelope.type_, &envelope.fields);
                let seq = extract_seq(&envelope.fields, index);
                Some(OrderedLine {
                    envelope,
                    machine: String::new(),
                    index,
                    ts,
                    seq,
                })
            })
            .collect())
    }
}

fn local_runtime_envelopes(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<Envelope>> {
    let path = layout.local_runtime_path(project_path);
    let lines = read_lines(&path)?;
    Ok(lines.iter().filter_map(|l| parse_envelope(l)).collect())
}

pub fn messages(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<Message>> {
    Ok(fold_messages(mode_routed_envelopes(layout, project_path, MESSAGES_FILE)?))
}

pub fn threads(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<Thread>> {
    Ok(fold_threads(mode_routed_envelopes(layout, project_path, THREADS_FILE)?))
}

pub fn questions(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<Question>> {
    Ok(fold_questions(mode_routed_envelopes(layout, project_path, QUESTIONS_FILE)?))
}

pub fn permissions(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<PermissionRequest>> {
    Ok(fold_permissions(mode_routed_envelopes(layout, project_path, PERMISSIONS_FILE)?))
}

pub fn ghost_cursors(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<GhostCursor>> {
    Ok(fold_ghost_cursors(mode_routed_envelopes(layout, project_path, AGENT_STATE_FILE)?))
}

pub fn faves(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<FaveEvent>> {
    Ok(fold_faves(mode_routed_envelopes(layout, project_path, AGENT_STATE_FILE)?))
}

pub fn roles(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<RoleEvent>> {
    Ok(fold_roles(mode_routed_envelopes(layout, project_path, AGENT_STATE_FILE)?))
}

pub fn agent_descriptors(
    layout: &dyn ProjectLayout,
    project_path: &Path,
) -> FoldResult<Vec<AgentDescriptor>> {
    Ok(fold_agent_descriptors(mode_routed_envelopes(
        layout,
        project_path,
        AGENT_STATE_FILE,
    )?))
}

pub fn message_pins(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<MessagePinEvent>> {
    Ok(fold_message_pins(mode_routed_envelopes(layout, project_path, MESSAGES_FILE)?))
}

pub fn reactions(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<ReactionEvent>> {
    Ok(fold_reaction_events(mode_routed_envelopes(layout, project_path, MESSAGES_FILE)?))
}

pub fn thread_membership(
    layout: &dyn ProjectLayout,
    project_path: &Path,
) -> FoldResult<Vec<ThreadMembershipEvent>> {
    Ok(fold_thread_membership(mode_routed_envelopes(layout, project_path, THREADS_FILE)?))
}

pub fn thread_pins(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<ThreadPinEvent>> {
    Ok(fold_thread_pins(mode_routed_envelopes(layout, project_path, THREADS_FILE)?))
}

pub fn thread_mutes(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<ThreadMuteEvent>> {
    Ok(fold_thread_mutes(mode_routed_envelopes(layout, project_path, THREADS_FILE)?))
}

/// Always reads the local, single-host runtime log — never mode-routed.
pub fn agents(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<Agent>> {
    Ok(fold_agents(local_runtime_envelopes(layout, project_path)?))
}

/// Always reads the local runtime log.
pub fn session_triggers(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<SessionTrigger>> {
    Ok(fold_session_triggers(local_runtime_envelopes(layout, project_path)?))
}

/// Always reads the local runtime log.
pub fn presence_events(layout: &dyn ProjectLayout, project_path: &Path) -> FoldResult<Vec<PresenceEvent>> {
    Ok(fold_presence_events(local_runtime_envelopes(layout, project_path)?))
}

pub fn message_history(
    layout: &dyn ProjectLayout,
    project_path: &Path,
    id: &str,
) -> FoldResult<MessageHistory> {
    let lines = mode_routed_ordered(layout, project_path, MESSAGES_FILE)?;
    history::message_history(&lines, id)
}

pub fn edit_count(layout: &dyn ProjectLayout, project_path: &Path, id: &str) -> FoldResult<usize> {
    let lines = mode_routed_ordered(layout, project_path, MESSAGES_FILE)?;
    let current_edited_at = messages(layout, project_path)?
        .into_iter()
        .find(|m| m.id == id)
        .and_then(|m| m.edited_at);
    Ok(history::edit_count(&lines, id, current_edited_at))
}
