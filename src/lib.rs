//! A local, file-backed event store for a multi-agent chat and
//! coordination room. The crate owns the read side only: it ingests
//! per-category JSONL logs — written either by a single host (legacy
//! layout) or by several hosts each appending to their own directory
//! under a shared root (multi-machine layout) — deterministically
//! orders cross-machine events, folds them per entity into
//! current-state views, and exposes per-entity materializers.
//!
//! The write path, the SQLite projection, network transport, and agent
//! lifecycle management live outside this crate; it consumes a
//! [`ProjectLayout`] implementation from its host and nothing else.

pub mod envelope;
pub mod error;
pub mod fold;
pub mod history;
pub mod layout;
pub mod line_source;
pub mod nullable;
pub mod order;
pub mod reader;
pub mod shared_log;

pub use error::{FoldError, FoldResult};
pub use layout::{FilesystemProjectLayout, ProjectLayout};

pub use fold::agents::{Agent, AgentDescriptor};
pub use fold::event_streams::{
    MessagePinEvent, ThreadMembershipEvent, ThreadMuteEvent, ThreadPinEvent,
};
pub use fold::faves::FaveEvent;
pub use fold::ghost_cursors::GhostCursor;
pub use fold::messages::Message;
pub use fold::permissions::PermissionRequest;
pub use fold::presence::PresenceEvent;
pub use fold::questions::Question;
pub use fold::reactions::ReactionEvent;
pub use fold::roles::RoleEvent;
pub use fold::sessions::SessionTrigger;
pub use fold::threads::Thread;
pub use history::{MessageHistory, MessageVersion};

pub use reader::{
    agent_descriptors, agents, edit_count, faves, ghost_cursors, message_history, message_pins,
    messages, permissions, presence_events, questions, reactions, roles, session_triggers,
    thread_membership, thread_mutes, thread_pins, threads,
};
