//! Conversation domain.
//!
//! - [`message::Message`] — one role-tagged turn, optionally carrying tool calls
//! - [`trace::ExecutionTrace`] — the append-only log of one strategy run

pub mod message;
pub mod trace;
