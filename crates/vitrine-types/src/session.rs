//! Session record, state patch, and update envelope types.
//!
//! A `Session` is one viewer's state: the counter and the chat transcript.
//! Mutations produce a `SessionPatch` describing exactly what changed, which
//! travels to re-render subscribers wrapped in a `SessionUpdate`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::ChatTurn;

/// Per-viewer session state.
///
/// Created when a viewer connects, destroyed on explicit disconnect or idle
/// expiry. Never persisted: the counter and transcript die with the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    /// Unbounded in both directions; decrement below zero is allowed.
    pub counter: i64,
    /// Append-only transcript in chronological order.
    pub messages: Vec<ChatTurn>,
    pub started_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session with a time-sortable id and zeroed state.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            counter: 0,
            messages: Vec::new(),
            started_at: now,
            last_active_at: now,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// The state diff produced by applying one event to a session.
///
/// `counter` is `Some` when the counter changed; `appended` carries any
/// transcript entries added by the event. Prior transcript entries are never
/// touched, so a patch is always sufficient for an incremental re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub appended: Vec<ChatTurn>,
}

impl SessionPatch {
    /// A patch that only moves the counter.
    pub fn counter(value: i64) -> Self {
        Self {
            counter: Some(value),
            appended: Vec::new(),
        }
    }

    /// A patch that only appends transcript turns.
    pub fn appended(turns: Vec<ChatTurn>) -> Self {
        Self {
            counter: None,
            appended: turns,
        }
    }
}

/// A patch tagged with its session, as broadcast to re-render subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub session_id: Uuid,
    pub patch: SessionPatch,
}
