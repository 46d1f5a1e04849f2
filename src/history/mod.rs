//! # Request History
//!
//! A bounded log of past executions, newest first. Every outcome is recorded,
//! failures included. The canonical copy lives in persisted storage; the
//! in-memory list is a cache the session keeps in lockstep by writing the
//! whole list back after every mutation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::http::request::TestRequest;
use crate::http::response::TestResponse;

/// Maximum number of history entries to retain.
pub const MAX_HISTORY_ENTRIES: usize = 20;

/// One executed request with its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub request: TestRequest,
    pub response: TestResponse,
    /// Round-trips as an ISO-8601 string in persisted form.
    #[serde(with = "time::serde::iso8601")]
    pub timestamp: OffsetDateTime,
}

impl HistoryEntry {
    /// Snapshot a completed execution. Ids combine the current millisecond
    /// timestamp with a random suffix; collisions are operationally
    /// negligible and not defended against.
    pub fn new(request: TestRequest, response: TestResponse) -> Self {
        let timestamp = OffsetDateTime::now_utc();
        let millis = timestamp.unix_timestamp_nanos() / 1_000_000;
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("{}-{}", millis, &suffix[..8]),
            request,
            response,
            timestamp,
        }
    }
}

/// Insertion-ordered log of the most recent executions.
///
/// Serializes as a bare JSON array of entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Add an entry to the front, evicting from the back once over capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.pop_back();
        }
    }

    /// Remove the entry with the given id. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Drop all entries. Clearing an empty log is a no-op.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, most recent first.
    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    pub fn find(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
