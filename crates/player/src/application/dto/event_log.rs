//! Bounded event log shown to the player.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Default number of entries kept (oldest are evicted)
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Largest capacity accepted from configuration
pub const MAX_LOG_CAPACITY: usize = 10_000;

/// Entries reserved up front; the deque grows past this on demand.
const INITIAL_RESERVE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Echo of what the player typed
    Player,
    /// Client or session notices (welcome, restored session)
    System,
    /// Story text from the backend
    Narration,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Monotonic within one store, never reused after eviction or clear
    pub id: u64,
    pub text: String,
    pub kind: LogKind,
    pub timestamp: DateTime<Utc>,
}

/// FIFO-bounded, append-only log.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

impl EventLog {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(INITIAL_RESERVE)),
            capacity,
            next_id: 1,
        }
    }

    /// Append an entry, evicting the oldest ones past capacity.
    pub fn push(&mut self, kind: LogKind, text: impl Into<String>, timestamp: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_back(LogEntry {
            id,
            text: text.into(),
            kind,
            timestamp,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        id
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries appended after `id`, oldest first
    pub fn since(&self, id: u64) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |entry| entry.id > id)
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
