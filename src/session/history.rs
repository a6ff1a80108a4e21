//! Action History
//!
//! Append-only log of every committed transition with before/after
//! snapshots. Entries belonging to one operator action share an
//! `action_id`, so undo can revert an auto-filled report in one step.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::roster::PlayerId;
use crate::game::state::TurnState;

/// Kind of recorded transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// Match seated.
    Start,
    /// Player failed a shot.
    Error,
    /// Player made a shot (reported or auto-filled).
    Success,
    /// Player won the match.
    Win,
}

/// One committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Operator action this entry belongs to.
    pub action_id: u64,
    /// Kind of transition.
    pub event_type: EventType,
    /// Player acted upon (none for `Start`).
    pub player_name: Option<PlayerId>,
    /// Snapshot before the transition.
    pub state_before: TurnState,
    /// Snapshot after the transition.
    pub state_after: TurnState,
    /// Human-readable summary.
    pub description: String,
    /// Match the transition happened in.
    pub match_number: u32,
    /// Synthesized by fast-forward.
    pub auto_filled: bool,
    /// When the transition was committed.
    pub timestamp: DateTime<Utc>,
}

/// History log errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Failed to encode or decode the log.
    #[error("History encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Where committed transitions are recorded.
///
/// `append` is fire-and-forget: a store that cannot record must not fail
/// the transition that produced the entry.
pub trait HistoryStore: Send {
    /// Record an entry.
    fn append(&mut self, entry: HistoryEntry);

    /// Remove and return every entry of the most recent action in
    /// `match_number`, oldest first. Empty if there is none.
    fn take_last_action(&mut self, match_number: u32) -> Vec<HistoryEntry>;

    /// Drop every entry of one match.
    fn clear_match(&mut self, match_number: u32);

    /// Drop everything.
    fn clear_all(&mut self);

    /// Most recent entries of one match, newest first.
    fn recent(&self, match_number: u32, limit: usize) -> Vec<&HistoryEntry>;
}

/// Bounded in-memory history.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl MemoryHistory {
    /// Create a log bounded to about `capacity` entries (0 = unbounded).
    /// A single action larger than `capacity` is still kept whole.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the log empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HistoryError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, HistoryError> {
        Ok(bincode::deserialize(data)?)
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&mut self, entry: HistoryEntry) {
        let newest = entry.action_id;
        self.entries.push(entry);
        if self.capacity == 0 {
            return;
        }

        // Evict whole actions, oldest first. The action being recorded is
        // kept intact even if it alone exceeds the capacity.
        while self.entries.len() > self.capacity {
            let oldest = self.entries[0].action_id;
            if oldest == newest {
                break;
            }
            let group = self
                .entries
                .iter()
                .take_while(|e| e.action_id == oldest)
                .count();
            self.entries.drain(..group);
        }
    }

    fn take_last_action(&mut self, match_number: u32) -> Vec<HistoryEntry> {
        let Some(last) = self.entries.iter().rev().find(|e| e.match_number == match_number) else {
            return Vec::new();
        };
        let action_id = last.action_id;

        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.action_id == action_id);
        self.entries = kept;
        taken
    }

    fn clear_match(&mut self, match_number: u32) {
        self.entries.retain(|e| e.match_number != match_number);
    }

    fn clear_all(&mut self) {
        self.entries.clear();
    }

    fn recent(&self, match_number: u32, limit: usize) -> Vec<&HistoryEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.match_number == match_number)
            .take(limit)
            .collect()
    }
}
