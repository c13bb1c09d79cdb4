//! Bounded undo/redo history.
//!
//! A [StateHistory] keeps serialised snapshots of a [Stateful] target. Undo and redo move a
//! cursor through the snapshots and restore the target from the entry under it. Separately, every
//! committed entry is appended to a change log that is never truncated, so states that have been
//! undone or evicted are still accounted for.

use crate::error::ExplorerError;
use crate::plot_state::PlotState;
use crate::session::Session;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::marker::PhantomData;
use time::OffsetDateTime;

/// Default maximum number of snapshots kept.
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// A value that can be captured as a snapshot and restored from one
pub trait Stateful {
    /// Serialisable form of the value
    type State: Serialize + DeserializeOwned;

    /// Capture the current state.
    fn to_state(&self) -> Self::State;

    /// Restore from a captured state. On error the value must be left unchanged.
    fn from_state(&mut self, state: Self::State) -> Result<(), ExplorerError>;
}

/// A timestamped description of a committed state
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ChangeLogEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub description: String,
}

/// A snapshot held by a history
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: OffsetDateTime,
    pub description: String,
    pub snapshot: serde_json::Value,
}

/// Bounded undo/redo stack of snapshots of a `T`
#[derive(Debug)]
pub struct StateHistory<T> {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    max_history: usize,
    change_log: Vec<ChangeLogEntry>,
    target: PhantomData<fn(&T)>,
}

/// History of a single view
pub type PlotStateHistory = StateHistory<PlotState>;

/// History of a whole session
pub type SessionStateHistory = StateHistory<Session>;

impl<T: Stateful> StateHistory<T> {
    /// Return a new empty StateHistory.
    ///
    /// # Arguments
    ///
    /// * `max_history`: Maximum number of snapshots kept. Values below 1 are raised to 1.
    pub fn new(max_history: usize) -> Self {
        StateHistory {
            entries: VecDeque::new(),
            cursor: 0,
            max_history: max_history.max(1),
            change_log: Vec::new(),
            target: PhantomData,
        }
    }

    /// Commit a snapshot of `target`.
    ///
    /// Any entries after the cursor are discarded. If the history is full the oldest entry is
    /// evicted. The cursor moves to the new entry.
    #[tracing::instrument(level = "DEBUG", skip(self, target))]
    pub fn save_state(&mut self, target: &T, description: &str) -> Result<(), ExplorerError> {
        let snapshot = serde_json::to_value(target.to_state())?;
        let timestamp = OffsetDateTime::now_utc();
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(HistoryEntry {
            timestamp,
            description: description.to_string(),
            snapshot,
        });
        while self.entries.len() > self.max_history {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(description = %evicted.description, "evicted history entry");
            }
        }
        self.cursor = self.entries.len() - 1;
        self.change_log.push(ChangeLogEntry {
            timestamp,
            description: description.to_string(),
        });
        Ok(())
    }

    /// Restore `target` to the previous entry.
    ///
    /// Returns `false` without touching `target` if there is nothing to undo.
    pub fn undo(&mut self, target: &mut T) -> Result<bool, ExplorerError> {
        if !self.can_undo() {
            tracing::debug!("nothing to undo");
            return Ok(false);
        }
        self.restore(target, self.cursor - 1)?;
        Ok(true)
    }

    /// Restore `target` to the next entry.
    ///
    /// Returns `false` without touching `target` if there is nothing to redo.
    pub fn redo(&mut self, target: &mut T) -> Result<bool, ExplorerError> {
        if !self.can_redo() {
            tracing::debug!("nothing to redo");
            return Ok(false);
        }
        self.restore(target, self.cursor + 1)?;
        Ok(true)
    }

    /// Restore `target` from the entry at `index` and move the cursor there. The cursor only moves
    /// if the restore succeeds.
    fn restore(&mut self, target: &mut T, index: usize) -> Result<(), ExplorerError> {
        let entry = &self.entries[index];
        let state: T::State = serde_json::from_value(entry.snapshot.clone())?;
        target.from_state(state)?;
        tracing::debug!(description = %entry.description, index, "restored history entry");
        self.cursor = index;
        Ok(())
    }

    /// Reset the history to a single entry holding the current state of `target`.
    ///
    /// The change log is kept.
    pub fn clear(&mut self, target: &T) -> Result<(), ExplorerError> {
        self.entries.clear();
        self.cursor = 0;
        self.save_state(target, "History cleared")
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry the target was last saved to or restored from.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Every committed entry in commit order, including undone and evicted ones.
    pub fn change_log(&self) -> &[ChangeLogEntry] {
        &self.change_log
    }
}

impl<T: Stateful> Default for StateHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
