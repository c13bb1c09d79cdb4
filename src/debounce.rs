//! Debounced history commits.
//!
//! Rapid mutations such as dragging a selection or resizing a plot would otherwise create one
//! history entry per event. A [Debouncer] holds at most one pending commit. Scheduling a new
//! debounced commit replaces a pending debounced one and pushes its deadline back, so only the
//! last state in a burst is committed. Immediate changes never coalesce: the owner commits the
//! pending change first when [Debouncer::coalesces] is false.
//!
//! The debouncer does not own a timer. The hosting event loop passes the current [Instant] when
//! scheduling and polls [Debouncer::poll] on each tick.

use std::time::{Duration, Instant};

use strum_macros::Display;

/// Default delay before a debounced commit is made.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// How a change should be committed to history
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Frequent change; coalesced with other changes arriving within the debounce delay
    Debounced,
    /// Deliberate change; committed on the next tick
    Immediate,
}

/// A change made to a state, as reported by its mutating methods
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    /// Human readable description, used for the history entry
    pub description: String,
    /// How the change should be committed
    pub policy: CommitPolicy,
}

impl Change {
    /// Return a change that is coalesced with others arriving within the debounce delay.
    pub fn debounced(description: impl Into<String>) -> Self {
        Change {
            description: description.into(),
            policy: CommitPolicy::Debounced,
        }
    }

    /// Return a change that is committed on the next tick.
    pub fn immediate(description: impl Into<String>) -> Self {
        Change {
            description: description.into(),
            policy: CommitPolicy::Immediate,
        }
    }
}

/// A commit waiting for its deadline
#[derive(Clone, Debug, PartialEq, Eq)]
struct PendingCommit {
    deadline: Instant,
    description: String,
    policy: CommitPolicy,
}

/// Coalesces changes into deferred commits
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingCommit>,
}

impl Debouncer {
    /// Return a new Debouncer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule a commit for `change`, replacing any pending commit.
    ///
    /// [CommitPolicy::Debounced] changes are due `delay` after `now`. [CommitPolicy::Immediate]
    /// changes are due at `now`, so they are committed on the next poll.
    pub fn schedule(&mut self, change: Change, now: Instant) {
        let deadline = match change.policy {
            CommitPolicy::Debounced => now + self.delay,
            CommitPolicy::Immediate => now,
        };
        if let Some(previous) = self.pending.take() {
            tracing::trace!(
                superseded = %previous.description,
                description = %change.description,
                "rescheduling pending commit"
            );
        }
        self.pending = Some(PendingCommit {
            deadline,
            description: change.description,
            policy: change.policy,
        });
    }

    /// Returns the description of the pending commit if it is due at `now`, clearing it.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => {
                self.pending.take().map(|pending| pending.description)
            }
            _ => None,
        }
    }

    /// Returns the description of the pending commit regardless of its deadline, clearing it.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|pending| pending.description)
    }

    /// Drop any pending commit.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a change with `policy` may replace the pending commit.
    ///
    /// Only debounced changes coalesce with each other. Anything else needs its own history entry,
    /// so the pending commit must be made before scheduling the new change.
    pub fn coalesces(&self, policy: CommitPolicy) -> bool {
        match &self.pending {
            None => true,
            Some(pending) => {
                pending.policy == CommitPolicy::Debounced && policy == CommitPolicy::Debounced
            }
        }
    }

    /// Policy of the pending commit.
    pub fn pending_policy(&self) -> Option<CommitPolicy> {
        self.pending.as_ref().map(|pending| pending.policy)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending commit, for hosts that sleep until the next due commit.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_DELAY)
    }
}
