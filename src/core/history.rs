//! Bounded log of recent state transitions.
//!
//! The dispatcher records every transition here for diagnostics. The log is
//! kept in memory only and drops its oldest entries once full, so a machine
//! that runs for the whole life of the process never grows without bound.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions retained by a [`TransitionLog`].
pub const DEFAULT_LOG_CAPACITY: usize = 64;

/// Record of a single transition.
///
/// # Example
///
/// ```rust
/// use gentle::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "at computer".to_string(),
///     to: "away from keyboard".to_string(),
///     event: "timeout".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert!(!record.is_self_transition());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the state being left
    pub from: String,
    /// Name of the state being entered
    pub to: String,
    /// Name of the event that caused the transition
    pub event: String,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn is_self_transition(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered, bounded history of transitions.
///
/// # Example
///
/// ```rust
/// use gentle::core::{TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let mut log = TransitionLog::with_capacity(2);
/// for (from, to) in [("a", "b"), ("b", "c"), ("c", "a")] {
///     log.record(TransitionRecord {
///         from: from.to_string(),
///         to: to.to_string(),
///         event: "next".to_string(),
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.path(), vec!["b", "c", "a"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionLog {
    capacity: usize,
    records: VecDeque<TransitionRecord>,
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl TransitionLog {
    /// Create an empty log. A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// States traversed: the first retained `from`, then every `to`.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.records.iter().map(|r| r.to.as_str()));
        path
    }

    /// Time between the oldest and newest retained transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &str, to: &str) -> TransitionRecord {
        TransitionRecord {
            from: from.to_string(),
            to: to.to_string(),
            event: "next".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = TransitionLog::default();
        assert!(log.is_empty());
        assert!(log.path().is_empty());
        assert!(log.duration().is_none());
        assert_eq!(log.capacity(), DEFAULT_LOG_CAPACITY);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut log = TransitionLog::default();
        log.record(record("Initial", "Processing"));
        log.record(record("Processing", "Complete"));

        assert_eq!(log.path(), vec!["Initial", "Processing", "Complete"]);
    }

    #[test]
    fn full_log_evicts_oldest() {
        let mut log = TransitionLog::with_capacity(2);
        log.record(record("a", "b"));
        log.record(record("b", "c"));
        log.record(record("c", "d"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.records().next().map(|r| r.from.as_str()), Some("b"));
        assert_eq!(log.last().map(|r| r.to.as_str()), Some("d"));
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut log = TransitionLog::with_capacity(0);
        log.record(record("a", "b"));
        assert!(log.is_empty());
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let mut log = TransitionLog::default();
        log.record(record("a", "b"));

        assert_eq!(log.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let mut log = TransitionLog::default();
        log.record(TransitionRecord {
            timestamp: start,
            ..record("a", "b")
        });
        log.record(TransitionRecord {
            timestamp: start + chrono::Duration::seconds(5),
            ..record("b", "c")
        });

        assert_eq!(log.duration(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn self_transition_is_detected() {
        assert!(record("a", "a").is_self_transition());
        assert!(!record("a", "b").is_self_transition());
    }

    #[test]
    fn log_serializes_correctly() {
        let mut log = TransitionLog::default();
        log.record(record("Initial", "Processing"));

        let json = serde_json::to_string(&log).unwrap();
        let deserialized: TransitionLog = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.last(), log.last());
    }
}
