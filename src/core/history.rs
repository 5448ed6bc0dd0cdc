//! State transition history tracking.
//!
//! History is an opt-in audit log. A machine records one entry per executed
//! transition; no-op requests and failed transitions leave the log untouched.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How much history a machine keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryPolicy {
    /// Nothing is recorded.
    #[default]
    Disabled,
    /// Every executed transition is appended.
    Unbounded,
    /// Only the most recent `n` transitions are kept.
    Bounded(usize),
}

/// Record of a single executed transition.
///
/// # Example
///
/// ```rust
/// use statute::core::{NamedState, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     sequence: 0,
///     from: NamedState::new("Collapsed"),
///     to: NamedState::new("Expanded"),
///     transition: Some("Expand".to_string()),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.transition.as_deref(), Some("Expand"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// Position of this transition in the machine's lifetime, starting at 0.
    /// Keeps counting when a bounded log evicts older entries.
    pub sequence: u64,
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Label of the transition that executed, if it was named
    pub transition: Option<String>,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of executed transitions.
///
/// # Example
///
/// ```rust
/// use statute::core::{HistoryPolicy, NamedState, State, TransitionLog};
///
/// let mut log = TransitionLog::new(HistoryPolicy::Unbounded);
/// log.record(NamedState::new("A"), NamedState::new("B"), None);
/// log.record(NamedState::new("B"), NamedState::new("C"), None);
///
/// let path: Vec<&str> = log.path().into_iter().map(|s| s.name()).collect();
/// assert_eq!(path, ["A", "B", "C"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionLog<S: State> {
    policy: HistoryPolicy,
    records: VecDeque<TransitionRecord<S>>,
    next_sequence: u64,
}

impl<S: State> Default for TransitionLog<S> {
    fn default() -> Self {
        Self::new(HistoryPolicy::default())
    }
}

impl<S: State> TransitionLog<S> {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            policy,
            records: VecDeque::new(),
            next_sequence: 0,
        }
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.policy, HistoryPolicy::Disabled | HistoryPolicy::Bounded(0))
    }

    /// Append a transition according to the policy.
    ///
    /// Every recorded transition takes the next sequence number, so
    /// sequences keep counting across eviction and [`TransitionLog::clear`].
    pub fn record(&mut self, from: S, to: S, transition: Option<String>) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let capacity = match self.policy {
            HistoryPolicy::Disabled | HistoryPolicy::Bounded(0) => return,
            HistoryPolicy::Unbounded => None,
            HistoryPolicy::Bounded(n) => Some(n),
        };

        if let Some(capacity) = capacity {
            while self.records.len() >= capacity {
                self.records.pop_front();
            }
        }

        self.records.push_back(TransitionRecord {
            sequence,
            from,
            to,
            transition,
            timestamp: Utc::now(),
        });
    }

    /// Recorded transitions, oldest first.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &TransitionRecord<S>> + '_ {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord<S>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained record followed by
    /// the `to` state of every record.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Elapsed time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Collapsed,
        Expanded,
        Hidden,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Collapsed => "Collapsed",
                Self::Expanded => "Expanded",
                Self::Hidden => "Hidden",
            }
        }
    }

    #[test]
    fn default_log_is_disabled() {
        let mut log: TransitionLog<TestState> = TransitionLog::default();
        log.record(TestState::Collapsed, TestState::Expanded, None);

        assert!(!log.is_enabled());
        assert!(log.is_empty());
        assert!(log.path().is_empty());
        assert!(log.duration().is_none());
    }

    #[test]
    fn unbounded_log_keeps_everything() {
        let mut log = TransitionLog::new(HistoryPolicy::Unbounded);
        for _ in 0..10 {
            log.record(TestState::Collapsed, TestState::Expanded, None);
            log.record(TestState::Expanded, TestState::Collapsed, None);
        }

        assert_eq!(log.len(), 20);
        assert_eq!(log.last().unwrap().sequence, 19);
    }

    #[test]
    fn bounded_log_evicts_oldest() {
        let mut log = TransitionLog::new(HistoryPolicy::Bounded(2));
        log.record(TestState::Collapsed, TestState::Expanded, Some("Expand".into()));
        log.record(TestState::Expanded, TestState::Collapsed, Some("Collapse".into()));
        log.record(TestState::Collapsed, TestState::Hidden, Some("Hide".into()));

        let sequences: Vec<u64> = log.records().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(
            log.path(),
            vec![&TestState::Expanded, &TestState::Collapsed, &TestState::Hidden]
        );
    }

    #[test]
    fn zero_capacity_behaves_as_disabled() {
        let mut log = TransitionLog::new(HistoryPolicy::Bounded(0));
        log.record(TestState::Collapsed, TestState::Expanded, None);

        assert!(!log.is_enabled());
        assert!(log.is_empty());
    }

    #[test]
    fn path_returns_state_sequence() {
        let mut log = TransitionLog::new(HistoryPolicy::Unbounded);
        log.record(TestState::Collapsed, TestState::Expanded, None);
        log.record(TestState::Expanded, TestState::Hidden, None);

        let path = log.path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &TestState::Collapsed);
        assert_eq!(path[1], &TestState::Expanded);
        assert_eq!(path[2], &TestState::Hidden);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut log = TransitionLog::new(HistoryPolicy::Unbounded);
        log.record(TestState::Collapsed, TestState::Expanded, None);
        std::thread::sleep(Duration::from_millis(10));
        log.record(TestState::Expanded, TestState::Collapsed, None);

        assert!(log.duration().unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn clear_keeps_sequence_counter() {
        let mut log = TransitionLog::new(HistoryPolicy::Unbounded);
        log.record(TestState::Collapsed, TestState::Expanded, None);
        log.clear();
        log.record(TestState::Expanded, TestState::Collapsed, None);

        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().sequence, 1);
    }

    #[test]
    fn log_serializes_correctly() {
        let mut log = TransitionLog::new(HistoryPolicy::Bounded(4));
        log.record(TestState::Collapsed, TestState::Expanded, Some("Expand".into()));

        let json = serde_json::to_string(&log).unwrap();
        let deserialized: TransitionLog<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.policy(), HistoryPolicy::Bounded(4));
        assert_eq!(deserialized.last().unwrap().to, TestState::Expanded);
    }
}
