//! Session transition history.
//!
//! Records every phase change of the current session so an operator can see
//! how a customer got where they are.

use super::state::{Operation, SessionPhase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single phase change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// The phase being left
    pub from: SessionPhase,
    /// The phase being entered
    pub to: SessionPhase,
    /// Operation that caused the change
    pub operation: Operation,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
}

impl PhaseTransition {
    pub fn now(from: SessionPhase, to: SessionPhase, operation: Operation) -> Self {
        Self {
            from,
            to,
            operation,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of phase changes within one session.
///
/// # Example
///
/// ```rust
/// use atm_session::core::{Operation, PhaseTransition, SessionHistory, SessionPhase};
///
/// let history = SessionHistory::new()
///     .record(PhaseTransition::now(
///         SessionPhase::Idle,
///         SessionPhase::CardPresent,
///         Operation::InsertCard,
///     ))
///     .record(PhaseTransition::now(
///         SessionPhase::CardPresent,
///         SessionPhase::Idle,
///         Operation::EjectCard,
///     ));
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&SessionPhase::Idle, &SessionPhase::CardPresent, &SessionPhase::Idle]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHistory {
    transitions: Vec<PhaseTransition>,
}

impl SessionHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning the extended history.
    pub fn record(mut self, transition: PhaseTransition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Get the path of phases traversed.
    ///
    /// Returns the starting phase followed by the `to` phase of each
    /// transition.
    pub fn get_path(&self) -> Vec<&SessionPhase> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[PhaseTransition] {
        &self.transitions
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn last(&self) -> Option<&PhaseTransition> {
        self.transitions.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert() -> PhaseTransition {
        PhaseTransition::now(
            SessionPhase::Idle,
            SessionPhase::CardPresent,
            Operation::InsertCard,
        )
    }

    #[test]
    fn new_history_is_empty() {
        let history = SessionHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_adds_transition() {
        let history = SessionHistory::new().record(insert());

        assert_eq!(history.transitions().len(), 1);
        assert_eq!(history.last().map(|t| t.operation), Some(Operation::InsertCard));
    }

    #[test]
    fn get_path_returns_phase_sequence() {
        let history = SessionHistory::new()
            .record(insert())
            .record(PhaseTransition::now(
                SessionPhase::CardPresent,
                SessionPhase::Authenticated,
                Operation::EnterPin,
            ))
            .record(PhaseTransition::now(
                SessionPhase::Authenticated,
                SessionPhase::AccountSelected,
                Operation::SelectAccount,
            ));

        let path = history.get_path();
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], &SessionPhase::Idle);
        assert_eq!(path[1], &SessionPhase::CardPresent);
        assert_eq!(path[2], &SessionPhase::Authenticated);
        assert_eq!(path[3], &SessionPhase::AccountSelected);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let start = Utc::now();
        let mut first = insert();
        first.timestamp = start;
        let mut second = PhaseTransition::now(
            SessionPhase::CardPresent,
            SessionPhase::Idle,
            Operation::EjectCard,
        );
        second.timestamp = start + chrono::Duration::milliseconds(250);

        let history = SessionHistory::new().record(first).record(second);

        assert_eq!(history.duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = SessionHistory::new().record(insert());
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = SessionHistory::new().record(insert());

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: SessionHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}
