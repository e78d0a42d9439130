//! Phase guards for controller operations.
//!
//! A guard is a pure predicate over the current phase. The controller
//! evaluates it before touching any collaborator, so a rejected operation
//! never has side effects.

use super::state::{Operation, SessionPhase};
use std::fmt;

/// Pure predicate that decides whether an operation may run in a phase.
///
/// # Example
///
/// ```rust
/// use atm_session::core::{Guard, Operation, SessionPhase};
///
/// let guard = Operation::EjectCard.guard();
///
/// assert!(!guard.check(SessionPhase::Idle));
/// assert!(guard.check(SessionPhase::CardPresent));
/// assert!(guard.check(SessionPhase::AccountSelected));
///
/// let only_idle = Guard::new(SessionPhase::is_idle);
/// assert!(only_idle.check(SessionPhase::Idle));
/// ```
#[derive(Clone, Copy)]
pub struct Guard {
    predicate: fn(&SessionPhase) -> bool,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    pub fn new(predicate: fn(&SessionPhase) -> bool) -> Self {
        Self { predicate }
    }

    /// Guard that admits exactly one phase.
    pub fn only(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Idle => Self::new(|p| *p == SessionPhase::Idle),
            SessionPhase::CardPresent => Self::new(|p| *p == SessionPhase::CardPresent),
            SessionPhase::Authenticated => Self::new(|p| *p == SessionPhase::Authenticated),
            SessionPhase::AccountSelected => Self::new(|p| *p == SessionPhase::AccountSelected),
        }
    }

    /// Check if the guard allows the operation in this phase.
    pub fn check(&self, phase: SessionPhase) -> bool {
        (self.predicate)(&phase)
    }

    /// Phases this guard admits, in lifecycle order.
    pub fn admitted(&self) -> Vec<SessionPhase> {
        SessionPhase::ALL
            .into_iter()
            .filter(|phase| self.check(*phase))
            .collect()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("admits", &self.admitted())
            .finish()
    }
}

impl Operation {
    /// Guard encoding the legal phases for this operation.
    pub fn guard(self) -> Guard {
        match self {
            Self::InsertCard => Guard::only(SessionPhase::Idle),
            Self::EjectCard => Guard::new(SessionPhase::holds_card),
            Self::EnterPin => Guard::only(SessionPhase::CardPresent),
            Self::ListAccounts | Self::SelectAccount => Guard::only(SessionPhase::Authenticated),
            Self::GetBalance | Self::Deposit | Self::Withdraw => {
                Guard::only(SessionPhase::AccountSelected)
            }
        }
    }

    /// Check whether this operation is legal in `phase`.
    pub fn permitted_in(self, phase: SessionPhase) -> bool {
        self.guard().check(phase)
    }
}
