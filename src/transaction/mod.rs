//! Multi-step commits with compensation.
//!
//! Two collaborators that share no transaction (the bank ledger and the
//! cash bin) are updated one after the other. If a later step fails, the
//! steps that already took effect are undone by their compensating action,
//! newest first.
//!
//! # Example
//!
//! ```rust
//! use atm_session::transaction::{Transaction, TransactionError};
//! use atm_session::{CollaboratorError, CollaboratorResult};
//!
//! struct Ledger {
//!     reserved: i64,
//!     shipped: bool,
//! }
//!
//! fn reserve(l: &mut Ledger) -> CollaboratorResult<()> {
//!     l.reserved += 10;
//!     Ok(())
//! }
//!
//! fn release(l: &mut Ledger) -> CollaboratorResult<()> {
//!     l.reserved -= 10;
//!     Ok(())
//! }
//!
//! fn ship(_: &mut Ledger) -> CollaboratorResult<()> {
//!     Err(CollaboratorError::Hardware("jam".to_string()))
//! }
//!
//! let transaction = Transaction::new()
//!     .compensated_step("reserve", reserve, release)
//!     .step("ship", ship);
//!
//! let mut ledger = Ledger { reserved: 0, shipped: false };
//! let err = transaction.run(&mut ledger).unwrap_err();
//!
//! assert_eq!(err.failed_step(), "ship");
//! assert!(matches!(err, TransactionError::StepFailed { .. }));
//! assert_eq!(ledger.reserved, 0);
//! assert!(!ledger.shipped);
//! ```

use crate::error::{CollaboratorError, CollaboratorResult};
use tracing::{debug, warn};

pub mod error;

pub use error::TransactionError;

/// Action run against the transaction context.
pub type StepAction<C> = fn(&mut C) -> CollaboratorResult<()>;

/// One named step with an optional compensating action.
pub struct Step<C> {
    pub name: &'static str,
    pub execute: StepAction<C>,
    pub compensate: Option<StepAction<C>>,
}

impl<C> Clone for Step<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Step<C> {}

/// Ordered list of steps executed against a shared context `C`.
pub struct Transaction<C> {
    steps: Vec<Step<C>>,
}

impl<C> Transaction<C> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step that needs no undo (typically the last one).
    pub fn step(mut self, name: &'static str, execute: StepAction<C>) -> Self {
        self.steps.push(Step {
            name,
            execute,
            compensate: None,
        });
        self
    }

    /// Append a step that is undone by `compensate` if a later step fails.
    pub fn compensated_step(
        mut self,
        name: &'static str,
        execute: StepAction<C>,
        compensate: StepAction<C>,
    ) -> Self {
        self.steps.push(Step {
            name,
            execute,
            compensate: Some(compensate),
        });
        self
    }

    pub fn steps(&self) -> &[Step<C>] {
        &self.steps
    }

    /// Execute every step in order.
    ///
    /// On the first failure the completed steps are compensated in reverse
    /// order. A failing compensation does not stop the remaining ones; the
    /// first such failure is reported.
    pub fn run(&self, ctx: &mut C) -> Result<(), TransactionError> {
        let mut completed: Vec<&Step<C>> = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            match (step.execute)(ctx) {
                Ok(()) => {
                    debug!(step = step.name, "transaction step completed");
                    completed.push(step);
                }
                Err(source) => {
                    warn!(step = step.name, error = %source, "transaction step failed");
                    return Err(Self::unwind(ctx, &completed, step.name, source));
                }
            }
        }

        Ok(())
    }

    fn unwind(
        ctx: &mut C,
        completed: &[&Step<C>],
        failed: &'static str,
        source: CollaboratorError,
    ) -> TransactionError {
        let mut compensated = Vec::new();
        let mut first_failure: Option<(&'static str, CollaboratorError)> = None;

        for step in completed.iter().rev() {
            let Some(compensate) = step.compensate else {
                continue;
            };
            match compensate(ctx) {
                Ok(()) => {
                    debug!(step = step.name, "compensation applied");
                    compensated.push(step.name);
                }
                Err(err) => {
                    warn!(step = step.name, error = %err, "compensation failed");
                    first_failure.get_or_insert((step.name, err));
                }
            }
        }

        match first_failure {
            Some((compensation, compensation_error)) => TransactionError::CompensationFailed {
                step: failed,
                source,
                compensation,
                compensation_error,
            },
            None => TransactionError::StepFailed {
                step: failed,
                source,
                compensated,
            },
        }
    }
}

impl<C> Default for Transaction<C> {
    fn default() -> Self {
        Self::new()
    }
}
