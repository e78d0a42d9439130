//! Transaction error types.

use crate::error::CollaboratorError;
use thiserror::Error;

/// Errors that can occur while running a [`Transaction`](super::Transaction)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// A step failed; every completed step was compensated.
    #[error("step '{step}' failed: {source}")]
    StepFailed {
        step: &'static str,
        source: CollaboratorError,
        /// Steps whose compensation ran, newest first
        compensated: Vec<&'static str>,
    },

    /// A step failed and undoing an earlier step failed too.
    #[error(
        "step '{step}' failed ({source}); compensating '{compensation}' also failed: \
         {compensation_error}"
    )]
    CompensationFailed {
        step: &'static str,
        source: CollaboratorError,
        compensation: &'static str,
        compensation_error: CollaboratorError,
    },
}

impl TransactionError {
    /// Name of the step whose failure aborted the transaction.
    pub fn failed_step(&self) -> &'static str {
        match self {
            Self::StepFailed { step, .. } | Self::CompensationFailed { step, .. } => step,
        }
    }

    /// Error returned by the failed step.
    pub fn step_error(&self) -> &CollaboratorError {
        match self {
            Self::StepFailed { source, .. } | Self::CompensationFailed { source, .. } => source,
        }
    }
}
