//! Error types for ATM session operations.
//!
//! Collaborators report failures as [`CollaboratorError`]. The controller
//! classifies those, together with its own phase and argument checks, into
//! [`AtmError`] at its boundary.

use crate::core::{Operation, SessionPhase};
use crate::model::AccountId;
use thiserror::Error;

/// Result type alias for controller operations.
pub type AtmResult<T> = Result<T, AtmError>;

/// Result type alias for collaborator (port) calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Failure reported by a card reader, bank or cash dispenser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Device malfunction (jammed reader, dispenser fault)
    #[error("hardware fault: {0}")]
    Hardware(String),

    /// Link to a remote service failed
    #[error("network fault: {0}")]
    Network(String),

    /// Collaborator could not allocate
    #[error("out of memory")]
    OutOfMemory,

    /// Collaborator answered and declined the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Unclassified system fault
    #[error("system fault: {0}")]
    System(String),
}

impl CollaboratorError {
    /// True when the collaborator answered with a business-level "no"
    /// rather than failing to answer at all.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Flat classification of [`AtmError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidState,
    InvalidArgument,
    CardAbsent,
    AccountNotSelected,
    AuthenticationFailed,
    AuthenticationLockout,
    AccountNotFound,
    InsufficientFunds,
    InsufficientCash,
    CollaboratorFailure,
    CompensationFailure,
}

/// Top-level error type for controller operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtmError {
    /// Operation is not legal in the current session phase
    #[error("{operation} is not allowed while {phase}")]
    InvalidState {
        operation: Operation,
        phase: SessionPhase,
    },

    /// Negative amount passed to deposit or withdraw
    #[error("invalid amount {amount}: must not be negative")]
    InvalidArgument { amount: i64 },

    /// Card identifier missing although the phase requires one
    #[error("no card present")]
    CardAbsent,

    /// Account missing although the phase requires one
    #[error("no account selected")]
    AccountNotSelected,

    /// Wrong PIN, further attempts remain
    #[error("PIN rejected: {attempts_remaining} attempt(s) remaining")]
    AuthenticationFailed { attempts_remaining: u32 },

    /// Wrong PIN and the attempt limit was reached; the card was ejected
    #[error("PIN rejected {attempts} time(s): card ejected")]
    AuthenticationLockout { attempts: u32 },

    /// Requested account is not linked to the inserted card
    #[error("account {account} not found for this card")]
    AccountNotFound { account: AccountId },

    /// Bank declined the withdrawal capacity check
    #[error("insufficient funds for {amount}")]
    InsufficientFunds { amount: i64 },

    /// Dispenser declined the capacity check
    #[error("insufficient cash in dispenser for {amount}")]
    InsufficientCash { amount: i64 },

    /// Underlying hardware or service call failed
    #[error("collaborator failure: {0}")]
    CollaboratorFailure(#[from] CollaboratorError),

    /// Account was debited, cash was not dispensed and the re-credit failed.
    /// Requires manual reconciliation.
    #[error(
        "account {account} debited {amount} without dispensing ({dispense_error}); \
         re-credit failed: {compensation_error}"
    )]
    CompensationFailure {
        account: AccountId,
        amount: i64,
        dispense_error: CollaboratorError,
        compensation_error: CollaboratorError,
    },
}

impl AtmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::CardAbsent => ErrorKind::CardAbsent,
            Self::AccountNotSelected => ErrorKind::AccountNotSelected,
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::AuthenticationLockout { .. } => ErrorKind::AuthenticationLockout,
            Self::AccountNotFound { .. } => ErrorKind::AccountNotFound,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::InsufficientCash { .. } => ErrorKind::InsufficientCash,
            Self::CollaboratorFailure(_) => ErrorKind::CollaboratorFailure,
            Self::CompensationFailure { .. } => ErrorKind::CompensationFailure,
        }
    }
}
