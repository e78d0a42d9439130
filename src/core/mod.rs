//! Core session state machine types.
//!
//! This module contains the pure part of the controller:
//! - Session phases and the operations that drive them
//! - Guard predicates that decide which operation is legal where
//! - PIN attempt accounting
//! - Transition history for the current session
//!
//! Nothing here talks to a collaborator.

mod attempts;
mod guard;
mod history;
mod state;

pub use attempts::{AttemptOutcome, PinAttempts};
pub use guard::Guard;
pub use history::{PhaseTransition, SessionHistory};
pub use state::{Operation, SessionPhase};
