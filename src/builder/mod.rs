//! Builder API for assembling a controller.
//!
//! # Example
//!
//! ```
//! use atm_session::adapters::{InMemoryBank, InMemoryCardReader, InMemoryCashDispenser};
//! use atm_session::builder::ControllerBuilder;
//! use atm_session::core::SessionPhase;
//!
//! let atm = ControllerBuilder::new()
//!     .card_reader(InMemoryCardReader::new("C1"))
//!     .bank(InMemoryBank::new().with_card("C1", "1234"))
//!     .cash_dispenser(InMemoryCashDispenser::new(500))
//!     .max_pin_attempts(5)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(atm.phase(), SessionPhase::Idle);
//! assert_eq!(atm.config().max_pin_attempts(), 5);
//! ```

pub mod error;

pub use error::BuildError;

use crate::config::ControllerConfig;
use crate::controller::Controller;
use crate::ports::{Bank, CardReader, CashDispenser};

/// Fluent builder for [`Controller`].
pub struct ControllerBuilder<R, B, D> {
    card_reader: Option<R>,
    bank: Option<B>,
    cash_dispenser: Option<D>,
    config: ControllerConfig,
}

impl<R: CardReader, B: Bank, D: CashDispenser> ControllerBuilder<R, B, D> {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            card_reader: None,
            bank: None,
            cash_dispenser: None,
            config: ControllerConfig::default(),
        }
    }

    /// Set the card reader (required).
    pub fn card_reader(mut self, card_reader: R) -> Self {
        self.card_reader = Some(card_reader);
        self
    }

    /// Set the bank (required).
    pub fn bank(mut self, bank: B) -> Self {
        self.bank = Some(bank);
        self
    }

    /// Set the cash dispenser (required).
    pub fn cash_dispenser(mut self, cash_dispenser: D) -> Self {
        self.cash_dispenser = Some(cash_dispenser);
        self
    }

    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the PIN attempt limit.
    /// Returns an error if `max` is zero.
    pub fn max_pin_attempts(mut self, max: u32) -> Result<Self, BuildError> {
        self.config = ControllerConfig::new(max)?;
        Ok(self)
    }

    /// Build the controller.
    /// Returns an error if a collaborator is missing.
    pub fn build(self) -> Result<Controller<R, B, D>, BuildError> {
        let card_reader = self.card_reader.ok_or(BuildError::MissingCardReader)?;
        let bank = self.bank.ok_or(BuildError::MissingBank)?;
        let cash_dispenser = self
            .cash_dispenser
            .ok_or(BuildError::MissingCashDispenser)?;

        Ok(Controller::with_config(
            card_reader,
            bank,
            cash_dispenser,
            self.config,
        ))
    }
}

impl<R: CardReader, B: Bank, D: CashDispenser> Default for ControllerBuilder<R, B, D> {
    fn default() -> Self {
        Self::new()
    }
}
