//! Build errors for the controller builder.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a controller.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Card reader not specified. Call .card_reader(reader) before .build()")]
    MissingCardReader,

    #[error("Bank not specified. Call .bank(bank) before .build()")]
    MissingBank,

    #[error("Cash dispenser not specified. Call .cash_dispenser(dispenser) before .build()")]
    MissingCashDispenser,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
