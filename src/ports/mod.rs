//! Ports (capability traits) for the controller's collaborators.
//!
//! The controller depends on these abstractions, never on concrete
//! hardware or services. Each trait exposes exactly the calls the session
//! protocol needs.

mod bank;
mod card_reader;
mod cash_dispenser;

pub use bank::Bank;
pub use card_reader::CardReader;
pub use cash_dispenser::CashDispenser;
