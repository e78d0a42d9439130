//! ATM session controller
//!
//! One customer session at a time is driven through four phases: `Idle`,
//! `CardPresent`, `Authenticated` and `AccountSelected`. The controller talks
//! to three collaborators (card reader, bank, cash dispenser) through the
//! traits in [`ports`], so the same session logic runs against hardware, a
//! remote core-banking service or the in-memory doubles in [`adapters`].
//!
//! # Core Concepts
//!
//! - **Phase guards**: pure predicates checked before any collaborator call
//! - **PIN attempts**: consecutive failures are counted and the card is
//!   ejected when the configured limit is hit
//! - **Compensating withdrawal**: both sides are probed, the account is
//!   debited, cash is dispensed, and a failed dispense is undone by
//!   re-crediting the account
//! - **History**: every phase change is recorded with a timestamp
//!
//! # Example
//!
//! ```rust
//! use atm_session::adapters::{InMemoryBank, InMemoryCardReader, InMemoryCashDispenser};
//! use atm_session::{AccountId, Controller, Pin};
//!
//! let mut atm = Controller::new(
//!     InMemoryCardReader::new("C1"),
//!     InMemoryBank::new()
//!         .with_card("C1", "1234")
//!         .with_account("C1", "A1", 1000),
//!     InMemoryCashDispenser::new(500),
//! );
//!
//! atm.insert_card()?;
//! atm.enter_pin(&Pin::from("1234"))?;
//! atm.select_account(&AccountId::from("A1"))?;
//! atm.withdraw(200)?;
//!
//! assert_eq!(atm.balance()?, 800);
//! atm.eject_card()?;
//! # Ok::<(), atm_session::AtmError>(())
//! ```

pub mod adapters;
pub mod builder;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod model;
pub mod ports;
pub mod transaction;

// Re-export commonly used types
pub use builder::{BuildError, ControllerBuilder};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{Controller, SessionSnapshot};
pub use core::{Operation, SessionPhase};
pub use error::{AtmError, AtmResult, CollaboratorError, CollaboratorResult, ErrorKind};
pub use model::{AccountId, CardId, Pin};
