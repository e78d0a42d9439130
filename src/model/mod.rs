//! Identifier and credential types exchanged with collaborators.
//!
//! These wrap plain strings so a card number cannot be passed where an
//! account id is expected.

mod ids;
mod pin;

pub use ids::{AccountId, CardId};
pub use pin::Pin;
