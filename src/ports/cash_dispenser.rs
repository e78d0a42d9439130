//! CashDispenser trait - capability to pay out notes

use crate::error::CollaboratorResult;

/// Capability to physically hand out cash.
pub trait CashDispenser {
    /// Non-mutating probe: does the bin hold at least `amount`?
    fn can_dispense(&mut self, amount: i64) -> CollaboratorResult<()>;

    /// Pay out `amount`.
    ///
    /// # Errors
    ///
    /// May fail even after a successful probe (jam, concurrent depletion).
    fn dispense(&mut self, amount: i64) -> CollaboratorResult<()>;
}

impl<T: CashDispenser + ?Sized> CashDispenser for &mut T {
    fn can_dispense(&mut self, amount: i64) -> CollaboratorResult<()> {
        (**self).can_dispense(amount)
    }

    fn dispense(&mut self, amount: i64) -> CollaboratorResult<()> {
        (**self).dispense(amount)
    }
}
