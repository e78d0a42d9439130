//! Bank trait - capability to authenticate cards and move money

use crate::error::CollaboratorResult;
use crate::model::{AccountId, CardId, Pin};

/// Capability to talk to the bank holding the customer's accounts.
///
/// A declined request (wrong PIN, short balance, unknown account) is
/// reported as [`CollaboratorError::Rejected`](crate::CollaboratorError::Rejected);
/// every other error kind means the bank could not be asked.
pub trait Bank {
    /// Check `pin` against `card`.
    fn verify_pin(&mut self, card: &CardId, pin: &Pin) -> CollaboratorResult<()>;

    /// Accounts linked to `card`. An empty list is not an error.
    fn list_accounts(&mut self, card: &CardId) -> CollaboratorResult<Vec<AccountId>>;

    fn balance(&mut self, account: &AccountId) -> CollaboratorResult<i64>;

    fn deposit(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()>;

    /// Non-mutating probe: could `account` cover `amount` right now?
    fn can_withdraw(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()>;

    /// Debit `amount` from `account`.
    fn withdraw(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()>;
}

impl<T: Bank + ?Sized> Bank for &mut T {
    fn verify_pin(&mut self, card: &CardId, pin: &Pin) -> CollaboratorResult<()> {
        (**self).verify_pin(card, pin)
    }

    fn list_accounts(&mut self, card: &CardId) -> CollaboratorResult<Vec<AccountId>> {
        (**self).list_accounts(card)
    }

    fn balance(&mut self, account: &AccountId) -> CollaboratorResult<i64> {
        (**self).balance(account)
    }

    fn deposit(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()> {
        (**self).deposit(account, amount)
    }

    fn can_withdraw(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()> {
        (**self).can_withdraw(account, amount)
    }

    fn withdraw(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()> {
        (**self).withdraw(account, amount)
    }
}
