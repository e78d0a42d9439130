//! In-memory collaborators.
//!
//! Backed by plain maps and counters. Every call is journaled, and any call
//! can be made to fail with a chosen [`CollaboratorError`], which is how the
//! controller's failure paths are exercised without hardware.

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::model::{AccountId, CardId, Pin};
use crate::ports::{Bank, CardReader, CashDispenser};
use std::collections::HashMap;

/// Calls observed by [`InMemoryCardReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderCall {
    Read,
    Eject,
}

/// Calls observed by [`InMemoryBank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BankCall {
    VerifyPin,
    ListAccounts,
    Balance,
    Deposit,
    CanWithdraw,
    Withdraw,
}

/// Calls observed by [`InMemoryCashDispenser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispenserCall {
    CanDispense,
    Dispense,
}

/// Card reader holding at most one card.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCardReader {
    card: Option<CardId>,
    faults: HashMap<ReaderCall, CollaboratorError>,
    calls: Vec<ReaderCall>,
}

impl InMemoryCardReader {
    pub fn new(card: impl Into<CardId>) -> Self {
        Self {
            card: Some(card.into()),
            ..Self::default()
        }
    }

    /// Reader with an empty slot; every read fails with a hardware fault.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_fault(mut self, call: ReaderCall, error: CollaboratorError) -> Self {
        self.faults.insert(call, error);
        self
    }

    pub fn set_fault(&mut self, call: ReaderCall, error: CollaboratorError) {
        self.faults.insert(call, error);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Put a different card in the slot.
    pub fn load(&mut self, card: impl Into<CardId>) {
        self.card = Some(card.into());
    }

    pub fn calls(&self) -> &[ReaderCall] {
        &self.calls
    }

    pub fn count(&self, call: ReaderCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn observe(&mut self, call: ReaderCall) -> CollaboratorResult<()> {
        self.calls.push(call);
        match self.faults.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl CardReader for InMemoryCardReader {
    fn read(&mut self) -> CollaboratorResult<CardId> {
        self.observe(ReaderCall::Read)?;
        self.card
            .clone()
            .ok_or_else(|| CollaboratorError::Hardware("no card in slot".to_string()))
    }

    fn eject(&mut self) -> CollaboratorResult<()> {
        self.observe(ReaderCall::Eject)
    }
}

/// Bank ledger kept in hash maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBank {
    pins: HashMap<CardId, Pin>,
    accounts: HashMap<CardId, Vec<AccountId>>,
    balances: HashMap<AccountId, i64>,
    faults: HashMap<BankCall, CollaboratorError>,
    calls: Vec<BankCall>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_card(mut self, card: impl Into<CardId>, pin: impl Into<Pin>) -> Self {
        self.pins.insert(card.into(), pin.into());
        self
    }

    /// Link `account` to `card` with an opening balance.
    pub fn with_account(
        mut self,
        card: impl Into<CardId>,
        account: impl Into<AccountId>,
        balance: i64,
    ) -> Self {
        let account = account.into();
        self.accounts
            .entry(card.into())
            .or_default()
            .push(account.clone());
        self.balances.insert(account, balance);
        self
    }

    pub fn with_fault(mut self, call: BankCall, error: CollaboratorError) -> Self {
        self.faults.insert(call, error);
        self
    }

    pub fn set_fault(&mut self, call: BankCall, error: CollaboratorError) {
        self.faults.insert(call, error);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Ledger balance, read without going through the port.
    pub fn balance_of(&self, account: &AccountId) -> Option<i64> {
        self.balances.get(account).copied()
    }

    pub fn calls(&self) -> &[BankCall] {
        &self.calls
    }

    pub fn count(&self, call: BankCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn observe(&mut self, call: BankCall) -> CollaboratorResult<()> {
        self.calls.push(call);
        match self.faults.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn ledger_entry(&mut self, account: &AccountId) -> CollaboratorResult<&mut i64> {
        self.balances
            .get_mut(account)
            .ok_or_else(|| CollaboratorError::Rejected(format!("unknown account {account}")))
    }
}

impl Bank for InMemoryBank {
    fn verify_pin(&mut self, card: &CardId, pin: &Pin) -> CollaboratorResult<()> {
        self.observe(BankCall::VerifyPin)?;
        match self.pins.get(card) {
            Some(expected) if expected == pin => Ok(()),
            _ => Err(CollaboratorError::Rejected("PIN mismatch".to_string())),
        }
    }

    fn list_accounts(&mut self, card: &CardId) -> CollaboratorResult<Vec<AccountId>> {
        self.observe(BankCall::ListAccounts)?;
        Ok(self.accounts.get(card).cloned().unwrap_or_default())
    }

    fn balance(&mut self, account: &AccountId) -> CollaboratorResult<i64> {
        self.observe(BankCall::Balance)?;
        self.ledger_entry(account).map(|balance| *balance)
    }

    fn deposit(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()> {
        self.observe(BankCall::Deposit)?;
        let balance = self.ledger_entry(account)?;
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| CollaboratorError::Rejected(format!("balance overflow on {account}")))?;
        Ok(())
    }

    fn can_withdraw(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()> {
        self.observe(BankCall::CanWithdraw)?;
        if *self.ledger_entry(account)? >= amount {
            Ok(())
        } else {
            Err(CollaboratorError::Rejected("insufficient balance".to_string()))
        }
    }

    fn withdraw(&mut self, account: &AccountId, amount: i64) -> CollaboratorResult<()> {
        self.observe(BankCall::Withdraw)?;
        let balance = self.ledger_entry(account)?;
        if *balance < amount {
            return Err(CollaboratorError::Rejected("insufficient balance".to_string()));
        }
        *balance = balance
            .checked_sub(amount)
            .ok_or_else(|| CollaboratorError::Rejected(format!("balance overflow on {account}")))?;
        Ok(())
    }
}

/// Cash bin with a single capacity counter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCashDispenser {
    capacity: i64,
    faults: HashMap<DispenserCall, CollaboratorError>,
    calls: Vec<DispenserCall>,
}

impl InMemoryCashDispenser {
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_fault(mut self, call: DispenserCall, error: CollaboratorError) -> Self {
        self.faults.insert(call, error);
        self
    }

    pub fn set_fault(&mut self, call: DispenserCall, error: CollaboratorError) {
        self.faults.insert(call, error);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    pub fn remaining(&self) -> i64 {
        self.capacity
    }

    pub fn calls(&self) -> &[DispenserCall] {
        &self.calls
    }

    pub fn count(&self, call: DispenserCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn observe(&mut self, call: DispenserCall) -> CollaboratorResult<()> {
        self.calls.push(call);
        match self.faults.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn covers(&self, amount: i64) -> CollaboratorResult<()> {
        if amount <= self.capacity {
            Ok(())
        } else {
            Err(CollaboratorError::Rejected(format!(
                "bin holds {}, asked for {amount}",
                self.capacity
            )))
        }
    }
}

impl CashDispenser for InMemoryCashDispenser {
    fn can_dispense(&mut self, amount: i64) -> CollaboratorResult<()> {
        self.observe(DispenserCall::CanDispense)?;
        self.covers(amount)
    }

    fn dispense(&mut self, amount: i64) -> CollaboratorResult<()> {
        self.observe(DispenserCall::Dispense)?;
        self.covers(amount)?;
        self.capacity -= amount;
        Ok(())
    }
}
