//! Session phases and the operations that move between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the customer session.
///
/// Exactly one phase is current at a time and it alone decides which
/// operations are legal.
///
/// ```text
/// Idle -> CardPresent -> Authenticated -> AccountSelected
///   ^________________________|_______________|  (eject)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No card in the machine
    Idle,
    /// Card read, waiting for the PIN
    CardPresent,
    /// PIN verified, waiting for an account choice
    Authenticated,
    /// Account chosen, money operations allowed
    AccountSelected,
}

impl SessionPhase {
    pub const ALL: [SessionPhase; 4] = [
        Self::Idle,
        Self::CardPresent,
        Self::Authenticated,
        Self::AccountSelected,
    ];

    /// Get the phase's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::CardPresent => "CardPresent",
            Self::Authenticated => "Authenticated",
            Self::AccountSelected => "AccountSelected",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Phases in which a card identifier must be held.
    pub fn holds_card(&self) -> bool {
        !self.is_idle()
    }

    /// Phases in which a selected account must be held.
    pub fn holds_account(&self) -> bool {
        matches!(self, Self::AccountSelected)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Public controller operations, used to look up phase guards and to tag
/// history entries and errors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Operation {
    InsertCard,
    EjectCard,
    EnterPin,
    ListAccounts,
    SelectAccount,
    GetBalance,
    Deposit,
    Withdraw,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Self::InsertCard,
        Self::EjectCard,
        Self::EnterPin,
        Self::ListAccounts,
        Self::SelectAccount,
        Self::GetBalance,
        Self::Deposit,
        Self::Withdraw,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertCard => "insert_card",
            Self::EjectCard => "eject_card",
            Self::EnterPin => "enter_pin",
            Self::ListAccounts => "list_accounts",
            Self::SelectAccount => "select_account",
            Self::GetBalance => "balance",
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
