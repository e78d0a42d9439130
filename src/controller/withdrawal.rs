//! Withdrawal protocol: probe both sides, debit, dispense, re-credit on
//! dispense failure.

use crate::error::{AtmError, AtmResult, CollaboratorResult};
use crate::model::AccountId;
use crate::ports::{Bank, CashDispenser};
use crate::transaction::{Transaction, TransactionError};
use tracing::{error, info, warn};

const DEBIT: &str = "debit";
const DISPENSE: &str = "dispense";

/// Context shared by the commit steps of one withdrawal.
struct Withdrawal<'a, B, D> {
    bank: &'a mut B,
    cash_dispenser: &'a mut D,
    account: &'a AccountId,
    amount: i64,
}

impl<B: Bank, D: CashDispenser> Withdrawal<'_, B, D> {
    fn debit(&mut self) -> CollaboratorResult<()> {
        self.bank.withdraw(self.account, self.amount)
    }

    fn recredit(&mut self) -> CollaboratorResult<()> {
        self.bank.deposit(self.account, self.amount)
    }

    fn dispense(&mut self) -> CollaboratorResult<()> {
        self.cash_dispenser.dispense(self.amount)
    }
}

/// Run the full protocol for `amount` against `account`.
///
/// 1. bank capacity probe, declined -> `InsufficientFunds`
/// 2. dispenser capacity probe, declined -> `InsufficientCash`
/// 3. debit the account
/// 4. dispense; on failure re-credit the account
pub(super) fn execute<B: Bank, D: CashDispenser>(
    bank: &mut B,
    cash_dispenser: &mut D,
    account: &AccountId,
    amount: i64,
) -> AtmResult<()> {
    match bank.can_withdraw(account, amount) {
        Ok(()) => {}
        Err(err) if err.is_rejection() => {
            warn!(%account, amount, reason = %err, "bank declined withdrawal");
            return Err(AtmError::InsufficientFunds { amount });
        }
        Err(err) => return Err(err.into()),
    }

    match cash_dispenser.can_dispense(amount) {
        Ok(()) => {}
        Err(err) if err.is_rejection() => {
            warn!(amount, reason = %err, "dispenser cannot cover withdrawal");
            return Err(AtmError::InsufficientCash { amount });
        }
        Err(err) => return Err(err.into()),
    }

    let transaction: Transaction<Withdrawal<'_, B, D>> = Transaction::new()
        .compensated_step(DEBIT, Withdrawal::debit, Withdrawal::recredit)
        .step(DISPENSE, Withdrawal::dispense);

    let mut withdrawal = Withdrawal {
        bank,
        cash_dispenser,
        account,
        amount,
    };

    match transaction.run(&mut withdrawal) {
        Ok(()) => {
            info!(%account, amount, "withdrawal dispensed");
            Ok(())
        }
        Err(err) => Err(classify(err, account, amount)),
    }
}

fn classify(err: TransactionError, account: &AccountId, amount: i64) -> AtmError {
    match err {
        TransactionError::StepFailed {
            step,
            source,
            compensated,
        } => {
            if compensated.is_empty() {
                warn!(%account, amount, step, error = %source, "withdrawal failed before any money moved");
            } else {
                warn!(%account, amount, step, error = %source, "withdrawal failed; debit reversed");
            }
            AtmError::CollaboratorFailure(source)
        }
        TransactionError::CompensationFailed {
            source,
            compensation_error,
            ..
        } => {
            error!(
                %account,
                amount,
                dispense_error = %source,
                compensation_error = %compensation_error,
                "account debited without dispensing and re-credit failed; manual reconciliation required"
            );
            AtmError::CompensationFailure {
                account: account.clone(),
                amount,
                dispense_error: source,
                compensation_error,
            }
        }
    }
}
