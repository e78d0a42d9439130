//! ATM session controller.
//!
//! The controller owns one customer session at a time and drives it through
//! [`SessionPhase`]s. Every public operation is checked against its phase
//! guard before any collaborator is touched, so a rejected call leaves both
//! the session and the collaborators exactly as they were.

use crate::config::ControllerConfig;
use crate::core::{
    AttemptOutcome, Operation, PhaseTransition, PinAttempts, SessionHistory, SessionPhase,
};
use crate::error::{AtmError, AtmResult};
use crate::model::{AccountId, CardId, Pin};
use crate::ports::{Bank, CardReader, CashDispenser};
use tracing::{debug, info, warn};
use uuid::Uuid;

mod snapshot;
mod withdrawal;

pub use snapshot::SessionSnapshot;

/// Session state machine over a card reader, a bank and a cash dispenser.
pub struct Controller<R, B, D> {
    card_reader: R,
    bank: B,
    cash_dispenser: D,
    config: ControllerConfig,
    phase: SessionPhase,
    card: Option<CardId>,
    account: Option<AccountId>,
    attempts: PinAttempts,
    session_id: Option<Uuid>,
    history: SessionHistory,
}

impl<R: CardReader, B: Bank, D: CashDispenser> Controller<R, B, D> {
    /// Create an idle controller with the default configuration.
    pub fn new(card_reader: R, bank: B, cash_dispenser: D) -> Self {
        Self::with_config(card_reader, bank, cash_dispenser, ControllerConfig::default())
    }

    pub fn with_config(
        card_reader: R,
        bank: B,
        cash_dispenser: D,
        config: ControllerConfig,
    ) -> Self {
        Self {
            card_reader,
            bank,
            cash_dispenser,
            attempts: PinAttempts::new(config.max_pin_attempts()),
            config,
            phase: SessionPhase::Idle,
            card: None,
            account: None,
            session_id: None,
            history: SessionHistory::new(),
        }
    }

    /// Read a card and open a session.
    ///
    /// A reader failure leaves the controller idle.
    pub fn insert_card(&mut self) -> AtmResult<()> {
        self.guard(Operation::InsertCard)?;

        let card = self.card_reader.read().map_err(|err| {
            warn!(operation = %Operation::InsertCard, error = %err, "card read failed");
            AtmError::from(err)
        })?;

        self.session_id = Some(Uuid::new_v4());
        self.history = SessionHistory::new();
        self.card = Some(card);
        self.attempts.reset();
        self.transition(SessionPhase::CardPresent, Operation::InsertCard);
        Ok(())
    }

    /// Return the card and end the session.
    ///
    /// The session is reset even when the reader reports a failure; the
    /// failure is still returned.
    pub fn eject_card(&mut self) -> AtmResult<()> {
        self.guard(Operation::EjectCard)?;

        let ejected = self.card_reader.eject();
        if let Err(err) = &ejected {
            warn!(session = ?self.session_id, error = %err, "card eject failed; resetting session anyway");
        }
        self.end_session(Operation::EjectCard);
        ejected.map_err(AtmError::from)
    }

    /// Verify `pin` for the inserted card.
    ///
    /// A declined PIN consumes one attempt. Reaching the configured limit
    /// ejects the card and returns [`AtmError::AuthenticationLockout`].
    pub fn enter_pin(&mut self, pin: &Pin) -> AtmResult<()> {
        self.guard(Operation::EnterPin)?;
        let card = self.card.as_ref().ok_or(AtmError::CardAbsent)?;

        match self.bank.verify_pin(card, pin) {
            Ok(()) => {
                self.attempts.reset();
                self.transition(SessionPhase::Authenticated, Operation::EnterPin);
                Ok(())
            }
            Err(err) if err.is_rejection() => match self.attempts.record_failure() {
                AttemptOutcome::Remaining(attempts_remaining) => {
                    warn!(session = ?self.session_id, attempts_remaining, "PIN declined");
                    Err(AtmError::AuthenticationFailed { attempts_remaining })
                }
                AttemptOutcome::Exhausted(attempts) => {
                    warn!(session = ?self.session_id, attempts, "PIN attempt limit reached; ejecting card");
                    if let Err(err) = self.card_reader.eject() {
                        warn!(session = ?self.session_id, error = %err, "forced eject failed");
                    }
                    self.end_session(Operation::EnterPin);
                    Err(AtmError::AuthenticationLockout { attempts })
                }
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Accounts linked to the inserted card, as reported by the bank.
    pub fn list_accounts(&mut self) -> AtmResult<Vec<AccountId>> {
        self.guard(Operation::ListAccounts)?;
        let card = self.card.as_ref().ok_or(AtmError::CardAbsent)?;
        Ok(self.bank.list_accounts(card)?)
    }

    /// Select one of the card's accounts.
    ///
    /// The account list is fetched again, so an account the bank dropped
    /// since the last listing is reported as not found.
    pub fn select_account(&mut self, account: &AccountId) -> AtmResult<()> {
        self.guard(Operation::SelectAccount)?;
        let card = self.card.as_ref().ok_or(AtmError::CardAbsent)?;

        let accounts = self.bank.list_accounts(card)?;
        if !accounts.contains(account) {
            debug!(session = ?self.session_id, %account, "account not linked to card");
            return Err(AtmError::AccountNotFound {
                account: account.clone(),
            });
        }

        self.account = Some(account.clone());
        self.transition(SessionPhase::AccountSelected, Operation::SelectAccount);
        Ok(())
    }

    pub fn balance(&mut self) -> AtmResult<i64> {
        self.guard(Operation::GetBalance)?;
        let account = self.account.as_ref().ok_or(AtmError::AccountNotSelected)?;
        Ok(self.bank.balance(account)?)
    }

    pub fn deposit(&mut self, amount: i64) -> AtmResult<()> {
        self.guard(Operation::Deposit)?;
        let account = self.account.as_ref().ok_or(AtmError::AccountNotSelected)?;
        validate_amount(amount)?;

        self.bank.deposit(account, amount)?;
        info!(session = ?self.session_id, %account, amount, "deposit accepted");
        Ok(())
    }

    /// Withdraw `amount` from the selected account and dispense it.
    ///
    /// Both sides are probed before anything moves. If dispensing fails
    /// after the debit, the account is re-credited; if that also fails the
    /// call returns [`AtmError::CompensationFailure`].
    pub fn withdraw(&mut self, amount: i64) -> AtmResult<()> {
        self.guard(Operation::Withdraw)?;
        let account = self.account.as_ref().ok_or(AtmError::AccountNotSelected)?;
        validate_amount(amount)?;

        withdrawal::execute(&mut self.bank, &mut self.cash_dispenser, account, amount)
    }
}

impl<R, B, D> Controller<R, B, D> {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn card(&self) -> Option<&CardId> {
        self.card.as_ref()
    }

    pub fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }

    /// Failed PIN attempts in the current session.
    pub fn pin_attempts(&self) -> u32 {
        self.attempts.count()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Phase changes of the current session, or of the last one once the
    /// card was ejected.
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            phase: self.phase,
            card: self.card.clone(),
            account: self.account.clone(),
            pin_attempts: self.attempts.count(),
        }
    }

    pub fn card_reader(&self) -> &R {
        &self.card_reader
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn cash_dispenser(&self) -> &D {
        &self.cash_dispenser
    }

    /// Give the collaborators back, dropping the session.
    pub fn into_parts(self) -> (R, B, D) {
        (self.card_reader, self.bank, self.cash_dispenser)
    }

    fn guard(&self, operation: Operation) -> AtmResult<()> {
        if operation.permitted_in(self.phase) {
            return Ok(());
        }
        debug!(
            session = ?self.session_id,
            %operation,
            phase = %self.phase,
            "operation rejected by phase guard"
        );
        Err(AtmError::InvalidState {
            operation,
            phase: self.phase,
        })
    }

    fn transition(&mut self, to: SessionPhase, operation: Operation) {
        let from = self.phase;
        self.phase = to;
        self.history = std::mem::take(&mut self.history)
            .record(PhaseTransition::now(from, to, operation));
        info!(
            session = ?self.session_id,
            %operation,
            from = %from,
            phase = %to,
            "session phase changed"
        );
    }

    fn end_session(&mut self, operation: Operation) {
        self.card = None;
        self.account = None;
        self.attempts.reset();
        self.transition(SessionPhase::Idle, operation);
        self.session_id = None;
    }
}

fn validate_amount(amount: i64) -> AtmResult<()> {
    if amount < 0 {
        return Err(AtmError::InvalidArgument { amount });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        BankCall, DispenserCall, InMemoryBank, InMemoryCardReader, InMemoryCashDispenser,
        ReaderCall,
    };
    use crate::error::{CollaboratorError, ErrorKind};

    type TestController = Controller<InMemoryCardReader, InMemoryBank, InMemoryCashDispenser>;

    fn controller() -> TestController {
        Controller::new(
            InMemoryCardReader::new("C1"),
            InMemoryBank::new()
                .with_card("C1", "1234")
                .with_account("C1", "A1", 1000)
                .with_account("C1", "A2", 50),
            InMemoryCashDispenser::new(500),
        )
    }

    fn selected() -> TestController {
        let mut atm = controller();
        atm.insert_card().unwrap();
        atm.enter_pin(&Pin::from("1234")).unwrap();
        atm.select_account(&AccountId::from("A1")).unwrap();
        atm
    }

    #[test]
    fn starts_idle() {
        let atm = controller();
        assert_eq!(atm.phase(), SessionPhase::Idle);
        assert!(atm.card().is_none());
        assert!(atm.session_id().is_none());
        assert_eq!(atm.config().max_pin_attempts(), 3);
    }

    #[test]
    fn insert_card_opens_session() {
        let mut atm = controller();
        atm.insert_card().unwrap();

        assert_eq!(atm.phase(), SessionPhase::CardPresent);
        assert_eq!(atm.card(), Some(&CardId::from("C1")));
        assert!(atm.session_id().is_some());
        assert_eq!(atm.history().transitions().len(), 1);
    }

    #[test]
    fn insert_card_read_failure_stays_idle() {
        let mut atm = Controller::new(
            InMemoryCardReader::new("C1").with_fault(ReaderCall::Read, CollaboratorError::OutOfMemory),
            InMemoryBank::new(),
            InMemoryCashDispenser::new(0),
        );

        let err = atm.insert_card().unwrap_err();

        assert_eq!(err, AtmError::CollaboratorFailure(CollaboratorError::OutOfMemory));
        assert_eq!(atm.phase(), SessionPhase::Idle);
        assert!(atm.card().is_none());
        assert!(atm.session_id().is_none());
    }

    #[test]
    fn guard_rejects_before_any_collaborator_call() {
        let mut atm = controller();
        let before = atm.snapshot();

        let err = atm.withdraw(10).unwrap_err();

        assert_eq!(
            err,
            AtmError::InvalidState {
                operation: Operation::Withdraw,
                phase: SessionPhase::Idle,
            }
        );
        assert_eq!(atm.snapshot(), before);
        assert!(atm.bank().calls().is_empty());
        assert!(atm.cash_dispenser().calls().is_empty());
    }

    #[test]
    fn eject_in_idle_is_invalid_state() {
        let mut atm = controller();
        let err = atm.eject_card().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(atm.card_reader().count(ReaderCall::Eject), 0);
    }

    #[test]
    fn eject_failure_still_resets_session() {
        let mut atm = selected();
        let history_len = atm.history().transitions().len();
        let fault = CollaboratorError::Hardware("motor stalled".to_string());
        let mut reader = InMemoryCardReader::new("C1");
        reader.set_fault(ReaderCall::Eject, fault.clone());
        atm.card_reader = reader;

        let err = atm.eject_card().unwrap_err();

        assert_eq!(err, AtmError::CollaboratorFailure(fault));
        assert_eq!(atm.phase(), SessionPhase::Idle);
        assert!(atm.card().is_none());
        assert!(atm.account().is_none());
        assert!(atm.snapshot().is_consistent());
        assert_eq!(atm.history().transitions().len(), history_len + 1);
    }

    #[test]
    fn wrong_pin_counts_down() {
        let mut atm = controller();
        atm.insert_card().unwrap();

        let err = atm.enter_pin(&Pin::from("0000")).unwrap_err();

        assert_eq!(err, AtmError::AuthenticationFailed { attempts_remaining: 2 });
        assert_eq!(atm.phase(), SessionPhase::CardPresent);
        assert_eq!(atm.pin_attempts(), 1);
    }

    #[test]
    fn pin_lockout_ejects_card() {
        let mut atm = controller();
        atm.insert_card().unwrap();

        atm.enter_pin(&Pin::from("0000")).unwrap_err();
        atm.enter_pin(&Pin::from("0000")).unwrap_err();
        let err = atm.enter_pin(&Pin::from("0000")).unwrap_err();

        assert_eq!(err, AtmError::AuthenticationLockout { attempts: 3 });
        assert_eq!(atm.phase(), SessionPhase::Idle);
        assert_eq!(atm.pin_attempts(), 0);
        assert_eq!(atm.card_reader().count(ReaderCall::Eject), 1);
    }

    #[test]
    fn lockout_reported_even_when_forced_eject_fails() {
        let mut atm = Controller::with_config(
            InMemoryCardReader::new("C1")
                .with_fault(ReaderCall::Eject, CollaboratorError::Hardware("jam".to_string())),
            InMemoryBank::new().with_card("C1", "1234"),
            InMemoryCashDispenser::new(0),
            ControllerConfig::new(1).unwrap(),
        );
        atm.insert_card().unwrap();

        let err = atm.enter_pin(&Pin::from("0000")).unwrap_err();

        assert_eq!(err, AtmError::AuthenticationLockout { attempts: 1 });
        assert_eq!(atm.phase(), SessionPhase::Idle);
    }

    #[test]
    fn pin_network_failure_does_not_consume_attempt() {
        let mut atm = controller();
        atm.insert_card().unwrap();
        atm.bank.set_fault(
            BankCall::VerifyPin,
            CollaboratorError::Network("timeout".to_string()),
        );

        let err = atm.enter_pin(&Pin::from("1234")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CollaboratorFailure);
        assert_eq!(atm.pin_attempts(), 0);
        assert_eq!(atm.phase(), SessionPhase::CardPresent);
    }

    #[test]
    fn correct_pin_after_failures_resets_counter() {
        let mut atm = controller();
        atm.insert_card().unwrap();
        atm.enter_pin(&Pin::from("0000")).unwrap_err();

        atm.enter_pin(&Pin::from("1234")).unwrap();

        assert_eq!(atm.phase(), SessionPhase::Authenticated);
        assert_eq!(atm.pin_attempts(), 0);
    }

    #[test]
    fn list_accounts_returns_bank_answer() {
        let mut atm = controller();
        atm.insert_card().unwrap();
        atm.enter_pin(&Pin::from("1234")).unwrap();

        let accounts = atm.list_accounts().unwrap();

        assert_eq!(accounts, vec![AccountId::from("A1"), AccountId::from("A2")]);
        assert_eq!(atm.phase(), SessionPhase::Authenticated);
    }

    #[test]
    fn select_unknown_account_is_not_found() {
        let mut atm = controller();
        atm.insert_card().unwrap();
        atm.enter_pin(&Pin::from("1234")).unwrap();

        let err = atm.select_account(&AccountId::from("ZZ")).unwrap_err();

        assert_eq!(
            err,
            AtmError::AccountNotFound {
                account: AccountId::from("ZZ")
            }
        );
        assert_eq!(atm.phase(), SessionPhase::Authenticated);
        assert!(atm.account().is_none());
    }

    #[test]
    fn select_account_refetches_list() {
        let mut atm = controller();
        atm.insert_card().unwrap();
        atm.enter_pin(&Pin::from("1234")).unwrap();
        atm.list_accounts().unwrap();

        atm.select_account(&AccountId::from("A2")).unwrap();

        assert_eq!(atm.bank().count(BankCall::ListAccounts), 2);
        assert_eq!(atm.account(), Some(&AccountId::from("A2")));
    }

    #[test]
    fn balance_and_deposit() {
        let mut atm = selected();

        atm.deposit(250).unwrap();

        assert_eq!(atm.balance().unwrap(), 1250);
        assert_eq!(atm.phase(), SessionPhase::AccountSelected);
    }

    #[test]
    fn overflowing_deposit_fails_without_changing_balance() {
        let mut atm = selected();

        let err = atm.deposit(i64::MAX).unwrap_err();

        assert!(matches!(err, AtmError::CollaboratorFailure(_)));
        assert_eq!(atm.bank().balance_of(&AccountId::from("A1")), Some(1000));
        assert_eq!(atm.phase(), SessionPhase::AccountSelected);
    }

    #[test]
    fn negative_amounts_rejected_before_bank() {
        let mut atm = selected();
        let calls = atm.bank().calls().len();

        assert_eq!(
            atm.deposit(-1),
            Err(AtmError::InvalidArgument { amount: -1 })
        );
        assert_eq!(
            atm.withdraw(-5),
            Err(AtmError::InvalidArgument { amount: -5 })
        );
        assert_eq!(atm.bank().calls().len(), calls);
        assert!(atm.cash_dispenser().calls().is_empty());
    }

    #[test]
    fn withdraw_keeps_account_selected() {
        let mut atm = selected();

        atm.withdraw(100).unwrap();
        atm.withdraw(100).unwrap();

        assert_eq!(atm.phase(), SessionPhase::AccountSelected);
        assert_eq!(atm.balance().unwrap(), 800);
        assert_eq!(atm.cash_dispenser().remaining(), 300);
        assert_eq!(atm.cash_dispenser().count(DispenserCall::Dispense), 2);
    }

    #[test]
    fn history_survives_eject_until_next_insert() {
        let mut atm = selected();
        atm.eject_card().unwrap();

        let path = atm.history().get_path();
        assert_eq!(
            path,
            vec![
                &SessionPhase::Idle,
                &SessionPhase::CardPresent,
                &SessionPhase::Authenticated,
                &SessionPhase::AccountSelected,
                &SessionPhase::Idle,
            ]
        );

        atm.card_reader.load("C1");
        atm.insert_card().unwrap();
        assert_eq!(atm.history().transitions().len(), 1);
    }

    #[test]
    fn each_insertion_gets_a_new_session_id() {
        let mut atm = controller();
        atm.insert_card().unwrap();
        let first = atm.session_id();
        atm.eject_card().unwrap();
        assert!(atm.session_id().is_none());

        atm.card_reader.load("C1");
        atm.insert_card().unwrap();
        assert_ne!(atm.session_id(), first);
    }

    #[test]
    fn into_parts_returns_collaborators() {
        let mut atm = selected();
        atm.deposit(1).unwrap();

        let (_, bank, _) = atm.into_parts();

        assert_eq!(bank.balance_of(&AccountId::from("A1")), Some(1001));
    }
}
