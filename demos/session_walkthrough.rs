//! Session Walkthrough
//!
//! This example drives two customer sessions through the controller.
//!
//! Key concepts:
//! - Phase guards (operations rejected in the wrong phase)
//! - PIN verification and account selection
//! - Check-then-commit withdrawal
//! - Re-credit when the dispenser jams after the debit
//!
//! Run with: RUST_LOG=atm_session=debug cargo run --example session_walkthrough

use atm_session::adapters::{
    DispenserCall, InMemoryBank, InMemoryCardReader, InMemoryCashDispenser,
};
use atm_session::{AccountId, AtmResult, CollaboratorError, Controller, Pin};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> AtmResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "atm_session=info".into()))
        .with(fmt::layer())
        .init();

    println!("=== ATM Session Walkthrough ===\n");

    let account = AccountId::from("A1");

    // Scenario 1: Withdrawal that succeeds
    println!("Scenario 1: Successful Withdrawal");
    let mut atm = Controller::new(
        InMemoryCardReader::new("C1"),
        InMemoryBank::new()
            .with_card("C1", "1234")
            .with_account("C1", "A1", 1000),
        InMemoryCashDispenser::new(500),
    );

    if let Err(err) = atm.withdraw(20) {
        println!("  ✗ Rejected before insertion: {err}");
    }

    atm.insert_card()?;
    println!("  Card inserted, phase: {}", atm.phase());
    atm.enter_pin(&Pin::from("1234"))?;
    println!("  PIN accepted, phase: {}", atm.phase());
    println!("  Accounts: {:?}", atm.list_accounts()?);
    atm.select_account(&account)?;
    println!("  Account selected, phase: {}", atm.phase());

    atm.withdraw(120)?;
    println!("  ✓ Dispensed 120, balance now {}", atm.balance()?);
    atm.eject_card()?;
    println!("  Card ejected after {} phase changes\n", atm.history().transitions().len());

    // Scenario 2: Dispenser jams after the debit
    println!("Scenario 2: Jammed Dispenser");
    let mut atm = Controller::new(
        InMemoryCardReader::new("C1"),
        InMemoryBank::new()
            .with_card("C1", "1234")
            .with_account("C1", "A1", 1000),
        InMemoryCashDispenser::new(500).with_fault(
            DispenserCall::Dispense,
            CollaboratorError::Hardware("note jam in presenter".to_string()),
        ),
    );

    atm.insert_card()?;
    atm.enter_pin(&Pin::from("1234"))?;
    atm.select_account(&account)?;

    match atm.withdraw(120) {
        Ok(()) => println!("  Unexpected success"),
        Err(err) => println!("  ✗ Withdrawal failed: {err}"),
    }
    println!("  Balance after re-credit: {}", atm.balance()?);

    let snapshot = atm.snapshot();
    println!(
        "  Snapshot: {}",
        serde_json::to_string(&snapshot).unwrap_or_default()
    );
    atm.eject_card()?;

    println!("\nKey Takeaways:");
    println!("- Guards reject operations before any collaborator is called");
    println!("- Both capacity checks run before money moves");
    println!("- A failed dispense is compensated by re-crediting the account");

    println!("\n=== Example Complete ===");
    Ok(())
}
