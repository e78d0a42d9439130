//! Adapters - concrete implementations of ports (traits)

mod memory;

pub use memory::{
    BankCall, DispenserCall, InMemoryBank, InMemoryCardReader, InMemoryCashDispenser, ReaderCall,
};
