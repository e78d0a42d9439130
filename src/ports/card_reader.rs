//! CardReader trait - capability to read and return cards

use crate::error::CollaboratorResult;
use crate::model::CardId;

/// Capability to take in a card and hand it back.
pub trait CardReader {
    /// Read the inserted card.
    ///
    /// # Errors
    ///
    /// Returns a hardware (or other) fault when the card cannot be read.
    fn read(&mut self) -> CollaboratorResult<CardId>;

    /// Return the card to the customer.
    ///
    /// Best effort: the controller ends the session whatever this reports.
    fn eject(&mut self) -> CollaboratorResult<()>;
}

impl<T: CardReader + ?Sized> CardReader for &mut T {
    fn read(&mut self) -> CollaboratorResult<CardId> {
        (**self).read()
    }

    fn eject(&mut self) -> CollaboratorResult<()> {
        (**self).eject()
    }
}
