//! Point-in-time view of the session.

use crate::core::SessionPhase;
use crate::model::{AccountId, CardId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable copy of everything the session tracks.
///
/// Two snapshots compare equal exactly when the session is observably in the
/// same state, which is how callers check that a rejected operation left
/// nothing behind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Identifier of the open session, `None` while idle
    pub session_id: Option<Uuid>,

    pub phase: SessionPhase,

    pub card: Option<CardId>,

    pub account: Option<AccountId>,

    /// Consecutive failed PIN attempts in the current session
    pub pin_attempts: u32,
}

impl SessionSnapshot {
    /// Check the structural invariants that tie stored ids to the phase.
    pub fn is_consistent(&self) -> bool {
        self.phase.holds_card() == self.card.is_some()
            && self.phase.holds_account() == self.account.is_some()
            && self.phase.holds_card() == self.session_id.is_some()
            && (self.phase == SessionPhase::CardPresent || self.pin_attempts == 0)
    }
}
