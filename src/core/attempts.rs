//! PIN attempt accounting.

/// Outcome of recording a failed PIN attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// More attempts are allowed
    Remaining(u32),
    /// The limit was reached; the session must end
    Exhausted(u32),
}

/// Counter of consecutive failed PIN attempts against a fixed limit.
///
/// The count never exceeds `max`: the failure that reaches the limit is
/// reported as [`AttemptOutcome::Exhausted`] and the caller resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAttempts {
    count: u32,
    max: u32,
}

impl PinAttempts {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.count)
    }

    /// Count one failed attempt.
    pub fn record_failure(&mut self) -> AttemptOutcome {
        self.count = self.count.saturating_add(1).min(self.max);
        if self.count >= self.max {
            AttemptOutcome::Exhausted(self.count)
        } else {
            AttemptOutcome::Remaining(self.remaining())
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
