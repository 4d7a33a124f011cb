//! Cancellable deadlines polled from the host loop

use std::time::Duration;
use tokio::time::Instant;

/// A one-shot timer. Owning the value owns the pending callback; dropping or
/// replacing it cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(now: Instant, delay: Duration) -> Self {
        Self { at: now + delay }
    }

    pub fn at(&self) -> Instant {
        self.at
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.at
    }

    /// Time left before the deadline, zero once due
    pub fn remaining(&self, now: Instant) -> Duration {
        self.at.saturating_duration_since(now)
    }
}
