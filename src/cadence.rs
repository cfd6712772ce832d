use std::time::{Duration, Instant};

/// Shortest wait handed out, so a late tick never turns into a busy loop.
pub const MIN_WAIT: Duration = Duration::from_millis(10);

/// Fixed-rate tick schedule anchored at a start instant.
///
/// Each tick moves the target forward by exactly one interval, so slow
/// samples delay the following tick without shifting the whole schedule.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    next_target: Instant,
}

impl Cadence {
    pub fn new(interval: Duration, anchor: Instant) -> Self {
        Self {
            interval,
            next_target: anchor,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Advances the target by one interval and returns the wait until it.
    pub fn schedule_next(&mut self, now: Instant) -> Duration {
        self.next_target += self.interval;
        self.remaining(now)
    }

    /// Time left until the current target, never below [`MIN_WAIT`].
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_target.saturating_duration_since(now).max(MIN_WAIT)
    }

    /// Switches to a new interval with the schedule restarting at `anchor`.
    pub fn reset(&mut self, interval: Duration, anchor: Instant) {
        self.interval = interval;
        self.next_target = anchor;
    }
}
