//! One-shot countdown used to abandon stalled frames.

use crate::tick::Tick;

/// What an idle sample did to the deadline.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Countdown {
    /// Budget is left; the deadline keeps running.
    Running,
    /// The budget is used up.
    Expired,
}

/// Remaining tick budget before an in-progress frame is abandoned.
///
/// The budget is consumed piecewise: every idle sample subtracts the ticks
/// elapsed since the previous sample. A zero budget means disarmed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Deadline<T> {
    remaining: T,
    last_sample: T,
}

impl<T> Deadline<T>
where
    T: Tick,
{
    /// Creates a disarmed deadline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            remaining: T::ZERO,
            last_sample: T::ZERO,
        }
    }

    /// Returns whether budget is left.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.remaining != T::ZERO
    }

    /// Returns the remaining budget.
    #[must_use]
    pub const fn remaining(&self) -> T {
        self.remaining
    }

    /// Restarts the countdown with a full `budget`, as of `now`.
    ///
    /// A zero budget counts as one tick, so an armed deadline always expires eventually.
    pub fn arm(&mut self, budget: T, now: T) {
        self.remaining = budget.max(T::from(1_u16));
        self.last_sample = now;
    }

    /// Clears the remaining budget.
    pub fn disarm(&mut self) {
        self.remaining = T::ZERO;
    }

    /// Charges the ticks elapsed since the last sample against the budget.
    pub fn sample(&mut self, now: T) -> Countdown {
        let elapsed = now.elapsed_since(self.last_sample);
        self.last_sample = now;

        if elapsed >= self.remaining {
            self.remaining = T::ZERO;
            Countdown::Expired
        } else {
            self.remaining = self.remaining.saturating_sub(elapsed);
            Countdown::Running
        }
    }
}

impl<T> Default for Deadline<T>
where
    T: Tick,
{
    fn default() -> Self {
        Self::new()
    }
}
