//! Monotonic game clock.
//!
//! The core never reads wall-clock time. The application loop measures how
//! long each frame took and feeds it in with [`GameClock::advance`]; every
//! deadline in the game is compared against [`GameClock::now`].

use std::time::Duration;

/// Accumulated elapsed time since the clock was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GameClock {
    /// Total time fed in so far.
    elapsed: Duration,
}

impl GameClock {
    /// Create a clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
        }
    }

    /// Current game time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.elapsed
    }

    /// Advance the clock by one frame's elapsed time.
    ///
    /// Saturates instead of overflowing, so the clock never goes backwards.
    pub fn advance(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.saturating_add(elapsed);
    }

    /// Advance the clock by a number of seconds.
    ///
    /// Negative or non-finite values are ignored.
    pub fn advance_secs(&mut self, secs: f32) {
        if let Ok(elapsed) = Duration::try_from_secs_f32(secs) {
            self.advance(elapsed);
        }
    }
}
