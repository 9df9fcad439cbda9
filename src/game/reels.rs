//! The reel bank: five reels, their spin deadlines and the win check.
//!
//! A spin is not a scheduler. Each reel carries its own deadline and every
//! [`ReelBank::tick`] compares those deadlines against the shared clock.
//! Staggering the deadlines as `duration / (5 - i)` makes the reels stop
//! one by one from left to right.

use std::time::Duration;

use crate::config::GameConfig;
use crate::error::{SlotsError, SlotsResult};
use crate::game::Symbol;
use crate::rng::RandomSource;

/// Number of reels on the machine.
pub const REEL_COUNT: usize = 5;

/// One reel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reel {
    /// Symbol currently showing.
    symbol: Symbol,
    /// When the reel stops, or `None` while it is at rest.
    deadline: Option<Duration>,
    /// Whether the player is holding this reel.
    held: bool,
}

impl Reel {
    /// Symbol currently showing.
    #[must_use]
    pub const fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// When the reel stops, or `None` while it is at rest.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether the player is holding this reel.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Whether the reel is still turning at `now`.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|d| d > now)
    }

    /// Settle on a freshly drawn symbol.
    fn settle<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.deadline = None;
        self.symbol = Symbol::draw(rng);
    }
}

/// What a front end needs to draw one reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReelView {
    /// Symbol showing (the blurred variant while animating).
    pub symbol: Symbol,
    /// Whether the reel is still turning.
    pub animating: bool,
    /// Whether a hold badge should be shown.
    pub held: bool,
}

/// The five reels plus spin bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReelBank {
    /// The reels, left to right.
    reels: [Reel; REEL_COUNT],
    /// Whether a spin (full or partial) is in progress.
    spinning: bool,
    /// When the current spin ends.
    spin_end: Duration,
    /// Whether the last completed spin lined up five of a kind.
    winning: bool,
    /// Nudges and holds left before a full spin is required.
    moves_remaining: u32,
    /// Refill value for `moves_remaining`.
    max_moves: u32,
    /// Length of a full spin.
    spin_duration: Duration,
}

impl ReelBank {
    /// Create a reel bank at rest.
    #[must_use]
    pub fn new(spin_duration: Duration, max_moves: u32) -> Self {
        let mut bank = Self {
            reels: [Reel::default(); REEL_COUNT],
            spinning: false,
            spin_end: Duration::ZERO,
            winning: false,
            moves_remaining: max_moves,
            max_moves,
            spin_duration,
        };
        bank.reset();
        bank
    }

    /// Create a reel bank from the game configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.spin_duration(), config.max_moves)
    }

    /// Put every reel back on the first symbol, at rest and not held.
    pub fn reset(&mut self) {
        self.reels = [Reel::default(); REEL_COUNT];
    }

    /// Start a full spin of all five reels.
    ///
    /// Refills the move counter. Reel `i` stops at `now + T / (5 - i)`, so
    /// the last reel stops exactly when the spin ends.
    pub fn spin(&mut self, now: Duration) {
        self.moves_remaining = self.max_moves;
        self.winning = false;
        self.spinning = true;
        self.spin_end = now.saturating_add(self.spin_duration);
        for index in 0..REEL_COUNT {
            let deadline = self.staggered_deadline(now, index);
            let reel = &mut self.reels[index];
            reel.held = false;
            reel.deadline = Some(deadline);
        }
    }

    /// Re-spin a single reel briefly.
    ///
    /// # Errors
    ///
    /// Returns [`SlotsError::PreconditionViolation`] if no moves remain or
    /// the reel index is out of range. The bank is left untouched.
    pub fn nudge(&mut self, now: Duration, reel: usize) -> SlotsResult<()> {
        self.check_move(reel)?;
        self.moves_remaining -= 1;
        self.winning = false;
        self.spinning = true;

        let deadline = now.saturating_add(self.spin_duration / 5);
        self.spin_end = deadline;
        for r in &mut self.reels {
            r.deadline = None;
        }
        let target = &mut self.reels[reel];
        target.deadline = Some(deadline);
        target.held = false;
        Ok(())
    }

    /// Hold one reel and re-spin the other four.
    ///
    /// # Errors
    ///
    /// Returns [`SlotsError::PreconditionViolation`] if no moves remain or
    /// the reel index is out of range. The bank is left untouched.
    pub fn hold(&mut self, now: Duration, reel: usize) -> SlotsResult<()> {
        self.check_move(reel)?;
        self.moves_remaining -= 1;
        self.winning = false;
        self.spinning = true;
        self.spin_end = now.saturating_add(self.spin_duration.mul_f32(0.8));

        for index in 0..REEL_COUNT {
            if index == reel {
                let held = &mut self.reels[index];
                held.held = true;
                held.deadline = None;
            } else {
                let deadline = self.staggered_deadline(now, index);
                let other = &mut self.reels[index];
                other.deadline = Some(deadline);
                other.held = false;
            }
        }
        Ok(())
    }

    /// Advance the animation to `now`.
    ///
    /// Reels whose deadline has passed settle on a random symbol. Once the
    /// spin's end has passed, any reel still turning settles too, hold flags
    /// clear and the win is evaluated. Returns `true` on the tick the spin
    /// finishes.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, now: Duration, rng: &mut R) -> bool {
        if !self.spinning {
            return false;
        }

        for reel in &mut self.reels {
            if reel.deadline.is_some_and(|d| d < now) {
                reel.settle(rng);
            }
        }

        if self.spin_end >= now {
            return false;
        }

        self.spinning = false;
        for reel in &mut self.reels {
            // A hold's spin ends before the rightmost reel's stagger.
            if reel.deadline.is_some() {
                reel.settle(rng);
            }
            reel.held = false;
        }
        let first = self.reels[0].symbol;
        self.winning = self.reels.iter().all(|r| r.symbol == first);
        true
    }

    /// Prize for the round that just finished.
    ///
    /// # Errors
    ///
    /// Returns [`SlotsError::PreconditionViolation`] unless the last spin
    /// was a winning round.
    pub fn winnings(&self) -> SlotsResult<u32> {
        self.winning_symbol()
            .map(Symbol::prize)
            .ok_or(SlotsError::PreconditionViolation(
                "winnings requested without a winning round",
            ))
    }

    /// Symbol lined up by the last spin, if it was a win.
    #[must_use]
    pub fn winning_symbol(&self) -> Option<Symbol> {
        (self.winning && !self.spinning).then_some(self.reels[0].symbol)
    }

    /// Whether a nudge or hold is still allowed.
    #[must_use]
    pub const fn can_use_move(&self) -> bool {
        self.moves_remaining > 0
    }

    /// Nudges and holds left before a full spin is required.
    #[must_use]
    pub const fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    /// Whether a spin is in progress.
    #[must_use]
    pub const fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Whether the last completed spin was a win.
    #[must_use]
    pub const fn is_winning_round(&self) -> bool {
        self.winning
    }

    /// When the current (or last) spin ends.
    #[must_use]
    pub const fn spin_end(&self) -> Duration {
        self.spin_end
    }

    /// The reels, left to right.
    #[must_use]
    pub const fn reels(&self) -> &[Reel; REEL_COUNT] {
        &self.reels
    }

    /// Symbols currently showing, left to right.
    #[must_use]
    pub fn symbols(&self) -> [Symbol; REEL_COUNT] {
        self.reels.map(|r| r.symbol)
    }

    /// Drawing state of every reel at `now`.
    #[must_use]
    pub fn view(&self, now: Duration) -> [ReelView; REEL_COUNT] {
        self.reels.map(|r| ReelView {
            symbol: r.symbol,
            animating: self.spinning && r.is_animating(now),
            held: self.spinning && r.held,
        })
    }

    fn check_move(&self, reel: usize) -> SlotsResult<()> {
        if self.moves_remaining == 0 {
            return Err(SlotsError::PreconditionViolation("no moves remaining"));
        }
        if reel >= REEL_COUNT {
            return Err(SlotsError::PreconditionViolation("reel index out of range"));
        }
        Ok(())
    }

    fn staggered_deadline(&self, now: Duration, index: usize) -> Duration {
        let divisor = u32::try_from(REEL_COUNT.saturating_sub(index)).unwrap_or(1).max(1);
        now.saturating_add(self.spin_duration / divisor)
    }
}

impl Default for ReelBank {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    const T: Duration = Duration::from_secs(2);

    fn bank() -> ReelBank {
        ReelBank::new(T, 10)
    }

    /// Run ticks until the spin settles.
    fn settle(bank: &mut ReelBank, from: Duration, rng: &mut ScriptedRandom) -> Duration {
        let mut now = from;
        while bank.is_spinning() {
            now += Duration::from_millis(50);
            bank.tick(now, rng);
        }
        now
    }

    #[test]
    fn test_new_bank_at_rest() {
        let bank = bank();
        assert!(!bank.is_spinning());
        assert!(!bank.is_winning_round());
        assert_eq!(bank.moves_remaining(), 10);
        for reel in bank.reels() {
            assert_eq!(reel.symbol(), Symbol::Orange);
            assert_eq!(reel.deadline(), None);
            assert!(!reel.is_held());
        }
    }

    #[test]
    fn test_spin_staggers_deadlines() {
        let mut bank = bank();
        let now = Duration::from_secs(10);
        bank.spin(now);

        let deadlines: Vec<Duration> = bank.reels().iter().map(|r| r.deadline().unwrap()).collect();
        assert_eq!(deadlines[0], now + T / 5);
        assert_eq!(deadlines[4], now + T);
        for pair in deadlines.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(bank.spin_end(), now + T);
    }

    #[test]
    fn test_reels_stop_left_to_right() {
        let mut bank = bank();
        let mut rng = ScriptedRandom::new([3]);
        bank.spin(Duration::ZERO);

        // Just past reel 0's deadline (0.4s) only reel 0 has stopped.
        bank.tick(Duration::from_millis(401), &mut rng);
        assert_eq!(bank.reels()[0].deadline(), None);
        assert!(bank.reels()[1..].iter().all(|r| r.deadline().is_some()));

        // Past reel 1's deadline (0.5s).
        bank.tick(Duration::from_millis(501), &mut rng);
        assert_eq!(bank.reels()[1].deadline(), None);
        assert!(bank.is_spinning());
    }

    #[test]
    fn test_spin_completes_with_win() {
        let mut bank = bank();
        let mut rng = ScriptedRandom::new([5]);
        bank.spin(Duration::ZERO);

        assert!(!bank.tick(T, &mut rng), "deadline must strictly elapse");
        assert!(bank.tick(T + Duration::from_millis(1), &mut rng));
        assert!(!bank.is_spinning());
        assert!(bank.is_winning_round());
        assert_eq!(bank.winning_symbol(), Some(Symbol::Cherry));
        assert_eq!(bank.winnings().unwrap(), 250);
    }

    #[test]
    fn test_spin_completes_with_loss() {
        let mut bank = bank();
        let mut rng = ScriptedRandom::new([0, 1, 2, 3, 4]);
        bank.spin(Duration::ZERO);
        settle(&mut bank, Duration::ZERO, &mut rng);

        assert!(!bank.is_winning_round());
        assert!(bank.winnings().unwrap_err().is_precondition());
    }

    #[test]
    fn test_nudge_respins_one_reel() {
        let mut bank = bank();
        let mut rng = ScriptedRandom::new([0, 1, 2, 3, 4]);
        bank.spin(Duration::ZERO);
        let now = settle(&mut bank, Duration::ZERO, &mut rng);
        let before = bank.symbols();

        bank.nudge(now, 2).unwrap();
        assert_eq!(bank.moves_remaining(), 9);
        assert_eq!(bank.spin_end(), now + T / 5);
        for (i, reel) in bank.reels().iter().enumerate() {
            if i == 2 {
                assert_eq!(reel.deadline(), Some(now + T / 5));
            } else {
                assert_eq!(reel.deadline(), None);
            }
        }

        let mut rng = ScriptedRandom::new([5]);
        settle(&mut bank, now, &mut rng);
        let after = bank.symbols();
        assert_eq!(after[2], Symbol::Cherry);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[4], before[4]);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_hold_keeps_target_reel() {
        let mut bank = bank();
        let mut rng = ScriptedRandom::new([4, 0, 1, 2, 3]);
        bank.spin(Duration::ZERO);
        let now = settle(&mut bank, Duration::ZERO, &mut rng);
        assert_eq!(bank.symbols()[0], Symbol::Banana);

        bank.hold(now, 0).unwrap();
        assert_eq!(bank.moves_remaining(), 9);
        assert!(bank.reels()[0].is_held());
        assert_eq!(bank.reels()[0].deadline(), None);
        assert_eq!(bank.reels()[1].deadline(), Some(now + T / 4));
        assert_eq!(bank.spin_end(), now + T.mul_f32(0.8));

        let mut rng = ScriptedRandom::new([4]);
        settle(&mut bank, now, &mut rng);
        assert_eq!(bank.symbols(), [Symbol::Banana; REEL_COUNT]);
        assert!(bank.is_winning_round());
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn test_spin_end_clears_everything() {
        let mut bank = bank();
        let mut rng = ScriptedRandom::new([1, 2]);
        bank.spin(Duration::ZERO);
        let now = settle(&mut bank, Duration::ZERO, &mut rng);
        bank.hold(now, 3).unwrap();

        // Jump straight past the end: the rightmost reel's stagger outlasts a hold.
        bank.tick(now + T.mul_f32(0.9), &mut rng);
        assert!(!bank.is_spinning());
        for reel in bank.reels() {
            assert!(!reel.is_held());
            assert_eq!(reel.deadline(), None);
        }
    }

    #[test]
    fn test_moves_exhaust() {
        let mut bank = ReelBank::new(T, 2);
        let mut rng = ScriptedRandom::new([0, 1]);
        bank.spin(Duration::ZERO);
        let mut now = settle(&mut bank, Duration::ZERO, &mut rng);

        bank.nudge(now, 0).unwrap();
        now = settle(&mut bank, now, &mut rng);
        bank.hold(now, 1).unwrap();
        now = settle(&mut bank, now, &mut rng);
        assert!(!bank.can_use_move());

        let snapshot = bank;
        assert!(bank.nudge(now, 0).unwrap_err().is_precondition());
        assert!(bank.hold(now, 0).unwrap_err().is_precondition());
        assert_eq!(bank, snapshot);

        // A full spin refills the counter.
        bank.spin(now);
        assert_eq!(bank.moves_remaining(), 2);
    }

    #[test]
    fn test_bad_reel_index_rejected() {
        let mut bank = bank();
        let snapshot = bank;
        assert!(bank.nudge(Duration::ZERO, REEL_COUNT).is_err());
        assert!(bank.hold(Duration::ZERO, 99).is_err());
        assert_eq!(bank, snapshot);
    }

    #[test]
    fn test_tick_idle_is_noop() {
        let mut bank = bank();
        let mut rng = ScriptedRandom::new([5]);
        assert!(!bank.tick(Duration::from_secs(100), &mut rng));
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_view_reports_animation_and_holds() {
        let mut bank = bank();
        let mut rng = ScriptedRandom::new([2]);
        bank.spin(Duration::ZERO);
        let now = settle(&mut bank, Duration::ZERO, &mut rng);
        bank.hold(now, 1).unwrap();

        let view = bank.view(now);
        assert!(view[1].held);
        assert!(!view[1].animating);
        assert!(view[0].animating);
    }
}
