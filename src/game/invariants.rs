//! Session invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger for any sequence of inputs. The fuzz target
//! and the property tests run them after every tick.

use std::time::Duration;

use crate::game::{ModeKind, Session};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all session invariants.
///
/// `now` is the time passed to the most recent [`Session::update`].
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(session: &Session, now: Duration) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });

    let config = session.config();
    let bank = session.reels();
    let balance = session.bankroll().balance();

    // Spends are validated first, so a non-negative pot stays non-negative
    if config.starting_bankroll >= 0 && balance < 0 {
        fail(format!("bankroll went negative: {balance}"));
    }

    if bank.moves_remaining() > config.max_moves {
        fail(format!(
            "moves remaining {} > max {}",
            bank.moves_remaining(),
            config.max_moves
        ));
    }

    if !bank.is_spinning() {
        for (i, reel) in bank.reels().iter().enumerate() {
            if reel.deadline().is_some() {
                fail(format!("reel {i} has a deadline while the bank is at rest"));
            }
            if reel.is_held() {
                fail(format!("reel {i} is held while the bank is at rest"));
            }
        }
    }

    if bank.is_winning_round() {
        let first = bank.reels()[0].symbol();
        if bank.reels().iter().any(|r| r.symbol() != first) {
            fail(format!("winning round with mixed symbols {:?}", bank.symbols()));
        }
    }

    let kind = session.mode().kind();
    // The reel bank is ticked before the mode handler, so the two agree
    // after every update.
    if (kind == ModeKind::Spinning) != bank.is_spinning() {
        fail(format!(
            "mode {kind} but reels spinning is {}",
            bank.is_spinning()
        ));
    }
    if bank.is_spinning() && bank.spin_end() < now {
        fail(format!(
            "spin ending at {:?} still running at {now:?}",
            bank.spin_end()
        ));
    }

    if let Some(name) = session.name_buffer() {
        if name.len() > config.max_name_len {
            fail(format!("name {name:?} longer than {}", config.max_name_len));
        }
        if !name.chars().all(|c| c.is_ascii_alphabetic()) {
            fail(format!("name {name:?} has non-letters"));
        }
    }

    let stats = session.stats();
    if i64::from(stats.spins) * config.play_cost > stats.wagered {
        fail(format!("wagered {} is less than spins paid for", stats.wagered));
    }

    violations
}
