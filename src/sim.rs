//! Headless simulation of whole sessions.
//!
//! Provides a pure function interface: `(seed, config) -> SessionReport`.
//!
//! A scripted player drives a real [`Session`] through the same inputs a
//! person would press, with a fixed frame step on a [`GameClock`]. Runs are
//! deterministic per seed, so batches can be spread over a rayon pool and
//! merged in any order.

use std::time::Duration;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::GameClock;
use crate::config::GameConfig;
use crate::error::SlotsError;
use crate::game::{Input, Key, ModeKind, REEL_COUNT, Session, Signal, Symbol};
use crate::rng::SeededRandom;
use crate::scores::MemoryStore;

/// Frames a single session may take before it is declared stuck.
const MAX_FRAMES_PER_SPIN: u64 = 1_000;

/// Name the scripted player signs the ledger with.
const SIM_PLAYER: &str = "sim";

/// How the scripted player uses nudges and holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Never use a move; always pay for a full spin.
    #[default]
    Spin,
    /// Nudge a reel that breaks the most common symbol.
    Nudge,
    /// Hold a reel showing the most common symbol.
    Hold,
}

/// Configuration for a simulated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Game rules.
    pub game: GameConfig,
    /// Full spins before the player walks away.
    pub max_spins: u32,
    /// Move policy.
    pub strategy: Strategy,
    /// Frame step fed to the clock.
    pub frame: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            max_spins: 100,
            strategy: Strategy::Spin,
            frame: Duration::from_millis(50),
        }
    }
}

/// Result of one simulated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Seed the session ran with.
    pub seed: u64,
    /// Full spins paid for.
    pub spins: u32,
    /// Winning rounds.
    pub wins: u32,
    /// Nudges and holds used.
    pub moves_used: u32,
    /// Money paid into the machine.
    pub wagered: i64,
    /// Money paid out.
    pub won: i64,
    /// Balance when the player walked away.
    pub final_bankroll: i64,
    /// Final balance minus starting balance.
    pub net_pot: i64,
    /// Whether the player ran out of money.
    pub busted: bool,
    /// Winning rounds per symbol, in paytable order.
    pub wins_by_symbol: [u32; Symbol::COUNT],
}

/// Error type for simulation runs.
#[derive(Debug, Error)]
pub enum SimError {
    /// The session stopped making progress.
    #[error("session with seed {seed} stalled after {frames} frames in {mode}")]
    Stalled {
        /// Seed of the stuck session.
        seed: u64,
        /// Frames run before giving up.
        frames: u64,
        /// Mode the session was stuck in.
        mode: ModeKind,
    },
    /// The session rejected an update.
    #[error(transparent)]
    Session(#[from] SlotsError),
}

/// Run one session to completion.
///
/// The player spins until `max_spins` full spins have been paid for or the
/// bankroll cannot cover another, then enters a name and leaves from the
/// leaderboard.
///
/// # Errors
///
/// Returns [`SimError::Stalled`] if the session loops without finishing.
pub fn run_session(seed: u64, config: &SimConfig) -> Result<SessionReport, SimError> {
    let mut session = Session::new(config.game);
    let mut rng = SeededRandom::new(Some(seed));
    let mut store = MemoryStore::new();
    let mut clock = GameClock::new();
    let mut wins_by_symbol = [0_u32; Symbol::COUNT];
    let mut busted = false;

    let frame_limit = u64::from(config.max_spins.max(1)) * MAX_FRAMES_PER_SPIN;
    let mut frames = 0_u64;

    loop {
        frames += 1;
        if frames > frame_limit {
            return Err(SimError::Stalled {
                seed,
                frames,
                mode: session.mode().kind(),
            });
        }

        let before = session.mode().kind();
        let input = choose_input(&session, config, &mut busted);
        clock.advance(config.frame);
        if session.update(clock.now(), &input, &mut rng, &mut store)? == Signal::Exit {
            break;
        }

        if before == ModeKind::Spinning
            && session.mode().kind() == ModeKind::Result
            && let Some(symbol) = session.reels().winning_symbol()
        {
            wins_by_symbol[symbol.index()] += 1;
        }
    }

    let stats = *session.stats();
    let bankroll = session.bankroll();
    let report = SessionReport {
        seed,
        spins: stats.spins,
        wins: stats.wins,
        moves_used: stats.moves_used,
        wagered: stats.wagered,
        won: stats.won,
        final_bankroll: bankroll.balance(),
        net_pot: bankroll.net_pot(),
        busted,
        wins_by_symbol,
    };
    tracing::debug!(seed, net_pot = report.net_pot, spins = report.spins, "simulated session");
    Ok(report)
}

/// Decide what the scripted player presses this frame.
fn choose_input(session: &Session, config: &SimConfig, busted: &mut bool) -> Input {
    let game = session.config();
    let balance = session.bankroll().balance();
    let spins = session.stats().spins;

    match session.mode().kind() {
        ModeKind::Ready => {
            if balance < game.play_cost {
                *busted = true;
                Input::cancel()
            } else if spins >= config.max_spins {
                Input::cancel()
            } else {
                Input::confirm()
            }
        }
        ModeKind::Spinning => Input::idle(),
        ModeKind::Result => {
            if session.moves_offered()
                && let Some(key) = move_key(session, config.strategy)
            {
                return Input::typed(key);
            }
            if spins < config.max_spins && balance > game.play_cost {
                Input::confirm()
            } else {
                *busted |= balance <= game.play_cost;
                Input::cancel()
            }
        }
        ModeKind::Nudge | ModeKind::Hold => match pick_reel(session, config.strategy) {
            Some(reel) => Input::typed(digit_for_reel(reel)),
            None => Input::idle(),
        },
        ModeKind::EnterName => {
            let typed = session.name_buffer().unwrap_or_default().len();
            match SIM_PLAYER.chars().nth(typed) {
                Some(c) => Input::typed(c),
                None => Input::press(Key::Enter),
            }
        }
        ModeKind::HighScores => Input::cancel(),
    }
}

/// Key that opens the strategy's move, if a move looks worth paying for.
fn move_key(session: &Session, strategy: Strategy) -> Option<char> {
    let key = match strategy {
        Strategy::Spin => return None,
        Strategy::Nudge => 'n',
        Strategy::Hold => 'h',
    };
    pick_reel(session, strategy).map(|_| key)
}

/// Reel the strategy would target.
///
/// Moves are only worth it when at least three reels already agree.
fn pick_reel(session: &Session, strategy: Strategy) -> Option<usize> {
    let symbols = session.reels().symbols();
    let mut counts = [0_usize; Symbol::COUNT];
    for symbol in symbols {
        counts[symbol.index()] += 1;
    }
    let (best, count) = counts
        .iter()
        .copied()
        .enumerate()
        .max_by_key(|&(index, count)| (count, std::cmp::Reverse(index)))?;
    if count < 3 || count == REEL_COUNT {
        return None;
    }

    match strategy {
        Strategy::Spin => None,
        Strategy::Nudge => symbols.iter().position(|s| s.index() != best),
        Strategy::Hold => symbols.iter().position(|s| s.index() == best),
    }
}

fn digit_for_reel(reel: usize) -> char {
    u32::try_from(reel + 1)
        .ok()
        .and_then(|d| char::from_digit(d, 10))
        .unwrap_or('1')
}

/// Aggregated statistics over many sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSummary {
    /// Sessions completed.
    pub sessions: u64,
    /// Sessions that failed to finish.
    pub failed: u64,
    /// Sessions that ended with an empty pot.
    pub busted: u64,
    /// Full spins across all sessions.
    pub spins: u64,
    /// Winning rounds across all sessions.
    pub wins: u64,
    /// Moves used across all sessions.
    pub moves_used: u64,
    /// Total paid in.
    pub wagered: i64,
    /// Total paid out.
    pub won: i64,
    /// Sum of net pots.
    pub net_pot: i64,
    /// Best single-session net pot.
    pub best_net_pot: Option<i64>,
    /// Winning rounds per symbol, in paytable order.
    pub wins_by_symbol: [u64; Symbol::COUNT],
}

impl SimSummary {
    /// Create empty statistics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sessions: 0,
            failed: 0,
            busted: 0,
            spins: 0,
            wins: 0,
            moves_used: 0,
            wagered: 0,
            won: 0,
            net_pot: 0,
            best_net_pot: None,
            wins_by_symbol: [0; Symbol::COUNT],
        }
    }

    /// Add one session's result.
    pub fn add(&mut self, report: &SessionReport) {
        self.sessions += 1;
        self.busted += u64::from(report.busted);
        self.spins += u64::from(report.spins);
        self.wins += u64::from(report.wins);
        self.moves_used += u64::from(report.moves_used);
        self.wagered += report.wagered;
        self.won += report.won;
        self.net_pot += report.net_pot;
        self.best_net_pot = Some(self.best_net_pot.map_or(report.net_pot, |b| b.max(report.net_pot)));
        for (total, wins) in self.wins_by_symbol.iter_mut().zip(report.wins_by_symbol) {
            *total += u64::from(wins);
        }
    }

    /// Merge another summary into this one.
    pub fn merge(&mut self, other: &Self) {
        self.sessions += other.sessions;
        self.failed += other.failed;
        self.busted += other.busted;
        self.spins += other.spins;
        self.wins += other.wins;
        self.moves_used += other.moves_used;
        self.wagered += other.wagered;
        self.won += other.won;
        self.net_pot += other.net_pot;
        self.best_net_pot = match (self.best_net_pot, other.best_net_pot) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        for (total, wins) in self.wins_by_symbol.iter_mut().zip(other.wins_by_symbol) {
            *total += wins;
        }
    }

    /// Fraction of the money wagered that was paid back.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn return_to_player(&self) -> f64 {
        if self.wagered == 0 {
            0.0
        } else {
            self.won as f64 / self.wagered as f64
        }
    }

    /// Fraction of full spins that won.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        if self.spins == 0 {
            0.0
        } else {
            self.wins as f64 / self.spins as f64
        }
    }
}

/// Run `sessions` sessions with consecutive seeds from `base_seed`.
///
/// Sessions run on the global rayon pool using a fold/reduce, so each
/// thread accumulates its own summary and they are merged at the end.
/// `on_done` is called once per finished session, from any thread.
pub fn run_batch<F>(base_seed: u64, sessions: u64, config: &SimConfig, on_done: F) -> SimSummary
where
    F: Fn() + Sync,
{
    (0..sessions)
        .into_par_iter()
        .fold(SimSummary::new, |mut local, i| {
            let seed = base_seed.wrapping_add(i);
            match run_session(seed, config) {
                Ok(report) => local.add(&report),
                Err(err) => {
                    tracing::warn!(%err, seed, "simulated session failed");
                    local.failed += 1;
                }
            }
            on_done();
            local
        })
        .reduce(SimSummary::new, |mut a, b| {
            a.merge(&b);
            a
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_is_deterministic_per_seed() {
        let config = SimConfig {
            max_spins: 20,
            ..SimConfig::default()
        };
        let a = run_session(7, &config).unwrap();
        let b = run_session(7, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_spin_strategy_never_moves() {
        let config = SimConfig {
            max_spins: 30,
            ..SimConfig::default()
        };
        let report = run_session(1, &config).unwrap();
        assert_eq!(report.moves_used, 0);
        assert!(report.spins <= 30);
        assert_eq!(report.wagered, i64::from(report.spins) * 5);
    }

    #[test]
    fn test_bankroll_accounting_balances() {
        for strategy in [Strategy::Spin, Strategy::Nudge, Strategy::Hold] {
            let config = SimConfig {
                max_spins: 40,
                strategy,
                ..SimConfig::default()
            };
            let report = run_session(99, &config).unwrap();
            assert_eq!(report.final_bankroll, 200 - report.wagered + report.won);
            assert_eq!(report.net_pot, report.final_bankroll - 200);
            let by_symbol: u32 = report.wins_by_symbol.iter().sum();
            assert_eq!(by_symbol, report.wins);
        }
    }

    #[test]
    fn test_small_bankroll_busts() {
        let config = SimConfig {
            game: GameConfig {
                starting_bankroll: 10,
                ..GameConfig::default()
            },
            max_spins: 1_000,
            ..SimConfig::default()
        };
        let report = run_session(3, &config).unwrap();
        assert!(report.busted || report.spins == 1_000);
    }

    #[test]
    fn test_batch_merges_all_sessions() {
        let config = SimConfig {
            max_spins: 10,
            ..SimConfig::default()
        };
        let summary = run_batch(100, 16, &config, || {});
        assert_eq!(summary.sessions, 16);
        assert_eq!(summary.failed, 0);

        let mut sequential = SimSummary::new();
        for seed in 100..116 {
            sequential.add(&run_session(seed, &config).unwrap());
        }
        assert_eq!(summary, sequential);
    }

    #[test]
    fn test_merge_keeps_best() {
        let mut a = SimSummary::new();
        let mut b = SimSummary::new();
        b.best_net_pot = Some(-5);
        a.merge(&b);
        assert_eq!(a.best_net_pot, Some(-5));
        assert!(SimSummary::new().return_to_player().abs() < f64::EPSILON);
    }
}
