//! The session state machine.
//!
//! A [`Session`] is driven one tick at a time by [`Session::update`]. Each
//! tick first advances the reel bank, then lets the handler for the current
//! [`Mode`] react to the input. Handlers only receive the pieces of session
//! state they need, and each one answers with the next step.
//!
//! Spending transitions check the bankroll first. When the player cannot
//! afford an action it is simply ignored and the mode stays put.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::{SlotsError, SlotsResult};
use crate::game::{Bankroll, REEL_COUNT, ReelBank, ReelView};
use crate::rng::RandomSource;
use crate::scores::{HighScoreStore, ReconcileOutcome, StoreError, Visit, reconcile};

/// A key event from the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Delete the last character.
    Backspace,
    /// Confirm the typed name.
    Enter,
    /// The escape key.
    Escape,
}

/// Everything the front end reports for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Input {
    /// Key typed this tick, if any.
    pub key: Option<Key>,
    /// Whether `key` is a fresh press rather than auto-repeat.
    pub fresh_press: bool,
    /// Whether the confirm key (space) is held down.
    pub confirm_held: bool,
    /// Whether the cancel key (escape) is held down.
    pub cancel_held: bool,
}

impl Input {
    /// No input at all.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            key: None,
            fresh_press: false,
            confirm_held: false,
            cancel_held: false,
        }
    }

    /// A freshly pressed key.
    #[must_use]
    pub const fn press(key: Key) -> Self {
        Self {
            key: Some(key),
            fresh_press: true,
            confirm_held: false,
            cancel_held: false,
        }
    }

    /// A freshly typed character.
    #[must_use]
    pub const fn typed(c: char) -> Self {
        Self::press(Key::Char(c))
    }

    /// Confirm (space) held down.
    #[must_use]
    pub const fn confirm() -> Self {
        Self {
            key: Some(Key::Char(' ')),
            fresh_press: true,
            confirm_held: true,
            cancel_held: false,
        }
    }

    /// Cancel (escape) held down.
    #[must_use]
    pub const fn cancel() -> Self {
        Self {
            key: Some(Key::Escape),
            fresh_press: true,
            confirm_held: false,
            cancel_held: true,
        }
    }
}

/// Where the session is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Waiting for the player to pay for a spin.
    Ready,
    /// Reels turning.
    Spinning,
    /// Showing the outcome of a spin.
    Result,
    /// Waiting for the reel number to nudge.
    Nudge,
    /// Waiting for the reel number to hold.
    Hold,
    /// Typing a name for the high-score ledger.
    EnterName {
        /// Name typed so far.
        name: String,
    },
    /// Showing the leaderboard.
    HighScores {
        /// Name the session was recorded under, if one was entered.
        player: Option<String>,
        /// What happened to the ledger, if reconciliation succeeded.
        outcome: Option<ReconcileOutcome>,
    },
}

impl Mode {
    /// The mode without its data.
    #[must_use]
    pub const fn kind(&self) -> ModeKind {
        match self {
            Self::Ready => ModeKind::Ready,
            Self::Spinning => ModeKind::Spinning,
            Self::Result => ModeKind::Result,
            Self::Nudge => ModeKind::Nudge,
            Self::Hold => ModeKind::Hold,
            Self::EnterName { .. } => ModeKind::EnterName,
            Self::HighScores { .. } => ModeKind::HighScores,
        }
    }
}

/// Discriminant of [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// See [`Mode::Ready`].
    Ready,
    /// See [`Mode::Spinning`].
    Spinning,
    /// See [`Mode::Result`].
    Result,
    /// See [`Mode::Nudge`].
    Nudge,
    /// See [`Mode::Hold`].
    Hold,
    /// See [`Mode::EnterName`].
    EnterName,
    /// See [`Mode::HighScores`].
    HighScores,
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ready => "READY",
            Self::Spinning => "SPINNING",
            Self::Result => "RESULT",
            Self::Nudge => "NUDGE",
            Self::Hold => "HOLD",
            Self::EnterName => "ENTER_NAME",
            Self::HighScores => "HIGH_SCORES",
        };
        f.write_str(name)
    }
}

/// What the application loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep running.
    Continue,
    /// The player quit from the leaderboard.
    Exit,
}

/// Running totals for the whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Full spins paid for.
    pub spins: u32,
    /// Rounds that ended in five of a kind.
    pub wins: u32,
    /// Nudges and holds used.
    pub moves_used: u32,
    /// Money paid into the machine.
    pub wagered: i64,
    /// Money paid out by the machine.
    pub won: i64,
}

/// Read-only snapshot for drawing a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// Current mode.
    pub mode: ModeKind,
    /// Current balance.
    pub bankroll: i64,
    /// Name being typed (empty outside name entry).
    pub name: String,
    /// Drawing state of each reel.
    pub reels: [ReelView; REEL_COUNT],
    /// Nudges and holds left before the next full spin.
    pub moves_remaining: u32,
    /// Whether the reels are turning.
    pub spinning: bool,
    /// Whether the last round was a win.
    pub winning: bool,
    /// Prize paid for the last round, if it won.
    pub last_win: Option<u32>,
    /// Whether nudge and hold are on offer right now.
    pub moves_offered: bool,
    /// Session totals.
    pub stats: SessionStats,
    /// Name recorded on the leaderboard this session.
    pub player: Option<String>,
    /// Ledger change from reconciliation.
    pub outcome: Option<ReconcileOutcome>,
}

/// Next step chosen by a mode handler.
enum Step {
    Stay,
    Go(Mode),
    Exit,
}

/// Which paid move a reel number selects.
#[derive(Clone, Copy)]
enum MoveKind {
    Nudge,
    Hold,
}

/// Counters the handlers bump as play goes on.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    /// Running totals for the whole session.
    stats: SessionStats,
    /// Prize paid for the last round, if it won.
    last_win: Option<u32>,
    /// Nudges and holds since the bankroll was last filled.
    visit_moves: u32,
}

/// One player's visit to the machine.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current mode.
    mode: Mode,
    /// The player's pot.
    bankroll: Bankroll,
    /// The five reels.
    reels: ReelBank,
    /// Costs and limits.
    config: GameConfig,
    /// Totals and the last prize.
    tally: Tally,
}

impl Session {
    /// Open a session with the configured starting bankroll.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        info!(bankroll = config.starting_bankroll, "session opened");
        Self {
            mode: Mode::Ready,
            bankroll: Bankroll::new(config.starting_bankroll),
            reels: ReelBank::from_config(&config),
            config,
            tally: Tally::default(),
        }
    }

    /// Advance the session by one tick.
    ///
    /// The reel bank is ticked before the current mode's handler runs, so
    /// a spin that completes this tick is seen with its final symbols.
    ///
    /// # Errors
    ///
    /// Returns [`SlotsError::StoreUnavailable`] if committing a name could
    /// not update the high-score ledger. The session has already moved to
    /// the leaderboard when this is returned.
    pub fn update<R, S>(
        &mut self,
        now: Duration,
        input: &Input,
        rng: &mut R,
        store: &mut S,
    ) -> SlotsResult<Signal>
    where
        R: RandomSource + ?Sized,
        S: HighScoreStore + ?Sized,
    {
        let Self {
            mode,
            bankroll,
            reels,
            config,
            tally,
        } = self;

        reels.tick(now, rng);

        let current = mode.kind();
        let mut failure = None;
        let step = match mode {
            Mode::Ready => on_ready(input, now, bankroll, reels, config, tally),
            Mode::Spinning => on_spinning(bankroll, reels, tally),
            Mode::Result => on_result(input, bankroll, reels, config),
            Mode::Nudge => {
                on_choose_reel(MoveKind::Nudge, input, now, bankroll, reels, config, tally)
            }
            Mode::Hold => {
                on_choose_reel(MoveKind::Hold, input, now, bankroll, reels, config, tally)
            }
            Mode::EnterName { name } => {
                let (step, error) = on_enter_name(input, name, bankroll, config, tally, store);
                failure = error;
                step
            }
            Mode::HighScores { .. } => on_high_scores(input, bankroll, tally),
        };

        let signal = match step {
            Step::Stay => Signal::Continue,
            Step::Go(next) => {
                debug!(from = %current, to = %next.kind(), bankroll = bankroll.balance(), "mode transition");
                *mode = next;
                Signal::Continue
            }
            Step::Exit => {
                info!(net_pot = bankroll.net_pot(), moves_used = tally.stats.moves_used, "session closed");
                Signal::Exit
            }
        };

        match failure {
            Some(err) => Err(err.into()),
            None => Ok(signal),
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The player's pot.
    #[must_use]
    pub const fn bankroll(&self) -> &Bankroll {
        &self.bankroll
    }

    /// The reel bank.
    #[must_use]
    pub const fn reels(&self) -> &ReelBank {
        &self.reels
    }

    /// Costs and limits in force.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Running totals.
    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.tally.stats
    }

    /// Name typed so far, while entering a name.
    #[must_use]
    pub fn name_buffer(&self) -> Option<&str> {
        match &self.mode {
            Mode::EnterName { name } => Some(name),
            _ => None,
        }
    }

    /// Whether nudge and hold are on offer.
    #[must_use]
    pub fn moves_offered(&self) -> bool {
        moves_on_offer(&self.bankroll, &self.reels, &self.config)
    }

    /// Snapshot for drawing the frame at `now`.
    #[must_use]
    pub fn view(&self, now: Duration) -> SessionView {
        let (player, outcome) = match &self.mode {
            Mode::HighScores { player, outcome } => (player.clone(), *outcome),
            _ => (None, None),
        };
        SessionView {
            mode: self.mode.kind(),
            bankroll: self.bankroll.balance(),
            name: self.name_buffer().unwrap_or_default().to_string(),
            reels: self.reels.view(now),
            moves_remaining: self.reels.moves_remaining(),
            spinning: self.reels.is_spinning(),
            winning: self.reels.is_winning_round(),
            last_win: self.tally.last_win,
            moves_offered: self.mode.kind() == ModeKind::Result && self.moves_offered(),
            stats: self.tally.stats,
            player,
            outcome,
        }
    }
}

fn on_ready(
    input: &Input,
    now: Duration,
    bankroll: &mut Bankroll,
    reels: &mut ReelBank,
    config: &GameConfig,
    tally: &mut Tally,
) -> Step {
    if input.confirm_held && bankroll.try_spend(config.play_cost) {
        reels.spin(now);
        tally.stats.spins += 1;
        tally.stats.wagered += config.play_cost;
        tally.last_win = None;
        debug!(bankroll = bankroll.balance(), "spin started");
        return Step::Go(Mode::Spinning);
    }
    if input.cancel_held {
        return Step::Go(Mode::HighScores {
            player: None,
            outcome: None,
        });
    }
    Step::Stay
}

fn on_spinning(bankroll: &mut Bankroll, reels: &ReelBank, tally: &mut Tally) -> Step {
    if reels.is_spinning() {
        return Step::Stay;
    }

    tally.last_win = None;
    if reels.is_winning_round() {
        match reels.winnings() {
            Ok(prize) => {
                bankroll.credit(prize);
                tally.stats.wins += 1;
                tally.stats.won += i64::from(prize);
                tally.last_win = Some(prize);
                debug!(prize, symbols = ?reels.symbols(), "winning round");
            }
            Err(err) => contract_breach(&err),
        }
    } else {
        debug!(symbols = ?reels.symbols(), "losing round");
    }
    Step::Go(Mode::Result)
}

fn on_result(input: &Input, bankroll: &Bankroll, reels: &ReelBank, config: &GameConfig) -> Step {
    if input.cancel_held {
        return Step::Go(Mode::EnterName {
            name: String::new(),
        });
    }
    if input.confirm_held && bankroll.balance() > config.play_cost {
        return Step::Go(Mode::Ready);
    }
    if !moves_on_offer(bankroll, reels, config) {
        return Step::Stay;
    }
    match input.key {
        Some(Key::Char('n')) => Step::Go(Mode::Nudge),
        Some(Key::Char('h')) => Step::Go(Mode::Hold),
        _ => Step::Stay,
    }
}

fn on_choose_reel(
    kind: MoveKind,
    input: &Input,
    now: Duration,
    bankroll: &mut Bankroll,
    reels: &mut ReelBank,
    config: &GameConfig,
    tally: &mut Tally,
) -> Step {
    let Some(Key::Char(c)) = input.key else {
        return Step::Stay;
    };
    let Some(reel) = reel_for_digit(c) else {
        return Step::Stay;
    };
    let cost = match kind {
        MoveKind::Nudge => config.nudge_cost,
        MoveKind::Hold => config.hold_cost,
    };
    if !bankroll.can_afford(cost) {
        return Step::Stay;
    }

    let applied = match kind {
        MoveKind::Nudge => reels.nudge(now, reel),
        MoveKind::Hold => reels.hold(now, reel),
    };
    if let Err(err) = applied {
        contract_breach(&err);
        return Step::Go(Mode::Result);
    }

    let spent = bankroll.try_spend(cost);
    debug_assert!(spent, "affordability checked above");
    tally.stats.moves_used += 1;
    tally.stats.wagered += cost;
    tally.visit_moves += 1;
    tally.last_win = None;
    debug!(reel, cost, moves_remaining = reels.moves_remaining(), "move used");
    Step::Go(Mode::Spinning)
}

fn on_enter_name<S: HighScoreStore + ?Sized>(
    input: &Input,
    name: &mut String,
    bankroll: &Bankroll,
    config: &GameConfig,
    tally: &Tally,
    store: &mut S,
) -> (Step, Option<StoreError>) {
    if !input.fresh_press {
        return (Step::Stay, None);
    }

    match input.key {
        Some(Key::Enter) if name.len() > 1 => {
            let player = std::mem::take(name);
            let visit = Visit {
                net_pot: bankroll.net_pot(),
                moves_used: u64::from(tally.visit_moves),
            };
            match reconcile(store, &player, visit, config.max_highscores) {
                Ok(outcome) => (
                    Step::Go(Mode::HighScores {
                        player: Some(player),
                        outcome: Some(outcome),
                    }),
                    None,
                ),
                Err(err) => {
                    warn!(%err, player = %player, "high-score update failed");
                    (
                        Step::Go(Mode::HighScores {
                            player: Some(player),
                            outcome: None,
                        }),
                        Some(err),
                    )
                }
            }
        }
        Some(Key::Backspace) => {
            name.pop();
            (Step::Stay, None)
        }
        Some(Key::Char(c)) if c.is_ascii_alphabetic() && name.len() < config.max_name_len => {
            name.push(c);
            (Step::Stay, None)
        }
        _ => (Step::Stay, None),
    }
}

fn on_high_scores(input: &Input, bankroll: &mut Bankroll, tally: &mut Tally) -> Step {
    if input.cancel_held {
        return Step::Exit;
    }
    if input.confirm_held {
        bankroll.reset();
        tally.visit_moves = 0;
        return Step::Go(Mode::Ready);
    }
    Step::Stay
}

fn moves_on_offer(bankroll: &Bankroll, reels: &ReelBank, config: &GameConfig) -> bool {
    !reels.is_winning_round()
        && reels.can_use_move()
        && bankroll.balance() > config.nudge_cost
        && bankroll.balance() > config.hold_cost
}

/// Map the digit keys 1-5 to reel indices 0-4.
fn reel_for_digit(c: char) -> Option<usize> {
    let digit = usize::try_from(c.to_digit(10)?).ok()?;
    digit.checked_sub(1).filter(|&index| index < REEL_COUNT)
}

/// A reel bank call was rejected: the session broke its own guard.
fn contract_breach(err: &SlotsError) {
    tracing::error!(%err, "reel bank contract breached");
    if cfg!(debug_assertions) {
        panic!("reel bank contract breached: {err}");
    }
}
