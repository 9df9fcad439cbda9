//! Output formatting utilities for CLI.

// Rates are displayed, never computed back into game state
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use slots::sim::{SimSummary, Strategy};
use slots::{GameConfig, HighScoreRecord, Symbol};
use std::fmt::Write as _;

/// Placeholder for empty leaderboard rows.
const EMPTY_ROW: &str = "???";

/// JSON-serializable leaderboard row.
#[derive(Debug, Serialize)]
pub(super) struct JsonLeaderboardRow {
    /// 1-based position.
    rank: usize,
    /// Player name.
    name: String,
    /// Cumulative score.
    score: i64,
    /// Visits recorded.
    plays: u32,
    /// Nudges and holds across those visits.
    moves_used: u64,
}

/// Build the JSON leaderboard from records already ordered best first.
pub(super) fn leaderboard_json(records: &[HighScoreRecord]) -> Vec<JsonLeaderboardRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| JsonLeaderboardRow {
            rank: i + 1,
            name: r.name.clone(),
            score: r.score,
            plays: r.plays,
            moves_used: r.moves_used,
        })
        .collect()
}

/// Leaderboard lines, best first, padded with `???` rows up to `capacity`.
pub(crate) fn leaderboard_lines(records: &[HighScoreRecord], capacity: usize) -> Vec<String> {
    (0..capacity.max(records.len()))
        .map(|i| match records.get(i) {
            Some(r) => format!(
                "{:>2}. {:<10} {:>6} {:>5} {:>5}",
                i + 1,
                r.name,
                r.score,
                r.plays,
                r.moves_used
            ),
            None => format!(
                "{:>2}. {EMPTY_ROW:<10} {EMPTY_ROW:>6} {EMPTY_ROW:>5} {EMPTY_ROW:>5}",
                i + 1
            ),
        })
        .collect()
}

/// Format the leaderboard as human-readable text.
pub(super) fn format_leaderboard_text(records: &[HighScoreRecord], capacity: usize) -> String {
    let mut output = String::from("High Scores\n\n");
    let _ = writeln!(
        output,
        "  {:>2}  {:<10} {:>6} {:>5} {:>5}",
        "#", "Name", "Score", "Plays", "Moves"
    );
    for line in leaderboard_lines(records, capacity) {
        output.push_str("  ");
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// JSON-serializable paytable.
#[derive(Debug, Serialize)]
pub(super) struct JsonPaytable {
    /// Prize per symbol for five of a kind.
    prizes: Vec<JsonPrize>,
    /// Cost of a full spin.
    play_cost: i64,
    /// Cost of a nudge.
    nudge_cost: i64,
    /// Cost of a hold.
    hold_cost: i64,
    /// Moves allowed between full spins.
    max_moves: u32,
}

/// One paytable row.
#[derive(Debug, Serialize)]
struct JsonPrize {
    /// Symbol name.
    symbol: &'static str,
    /// Prize paid.
    prize: u32,
}

impl JsonPaytable {
    /// Create from the game configuration.
    pub(super) fn new(config: &GameConfig) -> Self {
        Self {
            prizes: Symbol::paytable()
                .map(|(symbol, prize)| JsonPrize {
                    symbol: symbol.name(),
                    prize,
                })
                .collect(),
            play_cost: config.play_cost,
            nudge_cost: config.nudge_cost,
            hold_cost: config.hold_cost,
            max_moves: config.max_moves,
        }
    }
}

/// Paytable lines shared by the text output and the TUI side panel.
pub(crate) fn paytable_lines(config: &GameConfig) -> Vec<String> {
    let mut lines: Vec<String> = Symbol::paytable()
        .map(|(symbol, prize)| format!("5 x {:<8} {prize:>4}", symbol.name()))
        .collect();
    lines.push(String::new());
    lines.push(format!("Spin  {:>4}", config.play_cost));
    lines.push(format!("Nudge {:>4}", config.nudge_cost));
    lines.push(format!("Hold  {:>4}", config.hold_cost));
    lines.push(format!("Moves {:>4} per spin", config.max_moves));
    lines
}

/// Format the paytable as human-readable text.
pub(super) fn format_paytable_text(config: &GameConfig) -> String {
    let mut output = String::from("Paytable\n\n");
    for line in paytable_lines(config) {
        output.push_str("  ");
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimResult {
    /// Strategy the scripted player used.
    strategy: Strategy,
    /// Base seed of the batch.
    seed: u64,
    /// Raw totals.
    summary: SimSummary,
    /// Paid out over paid in.
    return_to_player: f64,
    /// Winning rounds per full spin.
    hit_rate: f64,
    /// Mean net pot per session.
    avg_net_pot: f64,
}

impl JsonSimResult {
    /// Create from aggregated stats.
    pub(super) fn new(summary: &SimSummary, strategy: Strategy, seed: u64) -> Self {
        Self {
            strategy,
            seed,
            summary: *summary,
            return_to_player: summary.return_to_player(),
            hit_rate: summary.hit_rate(),
            avg_net_pot: avg_net_pot(summary),
        }
    }
}

fn avg_net_pot(summary: &SimSummary) -> f64 {
    if summary.sessions == 0 {
        return 0.0;
    }
    summary.net_pot as f64 / summary.sessions as f64
}

/// Format simulation results as human-readable text.
pub(super) fn format_sim_text(summary: &SimSummary, strategy: Strategy, seed: u64) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Simulation Results (strategy: {strategy:?}, seed: {seed})");
    let _ = writeln!(output, "  Sessions: {} ({} busted, {} failed)", summary.sessions, summary.busted, summary.failed);
    let _ = writeln!(output, "  Spins: {}  Moves used: {}", summary.spins, summary.moves_used);
    let _ = writeln!(output, "  Wagered: {}  Won: {}", summary.wagered, summary.won);
    let _ = writeln!(output, "  Return to player: {:.2}%", summary.return_to_player() * 100.0);
    let _ = writeln!(output, "  Hit rate: {:.3}%", summary.hit_rate() * 100.0);
    let _ = writeln!(output, "  Avg net pot: {:+.1}", avg_net_pot(summary));
    if let Some(best) = summary.best_net_pot {
        let _ = writeln!(output, "  Best net pot: {best:+}");
    }

    output.push_str("\n  Wins by symbol:\n");
    for (symbol, wins) in Symbol::ALL.iter().zip(summary.wins_by_symbol) {
        let _ = writeln!(output, "    {:<8} {wins:>8}", symbol.name());
    }

    output
}
