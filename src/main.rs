//! Slots CLI - play the fruit machine, browse high scores, simulate sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Slots - a five-reel fruit machine with nudge and hold
#[derive(Parser, Debug)]
#[command(name = "slots")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the machine in the terminal
    Play {
        /// Game configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// High-score ledger (default: ~/.slots/highscores.json)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Show the high-score leaderboard
    Scores {
        /// Game configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// High-score ledger (default: ~/.slots/highscores.json)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run headless sessions in parallel and aggregate statistics
    Simulate {
        /// Game configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of sessions to run (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        sessions: u64,

        /// Full spins per session before walking away (default: 100)
        #[arg(long, default_value = "100")]
        spins: u32,

        /// Starting seed (increments for each session)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Move policy of the scripted player
        #[arg(long, default_value = "spin")]
        strategy: cli::StrategyArg,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Show prizes and move costs
    Paytable {
        /// Game configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (log_file, tui) = match &args.command {
        Commands::Play { log_file, .. } => (log_file.as_deref(), true),
        _ => (None, false),
    };
    if let Err(e) = cli::init_logging(args.verbose, log_file, tui) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Commands::Play {
            config,
            scores,
            seed,
            log_file: _,
        } => cli::play::execute(config, scores, seed),

        Commands::Scores {
            config,
            scores,
            format,
        } => cli::scores::execute(config, scores, format),

        Commands::Simulate {
            config,
            sessions,
            spins,
            seed,
            strategy,
            threads,
            format,
            progress,
        } => cli::simulate::execute(config, sessions, spins, seed, strategy, threads, format, progress),

        Commands::Paytable { config, format } => cli::paytable::execute(config, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(%e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
