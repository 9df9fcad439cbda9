//! Simulate command implementation.

// Throughput figures are display-only
#![allow(clippy::cast_precision_loss)]

use super::output::{JsonSimResult, format_sim_text};
use super::{CliError, OutputFormat, StrategyArg, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use slots::rng::time_seed;
use slots::sim::{SimConfig, run_batch};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or output fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    config: Option<PathBuf>,
    sessions: u64,
    spins: u32,
    seed: Option<u64>,
    strategy: StrategyArg,
    threads: Option<usize>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let game = load_config(config)?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed.unwrap_or_else(time_seed);
    let sim = SimConfig {
        game,
        max_spins: spins,
        strategy: strategy.into(),
        ..SimConfig::default()
    };

    let pb = if progress {
        let pb = ProgressBar::new(sessions);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sessions ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    tracing::info!(sessions, spins, base_seed, strategy = ?sim.strategy, "starting simulation");
    let start = Instant::now();

    let summary = run_batch(base_seed, sessions, &sim, || {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let sessions_per_sec = if duration.as_secs_f64() > 0.0 {
        summary.sessions as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_sim_text(&summary, sim.strategy, base_seed));
            println!();
            println!("Duration: {:.2}s ({sessions_per_sec:.0} sessions/sec)", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSimResult::new(&summary, sim.strategy, base_seed))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    if summary.failed > 0 {
        return Err(CliError::new(format!("{} sessions failed to finish", summary.failed)));
    }
    Ok(())
}
