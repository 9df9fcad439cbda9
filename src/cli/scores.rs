//! Scores command implementation.

use super::output::{format_leaderboard_text, leaderboard_json};
use super::{CliError, OutputFormat, load_config, open_store};
use slots::scores::leaderboard;
use std::path::PathBuf;

/// Execute the scores command.
///
/// # Errors
///
/// Returns an error if the configuration or the ledger cannot be read.
pub(crate) fn execute(
    config: Option<PathBuf>,
    scores: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let store = open_store(scores)?;
    let records = leaderboard(&store, config.max_highscores)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_leaderboard_text(&records, config.max_highscores));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&leaderboard_json(&records))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
