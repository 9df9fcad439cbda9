//! Paytable command implementation.

use super::output::{JsonPaytable, format_paytable_text};
use super::{CliError, OutputFormat, load_config};
use std::path::PathBuf;

/// Execute the paytable command.
///
/// # Errors
///
/// Returns an error if the configuration file is invalid.
pub(crate) fn execute(config: Option<PathBuf>, format: OutputFormat) -> Result<(), CliError> {
    let config = load_config(config)?;

    match format {
        OutputFormat::Text => print!("{}", format_paytable_text(&config)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonPaytable::new(&config))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
