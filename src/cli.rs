//! CLI command implementations for slots.

pub(crate) mod paytable;
pub(crate) mod play;
pub(crate) mod scores;
pub(crate) mod simulate;

mod output;

use clap::ValueEnum;
use slots::scores::default_scores_path;
use slots::sim::{SimError, Strategy};
use slots::{ConfigError, GameConfig, JsonFileStore, SlotsError, StoreError};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;

/// Output format for the reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Move policy for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StrategyArg {
    /// Only ever pay for full spins.
    Spin,
    /// Nudge the odd reel out when three or more agree.
    Nudge,
    /// Hold a matching reel when three or more agree.
    Hold,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Spin => Self::Spin,
            StrategyArg::Nudge => Self::Nudge,
            StrategyArg::Hold => Self::Hold,
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(format!("Invalid configuration: {e}"))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(format!("High-score ledger: {e}"))
    }
}

impl From<SlotsError> for CliError {
    fn from(e: SlotsError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SimError> for CliError {
    fn from(e: SimError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the game configuration, or the defaults when no file is given.
pub(crate) fn load_config(path: Option<PathBuf>) -> Result<GameConfig, CliError> {
    match path {
        Some(path) => GameConfig::load(&path).map_err(|e| {
            CliError::new(format!("Failed to load {}: {e}", path.display()))
        }),
        None => Ok(GameConfig::default()),
    }
}

/// Open the high-score ledger at `path`, or the default location.
pub(crate) fn open_store(path: Option<PathBuf>) -> Result<JsonFileStore, CliError> {
    let path = match path {
        Some(path) => path,
        None => default_scores_path()?,
    };
    Ok(JsonFileStore::open(path)?)
}

/// Install the tracing subscriber.
///
/// `-v` raises the level one step at a time from warnings. With a log file
/// everything goes there; otherwise logs go to stderr, except for the TUI
/// which must not write over the screen it draws and stays silent.
pub(crate) fn init_logging(verbose: u8, log_file: Option<&Path>, tui: bool) -> Result<(), CliError> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::new(format!("Failed to create log file {}: {e}", path.display()))
            })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None if tui => return Ok(()),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| CliError::new(format!("Failed to install logger: {e}")))
}
