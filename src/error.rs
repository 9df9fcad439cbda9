//! Error types for the game core.

use thiserror::Error;

use crate::scores::StoreError;

/// Errors raised by the reel bank and the session.
#[derive(Debug, Error)]
pub enum SlotsError {
    /// The caller broke an operation's contract.
    ///
    /// Examples: asking for winnings after a losing round, or nudging
    /// with no moves left. These are programming errors, not player errors.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),
    /// The high-score store could not complete a request.
    #[error("high-score store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl SlotsError {
    /// Whether this error is a caller-side contract breach.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::PreconditionViolation(_))
    }
}

/// Result type for game operations.
pub type SlotsResult<T> = Result<T, SlotsError>;
