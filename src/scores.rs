//! High-score ledger.
//!
//! The game only needs five operations from its store: read the top `n`
//! records, insert, update a score, update the play counters and delete.
//! [`HighScoreStore`] captures exactly that, so the reconciliation logic in
//! [`reconcile`] never sees a storage engine.
//!
//! Two stores ship with the crate:
//! - [`MemoryStore`] keeps records in a `Vec`, for tests and simulations
//! - [`JsonFileStore`] persists a versioned JSON document on disk

mod file;
mod memory;
mod reconcile;

pub use file::{JsonFileStore, default_scores_path, slots_data_dir};
pub use memory::MemoryStore;
pub use reconcile::{ReconcileOutcome, Visit, reconcile};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned record identifier.
pub type RecordId = u64;

/// One row of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    /// Identifier assigned on insert.
    pub id: RecordId,
    /// Player name.
    pub name: String,
    /// Cumulative net pot across the player's visits.
    pub score: i64,
    /// Visits recorded under this name.
    #[serde(default)]
    pub plays: u32,
    /// Nudges and holds used across those visits.
    #[serde(default)]
    pub moves_used: u64,
}

/// Ordering for [`HighScoreStore::top_n`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Lowest score first.
    Ascending,
    /// Highest score first.
    Descending,
}

/// Errors from a high-score store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Reading or writing the backing file failed.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file is not a valid ledger.
    #[error("store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    /// The backing file was written by an unknown format version.
    #[error("unsupported store version: {0}")]
    UnsupportedVersion(u32),
    /// No record has the given id.
    #[error("unknown record {0}")]
    UnknownRecord(RecordId),
}

/// A persistent, ordered ledger of `(name, score)` records.
///
/// All operations are synchronous. Ties in score are broken by id, oldest
/// first, so results are deterministic.
pub trait HighScoreStore {
    /// Up to `n` records ordered by score.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn top_n(&self, n: usize, order: SortOrder) -> Result<Vec<HighScoreRecord>, StoreError>;

    /// Add a record and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn insert_record(&mut self, name: &str, score: i64) -> Result<RecordId, StoreError>;

    /// Replace the score of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownRecord`] if `id` does not exist, or an
    /// error if the store cannot be written.
    fn update_score(&mut self, id: RecordId, score: i64) -> Result<(), StoreError>;

    /// Replace the play counters of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownRecord`] if `id` does not exist, or an
    /// error if the store cannot be written.
    fn update_plays(
        &mut self,
        id: RecordId,
        plays: u32,
        moves_used: u64,
    ) -> Result<(), StoreError>;

    /// Remove a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownRecord`] if `id` does not exist, or an
    /// error if the store cannot be written.
    fn delete_record(&mut self, id: RecordId) -> Result<(), StoreError>;
}

/// The leaderboard as displayed: best `n` records, highest first.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn leaderboard<S: HighScoreStore + ?Sized>(
    store: &S,
    n: usize,
) -> Result<Vec<HighScoreRecord>, StoreError> {
    store.top_n(n, SortOrder::Descending)
}
