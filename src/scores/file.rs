//! JSON-file high-score store.
//!
//! The ledger is a small versioned JSON document. It is loaded once on
//! open and rewritten after every mutation, through a temporary file and a
//! rename, so a crash mid-write never leaves a truncated ledger behind.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::scores::{HighScoreRecord, HighScoreStore, MemoryStore, RecordId, SortOrder, StoreError};

/// Current document format version.
const VERSION: u32 = 1;

/// Subdirectory of the home directory holding game data.
const DATA_DIR: &str = ".slots";

/// File name of the default ledger.
const SCORES_FILE: &str = "highscores.json";

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct Document {
    /// Format version.
    version: u32,
    /// Records and id counter.
    #[serde(flatten)]
    store: MemoryStore,
}

/// A high-score store persisted as JSON.
#[derive(Debug)]
pub struct JsonFileStore {
    /// Location of the ledger.
    path: PathBuf,
    /// Last state successfully written to disk.
    records: MemoryStore,
}

impl JsonFileStore {
    /// Open the ledger at `path`, creating an empty one if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if a new ledger cannot be written.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let records = match fs::read_to_string(&path) {
            Ok(text) => {
                let document: Document = serde_json::from_str(&text)?;
                if document.version != VERSION {
                    return Err(StoreError::UnsupportedVersion(document.version));
                }
                document.store
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "creating new high-score ledger");
                let store = MemoryStore::new();
                write_document(&path, &store)?;
                store
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), records = records.len(), "opened high-score ledger");
        Ok(Self { path, records })
    }

    /// Location of the ledger.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply a change to a copy, persist it, then keep it.
    ///
    /// If the write fails the in-memory ledger still matches the file.
    fn mutate<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.records.clone();
        let out = change(&mut next)?;
        write_document(&self.path, &next)?;
        self.records = next;
        Ok(out)
    }
}

impl HighScoreStore for JsonFileStore {
    fn top_n(&self, n: usize, order: SortOrder) -> Result<Vec<HighScoreRecord>, StoreError> {
        self.records.top_n(n, order)
    }

    fn insert_record(&mut self, name: &str, score: i64) -> Result<RecordId, StoreError> {
        self.mutate(|store| store.insert_record(name, score))
    }

    fn update_score(&mut self, id: RecordId, score: i64) -> Result<(), StoreError> {
        self.mutate(|store| store.update_score(id, score))
    }

    fn update_plays(
        &mut self,
        id: RecordId,
        plays: u32,
        moves_used: u64,
    ) -> Result<(), StoreError> {
        self.mutate(|store| store.update_plays(id, plays, moves_used))
    }

    fn delete_record(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.mutate(|store| store.delete_record(id))
    }
}

fn write_document(path: &Path, store: &MemoryStore) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let document = Document {
        version: VERSION,
        store: store.clone(),
    };
    let json = serde_json::to_string_pretty(&document)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Get the path to the slots data directory (~/.slots).
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or directory creation fails.
pub fn slots_data_dir() -> io::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "cannot determine home directory"))?;

    let data_dir = Path::new(&home).join(DATA_DIR);
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// Get the default ledger path (~/.slots/highscores.json).
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn default_scores_path() -> io::Result<PathBuf> {
    Ok(slots_data_dir()?.join(SCORES_FILE))
}
