//! In-memory high-score store.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::scores::{HighScoreRecord, HighScoreStore, RecordId, SortOrder, StoreError};

/// A high-score store held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    /// Id handed to the next insert.
    next_id: RecordId,
    /// Records in insertion order.
    records: Vec<HighScoreRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }

    /// Create a store pre-filled with `(name, score)` pairs.
    #[must_use]
    pub fn with_records<'a>(records: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        let mut store = Self::new();
        for (name, score) in records {
            store.push(name, score);
        }
        store
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[HighScoreRecord] {
        &self.records
    }

    /// Find a record by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&HighScoreRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    fn push(&mut self, name: &str, score: i64) -> RecordId {
        // Deserialized documents from older writers may carry next_id 0.
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.records.push(HighScoreRecord {
            id,
            name: name.to_string(),
            score,
            plays: 0,
            moves_used: 0,
        });
        id
    }

    fn position(&self, id: RecordId) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::UnknownRecord(id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScoreStore for MemoryStore {
    fn top_n(&self, n: usize, order: SortOrder) -> Result<Vec<HighScoreRecord>, StoreError> {
        let mut sorted = self.records.clone();
        match order {
            SortOrder::Ascending => sorted.sort_by_key(|r| (r.score, r.id)),
            SortOrder::Descending => sorted.sort_by_key(|r| (Reverse(r.score), r.id)),
        }
        sorted.truncate(n);
        Ok(sorted)
    }

    fn insert_record(&mut self, name: &str, score: i64) -> Result<RecordId, StoreError> {
        Ok(self.push(name, score))
    }

    fn update_score(&mut self, id: RecordId, score: i64) -> Result<(), StoreError> {
        let index = self.position(id)?;
        self.records[index].score = score;
        Ok(())
    }

    fn update_plays(
        &mut self,
        id: RecordId,
        plays: u32,
        moves_used: u64,
    ) -> Result<(), StoreError> {
        let index = self.position(id)?;
        let record = &mut self.records[index];
        record.plays = plays;
        record.moves_used = moves_used;
        Ok(())
    }

    fn delete_record(&mut self, id: RecordId) -> Result<(), StoreError> {
        let index = self.position(id)?;
        self.records.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut store = MemoryStore::new();
        let a = store.insert_record("ann", 10).unwrap();
        let b = store.insert_record("bob", 20).unwrap();
        assert!(b > a);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_top_n_orders_and_truncates() {
        let store = MemoryStore::with_records([("a", 30), ("b", 10), ("c", 20), ("d", 10)]);

        let asc = store.top_n(3, SortOrder::Ascending).unwrap();
        let names: Vec<&str> = asc.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "d", "c"]);

        let desc = store.top_n(2, SortOrder::Descending).unwrap();
        let names: Vec<&str> = desc.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_update_and_delete() {
        let mut store = MemoryStore::new();
        let id = store.insert_record("ann", 10).unwrap();
        store.update_score(id, 99).unwrap();
        assert_eq!(store.find("ann").unwrap().score, 99);

        store.update_plays(id, 3, 7).unwrap();
        let ann = store.find("ann").unwrap();
        assert_eq!((ann.plays, ann.moves_used), (3, 7));

        store.delete_record(id).unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.delete_record(id),
            Err(StoreError::UnknownRecord(_))
        ));
        assert!(store.update_score(id, 1).is_err());
        assert!(store.update_plays(id, 1, 1).is_err());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = MemoryStore::new();
        let a = store.insert_record("ann", 1).unwrap();
        store.delete_record(a).unwrap();
        let b = store.insert_record("bob", 2).unwrap();
        assert_ne!(a, b);
    }
}
