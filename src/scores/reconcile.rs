//! Folding a finished session into the high-score ledger.

use crate::scores::{HighScoreStore, RecordId, SortOrder, StoreError};

/// What reconciliation did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The player already had a record; the net pot was added to it.
    Updated {
        /// Record that changed.
        id: RecordId,
        /// Its new cumulative score.
        score: i64,
    },
    /// The ledger had room, so a new record was added.
    Inserted {
        /// The new record.
        id: RecordId,
    },
    /// The ledger was full and the lowest record was evicted.
    Replaced {
        /// Record that was removed.
        evicted: RecordId,
        /// The new record.
        id: RecordId,
    },
    /// The net pot did not beat the lowest record on a full ledger.
    NotQualified,
}

/// What a finished visit brings to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// Bankroll minus the starting bankroll.
    pub net_pot: i64,
    /// Nudges and holds used during the visit.
    pub moves_used: u64,
}

/// Fold a visit into the ledger.
///
/// Steps, first match wins:
/// 1. fetch up to `capacity` records, lowest score first
/// 2. a fetched record with the same name gets the net pot added, one more
///    play and the visit's moves
/// 3. otherwise, with fewer than `capacity` records, insert a new one
/// 4. otherwise, if the net pot beats the lowest, evict it and insert
/// 5. otherwise leave the ledger alone
///
/// New records start at one play with the visit's moves.
///
/// The sequence is not transactional. If a later step fails, earlier
/// writes stay in place and the error is returned.
///
/// # Errors
///
/// Returns the first store error encountered.
pub fn reconcile<S: HighScoreStore + ?Sized>(
    store: &mut S,
    name: &str,
    visit: Visit,
    capacity: usize,
) -> Result<ReconcileOutcome, StoreError> {
    let lowest_first = store.top_n(capacity, SortOrder::Ascending)?;

    let outcome = if let Some(existing) = lowest_first.iter().find(|r| r.name == name) {
        let score = existing.score.saturating_add(visit.net_pot);
        store.update_score(existing.id, score)?;
        store.update_plays(
            existing.id,
            existing.plays.saturating_add(1),
            existing.moves_used.saturating_add(visit.moves_used),
        )?;
        ReconcileOutcome::Updated {
            id: existing.id,
            score,
        }
    } else if lowest_first.len() < capacity {
        let id = insert_new(store, name, visit)?;
        ReconcileOutcome::Inserted { id }
    } else if let Some(lowest) = lowest_first.first().filter(|r| visit.net_pot > r.score) {
        store.delete_record(lowest.id)?;
        let id = insert_new(store, name, visit)?;
        ReconcileOutcome::Replaced {
            evicted: lowest.id,
            id,
        }
    } else {
        ReconcileOutcome::NotQualified
    };

    tracing::info!(
        player = name,
        net_pot = visit.net_pot,
        moves_used = visit.moves_used,
        ?outcome,
        "reconciled high scores"
    );
    Ok(outcome)
}

fn insert_new<S: HighScoreStore + ?Sized>(
    store: &mut S,
    name: &str,
    visit: Visit,
) -> Result<RecordId, StoreError> {
    let id = store.insert_record(name, visit.net_pot)?;
    store.update_plays(id, 1, visit.moves_used)?;
    Ok(id)
}
