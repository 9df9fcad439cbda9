#![no_main]

//! High-score reconciliation fuzzer.
//!
//! Builds a ledger from arbitrary records, folds an arbitrary net pot into
//! it and checks the ledger never grows past capacity or by more than one,
//! and that one visit adds at most one play.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use slots::scores::reconcile;
use slots::{HighScoreStore, MemoryStore, SortOrder, Visit};

#[derive(Arbitrary, Debug)]
struct ReconcileInput {
    records: Vec<(u8, i32)>,
    player: u8,
    net_pot: i32,
    moves_used: u16,
    capacity: u8,
}

fuzz_target!(|input: ReconcileInput| {
    let capacity = usize::from(input.capacity % 16).max(1);
    let names: Vec<String> = input
        .records
        .iter()
        .take(32)
        .map(|(name, _)| format!("p{name}"))
        .collect();
    let mut store = MemoryStore::with_records(
        names
            .iter()
            .map(String::as_str)
            .zip(input.records.iter().map(|(_, score)| i64::from(*score))),
    );
    let before = store.len();

    let player = format!("p{}", input.player);
    let visit = Visit {
        net_pot: i64::from(input.net_pot),
        moves_used: u64::from(input.moves_used),
    };
    reconcile(&mut store, &player, visit, capacity).expect("memory store never fails");

    let after = store.len();
    assert!(after.abs_diff(before) <= 1);
    if before >= capacity {
        assert!(after <= before);
    }

    let lowest = store.top_n(usize::MAX, SortOrder::Ascending).expect("memory store never fails");
    for pair in lowest.windows(2) {
        assert!(pair[0].score <= pair[1].score);
    }
    // Seeded records start at zero plays; one visit adds at most one.
    let plays: u32 = lowest.iter().map(|r| r.plays).sum();
    assert!(plays <= 1);
});
