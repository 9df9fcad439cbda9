//! Property-based tests for the reel bank, the session and the ledger.
//!
//! Run with: cargo test --release prop_reels

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use proptest::prelude::*;

use slots::game::check_invariants;
use slots::scores::reconcile;
use slots::{
    GameConfig, HighScoreStore, Input, Key, MemoryStore, REEL_COUNT, ReelBank, SeededRandom,
    Session, SortOrder, Symbol, Visit,
};

const T: Duration = Duration::from_secs(2);

/// A move against the reel bank.
#[derive(Debug, Clone, Copy)]
enum Move {
    Nudge(usize),
    Hold(usize),
}

fn move_strategy() -> impl Strategy<Value = Move> {
    prop_oneof![
        (0..REEL_COUNT).prop_map(Move::Nudge),
        (0..REEL_COUNT).prop_map(Move::Hold),
    ]
}

fn input_strategy() -> impl Strategy<Value = Input> {
    let key = prop_oneof![
        Just(None),
        Just(Some(Key::Enter)),
        Just(Some(Key::Backspace)),
        Just(Some(Key::Escape)),
        prop::char::range(' ', '~').prop_map(|c| Some(Key::Char(c))),
    ];
    (key, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(key, fresh_press, confirm_held, cancel_held)| Input {
            key,
            fresh_press,
            confirm_held,
            cancel_held,
        },
    )
}

/// Tick the bank until it rests, returning the time it stopped.
fn settle(bank: &mut ReelBank, mut now: Duration, rng: &mut SeededRandom) -> Duration {
    while bank.is_spinning() {
        now += Duration::from_millis(37);
        bank.tick(now, rng);
    }
    now
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every draw lands on a real symbol and pays the paytable prize.
    #[test]
    fn prop_draws_in_range(seed in any::<u64>()) {
        let mut rng = SeededRandom::new(Some(seed));
        for _ in 0..64 {
            let symbol = Symbol::draw(&mut rng);
            prop_assert!(symbol.index() < Symbol::COUNT);
            prop_assert_eq!(Symbol::paytable().nth(symbol.index()).map(|(_, p)| p), Some(symbol.prize()));
        }
    }

    /// A full spin gives every reel a future deadline, increasing left to right.
    #[test]
    fn prop_spin_deadlines_increase(start_ms in 0u64..1_000_000) {
        let mut bank = ReelBank::new(T, 10);
        let now = Duration::from_millis(start_ms);
        bank.spin(now);

        let deadlines: Vec<Duration> = bank.reels().iter().map(|r| r.deadline().unwrap()).collect();
        prop_assert_eq!(deadlines.len(), REEL_COUNT);
        prop_assert!(deadlines[0] > now);
        for pair in deadlines.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert_eq!(deadlines[REEL_COUNT - 1], bank.spin_end());
    }

    /// Whatever moves came before, a finished spin leaves nothing held or pending.
    #[test]
    fn prop_spin_end_clears_holds(
        seed in any::<u64>(),
        moves in prop::collection::vec(move_strategy(), 0..12),
    ) {
        let mut rng = SeededRandom::new(Some(seed));
        let mut bank = ReelBank::new(T, 10);
        bank.spin(Duration::ZERO);
        let mut now = settle(&mut bank, Duration::ZERO, &mut rng);

        for m in moves {
            let before = bank.moves_remaining();
            let applied = match m {
                Move::Nudge(reel) => bank.nudge(now, reel),
                Move::Hold(reel) => bank.hold(now, reel),
            };
            if before == 0 {
                prop_assert!(applied.is_err());
                prop_assert!(!bank.is_spinning());
                continue;
            }
            prop_assert!(applied.is_ok());
            prop_assert_eq!(bank.moves_remaining(), before - 1);

            now = settle(&mut bank, now, &mut rng);
            prop_assert!(!bank.is_spinning());
            for reel in bank.reels() {
                prop_assert!(!reel.is_held());
                prop_assert!(reel.deadline().is_none());
            }
            let first = bank.symbols()[0];
            prop_assert_eq!(bank.is_winning_round(), bank.symbols().iter().all(|s| *s == first));
        }
    }

    /// Arbitrary input never breaks the session's invariants.
    #[test]
    fn prop_session_invariants_hold(
        seed in any::<u64>(),
        inputs in prop::collection::vec((input_strategy(), 1u64..400), 1..300),
    ) {
        let mut session = Session::new(GameConfig::default());
        let mut rng = SeededRandom::new(Some(seed));
        let mut store = MemoryStore::new();
        let mut now = Duration::ZERO;

        for (input, step_ms) in inputs {
            now += Duration::from_millis(step_ms);
            session.update(now, &input, &mut rng, &mut store).unwrap();
            let violations = check_invariants(&session, now);
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
        prop_assert!(store.len() <= session.config().max_highscores);
    }

    /// Reconciliation changes the ledger by at most one record and never
    /// grows it past capacity.
    #[test]
    fn prop_reconcile_bounded(
        scores in prop::collection::vec(-500i64..500, 0..15),
        net_pot in -500i64..500,
        capacity in 1usize..12,
        pick_existing in any::<bool>(),
        moves_used in 0u64..50,
    ) {
        let names: Vec<String> = (0..scores.len()).map(|i| format!("p{i}")).collect();
        let mut store = MemoryStore::with_records(names.iter().map(String::as_str).zip(scores.iter().copied()));
        let before = store.len();
        let player = if pick_existing && !names.is_empty() { names[0].clone() } else { "new".to_string() };

        reconcile(&mut store, &player, Visit { net_pot, moves_used }, capacity).unwrap();

        let after = store.len();
        prop_assert!(after.abs_diff(before) <= 1);
        if before < capacity {
            prop_assert!(after <= capacity);
        } else {
            prop_assert!(after <= before);
        }
        let sorted = store.top_n(usize::MAX, SortOrder::Descending).unwrap();
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
