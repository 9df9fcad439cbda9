#![no_main]

//! Session state machine fuzzer.
//!
//! Feeds arbitrary key presses, held keys and frame times into a session
//! and checks the invariants after every tick. Any panic (including a
//! reel bank contract breach) or invariant violation is a bug.

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use slots::game::check_invariants;
use slots::{GameConfig, Input, Key, MemoryStore, SeededRandom, Session, Signal};

/// A fuzzer-generated key.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzKey {
    None,
    Char(u8),
    Backspace,
    Enter,
    Escape,
}

/// One frame of input.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzFrame {
    key: FuzzKey,
    fresh_press: bool,
    confirm_held: bool,
    cancel_held: bool,
    /// Frame time in milliseconds.
    elapsed_ms: u16,
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    seed: u64,
    starting_bankroll: u16,
    max_moves: u8,
    frames: Vec<FuzzFrame>,
}

fuzz_target!(|input: SessionInput| {
    let config = GameConfig {
        starting_bankroll: i64::from(input.starting_bankroll),
        max_moves: u32::from(input.max_moves % 20),
        ..GameConfig::default()
    };
    let mut session = Session::new(config);
    let mut rng = SeededRandom::new(Some(input.seed));
    let mut store = MemoryStore::new();
    let mut now = Duration::ZERO;

    for frame in input.frames.into_iter().take(2_000) {
        let key = match frame.key {
            FuzzKey::None => None,
            FuzzKey::Char(b) => Some(Key::Char(char::from(b))),
            FuzzKey::Backspace => Some(Key::Backspace),
            FuzzKey::Enter => Some(Key::Enter),
            FuzzKey::Escape => Some(Key::Escape),
        };
        let tick = Input {
            key,
            fresh_press: frame.fresh_press,
            confirm_held: frame.confirm_held,
            cancel_held: frame.cancel_held,
        };

        now += Duration::from_millis(u64::from(frame.elapsed_ms % 1_000));
        let signal = session
            .update(now, &tick, &mut rng, &mut store)
            .expect("memory store never fails");

        let violations = check_invariants(&session, now);
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");

        if signal == Signal::Exit {
            break;
        }
    }

    assert!(store.len() <= config.max_highscores);
});
