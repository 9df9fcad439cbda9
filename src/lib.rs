// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Slots: a five-reel fruit machine session engine.
//!
//! This crate provides the game logic of a classic fruit machine:
//! - Staggered, clock-driven reel spins with nudge and hold re-spins
//! - A bankroll ledger and a turn-based session state machine
//! - A persistent high-score ledger keyed by player name
//!
//! Rendering, audio and input polling live outside the core. A front end
//! feeds [`Input`] events and elapsed time into a [`Session`] and draws the
//! [`SessionView`] snapshots it hands back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Front end (TUI / simulation)      │
//! ├─────────────────────────────────────┤
//! │   Session state machine │ Scores    │
//! ├─────────────────────────────────────┤
//! │   Reel bank │ Bankroll │ Paytable   │
//! ├─────────────────────────────────────┤
//! │   Clock  │  Random source           │
//! └─────────────────────────────────────┘
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod rng;
pub mod scores;
pub mod sim;

pub use clock::GameClock;
pub use config::{ConfigError, GameConfig};
pub use error::{SlotsError, SlotsResult};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};

// Re-export key game types at crate root for convenience
pub use game::{
    Bankroll, Input, Key, Mode, ModeKind, REEL_COUNT, Reel, ReelBank, ReelView, Session,
    SessionStats, SessionView, Signal, Symbol,
};
pub use scores::{
    HighScoreRecord, HighScoreStore, JsonFileStore, MemoryStore, ReconcileOutcome, RecordId,
    SortOrder, StoreError, Visit,
};
