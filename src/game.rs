//! Game layer for the slot machine.
//!
//! - Symbols and their prizes
//! - The reel bank (spin timing, nudge, hold, win check)
//! - The player's bankroll
//! - The session state machine that ties them together
//! - Invariant checks used by the fuzzer and property tests

mod bankroll;
mod invariants;
mod reels;
mod session;
mod symbol;

pub use bankroll::Bankroll;
pub use invariants::{InvariantViolation, check_invariants};
pub use reels::{REEL_COUNT, Reel, ReelBank, ReelView};
pub use session::{Input, Key, Mode, ModeKind, Session, SessionStats, SessionView, Signal};
pub use symbol::Symbol;
