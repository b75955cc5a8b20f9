//! Game layer for Mind Match.
//!
//! Implements the card-matching rules:
//! - Board with shuffled face-down tiles (animal faces, optional traps)
//! - Match engine state machine (reveal, compare, resolve, reset)
//! - Mismatch delay and trap-preview timers against an injectable clock
//! - Invariant checks used by tests and the fuzzer

mod board;
mod clock;
mod config;
mod engine;
mod invariants;

pub(crate) use board::Rng;
pub use board::{generate_board, Board, Coord, Face, FaceId, Tile};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GameConfig;
pub use engine::{Cue, Engine, Note, Phase};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
