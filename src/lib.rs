// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Mind Match: a deterministic card-matching memory game.
//!
//! This crate provides a tile-matching engine designed for:
//! - Bit-exact deterministic sessions (seed + taps reproduce everything)
//! - Timer-driven transitions against an injectable clock
//! - Headless autoplay and replay without a frontend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     TUI / Autoplay / Replay         │
//! ├─────────────────────────────────────┤
//! │        Match Engine                 │
//! ├─────────────────────────────────────┤
//! │    Board Generator + Palette        │
//! └─────────────────────────────────────┘
//! ```

pub mod autoplay;
pub mod error;
pub mod game;
pub mod palette;
pub mod replay;

pub use error::SetupError;

// Re-export key game types at crate root for convenience
pub use game::{Board, Coord, Cue, Engine, Face, GameConfig, ManualClock, Phase, SystemClock, Tile};
pub use palette::Palette;
