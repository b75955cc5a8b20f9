//! Engine invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented engine. If they
//! do, it indicates a bug in the state machine, not bad player input:
//! every tap is a defined no-op or transition.

use crate::game::{Clock, Engine, Face};
use std::collections::HashMap;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all engine invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants<C: Clock>(engine: &Engine<C>) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let config = engine.config();
    let board = engine.board();

    // Grid shape
    let expected_cells = config.cells() as usize;
    if board.tiles().len() != expected_cells {
        violations.push(InvariantViolation {
            message: format!(
                "Board has {} tiles, expected {expected_cells}",
                board.tiles().len()
            ),
        });
    }

    // Face multiset: every art face exactly twice, traps exactly trap_count
    let mut face_counts: HashMap<u16, u32> = HashMap::new();
    let mut trap_count = 0u32;
    for tile in board.tiles() {
        match tile.face {
            Face::Art(id) => *face_counts.entry(id).or_insert(0) += 1,
            Face::Trap => trap_count += 1,
        }
    }
    for (&id, &count) in &face_counts {
        if count != 2 {
            violations.push(InvariantViolation {
                message: format!("Face {id} appears {count} times, expected 2"),
            });
        }
    }
    if trap_count != u32::from(config.trap_count) {
        violations.push(InvariantViolation {
            message: format!(
                "Board has {trap_count} traps, expected {}",
                config.trap_count
            ),
        });
    }

    // Matched is terminal and implies revealed
    for (coord, tile) in board.iter() {
        if tile.matched && !tile.revealed {
            violations.push(InvariantViolation {
                message: format!("Matched tile at {coord:?} is not revealed"),
            });
        }
        if tile.matched && tile.face.is_trap() {
            violations.push(InvariantViolation {
                message: format!("Trap tile at {coord:?} is marked matched"),
            });
        }
    }

    // Selection holds at most two distinct, revealed, unmatched tiles
    let selection = engine.selection();
    if selection.len() > 2 {
        violations.push(InvariantViolation {
            message: format!("Selection holds {} tiles, maximum is 2", selection.len()),
        });
    }
    if selection.len() == 2 && selection[0] == selection[1] {
        violations.push(InvariantViolation {
            message: format!("Selection holds {:?} twice", selection[0]),
        });
    }
    for &coord in selection {
        match board.get(coord) {
            Some(tile) if tile.matched => violations.push(InvariantViolation {
                message: format!("Selected tile at {coord:?} is already matched"),
            }),
            Some(tile) if !tile.revealed => violations.push(InvariantViolation {
                message: format!("Selected tile at {coord:?} is not revealed"),
            }),
            Some(_) => {}
            None => violations.push(InvariantViolation {
                message: format!("Selection references out-of-bounds {coord:?}"),
            }),
        }
    }

    // Pair accounting
    if board.matched_count() != engine.matched_pairs() * 2 {
        violations.push(InvariantViolation {
            message: format!(
                "{} matched tiles on board but {} pairs counted",
                board.matched_count(),
                engine.matched_pairs()
            ),
        });
    }
    if engine.matched_pairs() > engine.pair_target() {
        violations.push(InvariantViolation {
            message: format!(
                "Matched pairs {} exceeds target {}",
                engine.matched_pairs(),
                engine.pair_target()
            ),
        });
    }

    // Won iff all pairs found
    if engine.is_won() && engine.matched_pairs() != engine.pair_target() {
        violations.push(InvariantViolation {
            message: format!(
                "Session won with {}/{} pairs",
                engine.matched_pairs(),
                engine.pair_target()
            ),
        });
    }

    // A pending mismatch always refers to a full selection
    if engine.mismatch_pending() && selection.len() != 2 {
        violations.push(InvariantViolation {
            message: format!(
                "Mismatch pending with selection of {} tiles",
                selection.len()
            ),
        });
    }

    violations
}

/// Assert all engine invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with a detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants<C: Clock>(engine: &Engine<C>) {
    let violations = check_invariants(engine);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Engine invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants<C: Clock>(_engine: &Engine<C>) {}
