//! Property-based tests for the match engine.
//!
//! These verify structural board properties and that engine invariants
//! hold under arbitrary tap/advance interleavings.
//! Run with: cargo test prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_possible_truncation)]

use proptest::prelude::*;
use std::collections::HashMap;

use mindmatch::autoplay::{play_session, RecallPolicy};
use mindmatch::game::{
    check_invariants, generate_board, Coord, Engine, Face, GameConfig, ManualClock,
};
use mindmatch::palette::Palette;

/// One scripted input to throw at an engine.
#[derive(Debug, Clone, Copy)]
enum Op {
    Tap { row: u16, col: u16 },
    Advance { ms: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        // Mostly in-bounds taps, some wild ones
        (0u16..6, 0u16..6).prop_map(|(row, col)| Op::Tap { row, col }),
        (0u64..4000).prop_map(|ms| Op::Advance { ms }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every board is a valid multiset: each art face twice, traps exact.
    #[test]
    fn prop_board_multiset(seed in any::<u64>(), trap_count in 0u16..3) {
        let config = GameConfig {
            // 4x4 with 1 trap leaves 15 face cells: skip unpairable combos
            trap_count: if trap_count == 1 { 0 } else { trap_count },
            ..GameConfig::default()
        };
        let board = generate_board(seed, &config, &Palette::builtin()).unwrap();

        let mut counts: HashMap<u16, u32> = HashMap::new();
        let mut traps = 0u16;
        for tile in board.tiles() {
            match tile.face {
                Face::Art(id) => *counts.entry(id).or_insert(0) += 1,
                Face::Trap => traps += 1,
            }
        }

        prop_assert_eq!(traps, config.trap_count);
        for (_, &count) in &counts {
            prop_assert_eq!(count, 2);
        }
        prop_assert_eq!(
            counts.len() as u32 * 2 + u32::from(traps),
            config.cells()
        );
    }

    /// Board generation is a pure function of the seed.
    #[test]
    fn prop_generation_deterministic(seed in any::<u64>()) {
        let config = GameConfig::default();
        let a = generate_board(seed, &config, &Palette::builtin()).unwrap();
        let b = generate_board(seed, &config, &Palette::builtin()).unwrap();
        for (ta, tb) in a.tiles().iter().zip(b.tiles()) {
            prop_assert_eq!(ta.face, tb.face);
        }
    }

    /// Arbitrary tap/advance interleavings never violate engine invariants.
    #[test]
    fn prop_invariants_hold_under_arbitrary_input(
        seed in any::<u64>(),
        trapless in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 1..200)
    ) {
        let config = GameConfig {
            trap_count: if trapless { 0 } else { 2 },
            ..GameConfig::default()
        };
        let mut engine =
            Engine::new(config, Palette::builtin(), seed, ManualClock::new()).unwrap();

        for op in ops {
            match op {
                Op::Tap { row, col } => engine.handle_tap(Coord::new(row, col)),
                Op::Advance { ms } => engine.clock_mut().advance(ms),
            }
            engine.tick();

            let violations = check_invariants(&engine);
            prop_assert!(violations.is_empty(), "violations: {:?}", violations);
        }
    }

    /// The mismatch delay is honored for any configured threshold.
    #[test]
    fn prop_mismatch_delay_honored(seed in any::<u64>(), delay in 1u64..5000) {
        let config = GameConfig {
            trap_count: 0,
            mismatch_delay_ms: delay,
            ..GameConfig::default()
        };
        let mut engine =
            Engine::new(config, Palette::builtin(), seed, ManualClock::new()).unwrap();

        // Find two differing faces
        let tiles: Vec<(Coord, Face)> = engine
            .board()
            .iter()
            .map(|(c, t)| (c, t.face))
            .collect();
        let (a, _) = tiles[0];
        let (b, _) = tiles
            .iter()
            .copied()
            .find(|&(_, face)| face != tiles[0].1)
            .unwrap();

        engine.handle_tap(a);
        engine.handle_tap(b);
        engine.tick();
        prop_assert!(engine.mismatch_pending());

        // Still visible at exactly the threshold
        engine.clock_mut().advance(delay);
        engine.tick();
        prop_assert!(engine.face_up(a));

        // Hidden strictly after it
        engine.clock_mut().advance(1);
        engine.tick();
        prop_assert!(!engine.face_up(a));
        prop_assert!(!engine.face_up(b));
    }

    /// Matched tiles never revert, whatever happens afterwards.
    #[test]
    fn prop_matched_is_terminal(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..100)
    ) {
        let config = GameConfig { trap_count: 0, ..GameConfig::default() };
        let mut engine =
            Engine::new(config, Palette::builtin(), seed, ManualClock::new()).unwrap();

        // Match one pair first
        let tiles: Vec<(Coord, Face)> = engine
            .board()
            .iter()
            .map(|(c, t)| (c, t.face))
            .collect();
        let (a, face_a) = tiles[0];
        let (b, _) = tiles
            .iter()
            .copied()
            .skip(1)
            .find(|&(_, face)| face == face_a)
            .unwrap();
        engine.handle_tap(a);
        engine.handle_tap(b);
        engine.tick();
        prop_assert!(engine.board().get(a).unwrap().matched);

        for op in ops {
            match op {
                Op::Tap { row, col } => engine.handle_tap(Coord::new(row, col)),
                Op::Advance { ms } => engine.clock_mut().advance(ms),
            }
            engine.tick();
            prop_assert!(engine.board().get(a).unwrap().matched);
            prop_assert!(engine.board().get(b).unwrap().matched);
        }
    }
}

proptest! {
    // Full sessions are slower; fewer cases
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Perfect memory always wins a trapless default board within a
    /// generous tap budget.
    #[test]
    fn prop_recall_always_wins_trapless(seed in any::<u64>()) {
        let config = GameConfig { trap_count: 0, ..GameConfig::default() };
        let mut engine =
            Engine::new(config, Palette::builtin(), seed, ManualClock::new()).unwrap();
        let mut policy = RecallPolicy::new();

        let report = play_session(&mut engine, &mut policy, 64);
        prop_assert!(report.won);
        prop_assert_eq!(report.matches, 8);
    }
}
