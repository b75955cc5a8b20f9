#![no_main]

//! Tap stream fuzzer.
//!
//! Feeds an arbitrary interleaving of taps and clock advances into an
//! engine and checks every invariant after every tick. All engine
//! operations are supposed to be total: whatever the input, nothing may
//! panic and no invariant may break.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mindmatch::game::{check_invariants, Coord, Engine, GameConfig, ManualClock};
use mindmatch::palette::Palette;

/// A fuzzer-generated input event.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzOp {
    /// Tap a coordinate (possibly out of bounds).
    Tap { row: u16, col: u16 },
    /// Advance the clock.
    Advance { ms: u16 },
    /// Restart the session externally.
    Reset,
}

/// Structured input for tap fuzzing.
#[derive(Arbitrary, Debug)]
struct TapInput {
    /// Board seed.
    seed: u64,
    /// Grid side length (clamped to a sane range below).
    grid_size: u8,
    /// Trap count (clamped below).
    traps: u8,
    /// Input events to apply in order.
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: TapInput| {
    let config = GameConfig {
        grid_size: u16::from(input.grid_size % 6) + 1,
        trap_count: u16::from(input.traps % 3),
        ..GameConfig::default()
    };

    // Unpairable combos are rejected at setup; that is a valid outcome,
    // not a crash
    let Ok(mut engine) = Engine::new(
        config,
        Palette::builtin(),
        input.seed,
        ManualClock::new(),
    ) else {
        return;
    };

    for op in input.ops {
        match op {
            FuzzOp::Tap { row, col } => engine.handle_tap(Coord::new(row, col)),
            FuzzOp::Advance { ms } => engine.clock_mut().advance(u64::from(ms)),
            FuzzOp::Reset => engine.reset(),
        }
        engine.tick();

        let violations = check_invariants(&engine);
        assert!(violations.is_empty(), "violations: {violations:?}");
    }
});
