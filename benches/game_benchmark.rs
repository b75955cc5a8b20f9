//! Benchmarks for the match engine hot paths.
//!
//! Board generation, single tap handling, and full autoplayed sessions.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use mindmatch::autoplay::{play_session, RandomPolicy, RecallPolicy};
use mindmatch::game::{generate_board, Coord, Engine, GameConfig, ManualClock};
use mindmatch::palette::Palette;

fn bench_board_generation(c: &mut Criterion) {
    let config = GameConfig::default();
    let palette = Palette::builtin();

    c.bench_function("generate_board_4x4", |b| {
        b.iter(|| {
            let board = generate_board(black_box(42), black_box(&config), black_box(&palette));
            black_box(board)
        });
    });
}

fn bench_tap_and_tick(c: &mut Criterion) {
    let config = GameConfig {
        trap_count: 0,
        ..GameConfig::default()
    };

    c.bench_function("tap_pair_and_resolve", |b| {
        let mut engine = Engine::new(config, Palette::builtin(), 42, ManualClock::new())
            .expect("valid config");
        b.iter(|| {
            engine.reset();
            engine.handle_tap(black_box(Coord::new(0, 0)));
            engine.handle_tap(black_box(Coord::new(0, 1)));
            engine.tick();
            engine.clock_mut().advance(600);
            engine.tick();
            black_box(engine.matched_pairs())
        });
    });
}

fn bench_recall_session(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("recall_session_4x4", |b| {
        b.iter(|| {
            let mut engine =
                Engine::new(config, Palette::builtin(), black_box(42), ManualClock::new())
                    .expect("valid config");
            let mut policy = RecallPolicy::new();
            black_box(play_session(&mut engine, &mut policy, 200))
        });
    });
}

fn bench_random_session_batch(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("10_random_sessions", |b| {
        b.iter(|| {
            for seed in 0..10u64 {
                let mut engine =
                    Engine::new(config, Palette::builtin(), black_box(seed), ManualClock::new())
                        .expect("valid config");
                let mut policy = RandomPolicy::new(seed);
                let _ = black_box(play_session(&mut engine, &mut policy, 300));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_board_generation,
    bench_tap_and_tick,
    bench_recall_session,
    bench_random_session_batch
);
criterion_main!(benches);
