//! Stress command implementation - mass parallel sessions.

use super::output::{format_stress_csv, format_stress_text, JsonStressResult, StressStats};
use super::{CliError, PolicyKind, StressFormat};
use indicatif::{ProgressBar, ProgressStyle};
use mindmatch::autoplay::{play_session, RandomPolicy, RecallPolicy, TapPolicy};
use mindmatch::game::{Engine, GameConfig, ManualClock};
use mindmatch::palette::Palette;
use rayon::prelude::*;
use std::time::Instant;

/// Execute the stress command.
///
/// # Errors
///
/// Returns an error if the configuration cannot build a session.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    sessions: u64,
    seed: Option<u64>,
    grid_size: u16,
    traps: u16,
    policy: PolicyKind,
    max_taps: u32,
    threads: Option<usize>,
    format: StressFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = GameConfig {
        grid_size,
        trap_count: traps,
        ..GameConfig::default()
    };

    // Validate once up front so a bad config fails loudly instead of
    // producing zero-session stats
    drop(Engine::new(
        config,
        Palette::builtin(),
        0,
        ManualClock::new(),
    )?);

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Base seed
    let base_seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| {
                #[allow(clippy::cast_possible_truncation)]
                let nanos = d.as_nanos() as u64;
                nanos
            })
            .unwrap_or(42)
    });

    // Progress bar
    let pb = if progress {
        let pb = ProgressBar::new(sessions);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sessions ({per_sec})")
                .expect("valid template")
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Run sessions in parallel using lock-free fold/reduce pattern
    // Each thread accumulates into its own StressStats, then we merge at the end
    let stats = (0..sessions)
        .into_par_iter()
        .fold(StressStats::new, |mut local_stats, i| {
            let session_seed = base_seed.wrapping_add(i);

            if let Ok(mut engine) = Engine::new(
                config,
                Palette::builtin(),
                session_seed,
                ManualClock::new(),
            ) {
                let mut policy: Box<dyn TapPolicy> = match policy {
                    PolicyKind::Recall => Box::new(RecallPolicy::new()),
                    PolicyKind::Random => {
                        Box::new(RandomPolicy::new(session_seed ^ 0x9E37_79B9_7F4A_7C15))
                    }
                };
                let report = play_session(&mut engine, policy.as_mut(), max_taps);
                local_stats.add_report(&report);
            }

            local_stats
        })
        .reduce(StressStats::new, |mut a, b| {
            a.merge(&b);
            a
        });

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(stats.sessions);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    // Calculate sessions per second
    #[allow(clippy::cast_precision_loss)]
    let sessions_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.sessions as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    // Output based on format
    match format {
        StressFormat::Text => {
            println!();
            print!("{}", format_stress_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} sessions/sec)",
                duration.as_secs_f64(),
                sessions_per_sec
            );
        }
        StressFormat::Json => {
            let json_result = JsonStressResult::from_stats(&stats);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        StressFormat::Csv => {
            print!("{}", format_stress_csv(&stats));
        }
    }

    Ok(())
}
