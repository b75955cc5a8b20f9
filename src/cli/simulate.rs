//! Simulate command implementation.

use super::output::format_text;
use super::{CliError, OutputFormat, PolicyKind};
use mindmatch::autoplay::{play_session, RandomPolicy, RecallPolicy, TapPolicy};
use mindmatch::game::{Engine, GameConfig, ManualClock};
use mindmatch::palette::Palette;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the configuration cannot build a session.
pub(crate) fn execute(
    seed: Option<u64>,
    grid_size: u16,
    traps: u16,
    policy: PolicyKind,
    max_taps: u32,
    format: OutputFormat,
) -> Result<(), CliError> {
    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
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

    let config = GameConfig {
        grid_size,
        trap_count: traps,
        ..GameConfig::default()
    };

    let mut engine = Engine::new(config, Palette::builtin(), seed, ManualClock::new())?;

    let mut policy: Box<dyn TapPolicy> = match policy {
        PolicyKind::Recall => Box::new(RecallPolicy::new()),
        PolicyKind::Random => Box::new(RandomPolicy::new(seed ^ 0x9E37_79B9_7F4A_7C15)),
    };

    let report = play_session(&mut engine, policy.as_mut(), max_taps);

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&report));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
