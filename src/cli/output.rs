//! Output formatting utilities for CLI.

use mindmatch::autoplay::SessionReport;
use serde::Serialize;

/// Format a session report as human-readable text.
pub(super) fn format_text(report: &SessionReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Session Result (seed: {})\n", report.seed));
    if report.won {
        output.push_str(&format!("  Outcome: won in {}s\n", report.elapsed_secs));
    } else {
        output.push_str("  Outcome: unfinished\n");
    }
    output.push_str(&format!("  Taps: {}\n", report.taps));
    output.push_str(&format!("  Flips: {}\n", report.flips));
    output.push_str(&format!(
        "  Matches: {} ({} mismatches)\n",
        report.matches, report.mismatches
    ));
    output.push_str(&format!(
        "  Trap resets: {} ({} rounds)\n",
        report.trap_resets, report.rounds
    ));
    output.push_str(&format!("  Simulated time: {}ms\n", report.sim_ms));

    output
}

/// Aggregated statistics over many stress sessions.
#[derive(Debug, Default)]
pub(super) struct StressStats {
    /// Sessions completed.
    pub(super) sessions: u64,
    /// Sessions that ended in a win.
    pub(super) wins: u64,
    /// Total taps across all sessions.
    total_taps: u64,
    /// Tap sum of squares for std dev calculation.
    tap_sq_sum: f64,
    /// Total matches across all sessions.
    total_matches: u64,
    /// Total mismatches across all sessions.
    total_mismatches: u64,
    /// Total trap resets across all sessions.
    total_trap_resets: u64,
    /// Total simulated milliseconds.
    total_sim_ms: u64,
}

impl StressStats {
    /// Create empty stats.
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Add one session report to the stats.
    pub(super) fn add_report(&mut self, report: &SessionReport) {
        self.sessions += 1;
        if report.won {
            self.wins += 1;
        }
        self.total_taps += u64::from(report.taps);
        self.tap_sq_sum += f64::from(report.taps) * f64::from(report.taps);
        self.total_matches += u64::from(report.matches);
        self.total_mismatches += u64::from(report.mismatches);
        self.total_trap_resets += u64::from(report.trap_resets);
        self.total_sim_ms += report.sim_ms;
    }

    /// Merge another accumulator into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.sessions += other.sessions;
        self.wins += other.wins;
        self.total_taps += other.total_taps;
        self.tap_sq_sum += other.tap_sq_sum;
        self.total_matches += other.total_matches;
        self.total_mismatches += other.total_mismatches;
        self.total_trap_resets += other.total_trap_resets;
        self.total_sim_ms += other.total_sim_ms;
    }

    /// Win rate over all sessions (0.0-1.0).
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn win_rate(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.wins as f64 / self.sessions as f64
    }

    /// Average taps per session.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_taps(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.total_taps as f64 / self.sessions as f64
    }

    /// Tap count standard deviation.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn tap_std_dev(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        let n = self.sessions as f64;
        let mean = self.avg_taps();
        let variance = (self.tap_sq_sum / n) - (mean * mean);
        if variance < 0.0 {
            0.0
        } else {
            variance.sqrt()
        }
    }

    /// Average mismatches per session.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_mismatches(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.total_mismatches as f64 / self.sessions as f64
    }

    /// Average trap resets per session.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_trap_resets(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.total_trap_resets as f64 / self.sessions as f64
    }

    /// Average simulated session length in milliseconds.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_sim_ms(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.total_sim_ms as f64 / self.sessions as f64
    }

    /// Total matches across all sessions.
    pub(super) const fn total_matches(&self) -> u64 {
        self.total_matches
    }
}

/// JSON-serializable stress result.
#[derive(Debug, Serialize)]
pub(super) struct JsonStressResult {
    /// Sessions completed.
    sessions: u64,
    /// Sessions won.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average taps per session.
    avg_taps: f64,
    /// Tap standard deviation.
    tap_std_dev: f64,
    /// Average mismatches per session.
    avg_mismatches: f64,
    /// Average trap resets per session.
    avg_trap_resets: f64,
    /// Average simulated milliseconds per session.
    avg_sim_ms: f64,
}

impl JsonStressResult {
    /// Create from accumulated stats.
    pub(super) fn from_stats(stats: &StressStats) -> Self {
        Self {
            sessions: stats.sessions,
            wins: stats.wins,
            win_rate: stats.win_rate(),
            avg_taps: stats.avg_taps(),
            tap_std_dev: stats.tap_std_dev(),
            avg_mismatches: stats.avg_mismatches(),
            avg_trap_resets: stats.avg_trap_resets(),
            avg_sim_ms: stats.avg_sim_ms(),
        }
    }
}

/// Format stress stats as human-readable text.
pub(super) fn format_stress_text(stats: &StressStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Stress Results ({} sessions)\n", stats.sessions));
    output.push_str("========================================\n\n");

    output.push_str(&format!(
        "  Wins: {} ({:.1}%)\n",
        stats.wins,
        stats.win_rate() * 100.0
    ));
    output.push_str(&format!(
        "  Taps: {:.1} avg (+/- {:.1})\n",
        stats.avg_taps(),
        stats.tap_std_dev()
    ));
    output.push_str(&format!(
        "  Mismatches: {:.1} avg\n",
        stats.avg_mismatches()
    ));
    output.push_str(&format!(
        "  Trap resets: {:.1} avg\n",
        stats.avg_trap_resets()
    ));
    output.push_str(&format!("  Matches total: {}\n", stats.total_matches()));
    output.push_str(&format!(
        "  Simulated length: {:.0}ms avg\n",
        stats.avg_sim_ms()
    ));

    output
}

/// Format stress stats as CSV.
pub(super) fn format_stress_csv(stats: &StressStats) -> String {
    let mut output = String::new();

    // Header
    output.push_str(
        "sessions,wins,win_rate,avg_taps,tap_std_dev,avg_mismatches,avg_trap_resets,avg_sim_ms\n",
    );

    output.push_str(&format!(
        "{},{},{:.4},{:.2},{:.2},{:.2},{:.2},{:.0}\n",
        stats.sessions,
        stats.wins,
        stats.win_rate(),
        stats.avg_taps(),
        stats.tap_std_dev(),
        stats.avg_mismatches(),
        stats.avg_trap_resets(),
        stats.avg_sim_ms()
    ));

    output
}
