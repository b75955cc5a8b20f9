//! Mind Match CLI - play, simulate, and replay card-matching sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Mind Match - a deterministic card-matching game
#[derive(Parser, Debug)]
#[command(name = "mindmatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an interactive session in the terminal
    Play {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Grid side length (default: 4)
        #[arg(short, long, default_value = "4")]
        grid_size: u16,

        /// Number of bomb tiles (default: 2, 0 disables)
        #[arg(short, long, default_value = "2")]
        traps: u16,

        /// Load faces from an image directory instead of the builtin set
        #[arg(long)]
        palette: Option<std::path::PathBuf>,

        /// Save a tap recording to file
        #[arg(long)]
        save: Option<std::path::PathBuf>,
    },

    /// Run a headless session with an autoplay policy
    Simulate {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Grid side length (default: 4)
        #[arg(short, long, default_value = "4")]
        grid_size: u16,

        /// Number of bomb tiles (default: 2, 0 disables)
        #[arg(short, long, default_value = "2")]
        traps: u16,

        /// Autoplay policy: recall or random
        #[arg(short, long, default_value = "recall")]
        policy: cli::PolicyKind,

        /// Tap cap before the session is abandoned
        #[arg(short, long, default_value = "500")]
        max_taps: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Replay a recorded session
    Replay {
        /// Recording file
        #[arg(required = true)]
        recording: std::path::PathBuf,

        /// Output format: tui or text
        #[arg(short, long, default_value = "tui")]
        format: cli::ReplayFormat,

        /// Start positioned after this many taps
        #[arg(long)]
        tap: Option<usize>,
    },

    /// Run mass parallel sessions and aggregate statistics
    Stress {
        /// Number of sessions to run (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        sessions: u64,

        /// Starting seed (increments for each session)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Grid side length (default: 4)
        #[arg(short, long, default_value = "4")]
        grid_size: u16,

        /// Number of bomb tiles (default: 2, 0 disables)
        #[arg(short, long, default_value = "2")]
        traps: u16,

        /// Autoplay policy: recall or random
        #[arg(short, long, default_value = "random")]
        policy: cli::PolicyKind,

        /// Tap cap per session
        #[arg(short, long, default_value = "500")]
        max_taps: u32,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::StressFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Validate a face-image directory against a configuration
    Validate {
        /// Directory of face images
        #[arg(required = true)]
        dir: std::path::PathBuf,

        /// Grid side length (default: 4)
        #[arg(short, long, default_value = "4")]
        grid_size: u16,

        /// Number of bomb tiles (default: 2, 0 disables)
        #[arg(short, long, default_value = "2")]
        traps: u16,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            seed,
            grid_size,
            traps,
            palette,
            save,
        } => cli::play::execute(seed, grid_size, traps, palette, save),

        Commands::Simulate {
            seed,
            grid_size,
            traps,
            policy,
            max_taps,
            format,
        } => cli::simulate::execute(seed, grid_size, traps, policy, max_taps, format),

        Commands::Replay {
            recording,
            format,
            tap,
        } => cli::replay::execute(recording, format, tap),

        Commands::Stress {
            sessions,
            seed,
            grid_size,
            traps,
            policy,
            max_taps,
            threads,
            format,
            progress,
        } => cli::stress::execute(
            sessions, seed, grid_size, traps, policy, max_taps, threads, format, progress,
        ),

        Commands::Validate {
            dir,
            grid_size,
            traps,
        } => cli::validate::execute(dir, grid_size, traps),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
