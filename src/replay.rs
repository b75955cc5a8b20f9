//! Session recording and replay.
//!
//! Because sessions are 100% deterministic, a recording is only:
//! - `seed: u64` - the base seed for board generation
//! - `config: GameConfig` - grid, traps, and timing thresholds
//! - `taps: Vec<TapRecord>` - every tap with its timestamp
//!
//! No state deltas needed. To view tap N, re-run the session from tap 0
//! to N with a manual clock set to the recorded timestamps.
//!
//! # Time Travel
//!
//! - **Forward**: apply the next recorded tap
//! - **Backward**: re-run from tap 0 to (`cursor` - 1)
//! - **Jump to tap N**: re-run from tap 0 to N

mod text;

pub use text::{render_board, render_timeline};

use crate::error::SetupError;
use crate::game::{Coord, Engine, GameConfig, ManualClock};
use crate::palette::Palette;
use std::fs::File;
use std::io::{self, Read as IoRead, Write as IoWrite};
use std::path::Path;

/// One recorded tap: when it happened and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapRecord {
    /// Milliseconds since session start.
    pub at_ms: u64,
    /// Board coordinate that was tapped.
    pub coord: Coord,
}

/// Minimal recording - seed, config, and timestamped taps.
///
/// Because the engine is deterministic, this is all we need to replay.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Base seed for board generation.
    pub seed: u64,
    /// Session configuration.
    pub config: GameConfig,
    /// Every tap in arrival order.
    pub taps: Vec<TapRecord>,
}

impl Recording {
    /// Create an empty recording for a session about to be played.
    #[must_use]
    pub const fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            seed,
            config,
            taps: Vec::new(),
        }
    }

    /// Append a tap.
    pub fn push(&mut self, at_ms: u64, coord: Coord) {
        self.taps.push(TapRecord { at_ms, coord });
    }

    /// Save the recording to a file.
    ///
    /// Format: simple little-endian binary:
    /// - 8 bytes: seed
    /// - 2 bytes: `grid_size`
    /// - 2 bytes: `trap_count`
    /// - 8 bytes: `preview_ms`
    /// - 8 bytes: `mismatch_delay_ms`
    /// - 4 bytes: tap count (u32)
    /// - For each tap: 8 bytes `at_ms`, 2 bytes row, 2 bytes col
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut file = File::create(path)?;

        file.write_all(&self.seed.to_le_bytes())?;
        file.write_all(&self.config.grid_size.to_le_bytes())?;
        file.write_all(&self.config.trap_count.to_le_bytes())?;
        file.write_all(&self.config.preview_ms.to_le_bytes())?;
        file.write_all(&self.config.mismatch_delay_ms.to_le_bytes())?;

        #[allow(clippy::cast_possible_truncation)]
        let num_taps = self.taps.len() as u32;
        file.write_all(&num_taps.to_le_bytes())?;

        for tap in &self.taps {
            file.write_all(&tap.at_ms.to_le_bytes())?;
            file.write_all(&tap.coord.row.to_le_bytes())?;
            file.write_all(&tap.coord.col.to_le_bytes())?;
        }

        Ok(())
    }

    /// Load a recording from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail or the file is truncated.
    pub fn load(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;

        let mut u16_bytes = [0u8; 2];
        let mut u32_bytes = [0u8; 4];
        let mut u64_bytes = [0u8; 8];

        file.read_exact(&mut u64_bytes)?;
        let seed = u64::from_le_bytes(u64_bytes);

        file.read_exact(&mut u16_bytes)?;
        let grid_size = u16::from_le_bytes(u16_bytes);

        file.read_exact(&mut u16_bytes)?;
        let trap_count = u16::from_le_bytes(u16_bytes);

        file.read_exact(&mut u64_bytes)?;
        let preview_ms = u64::from_le_bytes(u64_bytes);

        file.read_exact(&mut u64_bytes)?;
        let mismatch_delay_ms = u64::from_le_bytes(u64_bytes);

        file.read_exact(&mut u32_bytes)?;
        let num_taps = u32::from_le_bytes(u32_bytes) as usize;

        let mut taps = Vec::with_capacity(num_taps);
        for _ in 0..num_taps {
            file.read_exact(&mut u64_bytes)?;
            let at_ms = u64::from_le_bytes(u64_bytes);
            file.read_exact(&mut u16_bytes)?;
            let row = u16::from_le_bytes(u16_bytes);
            file.read_exact(&mut u16_bytes)?;
            let col = u16::from_le_bytes(u16_bytes);
            taps.push(TapRecord {
                at_ms,
                coord: Coord::new(row, col),
            });
        }

        let config = GameConfig {
            grid_size,
            trap_count,
            preview_ms,
            mismatch_delay_ms,
        };

        Ok(Self { seed, config, taps })
    }
}

/// Error type for replay operations.
#[derive(Debug)]
pub enum ReplayError {
    /// File read or write failed (truncated files surface here too).
    Io(io::Error),
    /// The recorded configuration cannot build an engine.
    Setup(SetupError),
    /// Tap index out of bounds.
    TapOutOfBounds {
        /// Requested tap index.
        requested: usize,
        /// Number of taps in the recording.
        max: usize,
    },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Recording I/O failed: {e}"),
            Self::Setup(e) => write!(f, "Recorded config is invalid: {e}"),
            Self::TapOutOfBounds { requested, max } => {
                write!(f, "Tap {requested} out of bounds (recording has {max})")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<SetupError> for ReplayError {
    fn from(e: SetupError) -> Self {
        Self::Setup(e)
    }
}

/// Replay engine - steps through a recorded session deterministically.
///
/// Since sessions are deterministic, this engine can:
/// - Step forward by applying the next recorded tap
/// - Step backward by replaying from tap 0
/// - Jump to any tap by replaying from tap 0
#[derive(Debug)]
pub struct ReplayEngine {
    /// The recording being replayed.
    recording: Recording,
    /// The re-simulated session.
    engine: Engine<ManualClock>,
    /// Index of the next tap to apply.
    cursor: usize,
}

impl ReplayEngine {
    /// Create a replay engine positioned before the first tap.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded configuration is invalid.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        Self::new_at(recording, 0)
    }

    /// Create a replay engine positioned after `target` taps.
    ///
    /// This replays from tap 0 to the target tap.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or `target`
    /// exceeds the recording length.
    pub fn new_at(recording: Recording, target: usize) -> Result<Self, ReplayError> {
        if target > recording.taps.len() {
            return Err(ReplayError::TapOutOfBounds {
                requested: target,
                max: recording.taps.len(),
            });
        }

        // Recordings carry face ids, not assets; a padded palette
        // replays sessions whose directory palette is unavailable
        let engine = Engine::new(
            recording.config,
            Palette::sized(recording.config.required_faces()),
            recording.seed,
            ManualClock::new(),
        )?;

        let mut replay = Self {
            recording,
            engine,
            cursor: 0,
        };
        for _ in 0..target {
            replay.apply_next();
        }
        Ok(replay)
    }

    /// The recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// The underlying session engine.
    #[must_use]
    pub const fn engine(&self) -> &Engine<ManualClock> {
        &self.engine
    }

    /// Index of the next tap to apply.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether all recorded taps have been applied.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.cursor >= self.recording.taps.len()
    }

    /// Apply the next recorded tap.
    ///
    /// # Errors
    ///
    /// Returns an error if all taps have already been applied.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        if self.is_done() {
            return Err(ReplayError::TapOutOfBounds {
                requested: self.cursor,
                max: self.recording.taps.len(),
            });
        }
        self.apply_next();
        Ok(())
    }

    /// Step back one tap by replaying from tap 0.
    ///
    /// # Errors
    ///
    /// Returns an error if already at tap 0.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        if self.cursor == 0 {
            return Err(ReplayError::TapOutOfBounds {
                requested: 0,
                max: 0,
            });
        }
        let target = self.cursor - 1;
        self.goto(target)
    }

    /// Jump to a specific tap index by replaying from tap 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the tap index is out of bounds.
    pub fn goto(&mut self, target: usize) -> Result<(), ReplayError> {
        let recording = self.recording.clone();
        *self = Self::new_at(recording, target)?;
        Ok(())
    }

    /// Let pending timers (preview, mismatch delay) expire after the
    /// last applied tap, so the board settles for display.
    pub fn settle(&mut self) {
        let config = *self.engine.config();
        let skip = config.preview_ms.max(config.mismatch_delay_ms) + 1;
        self.engine.clock_mut().advance(skip);
        self.engine.tick();
    }

    /// Apply the tap at the cursor (internal, bounds already checked).
    fn apply_next(&mut self) {
        let tap = self.recording.taps[self.cursor];
        // Never move the clock backwards; recordings are monotonic but
        // a hand-edited file might not be
        let now = self.engine.now_ms().max(tap.at_ms);
        self.engine.clock_mut().set(now);
        self.engine.tick();
        self.engine.handle_tap(tap.coord);
        self.engine.tick();
        self.cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn trapless_config() -> GameConfig {
        GameConfig {
            trap_count: 0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_recording_save_load_roundtrip() {
        let mut recording = Recording::new(123_456_789, GameConfig::default());
        recording.push(3500, Coord::new(0, 0));
        recording.push(4200, Coord::new(1, 3));
        recording.push(9000, Coord::new(3, 3));

        let temp_file = NamedTempFile::new().expect("create temp file");
        recording.save(temp_file.path()).expect("save recording");

        let loaded = Recording::load(temp_file.path()).expect("load recording");

        assert_eq!(loaded.seed, recording.seed);
        assert_eq!(loaded.config, recording.config);
        assert_eq!(loaded.taps, recording.taps);
    }

    #[test]
    fn test_load_truncated_file_fails() {
        let temp_file = NamedTempFile::new().expect("create temp file");
        std::fs::write(temp_file.path(), [1, 2, 3]).expect("write");

        assert!(Recording::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_replay_reproduces_session() {
        // Play a live session with a manual clock, recording every tap
        let mut engine = Engine::new(
            trapless_config(),
            Palette::builtin(),
            42,
            ManualClock::new(),
        )
        .unwrap();
        let mut recording = Recording::new(42, trapless_config());

        let coords = [
            Coord::new(0, 0),
            Coord::new(0, 1),
            Coord::new(1, 0),
            Coord::new(2, 2),
        ];
        for (i, &coord) in coords.iter().enumerate() {
            engine.clock_mut().set(1000 * (i as u64 + 1));
            engine.tick();
            engine.handle_tap(coord);
            recording.push(engine.now_ms(), coord);
            engine.tick();
        }

        let mut replay = ReplayEngine::new(recording).unwrap();
        while !replay.is_done() {
            replay.step_forward().unwrap();
        }

        assert_eq!(replay.engine().matched_pairs(), engine.matched_pairs());
        for (live, replayed) in engine
            .board()
            .tiles()
            .iter()
            .zip(replay.engine().board().tiles())
        {
            assert_eq!(live.face, replayed.face);
            assert_eq!(live.revealed, replayed.revealed);
            assert_eq!(live.matched, replayed.matched);
        }
    }

    #[test]
    fn test_replay_accepts_configs_beyond_builtin_palette() {
        // An 8x8 trapless board needs 32 distinct faces, more than the
        // builtin palette holds; replay must still rebuild the session
        let config = GameConfig {
            grid_size: 8,
            trap_count: 0,
            ..GameConfig::default()
        };
        let mut recording = Recording::new(1, config);
        recording.push(100, Coord::new(0, 0));

        let mut replay = ReplayEngine::new(recording).unwrap();
        replay.step_forward().unwrap();
        assert_eq!(replay.cursor(), 1);
        assert!(replay.is_done());
    }

    #[test]
    fn test_step_backward_resimulates() {
        let mut recording = Recording::new(42, trapless_config());
        recording.push(100, Coord::new(0, 0));
        recording.push(200, Coord::new(0, 1));
        recording.push(900, Coord::new(1, 1));

        let mut replay = ReplayEngine::new(recording).unwrap();
        replay.step_forward().unwrap();
        replay.step_forward().unwrap();
        assert_eq!(replay.cursor(), 2);

        replay.step_backward().unwrap();
        assert_eq!(replay.cursor(), 1);

        // Exactly one tile revealed again
        let revealed = replay
            .engine()
            .board()
            .tiles()
            .iter()
            .filter(|t| t.revealed)
            .count();
        assert_eq!(revealed, 1);
    }

    #[test]
    fn test_step_backward_at_start_fails() {
        let recording = Recording::new(42, trapless_config());
        let mut replay = ReplayEngine::new(recording).unwrap();
        assert!(replay.step_backward().is_err());
    }

    #[test]
    fn test_goto_out_of_bounds_fails() {
        let recording = Recording::new(42, trapless_config());
        let mut replay = ReplayEngine::new(recording).unwrap();
        assert!(matches!(
            replay.goto(5),
            Err(ReplayError::TapOutOfBounds { requested: 5, max: 0 })
        ));
    }

    #[test]
    fn test_replay_error_display() {
        let err = ReplayError::TapOutOfBounds {
            requested: 15,
            max: 10,
        };
        assert!(format!("{err}").contains("15"));
        assert!(format!("{err}").contains("10"));
    }
}
