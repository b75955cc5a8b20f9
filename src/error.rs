//! Setup error types for board and palette construction.
//!
//! All errors here are fatal at setup time. Once an engine exists, every
//! operation on it is total: bad taps are no-ops, never errors.

use std::fmt;
use std::path::PathBuf;

/// Errors that can abort engine construction.
///
/// There is no partial or degraded mode: a session either starts with a
/// valid board or never starts at all.
#[derive(Debug, Clone)]
pub enum SetupError {
    /// The palette holds fewer distinct faces than the grid requires.
    InsufficientPalette {
        /// Distinct faces available in the palette.
        available: usize,
        /// Distinct faces required for the configured grid.
        required: usize,
    },
    /// Traps are enabled but the palette has no trap face asset.
    MissingTrapFace,
    /// The grid/trap combination leaves no valid pairing.
    InvalidGrid {
        /// Configured grid size (tiles per side).
        grid_size: u16,
        /// Configured trap tile count.
        trap_count: u16,
    },
    /// A palette directory scan found no usable image files.
    EmptyPaletteDir {
        /// The directory that was scanned.
        path: PathBuf,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientPalette {
                available,
                required,
            } => {
                write!(
                    f,
                    "Not enough faces: need {required} distinct faces, have {available}"
                )
            }
            Self::MissingTrapFace => write!(f, "Trap tiles enabled but no trap face in palette"),
            Self::InvalidGrid {
                grid_size,
                trap_count,
            } => {
                write!(
                    f,
                    "Invalid grid: {grid_size}x{grid_size} with {trap_count} traps leaves no pairable tiles"
                )
            }
            Self::EmptyPaletteDir { path } => {
                write!(f, "No usable images found in {}", path.display())
            }
        }
    }
}

impl std::error::Error for SetupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_palette_display() {
        let err = SetupError::InsufficientPalette {
            available: 3,
            required: 8,
        };
        let msg = format!("{err}");
        assert!(msg.contains('3'));
        assert!(msg.contains('8'));
    }

    #[test]
    fn test_invalid_grid_display() {
        let err = SetupError::InvalidGrid {
            grid_size: 1,
            trap_count: 1,
        };
        assert!(format!("{err}").contains("1x1"));
    }

    #[test]
    fn test_missing_trap_face_display() {
        let err = SetupError::MissingTrapFace;
        assert!(format!("{err}").contains("trap"));
    }
}
