//! Game configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a game session.
///
/// Grid size and timing thresholds are fixed for the lifetime of an engine;
/// they are never renegotiated mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Tiles per side of the square grid.
    pub grid_size: u16,
    /// Number of trap tiles on the board (0 disables the trap variant).
    pub trap_count: u16,
    /// Duration of the trap preview window at round start, in milliseconds.
    ///
    /// Inert when `trap_count` is zero.
    pub preview_ms: u64,
    /// How long a mismatched pair stays visible before flipping back, in
    /// milliseconds.
    pub mismatch_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            trap_count: 2,
            preview_ms: 3000,
            mismatch_delay_ms: 500,
        }
    }
}

impl GameConfig {
    /// Total number of tiles on the board.
    #[must_use]
    pub const fn cells(&self) -> u32 {
        (self.grid_size as u32) * (self.grid_size as u32)
    }

    /// Number of matching pairs the player must find to win.
    #[must_use]
    pub const fn pair_target(&self) -> u32 {
        (self.cells() - self.trap_count as u32) / 2
    }

    /// Number of distinct face assets the palette must supply.
    #[must_use]
    pub const fn required_faces(&self) -> usize {
        self.pair_target() as usize
    }

    /// Check that the grid/trap combination is pairable.
    ///
    /// Valid means: a non-empty grid, traps fit on the board, and the
    /// remaining non-trap cells form a positive, even number.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        if self.grid_size == 0 {
            return false;
        }
        let cells = self.cells();
        let traps = self.trap_count as u32;
        if traps >= cells {
            return false;
        }
        let pairable = cells - traps;
        pairable % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.is_valid());
        assert_eq!(config.cells(), 16);
        assert_eq!(config.pair_target(), 7);
        assert_eq!(config.required_faces(), 7);
    }

    #[test]
    fn test_trapless_grid() {
        let config = GameConfig {
            trap_count: 0,
            ..GameConfig::default()
        };
        assert!(config.is_valid());
        assert_eq!(config.pair_target(), 8);
    }

    #[test]
    fn test_zero_grid_invalid() {
        let config = GameConfig {
            grid_size: 0,
            ..GameConfig::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_odd_remainder_invalid() {
        // 3x3 = 9 cells, 2 traps leaves 7 cells: unpairable
        let config = GameConfig {
            grid_size: 3,
            trap_count: 2,
            ..GameConfig::default()
        };
        assert!(!config.is_valid());

        // 3x3 with 1 trap leaves 8 cells: fine
        let config = GameConfig {
            grid_size: 3,
            trap_count: 1,
            ..GameConfig::default()
        };
        assert!(config.is_valid());
    }

    #[test]
    fn test_all_traps_invalid() {
        let config = GameConfig {
            grid_size: 2,
            trap_count: 4,
            ..GameConfig::default()
        };
        assert!(!config.is_valid());
    }
}
