//! Board and tile types, plus deterministic board generation.

use crate::error::SetupError;
use crate::game::GameConfig;
use crate::palette::Palette;

/// Index of a face asset in the palette.
///
/// Two tiles carry the same `FaceId` iff they form a matching pair.
pub type FaceId = u16;

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Row index, top to bottom.
    pub row: u16,
    /// Column index, left to right.
    pub col: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// The hidden value bound to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// A palette face; appears on exactly two tiles.
    Art(FaceId),
    /// A trap; revealing it resets the whole session.
    Trap,
}

impl Face {
    /// Check whether this face is a trap.
    #[must_use]
    pub const fn is_trap(self) -> bool {
        matches!(self, Face::Trap)
    }
}

/// A single tile on the board.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    /// The hidden value under this tile.
    pub face: Face,
    /// Whether the face is currently shown.
    pub revealed: bool,
    /// Whether this tile has been matched. Terminal: never reverts.
    pub matched: bool,
}

impl Tile {
    /// Create a face-down, unmatched tile.
    #[must_use]
    pub const fn new(face: Face) -> Self {
        Self {
            face,
            revealed: false,
            matched: false,
        }
    }
}

/// The game board: a square grid of tiles in row-major order.
#[derive(Debug, Clone)]
pub struct Board {
    /// Tiles per side.
    grid_size: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Board {
    /// Get the grid size (tiles per side).
    #[must_use]
    pub const fn grid_size(&self) -> u16 {
        self.grid_size
    }

    /// Get a reference to the raw tiles slice in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Check if a coordinate is within the board bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.grid_size && coord.col < self.grid_size
    }

    /// Convert a coordinate to an index into the tiles array.
    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.row) * usize::from(self.grid_size) + usize::from(coord.col))
        } else {
            None
        }
    }

    /// Get a reference to the tile at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.coord_to_index(coord).map(|idx| &self.tiles[idx])
    }

    /// Get a mutable reference to the tile at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        self.coord_to_index(coord).map(|idx| &mut self.tiles[idx])
    }

    /// Iterate over all coordinates and tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> {
        let grid_size = usize::from(self.grid_size);
        self.tiles.iter().enumerate().map(move |(idx, tile)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx / grid_size) as u16, (idx % grid_size) as u16);
            (coord, tile)
        })
    }

    /// Count tiles that have been matched.
    #[must_use]
    pub fn matched_count(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.tiles.iter().filter(|t| t.matched).count() as u32
        }
    }

    /// Coordinates of all trap tiles.
    pub fn trap_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.iter()
            .filter(|(_, tile)| tile.face.is_trap())
            .map(|(coord, _)| coord)
    }
}

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    pub(crate) const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate next random u64.
    pub(crate) const fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate random usize in [0, max).
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn next_index(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as usize
    }
}

/// Generate a shuffled board for the given configuration and palette.
///
/// Each of the first `pair_target` palette faces appears exactly twice and
/// trap markers fill the remaining `trap_count` cells. The face multiset is
/// permuted with a seeded Fisher-Yates shuffle before assignment to
/// positions; the same seed always produces the same board.
///
/// # Errors
///
/// Returns an error if the configuration is unpairable, the palette holds
/// too few distinct faces, or traps are enabled without a trap face asset.
pub fn generate_board(
    seed: u64,
    config: &GameConfig,
    palette: &Palette,
) -> Result<Board, SetupError> {
    if !config.is_valid() {
        return Err(SetupError::InvalidGrid {
            grid_size: config.grid_size,
            trap_count: config.trap_count,
        });
    }

    let required = config.required_faces();
    if palette.face_count() < required {
        return Err(SetupError::InsufficientPalette {
            available: palette.face_count(),
            required,
        });
    }
    if config.trap_count > 0 && !palette.has_trap() {
        return Err(SetupError::MissingTrapFace);
    }

    Ok(shuffled_board(seed, config.grid_size, &build_deck(config)))
}

/// Build the unshuffled face multiset for a validated configuration:
/// each of the first `pair_target` face ids twice, then the trap markers.
pub(crate) fn build_deck(config: &GameConfig) -> Vec<Face> {
    let mut faces = Vec::with_capacity(config.cells() as usize);
    for id in 0..config.required_faces() {
        #[allow(clippy::cast_possible_truncation)]
        let id = id as FaceId;
        faces.push(Face::Art(id));
        faces.push(Face::Art(id));
    }
    for _ in 0..config.trap_count {
        faces.push(Face::Trap);
    }
    faces
}

/// Shuffle a face deck with a seeded Fisher-Yates permutation and lay it
/// out on a fresh face-down board. The shuffle is the only random step.
pub(crate) fn shuffled_board(seed: u64, grid_size: u16, deck: &[Face]) -> Board {
    let mut faces = deck.to_vec();
    let mut rng = Rng::new(seed);
    for i in (1..faces.len()).rev() {
        let j = rng.next_index(i + 1);
        faces.swap(i, j);
    }

    Board {
        grid_size,
        tiles: faces.into_iter().map(Tile::new).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn default_board(seed: u64) -> Board {
        generate_board(seed, &GameConfig::default(), &Palette::builtin()).unwrap()
    }

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = Rng::new(12345);
        let mut rng2 = Rng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = Rng::new(12345);
        let mut rng2 = Rng::new(54321);

        // Very unlikely to be equal with different seeds
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_board_has_all_cells() {
        let board = default_board(42);
        assert_eq!(board.tiles().len(), 16);
        assert_eq!(board.grid_size(), 4);
    }

    #[test]
    fn test_every_face_appears_exactly_twice() {
        let board = default_board(42);

        let mut counts: HashMap<FaceId, u32> = HashMap::new();
        let mut traps = 0;
        for tile in board.tiles() {
            match tile.face {
                Face::Art(id) => *counts.entry(id).or_insert(0) += 1,
                Face::Trap => traps += 1,
            }
        }

        assert_eq!(traps, 2);
        assert_eq!(counts.len(), 7);
        for (&id, &count) in &counts {
            assert_eq!(count, 2, "face {id} appears {count} times");
        }
    }

    #[test]
    fn test_trapless_board() {
        let config = GameConfig {
            trap_count: 0,
            ..GameConfig::default()
        };
        let board = generate_board(7, &config, &Palette::builtin()).unwrap();

        assert_eq!(board.trap_coords().count(), 0);
        let mut counts: HashMap<FaceId, u32> = HashMap::new();
        for tile in board.tiles() {
            if let Face::Art(id) = tile.face {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        assert_eq!(counts.len(), 8);
    }

    #[test]
    fn test_generation_determinism() {
        let board1 = default_board(999);
        let board2 = default_board(999);

        for (t1, t2) in board1.tiles().iter().zip(board2.tiles().iter()) {
            assert_eq!(t1.face, t2.face);
        }
    }

    #[test]
    fn test_generation_different_seeds() {
        let board1 = default_board(1);
        let board2 = default_board(2);

        let differences = board1
            .tiles()
            .iter()
            .zip(board2.tiles().iter())
            .filter(|(a, b)| a.face != b.face)
            .count();
        assert!(differences > 0);
    }

    #[test]
    fn test_all_tiles_start_face_down() {
        let board = default_board(3);
        for tile in board.tiles() {
            assert!(!tile.revealed);
            assert!(!tile.matched);
        }
    }

    #[test]
    fn test_board_bounds() {
        let board = default_board(4);
        assert!(board.in_bounds(Coord::new(0, 0)));
        assert!(board.in_bounds(Coord::new(3, 3)));
        assert!(!board.in_bounds(Coord::new(4, 0)));
        assert!(!board.in_bounds(Coord::new(0, 4)));
        assert!(board.get(Coord::new(4, 4)).is_none());
    }

    #[test]
    fn test_insufficient_palette_rejected() {
        let config = GameConfig {
            grid_size: 8,
            trap_count: 0,
            ..GameConfig::default()
        };
        // Builtin palette has fewer than the 32 faces an 8x8 grid needs
        let result = generate_board(42, &config, &Palette::builtin());
        assert!(matches!(
            result,
            Err(SetupError::InsufficientPalette { required: 32, .. })
        ));
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let config = GameConfig {
            grid_size: 3,
            trap_count: 2,
            ..GameConfig::default()
        };
        let result = generate_board(42, &config, &Palette::builtin());
        assert!(matches!(result, Err(SetupError::InvalidGrid { .. })));
    }

    #[test]
    fn test_larger_palette_uses_prefix() {
        // The builtin palette has more faces than a 4x4 grid needs; only
        // ids below the pair target may appear.
        let board = default_board(5);
        for tile in board.tiles() {
            if let Face::Art(id) = tile.face {
                assert!(u32::from(id) < GameConfig::default().pair_target());
            }
        }
    }
}
