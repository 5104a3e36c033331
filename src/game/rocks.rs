//! Procedural rock placement.
//!
//! Runs once per game at setup. Rocks are placed by shuffling every
//! position and retyping a prefix, so the count is exact. No connectivity
//! guarantee is made: rocks can wall off parts of the board.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::{Cell, Grid, Position};

/// Highest allowed rock density, in percent.
pub const MAX_ROCK_DENSITY: u8 = 90;

/// Number of rocks placed for a grid of the given size and density.
#[must_use]
pub fn rock_count(width: u16, height: u16, density: u8) -> usize {
    let total = usize::from(width) * usize::from(height);
    total * usize::from(density.min(MAX_ROCK_DENSITY)) / 100
}

/// Retype `floor(width * height * density / 100)` uniformly chosen cells to rocks.
///
/// Returns the rock positions in placement order.
pub fn place_rocks<R: Rng + ?Sized>(grid: &mut Grid, density: u8, rng: &mut R) -> Vec<Position> {
    let count = rock_count(grid.width(), grid.height(), density);

    let mut positions: Vec<Position> = (0..grid.total_cells())
        .map(|idx| grid.position_of(idx))
        .collect();
    positions.shuffle(rng);
    positions.truncate(count);

    for &pos in &positions {
        grid.set(pos, Cell::rock());
    }

    tracing::debug!(count, density, "placed rocks");
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CellType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rock_count_floor() {
        assert_eq!(rock_count(8, 8, 0), 0);
        assert_eq!(rock_count(8, 8, 10), 6);
        assert_eq!(rock_count(10, 10, 15), 15);
        assert_eq!(rock_count(4, 4, 90), 14);
        // Clamped to the maximum
        assert_eq!(rock_count(10, 10, 100), 90);
    }

    #[test]
    fn test_place_rocks_exact_count() {
        let mut grid = Grid::new(16, 16).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let rocks = place_rocks(&mut grid, 20, &mut rng);

        assert_eq!(rocks.len(), 51);
        assert_eq!(grid.count_type(CellType::Rock), 51);
    }

    #[test]
    fn test_place_rocks_deterministic() {
        let mut a = Grid::new(12, 12).unwrap();
        let mut b = Grid::new(12, 12).unwrap();
        place_rocks(&mut a, 25, &mut ChaCha8Rng::seed_from_u64(99));
        place_rocks(&mut b, 25, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_density_places_nothing() {
        let mut grid = Grid::new(6, 6).unwrap();
        let rocks = place_rocks(&mut grid, 0, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(rocks.is_empty());
        assert_eq!(grid.count_type(CellType::Empty), 36);
    }
}
