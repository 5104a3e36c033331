//! Score projection: a read-only view of territory per player.

use serde::{Deserialize, Serialize};

use crate::game::{Grid, Player, PlayerId};

/// Display-ready score for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    /// The player.
    pub player_id: PlayerId,
    /// Occupied cells owned by the player.
    pub tiles_owned: usize,
    /// Share of playable cells, rounded to the nearest percent.
    pub percentage: u32,
}

/// Share of `playable` held by `tiles`, rounded half away from zero.
#[must_use]
pub fn percentage(tiles: usize, playable: usize) -> u32 {
    if playable == 0 {
        return 0;
    }
    // round(tiles / playable * 100) in integer arithmetic
    let scaled = (tiles * 200 + playable) / (playable * 2);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Score every player in roster order.
#[must_use]
pub fn project_scores(grid: &Grid, players: &[Player]) -> Vec<ScoreLine> {
    let playable = grid.playable_cells();
    let mut counts = vec![0usize; players.len()];

    for cell in grid.cells() {
        if let Some(owner) = cell.owner()
            && let Some(idx) = players.iter().position(|p| p.id == owner)
        {
            counts[idx] += 1;
        }
    }

    players
        .iter()
        .zip(counts)
        .map(|(player, tiles_owned)| ScoreLine {
            player_id: player.id,
            tiles_owned,
            percentage: percentage(tiles_owned, playable),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Position};

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0, 64), 0);
        assert_eq!(percentage(32, 64), 50);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn test_project_scores_excludes_rocks() {
        let mut grid = Grid::new(4, 4).unwrap();
        for x in 0..4 {
            grid.set(Position::new(x, 0), Cell::rock());
        }
        for x in 0..3 {
            grid.set(Position::new(x, 1), Cell::occupied(1, 1));
        }
        grid.set(Position::new(3, 3), Cell::occupied(2, 2));

        let players = vec![Player::new(1, "a", "red"), Player::new(2, "b", "blue")];
        let scores = project_scores(&grid, &players);

        assert_eq!(scores[0].tiles_owned, 3);
        assert_eq!(scores[0].percentage, 25);
        assert_eq!(scores[1].tiles_owned, 1);
        assert_eq!(scores[1].percentage, 8);
    }

    #[test]
    fn test_project_scores_idempotent() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(Position::new(2, 2), Cell::occupied(1, 1));
        let players = vec![Player::new(1, "a", "red"), Player::new(2, "b", "blue")];
        assert_eq!(project_scores(&grid, &players), project_scores(&grid, &players));
    }
}
