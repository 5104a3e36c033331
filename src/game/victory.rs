//! Victory evaluation.
//!
//! Always recomputed from the grid, never maintained incrementally.
//! Checks, in priority order:
//! 1. Majority: a player holds more than half of the playable cells.
//! 2. Insurmountable lead: the runner-up cannot pass the leader even by
//!    taking every remaining empty cell.
//! 3. Full board: no empty cells left; the largest holding wins, ties share.

use serde::{Deserialize, Serialize};

use crate::game::{CellType, Grid, Player, PlayerId};

/// How a game was (or was not) decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinKind {
    /// Nothing decided yet.
    Undecided,
    /// One player holds a strict majority of playable cells.
    Majority,
    /// The leader can no longer be caught.
    Insurmountable,
    /// Board full, single top holder.
    BoardFull,
    /// Board full, several players share the top count.
    Tie,
    /// Board full and nobody owns anything.
    Stalemate,
}

/// Result of a victory evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCondition {
    /// Whether at least one winner was declared.
    pub has_winner: bool,
    /// Winning players, in roster order.
    pub winners: Vec<PlayerId>,
    /// How the result came about.
    pub kind: WinKind,
    /// Human-readable explanation.
    pub reason: String,
}

impl WinCondition {
    /// The game continues.
    #[must_use]
    pub fn undecided() -> Self {
        Self {
            has_winner: false,
            winners: Vec::new(),
            kind: WinKind::Undecided,
            reason: "game in progress".to_string(),
        }
    }

    /// Whether the game is over, with or without a winner.
    #[must_use]
    pub const fn is_decided(&self) -> bool {
        !matches!(self.kind, WinKind::Undecided)
    }

    fn winner(player: PlayerId, kind: WinKind, reason: String) -> Self {
        Self {
            has_winner: true,
            winners: vec![player],
            kind,
            reason,
        }
    }
}

/// Tile counts per player, in roster order.
#[must_use]
pub fn tile_counts(grid: &Grid, players: &[Player]) -> Vec<(PlayerId, usize)> {
    players
        .iter()
        .map(|p| (p.id, grid.count_owned(p.id)))
        .collect()
}

/// Evaluate the win condition for the current grid.
#[must_use]
pub fn evaluate(grid: &Grid, players: &[Player]) -> WinCondition {
    let counts = tile_counts(grid, players);
    let empty = grid.count_type(CellType::Empty);
    evaluate_counts(&counts, grid.playable_cells(), empty)
}

/// Evaluate from raw counts.
///
/// `counts` is in roster order; `playable` excludes rocks; `empty` is the
/// number of cells still open for placement.
#[must_use]
pub fn evaluate_counts(counts: &[(PlayerId, usize)], playable: usize, empty: usize) -> WinCondition {
    if counts.is_empty() {
        return WinCondition::undecided();
    }

    // Majority
    let threshold = playable / 2 + 1;
    if let Some(&(player, tiles)) = counts.iter().find(|&&(_, tiles)| tiles >= threshold) {
        return WinCondition::winner(
            player,
            WinKind::Majority,
            format!("territory majority: {tiles} of {playable} playable cells"),
        );
    }

    // Rank by tile count; stable so earlier joiners lead ties.
    let mut ranked = counts.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let (leader, lead) = ranked[0];
    let runner_up = ranked.get(1).map_or(0, |&(_, tiles)| tiles);

    // Insurmountable lead, only while cells remain. Catching up to a tie
    // is not enough to stay in the game.
    if empty > 0 && runner_up + empty <= lead {
        return WinCondition::winner(
            leader,
            WinKind::Insurmountable,
            format!("insurmountable lead: {lead} vs at most {}", runner_up + empty),
        );
    }

    // Full board
    if empty == 0 {
        if lead == 0 {
            return WinCondition {
                has_winner: false,
                winners: Vec::new(),
                kind: WinKind::Stalemate,
                reason: "board full with no territory claimed".to_string(),
            };
        }

        let winners: Vec<PlayerId> = counts
            .iter()
            .filter(|&&(_, tiles)| tiles == lead)
            .map(|&(id, _)| id)
            .collect();

        return if winners.len() > 1 {
            WinCondition {
                has_winner: true,
                winners,
                kind: WinKind::Tie,
                reason: format!("board full, tie at {lead} tiles"),
            }
        } else {
            WinCondition::winner(
                leader,
                WinKind::BoardFull,
                format!("board full, most territory with {lead} tiles"),
            )
        };
    }

    WinCondition::undecided()
}
