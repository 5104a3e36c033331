//! Game invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger for a game driven through the public API.
//! They exist for tests, fuzzing and loaded snapshots.

use crate::game::{Game, GameStatus, WinKind, project_scores};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(game: &Game) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut violation = |message: String| violations.push(InvariantViolation { message });

    let grid = game.grid();
    if !grid.is_well_formed() {
        violation(format!(
            "Grid is {}x{} but holds {} cells",
            grid.width(),
            grid.height(),
            grid.total_cells()
        ));
    }

    // Every owner is a registered player
    for (pos, cell) in grid.iter() {
        if let Some(owner) = cell.owner()
            && game.player(owner).is_none()
        {
            violation(format!("Cell at {pos:?} owned by unknown player {owner}"));
        }
        if cell.last_modified > game.move_count() {
            violation(format!(
                "Cell at {pos:?} modified at move {} but only {} moves played",
                cell.last_modified,
                game.move_count()
            ));
        }
    }

    // Cached scores match the grid
    for line in project_scores(game.grid(), game.players()) {
        let cached = game.player(line.player_id).map_or(0, |p| p.score);
        if usize::try_from(cached).ok() != Some(line.tiles_owned) {
            violation(format!(
                "Player {} cached score {} but owns {} tiles",
                line.player_id, cached, line.tiles_owned
            ));
        }
    }

    // The turn holder is a registered player
    if let Some(turn) = game.current_turn()
        && game.player(turn.player_id).is_none()
    {
        violation(format!("Turn held by unknown player {}", turn.player_id));
    }

    match game.status() {
        GameStatus::Running | GameStatus::Paused if game.current_turn().is_none() => {
            violation(format!("{:?} game has no active turn", game.status()));
        }
        GameStatus::Ended if game.win_condition().is_none_or(|w| !w.is_decided()) => {
            violation("Ended game has no final result".to_string());
        }
        _ => {}
    }

    if let Some(win) = game.win_condition() {
        if win.has_winner == win.winners.is_empty() {
            violation(format!(
                "has_winner={} but {} winners listed",
                win.has_winner,
                win.winners.len()
            ));
        }
        if win.winners.len() > 1 && win.kind != WinKind::Tie {
            violation(format!(
                "{} winners listed for a {:?} result",
                win.winners.len(),
                win.kind
            ));
        }
        for id in &win.winners {
            if game.player(*id).is_none() {
                violation(format!("Unknown player {id} listed as winner"));
            }
        }
    }

    violations
}
