//! Move validation.

use crate::error::MoveError;
use crate::game::{Grid, PlayerId, Position};

/// Check a placement by `player` at `pos` against bounds, turn ownership
/// and occupancy, in that order.
///
/// # Errors
///
/// Returns the first failed check. Never mutates anything.
pub fn validate_move(
    grid: &Grid,
    current: PlayerId,
    player: PlayerId,
    pos: Position,
) -> Result<(), MoveError> {
    let Some(cell) = grid.get(pos) else {
        return Err(MoveError::OutOfBounds {
            position: pos,
            width: grid.width(),
            height: grid.height(),
        });
    };

    if player != current {
        return Err(MoveError::NotYourTurn { player, current });
    }

    if !cell.is_empty() {
        return Err(MoveError::CellOccupied {
            position: pos,
            cell_type: cell.cell_type(),
        });
    }

    Ok(())
}
