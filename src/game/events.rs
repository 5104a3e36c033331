//! Outbound notifications for rendering and UI collaborators.
//!
//! Events are fire-and-forget: the engine returns them with each move and
//! never waits for acknowledgment.

use serde::{Deserialize, Serialize};

use crate::game::{GameStatus, PlayerId, Position, WinCondition};

/// Something observable happened in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player placed a cell.
    CellPlaced {
        /// Where.
        position: Position,
        /// Who.
        player: PlayerId,
    },
    /// An enclosed region was converted.
    RegionCaptured {
        /// Region id.
        region_id: u32,
        /// Converted cells.
        cells: Vec<Position>,
        /// Capturing player.
        player: PlayerId,
        /// Capturing player's display color.
        color: String,
    },
    /// Tiles changed hands between two players.
    OpponentTilesCaptured {
        /// Player gaining the tiles.
        capturing: PlayerId,
        /// Player losing the tiles.
        losing: PlayerId,
        /// Number of tiles.
        count: usize,
    },
    /// A player passed.
    TurnPassed {
        /// Who passed.
        player: PlayerId,
    },
    /// Play moved to another player.
    TurnAdvanced {
        /// Round number.
        turn_number: u32,
        /// New turn holder.
        player: PlayerId,
    },
    /// The game status changed.
    StatusChanged {
        /// Previous status.
        from: GameStatus,
        /// New status.
        to: GameStatus,
    },
    /// The game ended.
    GameEnded(WinCondition),
}
