//! Error types for the Conquer engine.
//!
//! Move validation failures are ordinary values, never panics. Every
//! variant renders a human-readable reason through `Display`.

use thiserror::Error;

use crate::game::{CellType, GameStatus, PlayerId, Position};

/// Fieldless tag of a [`MoveError`], for callers that branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveErrorKind {
    /// Target position lies outside the grid.
    OutOfBounds,
    /// Acting player does not hold the current turn.
    NotYourTurn,
    /// Target cell is not empty.
    CellOccupied,
    /// The game is not accepting moves.
    GameNotRunning,
    /// Acting player never joined this game.
    UnknownPlayer,
}

/// Reason a move or pass was rejected. Rejection never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Target position lies outside the grid.
    #[error("position ({}, {}) is outside the {width}x{height} grid", position.x, position.y)]
    OutOfBounds {
        /// The rejected position.
        position: Position,
        /// Grid width.
        width: u16,
        /// Grid height.
        height: u16,
    },
    /// Acting player does not hold the current turn.
    #[error("it is player {current}'s turn, not player {player}'s")]
    NotYourTurn {
        /// The player that tried to act.
        player: PlayerId,
        /// The player holding the turn.
        current: PlayerId,
    },
    /// Target cell is not empty.
    #[error("cell ({}, {}) is not empty ({cell_type:?})", position.x, position.y)]
    CellOccupied {
        /// The rejected position.
        position: Position,
        /// What currently occupies the cell.
        cell_type: CellType,
    },
    /// The game is not in the `Running` state.
    #[error("game is not running (status: {status:?})")]
    GameNotRunning {
        /// Current game status.
        status: GameStatus,
    },
    /// The acting player is not part of this game.
    #[error("player {0} is not part of this game")]
    UnknownPlayer(PlayerId),
}

impl MoveError {
    /// The fieldless kind of this error.
    #[must_use]
    pub const fn kind(&self) -> MoveErrorKind {
        match self {
            Self::OutOfBounds { .. } => MoveErrorKind::OutOfBounds,
            Self::NotYourTurn { .. } => MoveErrorKind::NotYourTurn,
            Self::CellOccupied { .. } => MoveErrorKind::CellOccupied,
            Self::GameNotRunning { .. } => MoveErrorKind::GameNotRunning,
            Self::UnknownPlayer(_) => MoveErrorKind::UnknownPlayer,
        }
    }
}

/// Invalid or unreadable game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric option is outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Option name.
        field: &'static str,
        /// Rejected value.
        value: u64,
        /// Inclusive lower bound.
        min: u64,
        /// Inclusive upper bound.
        max: u64,
    },
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for `GameOptions`.
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lifecycle misuse of a [`crate::game::Game`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Players may only join while the game is pending.
    #[error("players can only join a pending game (status: {0:?})")]
    NotPending(GameStatus),
    /// A player with this id already joined.
    #[error("player {0} has already joined")]
    DuplicatePlayer(PlayerId),
    /// No player with this id.
    #[error("player {0} is not part of this game")]
    UnknownPlayer(PlayerId),
    /// Too few players to start.
    #[error("need at least {min} players, have {count}")]
    TooFewPlayers {
        /// Players present.
        count: usize,
        /// Minimum required.
        min: usize,
    },
    /// The roster is full.
    #[error("game is full ({max} players)")]
    TooManyPlayers {
        /// Maximum allowed.
        max: usize,
    },
    /// Requested status change is not allowed.
    #[error("cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status.
        from: GameStatus,
        /// Requested status.
        to: GameStatus,
    },
    /// The options the game was created with are invalid.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidOptions(e.to_string())
    }
}

/// Failure while saving, loading or re-simulating a recording.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading or writing the recording file failed.
    #[error("recording I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The recording file is not valid JSON.
    #[error("invalid recording: {0}")]
    Json(#[from] serde_json::Error),
    /// Setting up the game from the recording failed.
    #[error("recording setup failed: {0}")]
    Setup(#[from] GameError),
    /// A recorded move was rejected during re-simulation.
    #[error("recorded move {index} is invalid: {error}")]
    InvalidMove {
        /// Index into the recorded move list.
        index: usize,
        /// Why the engine rejected it.
        error: MoveError,
    },
    /// A loaded snapshot breaks the game invariants.
    #[error("inconsistent snapshot: {}", violations.join("; "))]
    InvalidSnapshot {
        /// Every violated invariant.
        violations: Vec<String>,
    },
    /// Requested step lies past the end of the recording.
    #[error("move {requested} is past the end of the recording ({len} moves)")]
    PastEnd {
        /// Requested move index.
        requested: usize,
        /// Number of recorded moves.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_kind_and_message() {
        let err = MoveError::NotYourTurn {
            player: 2,
            current: 1,
        };
        assert_eq!(err.kind(), MoveErrorKind::NotYourTurn);
        assert_eq!(err.to_string(), "it is player 1's turn, not player 2's");

        let err = MoveError::OutOfBounds {
            position: Position::new(-1, 3),
            width: 8,
            height: 8,
        };
        assert_eq!(err.kind(), MoveErrorKind::OutOfBounds);
        assert!(err.to_string().contains("(-1, 3)"));

        let err = MoveError::UnknownPlayer(9);
        assert_eq!(err.kind(), MoveErrorKind::UnknownPlayer);
        assert_eq!(err.to_string(), "player 9 is not part of this game");
    }

    #[test]
    fn test_snapshot_error_lists_violations() {
        let err = ReplayError::InvalidSnapshot {
            violations: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "inconsistent snapshot: a; b");
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::OutOfRange {
            field: "width",
            value: 2,
            min: 4,
            max: 64,
        };
        assert_eq!(err.to_string(), "width must be between 4 and 64, got 2");
    }
}
