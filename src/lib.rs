// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Conquer: a turn-based territory game engine.
//!
//! Players take turns claiming single cells on a rectangular grid. Empty
//! regions sealed off by a player's walls (and the grid edge, within a
//! budget) are captured wholesale. The first player to hold a majority of
//! playable cells, or an unassailable lead, wins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (play / simulate / watch)     │
//! ├─────────────────────────────────────┤
//! │   Playouts        Replay/Render     │
//! ├─────────────────────────────────────┤
//! │   Game: grid, capture, turns, win   │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod playout;
pub mod replay;

pub use config::GameOptions;
pub use error::{ConfigError, GameError, MoveError, MoveErrorKind, ReplayError};

// Re-export key game types at crate root for convenience
pub use game::{
    Cell, CellState, CellType, Game, GameEvent, GameStatus, Grid, MoveOutcome, Player, PlayerId,
    Position, WinCondition, WinKind,
};
