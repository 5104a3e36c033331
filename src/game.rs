//! Game layer for Conquer.
//!
//! Implements the territory rules:
//! - Grid of cells (empty, owned, rocks)
//! - Rock placement at setup
//! - Move validation
//! - Region capture by flood fill with an edge budget
//! - Turn order and round numbering
//! - Victory evaluation and score projection

mod capture;
mod events;
mod grid;
mod invariants;
mod player;
mod rocks;
mod score;
mod state;
mod turn;
mod validate;
mod victory;

pub use capture::{
    CaptureResult, OrphanCapture, Region, RegionScan, Rejection, capture_regions, scan_region,
};
pub use events::GameEvent;
pub use grid::{Cell, CellState, CellType, DIRECTIONS, Grid, Position};
pub use invariants::{InvariantViolation, check_invariants};
pub use player::{Player, PlayerId};
pub use rocks::{MAX_ROCK_DENSITY, place_rocks, rock_count};
pub use score::{ScoreLine, percentage, project_scores};
pub use state::{
    Game, GameStatus, MAX_PLAYERS, MIN_PLAYERS, MoveAction, MoveOutcome, MoveRecord,
};
pub use turn::{Turn, advance_turn};
pub use validate::validate_move;
pub use victory::{WinCondition, WinKind, evaluate, evaluate_counts, tile_counts};
