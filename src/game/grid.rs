//! Grid, cell and position types.

use serde::{Deserialize, Serialize};

use crate::game::PlayerId;

/// The four cardinal directions, in the fixed order neighbors are scanned.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// A coordinate on the grid.
///
/// Signed so that positions just outside the grid can be represented and
/// rejected rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four cardinal neighbors (up, right, down, left), bounds unchecked.
    #[must_use]
    #[inline]
    pub fn neighbors(self) -> [Position; 4] {
        DIRECTIONS.map(|(dx, dy)| Position::new(self.x + dx, self.y + dy))
    }
}

/// Type of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Unclaimed playable cell.
    Empty,
    /// Owned by a player.
    Occupied,
    /// Obstacle placed at setup.
    Rock,
    /// Unplayable, non-rock cell.
    Blocked,
    /// Reserved for special tiles.
    Special,
}

/// Content of a cell. Ownership only exists on occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    /// Unclaimed playable cell.
    Empty,
    /// Owned by the given player.
    Occupied(PlayerId),
    /// Obstacle placed at setup.
    Rock,
    /// Unplayable, non-rock cell.
    Blocked,
    /// Reserved for special tiles.
    Special,
}

/// A single cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// What the cell holds.
    pub state: CellState,
    /// Move sequence number of the last write (0 = untouched since setup).
    pub last_modified: u32,
}

impl Cell {
    /// An empty, untouched cell.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            state: CellState::Empty,
            last_modified: 0,
        }
    }

    /// A rock cell.
    #[must_use]
    pub const fn rock() -> Self {
        Self {
            state: CellState::Rock,
            last_modified: 0,
        }
    }

    /// A cell owned by `owner`, written at move `seq`.
    #[must_use]
    pub const fn occupied(owner: PlayerId, seq: u32) -> Self {
        Self {
            state: CellState::Occupied(owner),
            last_modified: seq,
        }
    }

    /// The cell's type.
    #[must_use]
    pub const fn cell_type(&self) -> CellType {
        match self.state {
            CellState::Empty => CellType::Empty,
            CellState::Occupied(_) => CellType::Occupied,
            CellState::Rock => CellType::Rock,
            CellState::Blocked => CellType::Blocked,
            CellState::Special => CellType::Special,
        }
    }

    /// The owning player, if the cell is occupied.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        match self.state {
            CellState::Occupied(owner) => Some(owner),
            _ => None,
        }
    }

    /// Whether the cell is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.state, CellState::Empty)
    }

    /// Whether the cell is a rock.
    #[must_use]
    pub const fn is_rock(&self) -> bool {
        matches!(self.state, CellState::Rock)
    }
}

/// The game grid. Shape is fixed at creation.
///
/// Deserializing rejects a cell list whose length does not match the
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    /// Width in cells.
    width: u16,
    /// Height in cells.
    height: u16,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

/// Unchecked wire form of [`Grid`].
#[derive(Deserialize)]
struct GridData {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl TryFrom<GridData> for Grid {
    type Error = String;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let grid = Self {
            width: data.width,
            height: data.height,
            cells: data.cells,
        };
        if grid.is_well_formed() {
            Ok(grid)
        } else {
            Err(format!(
                "grid is {}x{} but holds {} cells",
                grid.width,
                grid.height,
                grid.cells.len()
            ))
        }
    }
}

impl Grid {
    /// Create a grid filled with empty cells.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            cells: vec![Cell::empty(); size],
        })
    }

    /// Width of the grid.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the grid.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if a position is within the grid.
    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < i32::from(self.width) && pos.y < i32::from(self.height)
    }

    /// Whether a position lies on row/column 0 or the last row/column.
    #[must_use]
    pub fn on_border(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x == i32::from(self.width) - 1
                || pos.y == i32::from(self.height) - 1)
    }

    /// Row-major index of an in-bounds position.
    #[must_use]
    #[inline]
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        Some(y * usize::from(self.width) + x)
    }

    /// Position of a row-major index.
    #[must_use]
    pub fn position_of(&self, idx: usize) -> Position {
        let width = usize::from(self.width);
        // Both fit in i32 because dimensions are u16.
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        Position::new((idx % width) as i32, (idx / width) as i32)
    }

    /// Whether the cell list matches the non-zero dimensions.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.cells.len() == usize::from(self.width) * usize::from(self.height)
    }

    /// The cell at a position.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).and_then(|idx| self.cells.get(idx))
    }

    /// Set the cell at a position. Returns `false` if out of bounds.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index_of(pos).and_then(|idx| self.cells.get_mut(idx)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Iterate over all positions and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (self.position_of(idx), cell))
    }

    /// Count cells of the given type.
    #[must_use]
    pub fn count_type(&self, cell_type: CellType) -> usize {
        self.cells
            .iter()
            .filter(|c| c.cell_type() == cell_type)
            .count()
    }

    /// Count cells owned by a player.
    #[must_use]
    pub fn count_owned(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|c| c.owner() == Some(player))
            .count()
    }

    /// Total cells minus rocks.
    #[must_use]
    pub fn playable_cells(&self) -> usize {
        self.total_cells() - self.count_type(CellType::Rock)
    }

    /// Positions of all empty cells, in row-major order.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, c)| c.is_empty())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::empty());
    }
}
