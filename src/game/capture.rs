//! Region capture.
//!
//! After a placement, every cardinal neighbor that is neither the mover's
//! nor a rock seeds a flood fill. The fill walks empty and enemy cells and
//! stops at the mover's cells, rocks and other unplayable cells. Stepping
//! off the grid is not part of the region but counts as one neutral edge.
//!
//! A region is captured when:
//! - its neutral edge count is at most `max_neutral_edges`, and
//! - none of its enemy cells sits on the outer border of the grid.
//!
//! A failed enclosure is not an error; it simply yields no region.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::{Cell, CellState, Grid, PlayerId, Position};

/// A captured area, produced for a single capture event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region id, unique within a game.
    pub id: u32,
    /// Every cell converted by this capture.
    pub cells: Vec<Position>,
    /// The capturing player.
    pub owner: Option<PlayerId>,
    /// Move sequence number of the capture.
    pub conquered_at: Option<u32>,
}

/// An enemy cell converted by a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanCapture {
    /// Where the cell is.
    pub position: Position,
    /// Who owned it before.
    pub previous_owner: PlayerId,
}

/// Why a scanned region was not captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The region touches the grid edge more often than allowed.
    TooManyEdges {
        /// Neutral edges counted.
        edges: u32,
        /// Allowed budget.
        budget: u8,
    },
    /// An enemy cell in the region lies on the grid border.
    ExposedEnemy(Position),
}

/// Raw result of one flood fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionScan {
    /// Cells in the region, in discovery order.
    pub cells: Vec<Position>,
    /// Neutral edge occurrences.
    pub edges: u32,
    /// First enemy cell found on the grid border, if any.
    pub exposed_enemy: Option<Position>,
}

impl RegionScan {
    /// Apply the edge budget and the border veto.
    ///
    /// # Errors
    ///
    /// Returns the reason the region cannot be captured.
    pub fn check(&self, max_neutral_edges: u8) -> Result<(), Rejection> {
        if let Some(pos) = self.exposed_enemy {
            return Err(Rejection::ExposedEnemy(pos));
        }
        if self.edges > u32::from(max_neutral_edges) {
            return Err(Rejection::TooManyEdges {
                edges: self.edges,
                budget: max_neutral_edges,
            });
        }
        Ok(())
    }
}

/// Everything a single placement captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureResult {
    /// Captured regions, in neighbor scan order.
    pub regions: Vec<Region>,
    /// Every converted cell, across all regions.
    pub captured: Vec<Position>,
    /// Converted cells that belonged to another player.
    pub orphans: Vec<OrphanCapture>,
}

/// Whether a cell can be part of a region for `mover`.
#[inline]
fn is_candidate(cell: &Cell, mover: PlayerId) -> bool {
    match cell.state {
        CellState::Empty => true,
        CellState::Occupied(owner) => owner != mover,
        CellState::Rock | CellState::Blocked | CellState::Special => false,
    }
}

/// Flood fill from `seed` through cells that are not `mover`'s.
///
/// `visited` is shared between fills of the same move so each region is
/// only walked once. Returns `None` if `seed` is not a candidate cell or
/// was already visited.
pub fn scan_region(
    grid: &Grid,
    mover: PlayerId,
    seed: Position,
    visited: &mut [bool],
) -> Option<RegionScan> {
    let seed_idx = grid.index_of(seed)?;
    if visited[seed_idx] || !is_candidate(&grid.cells()[seed_idx], mover) {
        return None;
    }

    let mut scan = RegionScan {
        cells: Vec::new(),
        edges: 0,
        exposed_enemy: None,
    };
    let mut queue = VecDeque::new();
    visited[seed_idx] = true;
    queue.push_back(seed);

    while let Some(pos) = queue.pop_front() {
        scan.cells.push(pos);

        if scan.exposed_enemy.is_none()
            && grid.on_border(pos)
            && grid.get(pos).and_then(Cell::owner).is_some()
        {
            scan.exposed_enemy = Some(pos);
        }

        for next in pos.neighbors() {
            let Some(idx) = grid.index_of(next) else {
                scan.edges += 1;
                continue;
            };
            if !visited[idx] && is_candidate(&grid.cells()[idx], mover) {
                visited[idx] = true;
                queue.push_back(next);
            }
        }
    }

    Some(scan)
}

/// Detect and convert every region enclosed by a placement at `placed`.
///
/// `seq` stamps converted cells and regions; `next_region_id` is advanced
/// for each captured region.
pub fn capture_regions(
    grid: &mut Grid,
    mover: PlayerId,
    placed: Position,
    max_neutral_edges: u8,
    seq: u32,
    next_region_id: &mut u32,
) -> CaptureResult {
    let mut result = CaptureResult::default();
    let mut visited = vec![false; grid.total_cells()];

    for seed in placed.neighbors() {
        let Some(scan) = scan_region(grid, mover, seed, &mut visited) else {
            continue;
        };

        if let Err(reason) = scan.check(max_neutral_edges) {
            tracing::debug!(
                player = mover,
                x = seed.x,
                y = seed.y,
                size = scan.cells.len(),
                edges = scan.edges,
                ?reason,
                "region not enclosed"
            );
            continue;
        }

        for &pos in &scan.cells {
            if let Some(previous_owner) = grid.get(pos).and_then(Cell::owner) {
                result.orphans.push(OrphanCapture {
                    position: pos,
                    previous_owner,
                });
            }
            grid.set(pos, Cell::occupied(mover, seq));
        }

        let region = Region {
            id: *next_region_id,
            cells: scan.cells,
            owner: Some(mover),
            conquered_at: Some(seq),
        };
        *next_region_id += 1;

        tracing::info!(
            player = mover,
            region = region.id,
            size = region.cells.len(),
            edges = scan.edges,
            "region captured"
        );
        result.captured.extend_from_slice(&region.cells);
        result.regions.push(region);
    }

    result
}
