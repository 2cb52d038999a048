use bevy::prelude::*;
use rustc_hash::FxHashSet;

use crate::game::maze::CellCoord;

#[cfg(test)]
mod tests;

/// Visited-position ledger: which agents have ever stepped on which cell.
///
/// Backed by a flat array of visitor sets indexed by flattened coordinate.
/// Written only by the movement coordinator when an agent completes a move;
/// read by every agent's decision call. Grows monotonically within an
/// episode and is discarded wholesale on reset.
#[derive(Resource, Default)]
pub struct OccupancyTracker {
    size: usize,
    cells: Vec<FxHashSet<Entity>>,
}

impl OccupancyTracker {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![FxHashSet::default(); size * size],
        }
    }

    /// Discard the whole ledger for a fresh episode on a `size`-sided grid.
    pub fn reset(&mut self, size: usize) {
        self.size = size;
        self.cells = vec![FxHashSet::default(); size * size];
    }

    #[inline]
    fn idx(&self, cell: CellCoord) -> Option<usize> {
        (cell.x < self.size && cell.y < self.size).then(|| cell.y * self.size + cell.x)
    }

    /// Record a visit. Idempotent: marking the same (cell, agent) pair twice
    /// leaves the visitor set unchanged.
    pub fn mark_visited(&mut self, cell: CellCoord, agent: Entity) {
        if let Some(idx) = self.idx(cell) {
            self.cells[idx].insert(agent);
        }
    }

    pub fn is_visited_by(&self, cell: CellCoord, agent: Entity) -> bool {
        self.idx(cell)
            .is_some_and(|idx| self.cells[idx].contains(&agent))
    }

    /// Crowding signal: distinct-agent visitor entries summed over the
    /// square neighbourhood of the given radius, clamped at the grid edge.
    pub fn visitor_count_near(&self, cell: CellCoord, radius: usize) -> usize {
        let r = radius as isize;
        let mut total = 0;
        for dy in -r..=r {
            for dx in -r..=r {
                let Some(x) = cell.x.checked_add_signed(dx) else {
                    continue;
                };
                let Some(y) = cell.y.checked_add_signed(dy) else {
                    continue;
                };
                if let Some(idx) = self.idx(CellCoord::new(x, y)) {
                    total += self.cells[idx].len();
                }
            }
        }
        total
    }

    /// Count the total number of visitor entries across all cells.
    /// Useful for debugging and diagnostics.
    pub fn total_entries(&self) -> usize {
        self.cells.iter().map(|cell| cell.len()).sum()
    }

    /// Count the number of cells with at least one visitor.
    /// Useful for debugging and diagnostics.
    pub fn non_empty_cells(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }
}
