use serde::{Deserialize, Serialize};

use super::{Cell, CellCoord, Direction};

/// The maze substrate: a square grid of `Wall`/`Path` cells with an always
/// open border ring and a list of declared exits.
///
/// The ring (outer `border` cells on every side) is the escape corridor: it
/// is fully connected, entirely `Path`, and touches every exit. Immutable
/// after generation except for [`MazeGrid::destroy_walls`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MazeGrid {
    size: usize,
    border: usize,
    cells: Vec<Cell>,
    exits: Vec<CellCoord>,
}

impl MazeGrid {
    /// Grid with every cell open. Starting point for hand-built test mazes.
    pub fn open(size: usize, border: usize) -> Self {
        Self {
            size,
            border,
            cells: vec![Cell::Path; size * size],
            exits: Vec::new(),
        }
    }

    /// Grid with an open ring and a fully walled interior, the generator's
    /// canvas before carving.
    pub fn walled(size: usize, border: usize) -> Self {
        let mut grid = Self::open(size, border);
        for y in border..size - border {
            for x in border..size - border {
                grid.set(CellCoord::new(x, y), Cell::Wall);
            }
        }
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn border(&self) -> usize {
        self.border
    }

    pub fn center(&self) -> CellCoord {
        CellCoord::new(self.size / 2, self.size / 2)
    }

    #[inline]
    fn idx(&self, cell: CellCoord) -> usize {
        debug_assert!(self.in_bounds(cell));
        cell.y * self.size + cell.x
    }

    #[inline]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x < self.size && cell.y < self.size
    }

    /// True for cells inside the walled/carved area, excluding the ring.
    #[inline]
    pub fn is_interior(&self, cell: CellCoord) -> bool {
        cell.x >= self.border
            && cell.x < self.size - self.border
            && cell.y >= self.border
            && cell.y < self.size - self.border
    }

    /// True for in-bounds cells on the border ring.
    #[inline]
    pub fn is_ring(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell) && !self.is_interior(cell)
    }

    pub fn get(&self, cell: CellCoord) -> Cell {
        self.cells[self.idx(cell)]
    }

    pub fn set(&mut self, cell: CellCoord, value: Cell) {
        let idx = self.idx(cell);
        self.cells[idx] = value;
    }

    /// Walkability check, total over all coordinates: out-of-bounds is not a
    /// path.
    pub fn is_path(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell) && self.get(cell) == Cell::Path
    }

    /// Neighbouring coordinate one step away, `None` off the grid.
    pub fn step(&self, cell: CellCoord, dir: Direction) -> Option<CellCoord> {
        let (dx, dy) = dir.offset();
        let x = cell.x.checked_add_signed(dx as isize)?;
        let y = cell.y.checked_add_signed(dy as isize)?;
        let next = CellCoord::new(x, y);
        self.in_bounds(next).then_some(next)
    }

    pub fn exits(&self) -> &[CellCoord] {
        &self.exits
    }

    pub fn is_exit(&self, cell: CellCoord) -> bool {
        self.exits.iter().any(|&e| e == cell)
    }

    /// Declare an exit cell. Used by the generator and by hand-built grids.
    pub fn add_exit(&mut self, cell: CellCoord) {
        debug_assert!(self.in_bounds(cell));
        self.exits.push(cell);
    }

    /// Flip walls to paths within a Euclidean radius of `center`. Localized
    /// environmental mutation triggered by runner failure events; the only
    /// way a grid changes mid-episode.
    pub fn destroy_walls(&mut self, center: CellCoord, radius: usize) {
        let r = radius as isize;
        let r_sq = (radius * radius) as isize;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r_sq {
                    continue;
                }
                let Some(x) = center.x.checked_add_signed(dx) else {
                    continue;
                };
                let Some(y) = center.y.checked_add_signed(dy) else {
                    continue;
                };
                let cell = CellCoord::new(x, y);
                if self.in_bounds(cell) && self.get(cell) == Cell::Wall {
                    self.set(cell, Cell::Path);
                }
            }
        }
    }
}
