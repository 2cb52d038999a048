use fixedbitset::FixedBitSet;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

use crate::game::maze::{CellCoord, Direction, MazeGrid};

/// Shortest path from `start` to the nearest exit as a sequence of direction
/// steps, breadth-first over path cells.
///
/// The search stops at the first exit discovered. Equal-length paths
/// tie-break on discovery order, which follows a per-call shuffle of the
/// expansion directions; path choice is deliberately not deterministic
/// across calls.
///
/// An empty result means no exit is reachable (or `start` already is one).
/// That is a legitimate outcome, not an error; callers fall back to local
/// heuristics.
pub fn find_exit_path(grid: &MazeGrid, start: CellCoord, rng: &mut impl Rng) -> Vec<Direction> {
    debug_assert!(grid.in_bounds(start));
    if grid.is_exit(start) {
        return Vec::new();
    }

    let size = grid.size();
    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);

    let mut visited = FixedBitSet::with_capacity(size * size);
    let mut came_from: Vec<Option<(CellCoord, Direction)>> = vec![None; size * size];
    let mut queue = VecDeque::new();

    visited.insert(start.y * size + start.x);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for dir in dirs {
            let Some(next) = grid.step(cell, dir) else {
                continue;
            };
            let idx = next.y * size + next.x;
            if !grid.is_path(next) || visited.contains(idx) {
                continue;
            }
            visited.insert(idx);
            came_from[idx] = Some((cell, dir));
            if grid.is_exit(next) {
                return reconstruct(&came_from, size, start, next);
            }
            queue.push_back(next);
        }
    }

    Vec::new()
}

fn reconstruct(
    came_from: &[Option<(CellCoord, Direction)>],
    size: usize,
    start: CellCoord,
    exit: CellCoord,
) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut cell = exit;
    while cell != start {
        let Some((prev, dir)) = came_from[cell.y * size + cell.x] else {
            break;
        };
        path.push(dir);
        cell = prev;
    }
    path.reverse();
    path
}
