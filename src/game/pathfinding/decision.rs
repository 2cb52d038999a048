use bevy::prelude::*;
use rand::Rng;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::game::config::SimSettings;
use crate::game::maze::{CellCoord, Direction, MazeGrid};
use crate::game::occupancy::OccupancyTracker;

use super::bfs::find_exit_path;

/// Per-runner navigation memory. Each agent exclusively owns its own mind;
/// the engine never touches another agent's state.
#[derive(Debug, Clone, Default)]
pub struct RunnerMind {
    /// Remaining steps of the last computed path to an exit. Advisory only:
    /// the grid can gain paths mid-episode, and the periodic recompute
    /// corrects any staleness.
    pub cached_path: VecDeque<Direction>,
    /// Consecutive decision calls made from the same cell.
    pub stuck: u32,
    pub last_cell: Option<CellCoord>,
    /// Own revisit counts, keyed by flattened cell index.
    pub exploration: FxHashMap<u32, u32>,
}

impl RunnerMind {
    /// Bump the revisit count for a cell the agent just arrived on.
    pub fn note_arrival(&mut self, cell: CellCoord, grid_size: usize) {
        let idx = (cell.y * grid_size + cell.x) as u32;
        *self.exploration.entry(idx).or_insert(0) += 1;
    }

    fn revisits(&self, cell: CellCoord, grid_size: usize) -> u32 {
        let idx = (cell.y * grid_size + cell.x) as u32;
        self.exploration.get(&idx).copied().unwrap_or(0)
    }
}

/// Direction chooser for runner agents: a blend of BFS exit-seeking,
/// visited-cell avoidance and crowd avoidance over the occupancy ledger.
///
/// Borrows the episode's shared state for the duration of one decision pass;
/// all mutation goes through the caller-owned [`RunnerMind`].
pub struct DecisionEngine<'a> {
    grid: &'a MazeGrid,
    occupancy: &'a OccupancyTracker,
    settings: &'a SimSettings,
}

impl<'a> DecisionEngine<'a> {
    pub fn new(
        grid: &'a MazeGrid,
        occupancy: &'a OccupancyTracker,
        settings: &'a SimSettings,
    ) -> Self {
        Self {
            grid,
            occupancy,
            settings,
        }
    }

    /// Pick one of `legal` for an agent standing on `cell`, or `None` when
    /// `legal` is empty (the no-move sentinel; the caller skips the tick).
    ///
    /// Total over all in-bounds inputs: never panics, never returns a
    /// direction outside the supplied set.
    pub fn choose_direction(
        &self,
        agent: Entity,
        mind: &mut RunnerMind,
        cell: CellCoord,
        legal: &[Direction],
        rng: &mut impl Rng,
    ) -> Option<Direction> {
        // Stuck bookkeeping: deciding repeatedly from the same cell means
        // the cached path keeps getting blocked, so drop it past the
        // threshold and let the next exit-seek recompute. Runs before the
        // no-move sentinel so a fully boxed-in runner sheds its stale path
        // too.
        if mind.last_cell == Some(cell) {
            mind.stuck += 1;
            if mind.stuck > self.settings.stuck_threshold {
                mind.cached_path.clear();
                mind.stuck = 0;
            }
        } else {
            mind.stuck = 0;
        }
        mind.last_cell = Some(cell);

        if legal.is_empty() {
            return None;
        }

        if rng.random::<f32>() < self.settings.exit_seek_chance {
            if let Some(dir) = self.next_exit_step(mind, cell, rng) {
                if legal.contains(&dir) {
                    return Some(dir);
                }
                // Blocked this tick. The step is spent; fall through to the
                // exploration heuristics.
            }
        }

        self.explore(agent, mind, cell, legal, rng)
    }

    /// Consume one step of the cached exit path, recomputing it when empty
    /// or with a small probability to mimic imperfect navigation. `None`
    /// when no exit is reachable from here.
    fn next_exit_step(
        &self,
        mind: &mut RunnerMind,
        cell: CellCoord,
        rng: &mut impl Rng,
    ) -> Option<Direction> {
        if mind.cached_path.is_empty()
            || rng.random::<f32>() < self.settings.path_recompute_chance
        {
            mind.cached_path = find_exit_path(self.grid, cell, rng).into();
        }
        mind.cached_path.pop_front()
    }

    /// Crowd-avoidance exploration: prefer destinations this agent has not
    /// visited, then the least crowded neighbourhoods, with a random pick
    /// among the best few for variety.
    fn explore(
        &self,
        agent: Entity,
        mind: &RunnerMind,
        cell: CellCoord,
        legal: &[Direction],
        rng: &mut impl Rng,
    ) -> Option<Direction> {
        let mut scored: SmallVec<[(Direction, usize, u32, bool); 4]> = SmallVec::new();
        for &dir in legal {
            let Some(dest) = self.grid.step(cell, dir) else {
                continue;
            };
            let crowd = self
                .occupancy
                .visitor_count_near(dest, self.settings.crowd_radius);
            let revisits = mind.revisits(dest, self.grid.size());
            let visited = self.occupancy.is_visited_by(dest, agent);
            scored.push((dir, crowd, revisits, visited));
        }
        if scored.is_empty() {
            return Some(legal[rng.random_range(0..legal.len())]);
        }

        // Least crowded first; the agent's own revisit count breaks ties.
        scored.sort_by_key(|&(_, crowd, revisits, _)| (crowd, revisits));

        let unvisited: SmallVec<[Direction; 4]> = scored
            .iter()
            .filter(|&&(_, _, _, visited)| !visited)
            .map(|&(dir, ..)| dir)
            .collect();
        let visited: SmallVec<[Direction; 4]> = scored
            .iter()
            .filter(|&&(_, _, _, visited)| visited)
            .map(|&(dir, ..)| dir)
            .collect();

        let bucket = if unvisited.is_empty() {
            &visited
        } else {
            &unvisited
        };
        let top = bucket.len().min(self.settings.crowd_pick_top.max(1));
        Some(bucket[rng.random_range(0..top)])
    }
}
