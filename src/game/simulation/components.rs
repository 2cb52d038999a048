use bevy::prelude::*;

use crate::game::maze::{CellCoord, Direction};
use crate::game::pathfinding::RunnerMind;

/// Grid-cell position with sub-cell movement progress.
///
/// `cell` is the authoritative occupied cell until the move completes;
/// `target` is the cell being moved into. `progress` runs 0.0 to 1.0 between
/// the two. An arrived agent has `cell == target` and `progress == 0.0`.
#[derive(Component, Debug, Clone)]
pub struct GridPos {
    pub cell: CellCoord,
    pub target: CellCoord,
    pub progress: f32,
}

impl GridPos {
    pub fn at(cell: CellCoord) -> Self {
        Self {
            cell,
            target: cell,
            progress: 0.0,
        }
    }

    pub fn arrived(&self) -> bool {
        self.cell == self.target
    }

    pub fn begin_move(&mut self, target: CellCoord) {
        self.target = target;
        self.progress = 0.0;
    }
}

/// Common marker for everything that occupies maze cells and moves.
#[derive(Component, Debug, Default)]
pub struct Agent;

/// The externally driven agent. One per episode; its moves come from
/// `NavigatorMoveCommand` messages rather than the decision engine.
#[derive(Component, Debug, Default)]
pub struct Navigator {
    /// Latest commanded direction, consumed when the current move finishes.
    pub queued: Option<Direction>,
}

/// Marker for autonomous escape-seeking agents.
#[derive(Component, Debug, Default)]
pub struct Runner;

/// Per-runner decision state, owned exclusively by its entity.
#[derive(Component, Debug, Default)]
pub struct RunnerBrain(pub RunnerMind);
