use bevy::prelude::*;

use crate::game::maze::{CellCoord, Direction};

/// External steering input for the navigator. Only the latest command per
/// tick takes effect.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct NavigatorMoveCommand {
    pub direction: Direction,
}

/// Request a full episode reset: new maze, fresh ledger, all agents respawned.
#[derive(Event, Message, Debug, Clone, Copy, Default)]
pub struct ResetEpisode;

/// A runner reached the border ring and left the maze.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct RunnerEscaped {
    pub entity: Entity,
    pub cell: CellCoord,
}

/// A runner was destroyed by a random failure, taking nearby walls with it.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct RunnerDestroyed {
    pub entity: Entity,
    pub cell: CellCoord,
}
