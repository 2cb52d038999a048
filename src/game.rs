use bevy::prelude::*;

pub mod config;
pub mod maze;
pub mod occupancy;
pub mod pathfinding;
pub mod simulation;

use config::ConfigPlugin;
use simulation::SimulationPlugin;

/// Marker for every entity owned by the game core, used for wholesale cleanup
/// on episode reset.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GameEntity;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ConfigPlugin, SimulationPlugin));
    }
}
