use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;

use crate::game::config::SimSettings;
use crate::game::occupancy::OccupancyTracker;

pub use components::{Agent, GridPos, Navigator, Runner, RunnerBrain};
pub use events::{NavigatorMoveCommand, ResetEpisode, RunnerDestroyed, RunnerEscaped};
pub use resources::{EpisodeStats, MazeMap, SimTick};

/// Fixed-update phases, strictly ordered. Input and spawning first, then one
/// decision per arrived agent, then movement integration, then escape and
/// failure handling.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    Input,
    Decide,
    Integrate,
    Cleanup,
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_seconds(1.0 / 20.0))
            .init_resource::<SimSettings>()
            .init_resource::<SimTick>()
            .init_resource::<MazeMap>()
            .init_resource::<OccupancyTracker>()
            .init_resource::<EpisodeStats>()
            .add_message::<NavigatorMoveCommand>()
            .add_message::<ResetEpisode>()
            .add_message::<RunnerEscaped>()
            .add_message::<RunnerDestroyed>()
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Input,
                    SimSet::Decide,
                    SimSet::Integrate,
                    SimSet::Cleanup,
                )
                    .chain(),
            )
            .add_systems(
                Startup,
                (systems::configure_fixed_timestep, systems::init_episode),
            )
            .add_systems(
                FixedUpdate,
                systems::increment_sim_tick.before(SimSet::Input),
            )
            .add_systems(
                FixedUpdate,
                (systems::process_input, systems::spawn_runners).in_set(SimSet::Input),
            )
            .add_systems(
                FixedUpdate,
                systems::plan_runner_moves.in_set(SimSet::Decide),
            )
            .add_systems(
                FixedUpdate,
                systems::integrate_movement.in_set(SimSet::Integrate),
            )
            .add_systems(
                FixedUpdate,
                (
                    systems::check_escapes,
                    systems::random_failures,
                    systems::check_episode_goal,
                    systems::reset_episode,
                )
                    .chain()
                    .in_set(SimSet::Cleanup),
            );
    }
}
