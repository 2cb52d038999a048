use bevy::prelude::*;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::game::config::SimSettings;
use crate::game::maze::{CellCoord, Direction, MazeGenerator};
use crate::game::occupancy::OccupancyTracker;
use crate::game::pathfinding::DecisionEngine;
use crate::game::GameEntity;
use crate::tick_log;

use super::components::{Agent, GridPos, Navigator, Runner, RunnerBrain};
use super::events::{NavigatorMoveCommand, ResetEpisode, RunnerDestroyed, RunnerEscaped};
use super::resources::{EpisodeStats, MazeMap, SimTick};

pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

/// Align the fixed schedule with the configured tick rate. Runs at startup,
/// after the settings file has been loaded; `tick_rate` is the single source
/// of truth for both the schedule period and the movement delta.
pub fn configure_fixed_timestep(settings: Res<SimSettings>, mut time: ResMut<Time<Fixed>>) {
    time.set_timestep_seconds(1.0 / settings.tick_rate);
}

/// Apply navigator steering. The latest command of the tick wins; a command
/// into a wall or an occupied cell is held until it becomes walkable or is
/// overwritten.
pub fn process_input(
    mut move_commands: MessageReader<NavigatorMoveCommand>,
    map: Res<MazeMap>,
    mut agents: Query<(Entity, &mut GridPos, Option<&mut Navigator>), With<Agent>>,
) {
    let commanded = move_commands.read().last().map(|cmd| cmd.direction);

    // Cells that are or will be occupied this tick.
    let occupied: FxHashSet<CellCoord> = agents
        .iter()
        .flat_map(|(_, pos, _)| [pos.cell, pos.target])
        .collect();

    for (_, mut pos, nav) in &mut agents {
        let Some(mut nav) = nav else {
            continue;
        };
        if let Some(direction) = commanded {
            nav.queued = Some(direction);
        }
        if !pos.arrived() {
            continue;
        }
        let Some(direction) = nav.queued else {
            continue;
        };
        let Some(dest) = map.0.step(pos.cell, direction) else {
            nav.queued = None;
            continue;
        };
        if map.0.is_path(dest) && !occupied.contains(&dest) {
            nav.queued = None;
            pos.begin_move(dest);
        }
    }
}

/// Trickle new runners into the maze center, up to the population cap. The
/// spawn cell obeys the same occupancy discipline as moves: a claimed center
/// defers the spawn to a later tick.
pub fn spawn_runners(
    mut commands: Commands,
    map: Res<MazeMap>,
    settings: Res<SimSettings>,
    mut stats: ResMut<EpisodeStats>,
    runners: Query<(), With<Runner>>,
    agents: Query<&GridPos, With<Agent>>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let alive = runners.iter().count();
    if alive >= settings.max_runners {
        return;
    }
    let mut rng = rand::rng();
    if rng.random::<f32>() >= settings.spawn_chance {
        return;
    }
    let center = map.0.center();
    if agents
        .iter()
        .any(|pos| pos.cell == center || pos.target == center)
    {
        return;
    }

    commands.spawn((
        GameEntity,
        Agent,
        Runner,
        RunnerBrain::default(),
        GridPos::at(center),
    ));
    stats.spawned += 1;

    tick_log!(
        tick,
        "runners alive: {}, spawned this round: {}",
        alive + 1,
        stats.spawned
    );
}

/// One decision per arrived runner. Runners earlier in iteration order claim
/// their destination cell for the tick; later runners see it as occupied.
pub fn plan_runner_moves(
    map: Res<MazeMap>,
    occupancy: Res<OccupancyTracker>,
    settings: Res<SimSettings>,
    mut agents: Query<(Entity, &mut GridPos, Option<&mut RunnerBrain>), With<Agent>>,
) {
    let mut occupied: FxHashSet<CellCoord> = agents
        .iter()
        .flat_map(|(_, pos, _)| [pos.cell, pos.target])
        .collect();

    let engine = DecisionEngine::new(&map.0, &occupancy, &settings);
    let mut rng = rand::rng();

    for (entity, mut pos, brain) in &mut agents {
        let Some(mut brain) = brain else {
            continue;
        };
        if !pos.arrived() {
            continue;
        }

        let legal: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&dir| {
                map.0
                    .step(pos.cell, dir)
                    .is_some_and(|dest| map.0.is_path(dest) && !occupied.contains(&dest))
            })
            .collect();

        if let Some(direction) =
            engine.choose_direction(entity, &mut brain.0, pos.cell, &legal, &mut rng)
        {
            // choose_direction only returns legal directions, so the step
            // cannot fail here.
            if let Some(dest) = map.0.step(pos.cell, direction) {
                occupied.insert(dest);
                pos.begin_move(dest);
            }
        }
    }
}

/// Advance every in-flight move by one fixed tick and record arrivals in the
/// occupancy ledger.
pub fn integrate_movement(
    map: Res<MazeMap>,
    settings: Res<SimSettings>,
    mut occupancy: ResMut<OccupancyTracker>,
    mut agents: Query<(Entity, &mut GridPos, Has<Navigator>, Option<&mut RunnerBrain>), With<Agent>>,
) {
    // Fixed per-tick delta keeps integration deterministic for a given
    // decision sequence.
    let dt = 1.0 / settings.tick_rate as f32;

    for (entity, mut pos, is_navigator, brain) in &mut agents {
        if pos.arrived() {
            continue;
        }
        let speed = if is_navigator {
            settings.navigator_speed
        } else {
            settings.runner_speed
        };
        pos.progress += speed * dt;
        if pos.progress < 1.0 {
            continue;
        }

        pos.cell = pos.target;
        pos.progress = 0.0;
        occupancy.mark_visited(pos.cell, entity);
        if let Some(mut brain) = brain {
            brain.0.note_arrival(pos.cell, map.0.size());
        }
    }
}

/// A runner standing on the border ring has left the maze.
pub fn check_escapes(
    mut commands: Commands,
    map: Res<MazeMap>,
    mut stats: ResMut<EpisodeStats>,
    mut escapes: MessageWriter<RunnerEscaped>,
    runners: Query<(Entity, &GridPos), With<Runner>>,
) {
    for (entity, pos) in &runners {
        if !pos.arrived() || map.0.is_interior(pos.cell) {
            continue;
        }
        stats.escaped += 1;
        escapes.write(RunnerEscaped {
            entity,
            cell: pos.cell,
        });
        commands.entity(entity).despawn();
        info!(
            "Runner {:?} escaped at {:?} ({}/{} this round)",
            entity, pos.cell, stats.escaped, stats.spawned
        );
    }
}

/// Rare spontaneous runner failure: the runner is destroyed and the blast
/// opens the surrounding walls.
pub fn random_failures(
    mut commands: Commands,
    mut map: ResMut<MazeMap>,
    settings: Res<SimSettings>,
    mut failures: MessageWriter<RunnerDestroyed>,
    runners: Query<(Entity, &GridPos), With<Runner>>,
) {
    let mut rng = rand::rng();
    for (entity, pos) in &runners {
        if rng.random::<f32>() >= settings.failure_chance {
            continue;
        }
        map.0.destroy_walls(pos.cell, settings.blast_radius);
        failures.write(RunnerDestroyed {
            entity,
            cell: pos.cell,
        });
        commands.entity(entity).despawn();
        warn!(
            "Runner {:?} destroyed at {:?}, walls cleared within radius {}",
            entity, pos.cell, settings.blast_radius
        );
    }
}

pub fn check_episode_goal(
    stats: Res<EpisodeStats>,
    settings: Res<SimSettings>,
    mut resets: MessageWriter<ResetEpisode>,
) {
    if stats.escaped >= settings.escape_goal {
        info!(
            "Round {} complete: {} escapes from {} spawns (rate {:.2})",
            stats.rounds,
            stats.escaped,
            stats.spawned,
            stats.escape_rate()
        );
        resets.write(ResetEpisode);
    }
}

/// Tear down the whole episode and start a new round on a fresh maze.
pub fn reset_episode(
    mut commands: Commands,
    mut resets: MessageReader<ResetEpisode>,
    settings: Res<SimSettings>,
    mut map: ResMut<MazeMap>,
    mut occupancy: ResMut<OccupancyTracker>,
    mut stats: ResMut<EpisodeStats>,
    game_entities: Query<Entity, With<GameEntity>>,
) {
    if resets.read().next().is_none() {
        return;
    }

    for entity in &game_entities {
        commands.entity(entity).despawn();
    }
    start_episode(&mut commands, &settings, &mut map, &mut occupancy, &mut stats);
}

pub fn init_episode(
    mut commands: Commands,
    settings: Res<SimSettings>,
    mut map: ResMut<MazeMap>,
    mut occupancy: ResMut<OccupancyTracker>,
    mut stats: ResMut<EpisodeStats>,
) {
    start_episode(&mut commands, &settings, &mut map, &mut occupancy, &mut stats);
}

/// Generate a maze, reset the shared episode state and spawn the navigator.
fn start_episode(
    commands: &mut Commands,
    settings: &SimSettings,
    map: &mut MazeMap,
    occupancy: &mut OccupancyTracker,
    stats: &mut EpisodeStats,
) {
    let mut rng = rand::rng();
    let grid = MazeGenerator::generate(settings, &mut rng).unwrap_or_else(|e| {
        error!("Settings rejected at episode start: {}. Using defaults", e);
        MazeGenerator::generate(&SimSettings::default(), &mut rng)
            .expect("default settings always generate")
    });

    occupancy.reset(grid.size());
    stats.start_round();

    commands.spawn((
        GameEntity,
        Agent,
        Navigator::default(),
        GridPos::at(grid.center()),
    ));

    info!(
        "Round {} started: {}x{} maze, {} exits",
        stats.rounds,
        grid.size(),
        grid.size(),
        grid.exits().len()
    );
    map.0 = grid;
}
