use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

use super::*;
use crate::game::config::SimSettings;
use crate::game::maze::{Cell, CellCoord, Direction, MazeGenerator, MazeGrid};
use crate::game::occupancy::OccupancyTracker;

/// Walled 11x11 grid with a single vertical corridor at x = 5 and an exit at
/// the corridor's top end.
fn corridor_grid() -> MazeGrid {
    let mut grid = MazeGrid::walled(11, 2);
    for y in 2..=8 {
        grid.set(CellCoord::new(5, y), Cell::Path);
    }
    grid.add_exit(CellCoord::new(5, 2));
    grid
}

fn explore_settings() -> SimSettings {
    SimSettings {
        exit_seek_chance: 0.0,
        crowd_pick_top: 1,
        ..Default::default()
    }
}

#[test]
fn corridor_path_is_straight_north() {
    let grid = corridor_grid();
    let mut rng = StdRng::seed_from_u64(7);

    let path = find_exit_path(&grid, CellCoord::new(5, 8), &mut rng);

    assert_eq!(path.len(), 6);
    assert!(path.iter().all(|&d| d == Direction::North));
}

#[test]
fn path_from_an_exit_is_empty() {
    let grid = corridor_grid();
    let mut rng = StdRng::seed_from_u64(7);

    assert!(find_exit_path(&grid, CellCoord::new(5, 2), &mut rng).is_empty());
}

#[test]
fn unreachable_exit_yields_empty_path() {
    // Corridor grid but with no exits declared at all.
    let mut grid = MazeGrid::walled(11, 2);
    for y in 3..=7 {
        grid.set(CellCoord::new(5, y), Cell::Path);
    }
    let mut rng = StdRng::seed_from_u64(7);

    assert!(find_exit_path(&grid, CellCoord::new(5, 5), &mut rng).is_empty());
}

#[test]
fn generated_maze_paths_end_on_an_exit() {
    let settings = SimSettings {
        maze_size: 31,
        ..Default::default()
    };
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = MazeGenerator::generate(&settings, &mut rng).unwrap();

        let path = find_exit_path(&grid, grid.center(), &mut rng);
        assert!(!path.is_empty(), "seed {seed}: no path from center");

        let mut cell = grid.center();
        for &dir in &path {
            cell = grid.step(cell, dir).expect("path walked off the grid");
            assert!(grid.is_path(cell), "seed {seed}: path crosses a wall");
        }
        assert!(grid.is_exit(cell), "seed {seed}: path ends off-exit");
    }
}

#[test]
fn empty_legal_set_is_a_no_move() {
    let grid = corridor_grid();
    let occupancy = OccupancyTracker::new(grid.size());
    let settings = SimSettings::default();
    let engine = DecisionEngine::new(&grid, &occupancy, &settings);
    let mut mind = RunnerMind::default();
    let mut rng = StdRng::seed_from_u64(7);

    let choice = engine.choose_direction(
        Entity::from_bits(1),
        &mut mind,
        CellCoord::new(5, 5),
        &[],
        &mut rng,
    );

    assert_eq!(choice, None);
}

#[test]
fn choices_stay_within_the_legal_set() {
    let settings = SimSettings {
        maze_size: 21,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(11);
    let grid = MazeGenerator::generate(&settings, &mut rng).unwrap();
    let occupancy = OccupancyTracker::new(grid.size());
    let engine = DecisionEngine::new(&grid, &occupancy, &settings);
    let agent = Entity::from_bits(1);
    let mut mind = RunnerMind::default();

    let mut cell = grid.center();
    for _ in 0..500 {
        let legal: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| grid.step(cell, d).is_some_and(|n| grid.is_path(n)))
            .collect();
        let Some(choice) = engine.choose_direction(agent, &mut mind, cell, &legal, &mut rng)
        else {
            panic!("no move from a path cell with open neighbours");
        };
        assert!(legal.contains(&choice));
        cell = grid.step(cell, choice).unwrap();
        if !grid.is_interior(cell) {
            // Escaped; start a fresh walk.
            cell = grid.center();
            mind = RunnerMind::default();
        }
    }
}

#[test]
fn blocked_cached_step_falls_through_to_exploration() {
    let grid = corridor_grid();
    let occupancy = OccupancyTracker::new(grid.size());
    let settings = SimSettings {
        exit_seek_chance: 1.0,
        path_recompute_chance: 0.0,
        ..Default::default()
    };
    let engine = DecisionEngine::new(&grid, &occupancy, &settings);
    let mut mind = RunnerMind {
        cached_path: VecDeque::from([Direction::North]),
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(7);

    let choice = engine.choose_direction(
        Entity::from_bits(1),
        &mut mind,
        CellCoord::new(5, 5),
        &[Direction::South],
        &mut rng,
    );

    // The cached step was spent even though it could not be taken.
    assert_eq!(choice, Some(Direction::South));
    assert!(mind.cached_path.is_empty());
}

#[test]
fn unvisited_cells_are_preferred() {
    let grid = MazeGrid::open(11, 2);
    let mut occupancy = OccupancyTracker::new(grid.size());
    let agent = Entity::from_bits(1);
    // The eastern neighbour has been visited before, the northern one not.
    occupancy.mark_visited(CellCoord::new(6, 5), agent);

    let settings = explore_settings();
    let engine = DecisionEngine::new(&grid, &occupancy, &settings);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let mut mind = RunnerMind::default();
        let choice = engine.choose_direction(
            agent,
            &mut mind,
            CellCoord::new(5, 5),
            &[Direction::North, Direction::East],
            &mut rng,
        );
        assert_eq!(choice, Some(Direction::North));
    }
}

#[test]
fn crowded_neighbourhoods_are_avoided() {
    let grid = MazeGrid::open(11, 2);
    let mut occupancy = OccupancyTracker::new(grid.size());
    let agent = Entity::from_bits(1);
    // Both destinations already visited, so crowd score decides. Pile other
    // agents around the eastern neighbour.
    occupancy.mark_visited(CellCoord::new(5, 4), agent);
    occupancy.mark_visited(CellCoord::new(6, 5), agent);
    for bits in 2..8 {
        occupancy.mark_visited(CellCoord::new(8, 5), Entity::from_bits(bits));
    }

    let settings = explore_settings();
    let engine = DecisionEngine::new(&grid, &occupancy, &settings);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let mut mind = RunnerMind::default();
        let choice = engine.choose_direction(
            agent,
            &mut mind,
            CellCoord::new(5, 5),
            &[Direction::North, Direction::East],
            &mut rng,
        );
        assert_eq!(choice, Some(Direction::North));
    }
}

#[test]
fn stuck_counter_drops_the_cached_path() {
    let grid = corridor_grid();
    let occupancy = OccupancyTracker::new(grid.size());
    let settings = SimSettings {
        exit_seek_chance: 0.0,
        stuck_threshold: 3,
        ..Default::default()
    };
    let engine = DecisionEngine::new(&grid, &occupancy, &settings);
    let mut mind = RunnerMind {
        cached_path: VecDeque::from([Direction::North, Direction::North]),
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(7);
    let cell = CellCoord::new(5, 5);

    // Deciding from the same cell over and over crosses the threshold.
    for _ in 0..6 {
        let _ = engine.choose_direction(
            Entity::from_bits(1),
            &mut mind,
            cell,
            &[Direction::South],
            &mut rng,
        );
    }

    assert!(mind.cached_path.is_empty());
}

#[test]
fn boxed_in_runner_still_sheds_its_cached_path() {
    let grid = corridor_grid();
    let occupancy = OccupancyTracker::new(grid.size());
    let settings = SimSettings {
        stuck_threshold: 3,
        ..Default::default()
    };
    let engine = DecisionEngine::new(&grid, &occupancy, &settings);
    let mut mind = RunnerMind {
        cached_path: VecDeque::from([Direction::North, Direction::North]),
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(7);
    let cell = CellCoord::new(5, 5);

    // No legal move at all, tick after tick. The no-move sentinel must not
    // bypass the stuck bookkeeping.
    for _ in 0..5 {
        let choice =
            engine.choose_direction(Entity::from_bits(1), &mut mind, cell, &[], &mut rng);
        assert_eq!(choice, None);
    }

    assert!(mind.cached_path.is_empty());
}
