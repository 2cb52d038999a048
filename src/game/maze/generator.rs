use rand::Rng;

use crate::game::config::{ConfigError, SimSettings};

use super::{Cell, CellCoord, Direction, MazeGrid};

/// Randomized maze builder: recursive-backtracker carve (explicit stack, no
/// recursion-depth limit), branch injection for bushier dead ends, cycle
/// injection so the maze is not a strict tree, and multi-exit placement.
///
/// Deterministic given the supplied random source; always terminates and the
/// result always satisfies the connectivity invariant (center reaches every
/// exit). Generation cannot fail once the settings validate.
pub struct MazeGenerator;

impl MazeGenerator {
    pub fn generate(settings: &SimSettings, rng: &mut impl Rng) -> Result<MazeGrid, ConfigError> {
        settings.validate()?;

        let mut grid = MazeGrid::walled(settings.maze_size, settings.border_size);
        carve(&mut grid, settings, rng);
        inject_cycles(&mut grid, settings, rng);
        place_exits(&mut grid, settings, rng);
        Ok(grid)
    }
}

/// A carve move from `from`: the wall cell in between and the lattice cell
/// two steps away, provided the target is an uncarved interior wall.
fn carve_candidate(
    grid: &MazeGrid,
    from: CellCoord,
    dir: Direction,
) -> Option<(CellCoord, CellCoord)> {
    let mid = grid.step(from, dir)?;
    let next = grid.step(mid, dir)?;
    (grid.is_interior(next) && grid.get(next) == Cell::Wall).then_some((mid, next))
}

/// Depth-first carve over the step-by-2 lattice, starting at the center.
///
/// The stack-based walk revisits each node until no carvable neighbour
/// remains, so every lattice cell of the interior ends up `Path`. That
/// exhaustiveness is what the exit placement relies on for connectivity.
fn carve(grid: &mut MazeGrid, settings: &SimSettings, rng: &mut impl Rng) {
    let start = grid.center();
    grid.set(start, Cell::Path);

    let mut stack = vec![start];
    while let Some(&cur) = stack.last() {
        let mut dirs = Direction::ALL;
        biased_shuffle(&mut dirs, settings.branchiness, rng);

        let mut advanced = false;
        for dir in dirs {
            if let Some((mid, next)) = carve_candidate(grid, cur, dir) {
                grid.set(mid, Cell::Path);
                grid.set(next, Cell::Path);
                stack.push(next);

                // Branch injection: occasionally open one extra corridor
                // from the same node in a random direction.
                if rng.random::<f32>() < settings.branchiness {
                    let extra = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
                    if let Some((mid2, next2)) = carve_candidate(grid, cur, extra) {
                        grid.set(mid2, Cell::Path);
                        grid.set(next2, Cell::Path);
                        stack.push(next2);
                    }
                }

                advanced = true;
                break;
            }
        }

        if !advanced {
            stack.pop();
        }
    }
}

/// Fisher-Yates with a branchiness-weighted skew, matching the carve's taste
/// for longer dead ends over tight loops.
fn biased_shuffle(dirs: &mut [Direction; 4], branchiness: f32, rng: &mut impl Rng) {
    for i in (1..dirs.len()).rev() {
        let bias = if rng.random::<f32>() < branchiness {
            0.3
        } else {
            0.0
        };
        let j = ((rng.random::<f32>() * (i + 1) as f32 + bias * i as f32) as usize) % dirs.len();
        dirs.swap(i, j);
    }
}

/// Punch loops into the carved tree: sample O(size) interior cells and open
/// each sampled wall that already touches at least two paths. Without these
/// cycles the crowd-avoidance heuristic would have nothing to choose between.
fn inject_cycles(grid: &mut MazeGrid, settings: &SimSettings, rng: &mut impl Rng) {
    let size = grid.size();
    let border = grid.border();
    let span = size - 2 * border;
    let attempts = (size as f32 * settings.extra_path_factor) as usize;

    for _ in 0..attempts {
        let cell = CellCoord::new(
            border + rng.random_range(0..span),
            border + rng.random_range(0..span),
        );
        if grid.get(cell) != Cell::Wall {
            continue;
        }
        let open_neighbours = Direction::ALL
            .iter()
            .filter(|&&dir| {
                grid.step(cell, dir)
                    .is_some_and(|n| grid.get(n) == Cell::Path)
            })
            .count();
        if open_neighbours >= 2 {
            grid.set(cell, Cell::Path);
        }
    }
}

/// Place exits round-robin over the four sides, snapped onto the boundary
/// between carved interior and border ring, away from the corners.
///
/// Each exit is force-connected inward by clearing its straight-in neighbour
/// plus one lateral cell; together with the exhaustive lattice carve that
/// guarantees a path from the center, whatever the grid parity.
fn place_exits(grid: &mut MazeGrid, settings: &SimSettings, rng: &mut impl Rng) {
    let size = grid.size();
    let border = grid.border();

    // Corner margin, clamped so tiny grids still get a valid range.
    let margin = settings.exit_margin.min((size - 2 * border - 1) / 2);
    let min = border + margin;
    let max = size - border - margin;

    for i in 0..settings.exit_count {
        let along = if max > min {
            rng.random_range(min..max)
        } else {
            min
        };

        // Sides in order: top, right, bottom, left.
        let side = i % 4;
        let exit = match side {
            0 => CellCoord::new(along, border),
            1 => CellCoord::new(size - border - 1, along),
            2 => CellCoord::new(along, size - border - 1),
            _ => CellCoord::new(border, along),
        };
        let (inward, lateral) = match side {
            0 => (Direction::South, Direction::West),
            1 => (Direction::West, Direction::South),
            2 => (Direction::North, Direction::East),
            _ => (Direction::East, Direction::North),
        };

        grid.set(exit, Cell::Path);
        if let Some(first) = grid.step(exit, inward) {
            grid.set(first, Cell::Path);
            if let Some(second) = grid.step(first, lateral) {
                if grid.is_interior(second) {
                    grid.set(second, Cell::Path);
                }
            }
        }
        grid.add_exit(exit);
    }
}
