use bevy::prelude::*;

use crate::game::maze::MazeGrid;

/// Monotonic fixed-update counter, incremented once per simulation tick
/// before any game system runs.
#[derive(Resource, Default, Debug)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

/// The episode's maze. Replaced wholesale on reset, mutated in place only by
/// wall destruction.
#[derive(Resource, Default, Debug)]
pub struct MazeMap(pub MazeGrid);

/// Episode progress counters.
#[derive(Resource, Default, Debug)]
pub struct EpisodeStats {
    pub spawned: u32,
    pub escaped: u32,
    pub rounds: u32,
}

impl EpisodeStats {
    /// Fraction of spawned runners that made it out this episode.
    pub fn escape_rate(&self) -> f32 {
        if self.spawned == 0 {
            0.0
        } else {
            self.escaped as f32 / self.spawned as f32
        }
    }

    pub fn start_round(&mut self) {
        self.spawned = 0;
        self.escaped = 0;
        self.rounds += 1;
    }
}
