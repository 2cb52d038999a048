use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid simulation configuration. All variants are fatal at construction
/// time: settings are validated before any maze generation starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("maze size must be an odd number >= 5, got {0}")]
    InvalidMazeSize(usize),
    #[error("maze size {size} leaves no interior inside a border of {border}")]
    InvalidBorder { size: usize, border: usize },
    #[error("exit count must be at least 1, got {0}")]
    InvalidExitCount(usize),
}

/// Static simulation settings loaded once at startup. Grid size, speeds and
/// decision-policy tunables that hold for a whole episode. Multiple episodes
/// or test instances can each carry their own copy.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
pub struct SimSettings {
    // Simulation timing
    pub tick_rate: f64,

    // Maze generation
    pub maze_size: usize,
    pub border_size: usize,
    pub exit_count: usize,
    pub exit_margin: usize,
    /// Shuffle bias toward longer dead-end branches, 0.0 - 1.0. Aesthetic
    /// tunable, not a correctness knob.
    pub branchiness: f32,
    /// Cycle-injection sample count as a fraction of the maze side length.
    pub extra_path_factor: f32,

    // Decision engine
    pub exit_seek_chance: f32,
    pub path_recompute_chance: f32,
    pub stuck_threshold: u32,
    pub crowd_radius: usize,
    pub crowd_pick_top: usize,

    // Agents
    pub navigator_speed: f32,
    pub runner_speed: f32,
    pub max_runners: usize,
    pub spawn_chance: f32,

    // Hazards
    pub failure_chance: f32,
    pub blast_radius: usize,

    // Episode control
    pub escape_goal: u32,
}

impl SimSettings {
    /// Validate the generation-relevant settings. Must pass before a maze is
    /// built; generation itself cannot fail afterwards.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maze_size < 5 || self.maze_size % 2 == 0 {
            return Err(ConfigError::InvalidMazeSize(self.maze_size));
        }
        if self.maze_size <= 2 * self.border_size {
            return Err(ConfigError::InvalidBorder {
                size: self.maze_size,
                border: self.border_size,
            });
        }
        if self.exit_count == 0 {
            return Err(ConfigError::InvalidExitCount(self.exit_count));
        }
        Ok(())
    }
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            maze_size: 61,
            border_size: 2,
            exit_count: 8,
            exit_margin: 5,
            branchiness: 0.7,
            extra_path_factor: 0.5,
            exit_seek_chance: 0.7,
            path_recompute_chance: 0.1,
            stuck_threshold: 3,
            crowd_radius: 2,
            crowd_pick_top: 2,
            navigator_speed: 9.0,
            runner_speed: 2.5,
            max_runners: 100,
            spawn_chance: 0.01,
            failure_chance: 0.00008,
            blast_radius: 3,
            escape_goal: 50,
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        // PreStartup so episode setup in Startup sees the loaded values.
        app.init_resource::<SimSettings>()
            .add_systems(PreStartup, load_settings);
    }
}

/// Load settings synchronously at startup. Anything episode setup depends on
/// must be in place before the first maze is generated.
pub fn load_settings(mut commands: Commands) {
    let settings_path = "assets/sim_config.ron";

    match std::fs::read_to_string(settings_path) {
        Ok(contents) => match ron::from_str::<SimSettings>(&contents) {
            Ok(settings) => {
                if let Err(e) = settings.validate() {
                    error!("Rejecting {}: {}", settings_path, e);
                    error!("Using default SimSettings");
                    commands.insert_resource(SimSettings::default());
                } else {
                    info!("Loaded settings from {}", settings_path);
                    commands.insert_resource(settings);
                }
            }
            Err(e) => {
                error!("Failed to parse settings: {}", e);
                error!("Using default SimSettings");
                commands.insert_resource(SimSettings::default());
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", settings_path, e);
            error!("Using default SimSettings");
            commands.insert_resource(SimSettings::default());
        }
    }
}
