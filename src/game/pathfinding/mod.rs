mod bfs;
mod decision;

#[cfg(test)]
mod tests;

pub use bfs::find_exit_path;
pub use decision::{DecisionEngine, RunnerMind};
