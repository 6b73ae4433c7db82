//! World module - levels, ground and spawn points.

mod data;
mod error;
mod plugin;
mod spawning;

pub use data::{load_level, LevelDefinition, Platform, LEVEL_PATH, WALL_THICKNESS};
pub use error::DataLoadError;
pub use plugin::{setup_level, CurrentLevel, WorldPlugin};
pub use spawning::LevelEntity;
