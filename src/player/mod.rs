//! Player module - the knight the enemies hunt.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{player_bundle, spawn_player};
pub use plugin::PlayerPlugin;
