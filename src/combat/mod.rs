//! Combat module - player attacks, throttles and damage.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::CombatPlugin;
pub use systems::{strike_targets, CombatSet};
