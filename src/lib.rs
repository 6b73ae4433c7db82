//! Teravia - a 2D side-scroller where a knight fights patrolling cats.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, clip playback, tweens
//! - **Player**: Running, jumping, camera follow
//! - **Combat**: Player attacks, damage on the player
//! - **Enemies**: Engagement state machine, enemy definitions and spawning
//! - **World**: Level loading, ground and platforms
//! - **Audio**: Sound effects
//! - **UI**: HUD, enemy health bars, pause and game over screens

pub mod audio;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct TeraviaPlugin;

impl Plugin for TeraviaPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Audio systems
            .add_plugins(audio::GameAudioPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
