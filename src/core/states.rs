//! Game state definitions that control the overall flow of the game.
//!
//! Enemy AI, player input and combat only run in `InGame`. `Paused` keeps the
//! world visible but frozen.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while enemy and level data are read
/// - Enter `InGame` once the level is spawned
/// - `Paused` freezes gameplay but keeps the world visible
/// - `GameOver` when the player dies
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Loading data files and spawning the level
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Player has died
    GameOver,
}
