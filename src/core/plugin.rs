//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::animation::{advance_clips, sync_clip_sprites};
use super::events::*;
use super::states::*;
use super::tween::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused, GameOver)
/// - Global events (DamageEvent, DeathEvent, SoundEvent, etc.)
/// - Clip playback and bar tweening
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<EnemyDestroyed>()
            .add_event::<SoundEvent>()
            .add_event::<ClipFinished>()

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused)))
            )

            // Physics and the game clock stop while paused
            .add_systems(OnEnter(GameState::Paused), freeze_world)
            .add_systems(OnExit(GameState::Paused), thaw_world)

            // Animations freeze while paused
            .add_systems(
                Update,
                (advance_clips, sync_clip_sprites)
                    .chain()
                    .run_if(not(in_state(GameState::Paused))),
            )

            // Bar widths (runs for all game states)
            .add_systems(Update, update_width_tweens);
    }
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}

/// Stop the physics step and the virtual clock.
///
/// Deadlines and cooldowns are measured on the virtual clock, so they hold
/// still for the length of the pause.
fn freeze_world(mut time: ResMut<Time<Virtual>>, mut configs: Query<&mut RapierConfiguration>) {
    time.pause();
    for mut config in configs.iter_mut() {
        config.physics_pipeline_active = false;
    }
    info!("Game paused");
}

fn thaw_world(mut time: ResMut<Time<Virtual>>, mut configs: Query<&mut RapierConfiguration>) {
    time.unpause();
    for mut config in configs.iter_mut() {
        config.physics_pipeline_active = true;
    }
    info!("Game resumed");
}
