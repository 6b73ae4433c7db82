//! World plugin - level loading and setup.

use std::path::Path;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::GameState;
use crate::enemies::data::load_enemy_definitions;
use crate::enemies::EnemyRegistry;
use crate::player::PlayerConfig;

use super::data::{load_level, LevelDefinition, LEVEL_PATH};
use super::spawning::{spawn_camera, spawn_level, LevelEntity};

/// Leaving `Loading` for `InGame`, as opposed to resuming from a pause.
const LEVEL_STARTED: OnTransition<GameState> = OnTransition {
    exited: GameState::Loading,
    entered: GameState::InGame,
};

/// The level currently being played.
#[derive(Resource, Default)]
pub struct CurrentLevel(pub LevelDefinition);

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentLevel>()
            .add_systems(Startup, spawn_camera)
            // Entering Loading (at startup or on retry) rebuilds the level
            .add_systems(
                OnEnter(GameState::Loading),
                (cleanup_level, setup_level, start_game)
                    .chain()
                    .after(load_enemy_definitions),
            )
            // The physics context may not exist yet while loading
            .add_systems(LEVEL_STARTED, apply_gravity);
    }
}

/// Load the level file and spawn its contents.
///
/// A broken level file is logged and replaced by an empty level.
pub fn setup_level(
    mut commands: Commands,
    mut current_level: ResMut<CurrentLevel>,
    enemy_registry: Res<EnemyRegistry>,
    player_config: Res<PlayerConfig>,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let level = match load_level(Path::new(LEVEL_PATH)) {
        Ok(level) => level,
        Err(e) => {
            error!("{}", e);
            LevelDefinition::default()
        }
    };

    spawn_level(
        &mut commands,
        &level,
        &enemy_registry,
        &player_config,
        &asset_server,
        &mut layouts,
    );
    current_level.0 = level;
}

/// Apply the level's gravity to the physics world.
fn apply_gravity(current_level: Res<CurrentLevel>, mut configs: Query<&mut RapierConfiguration>) {
    for mut config in configs.iter_mut() {
        config.gravity = Vec2::new(0.0, -current_level.0.gravity);
    }
}

fn start_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Remove the entities of a previous run.
fn cleanup_level(mut commands: Commands, level_query: Query<Entity, With<LevelEntity>>) {
    for entity in level_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;

    #[test]
    fn test_gravity_applied_on_level_start_only() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<GameState>()
            .insert_resource(CurrentLevel(LevelDefinition {
                gravity: 2000.0,
                ..default()
            }))
            .add_systems(LEVEL_STARTED, apply_gravity);
        let physics = app.world_mut().spawn(RapierConfiguration::new(100.0)).id();
        app.update();

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::InGame);
        app.update();
        let config = app.world().get::<RapierConfiguration>(physics).unwrap();
        assert_eq!(config.gravity, Vec2::new(0.0, -2000.0));

        // Resuming from a pause leaves the physics world alone
        app.world_mut()
            .get_mut::<RapierConfiguration>(physics)
            .unwrap()
            .gravity = Vec2::ZERO;
        for state in [GameState::Paused, GameState::InGame] {
            app.world_mut()
                .resource_mut::<NextState<GameState>>()
                .set(state);
            app.update();
        }
        let config = app.world().get::<RapierConfiguration>(physics).unwrap();
        assert_eq!(config.gravity, Vec2::ZERO);
    }
}
