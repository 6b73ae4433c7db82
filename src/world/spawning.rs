//! Entity spawning functions for level construction.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::data::{LevelDefinition, Platform};
use crate::enemies::{spawn_enemy, EnemyRegistry};
use crate::player::{spawn_player, PlayerConfig};

/// Marker for everything a level spawned, removed when the level reloads.
#[derive(Component)]
pub struct LevelEntity;

/// Spawn the game camera.
pub fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Spawn one fixed collider.
pub fn spawn_platform(commands: &mut Commands, platform: &Platform, color: Color) -> Entity {
    let half = platform.half_size();
    commands
        .spawn((
            LevelEntity,
            Sprite {
                color,
                custom_size: Some(half * 2.0),
                ..default()
            },
            Transform::from_translation(platform.center().extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            Friction::coefficient(1.0),
        ))
        .id()
}

/// Spawn an invisible, frictionless wall so bodies slide along it.
pub fn spawn_wall(commands: &mut Commands, wall: &Platform) -> Entity {
    let half = wall.half_size();
    commands
        .spawn((
            LevelEntity,
            Transform::from_translation(wall.center().extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
        ))
        .id()
}

/// Spawn ground, platforms, side walls, player and enemies of `level`.
pub fn spawn_level(
    commands: &mut Commands,
    level: &LevelDefinition,
    enemy_registry: &EnemyRegistry,
    player_config: &PlayerConfig,
    asset_server: &AssetServer,
    layouts: &mut Assets<TextureAtlasLayout>,
) {
    info!("Building level: {}", level.name);

    spawn_platform(commands, &level.ground(), Color::srgb(0.25, 0.2, 0.15));
    for platform in &level.platforms {
        spawn_platform(commands, platform, Color::srgb(0.35, 0.3, 0.25));
    }
    for wall in &level.walls() {
        spawn_wall(commands, wall);
    }

    let mut spawned = 0;
    for spawn in &level.enemies {
        match spawn_enemy(commands, enemy_registry, spawn, &level.name, asset_server, layouts) {
            Ok(enemy) => {
                commands.entity(enemy).insert(LevelEntity);
                spawned += 1;
            }
            Err(e) => warn!("{}", e),
        }
    }
    info!("Spawned {} of {} enemies", spawned, level.enemies.len());

    // Enemies first so the player is drawn and updated on top of them
    let player = spawn_player(
        commands,
        player_config,
        level.player_spawn(),
        asset_server,
        layouts,
    );
    commands.entity(player).insert(LevelEntity);
}
