//! Enemy spawning from level spawn points.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use serde::Deserialize;

use super::components::{Enemy, EnemyCapabilities, EnemyKind};
use super::data::{EnemyDefinition, EnemyRegistry};
use super::engagement::{EnemyClip, Engagement, Facing, PatrolBounds};
use crate::core::{ClipPlayer, ClipSheets};
use crate::world::DataLoadError;

/// Enemies are drawn in front of the level but behind the player.
const ENEMY_Z: f32 = 5.0;

/// One enemy placement in a level file.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct EnemySpawn {
    /// Key into the [`EnemyRegistry`]
    pub kind: String,
    /// Left end of the patrol
    pub x_min: f32,
    pub y: f32,
    #[serde(default)]
    pub facing: Facing,
}

/// Components of a freshly spawned enemy, without sprite sheets.
///
/// The enemy starts at the patrol end it walks away from, already moving.
pub fn enemy_bundle(definition: &EnemyDefinition, spawn: &EnemySpawn) -> impl Bundle {
    let bounds = PatrolBounds::from_origin(spawn.x_min, definition.patrol_range);
    let engagement = Engagement::new(definition.to_config(), bounds, spawn.facing);
    let velocity = Velocity::linear(Vec2::new(engagement.velocity_x(), 0.0));
    let position = Vec3::new(bounds.start_x(spawn.facing), spawn.y, ENEMY_Z);

    let mut clips = ClipPlayer::new(definition.clips.clone());
    clips.play(EnemyClip::Walk.name());

    let collider = &definition.collider;

    (
        (
            Enemy,
            EnemyKind(spawn.kind.clone()),
            EnemyCapabilities::from_definition(definition),
            engagement,
            clips,
        ),
        Sprite {
            flip_x: spawn.facing == Facing::Left,
            custom_size: Some(Vec2::new(collider.half_width, collider.half_height) * 2.0),
            ..default()
        },
        Transform::from_translation(position),
        RigidBody::Dynamic,
        Collider::cuboid(collider.half_width, collider.half_height),
        LockedAxes::ROTATION_LOCKED,
        velocity,
        ActiveEvents::COLLISION_EVENTS,
        CollidingEntities::default(),
    )
}

/// Spawn one enemy with its sprite sheets.
pub fn spawn_enemy(
    commands: &mut Commands,
    registry: &EnemyRegistry,
    spawn: &EnemySpawn,
    level: &str,
    asset_server: &AssetServer,
    layouts: &mut Assets<TextureAtlasLayout>,
) -> Result<Entity, DataLoadError> {
    let definition = registry
        .get(&spawn.kind)
        .ok_or_else(|| DataLoadError::UnknownEnemyKind {
            kind: spawn.kind.clone(),
            level: level.to_string(),
        })?;

    let sheets = ClipSheets::load(
        asset_server,
        layouts,
        &definition.texture_prefix,
        &definition.clips,
    );

    let enemy = commands
        .spawn(enemy_bundle(definition, spawn))
        .insert(sheets)
        .id();

    info!(
        "Spawned {} at ({}, {}) facing {:?}",
        definition.name, spawn.x_min, spawn.y, spawn.facing
    );
    Ok(enemy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> EnemyDefinition {
        EnemyDefinition::from_ron(
            r#"(
                name: "Cat",
                texture_prefix: "cat",
                patrol_range: 300.0,
                clips: { "walk": (frames: 10, fps: 15.0, looping: true) },
            )"#,
            "cat.ron",
        )
        .unwrap()
    }

    #[test]
    fn test_spawn_from_ron() {
        let spawn: EnemySpawn = ron::from_str(r#"(kind: "cat", x_min: 400.0, y: 120.0)"#).unwrap();
        assert_eq!(spawn.facing, Facing::Right);

        let spawn: EnemySpawn =
            ron::from_str(r#"(kind: "cat", x_min: 400.0, y: 120.0, facing: Left)"#).unwrap();
        assert_eq!(spawn.facing, Facing::Left);
    }

    #[test]
    fn test_bundle_starts_at_far_end_when_facing_left() {
        let mut world = World::new();
        let spawn = EnemySpawn {
            kind: "cat".to_string(),
            x_min: 400.0,
            y: 120.0,
            facing: Facing::Left,
        };
        let entity = world.spawn(enemy_bundle(&definition(), &spawn)).id();

        let transform = world.get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation.x, 700.0);
        assert_eq!(transform.translation.y, 120.0);

        let engagement = world.get::<Engagement>(entity).unwrap();
        assert_eq!(engagement.bounds(), PatrolBounds { min: 400.0, max: 700.0 });
        assert_eq!(engagement.velocity_x(), -100.0);
        assert_eq!(world.get::<Velocity>(entity).unwrap().linvel.x, -100.0);
        assert!(world.get::<Sprite>(entity).unwrap().flip_x);
        assert!(world.get::<ClipPlayer>(entity).unwrap().is_playing("walk"));
        assert_eq!(world.get::<EnemyKind>(entity).unwrap().0, "cat");
    }
}
