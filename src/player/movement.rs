//! Side-scrolling player movement and camera follow.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use crate::combat::{AttackThrottle, Health, HurtThrottle};
use crate::core::{ClipPlayer, ClipSheets, GameState, SoundEvent};
use crate::enemies::Facing;

const JUMP_VOLUME: f64 = 0.3;

/// How far below the collider the ground probe reaches.
const GROUND_PROBE: f32 = 4.0;

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app
        .init_resource::<PlayerConfig>()
        .add_systems(
            Update,
            (ground_check, player_movement, camera_follow)
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

/// Probe for ground right under the player's feet.
fn ground_check(
    config: Res<PlayerConfig>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<(Entity, &Transform, &mut PlayerMotion), With<Player>>,
) {
    let Ok((player_entity, transform, mut motion)) = player_query.get_single_mut() else {
        return;
    };

    motion.grounded = if let Ok(context) = rapier_context.get_single() {
        let ray_origin = transform.translation.truncate() - Vec2::Y * (config.half_size.y - 1.0);
        context
            .cast_ray(
                ray_origin,
                Vec2::NEG_Y,
                GROUND_PROBE + 1.0,
                true,
                QueryFilter::default()
                    .exclude_collider(player_entity)
                    .groups(CollisionGroups::new(PLAYER_GROUP, Group::ALL)),
            )
            .is_some()
    } else {
        // Fallback: assume grounded if no physics context
        true
    };
}

/// Arrow keys run and jump. No input on the ground means idle.
pub fn player_movement(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut sounds: EventWriter<SoundEvent>,
    mut player_query: Query<
        (&Health, &mut Velocity, &mut PlayerMotion, &mut ClipPlayer, &mut Sprite),
        With<Player>,
    >,
) {
    let Some(keyboard) = keyboard else {
        return;
    };
    let Ok((health, mut velocity, mut motion, mut clips, mut sprite)) = player_query.get_single_mut()
    else {
        return;
    };

    if health.is_dead() {
        return;
    }

    let dt = time.delta_secs();
    let attacking = clips.is_playing("attack");
    let mut moved = false;

    // Right wins when both directions are held
    let direction = if keyboard.pressed(KeyCode::ArrowRight) {
        Some(Facing::Right)
    } else if keyboard.pressed(KeyCode::ArrowLeft) {
        Some(Facing::Left)
    } else {
        None
    };

    if let Some(facing) = direction {
        moved = true;
        if !attacking {
            if motion.grounded {
                clips.play("run");
            }
            motion.facing = facing;
            velocity.linvel.x = run_velocity(
                velocity.linvel.x,
                facing.sign(),
                config.acceleration,
                config.max_run_speed,
                dt,
            );
        }
    }

    if keyboard.pressed(KeyCode::ArrowUp) {
        moved = true;
        if !attacking {
            if let Some(kind) = motion.press_jump(time.elapsed(), config.double_jump_window) {
                velocity.linvel.y = match kind {
                    JumpKind::Jump => config.jump_speed,
                    JumpKind::DoubleJump => (config.jump_speed * config.double_jump_multiplier).round(),
                };
                clips.restart("jump");
                if let Some(path) = &config.jump_sound {
                    sounds.send(SoundEvent::new(path.clone()).with_volume(JUMP_VOLUME));
                }
            }
        }
    } else {
        motion.release_jump();
    }

    if !moved && motion.grounded && !attacking {
        clips.play("idle");
        velocity.linvel.x = 0.0;
    }

    sprite.flip_x = motion.facing == Facing::Left;
}

/// Keep the camera centred on the player.
fn camera_follow(
    player_query: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut camera_query: Query<&mut Transform, (With<Camera2d>, Without<Player>)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let Ok(mut camera_transform) = camera_query.get_single_mut() else {
        return;
    };

    camera_transform.translation.x = player_transform.translation.x;
    camera_transform.translation.y = player_transform.translation.y;
}

/// Components of a freshly spawned player, without sprite sheets.
pub fn player_bundle(config: &PlayerConfig, position: Vec2) -> impl Bundle {
    let mut clips = ClipPlayer::new(config.clips.clone());
    clips.play("idle");

    (
        Player,
        PlayerMotion::default(),
        Health::new(config.max_health),
        HurtThrottle::new(config.hurt_cooldown),
        AttackThrottle::new(config.attack_cooldown),
        clips,
        Sprite {
            custom_size: Some(config.half_size * 2.0),
            ..default()
        },
        Transform::from_translation(position.extend(10.0)),
        RigidBody::Dynamic,
        Collider::cuboid(config.half_size.x, config.half_size.y),
        CollisionGroups::new(PLAYER_GROUP, Group::ALL),
        LockedAxes::ROTATION_LOCKED,
        Velocity::zero(),
        ActiveEvents::COLLISION_EVENTS,
        CollidingEntities::default(),
    )
}

/// Spawn the player entity with its sprite sheets.
pub fn spawn_player(
    commands: &mut Commands,
    config: &PlayerConfig,
    position: Vec2,
    asset_server: &AssetServer,
    layouts: &mut Assets<TextureAtlasLayout>,
) -> Entity {
    let sheets = ClipSheets::load(asset_server, layouts, &config.texture_prefix, &config.clips);

    let player = commands
        .spawn(player_bundle(config, position))
        .insert(sheets)
        .id();

    info!("Spawned player at ({}, {})", position.x, position.y);
    player
}
