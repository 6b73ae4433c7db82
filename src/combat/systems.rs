//! Combat systems - player attacks and damage on the player.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use crate::core::{ClipFinished, ClipPlayer, GameState, SoundEvent};
use crate::enemies::{Engagement, Enemy, Facing};
use crate::player::{Player, PlayerConfig, PlayerMotion};

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Input,
    Damage,
    Feedback,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        // System ordering
        .configure_sets(
            Update,
            (CombatSet::Input, CombatSet::Damage, CombatSet::Feedback)
                .chain()
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(Update, player_attack.in_set(CombatSet::Input))
        .add_systems(Update, apply_player_damage.in_set(CombatSet::Damage))
        .add_systems(
            Update,
            (fade_hurt_flash, enter_game_over).in_set(CombatSet::Feedback),
        );
}

/// Entities within `reach` of `origin` on the side `facing` looks at.
pub fn strike_targets(
    origin: Vec2,
    facing: Facing,
    reach: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec2)>,
) -> Vec<Entity> {
    candidates
        .into_iter()
        .filter(|(_, position)| {
            Facing::toward(origin.x, position.x) == Some(facing) && origin.distance(*position) < reach
        })
        .map(|(entity, _)| entity)
        .collect()
}

/// Space swings the weapon and hits every live enemy in front of the player.
fn player_attack(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<
        (
            Entity,
            &Transform,
            &Health,
            &PlayerMotion,
            &mut AttackThrottle,
            &mut ClipPlayer,
            &mut Velocity,
        ),
        With<Player>,
    >,
    enemy_query: Query<(Entity, &Transform, &Engagement), (With<Enemy>, Without<Player>)>,
    mut damage_events: EventWriter<DamageEvent>,
    mut sounds: EventWriter<SoundEvent>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };
    if !keyboard.just_pressed(KeyCode::Space) {
        return;
    }

    let Ok((player, transform, health, motion, mut throttle, mut clips, mut velocity)) =
        player_query.get_single_mut()
    else {
        return;
    };

    if health.is_dead() || !throttle.0.try_fire(time.elapsed()) {
        return;
    }

    // No attacks mid-air
    if !motion.grounded {
        return;
    }

    clips.restart("attack");
    velocity.linvel.x = (velocity.linvel.x / 2.0).round();
    if let Some(path) = &config.attack_sound {
        sounds.send(SoundEvent::new(path.clone()));
    }

    let origin = transform.translation.truncate();
    let candidates = enemy_query
        .iter()
        .filter(|(_, _, engagement)| engagement.is_alive())
        .map(|(entity, enemy_transform, _)| (entity, enemy_transform.translation.truncate()));

    for target in strike_targets(origin, motion.facing, config.attack_reach, candidates) {
        damage_events.send(DamageEvent {
            target,
            source: player,
        });
    }
}

/// Apply enemy strikes to the player, at most one per hurt interval.
pub fn apply_player_damage(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut damage_events: EventReader<DamageEvent>,
    mut death_events: EventWriter<DeathEvent>,
    mut player_query: Query<
        (
            Entity,
            &mut Health,
            &mut HurtThrottle,
            &mut ClipPlayer,
            Option<&mut Velocity>,
            Option<&mut Sprite>,
        ),
        With<Player>,
    >,
) {
    let Ok((player, mut health, mut throttle, mut clips, mut velocity, mut sprite)) =
        player_query.get_single_mut()
    else {
        damage_events.clear();
        return;
    };

    for event in damage_events.read() {
        if event.target != player || health.is_dead() {
            continue;
        }
        if !throttle.0.try_fire(time.elapsed()) {
            continue;
        }

        health.take_damage(config.hurt_damage);

        if health.is_dead() {
            clips.play("dead");
            if let Some(velocity) = velocity.as_mut() {
                velocity.linvel.x = 0.0;
            }
            death_events.send(DeathEvent { entity: player });
            info!("Player killed by {:?}", event.source);
        } else if let Some(sprite) = sprite.as_mut() {
            sprite.color = Color::srgb(1.0, 0.0, 0.0);
            commands.entity(player).insert(HurtFlash(Timer::new(
                config.hurt_flash,
                TimerMode::Once,
            )));
        }
    }
}

/// Clear the hurt tint once its timer runs out.
fn fade_hurt_flash(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut HurtFlash, &mut Sprite)>,
) {
    for (entity, mut flash, mut sprite) in query.iter_mut() {
        flash.0.tick(time.delta());

        if flash.0.finished() {
            sprite.color = Color::WHITE;
            commands.entity(entity).remove::<HurtFlash>();
        }
    }
}

/// Game over once the player's death animation completed.
fn enter_game_over(
    mut finished: EventReader<ClipFinished>,
    player_query: Query<Entity, With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in finished.read() {
        if event.clip == "dead" && player_query.contains(event.entity) {
            info!("Game over");
            next_state.set(GameState::GameOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strike_targets_in_front_and_in_reach() {
        let near_front = Entity::from_raw(1);
        let near_behind = Entity::from_raw(2);
        let far_front = Entity::from_raw(3);
        let candidates = [
            (near_front, Vec2::new(60.0, 0.0)),
            (near_behind, Vec2::new(-60.0, 0.0)),
            (far_front, Vec2::new(80.0, 0.0)),
        ];

        let hit = strike_targets(Vec2::ZERO, Facing::Right, 80.0, candidates);
        assert_eq!(hit, vec![near_front]);

        let hit = strike_targets(Vec2::ZERO, Facing::Left, 80.0, candidates);
        assert_eq!(hit, vec![near_behind]);
    }
}
