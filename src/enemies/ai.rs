//! Enemy AI behavior systems.
//!
//! These systems adapt ECS state to the [`Engagement`] machine: they read the
//! enemy and player transforms, tick the machine, then write its velocity and
//! facing back to the physics body and sprite and route its effects.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{Enemy, EnemyCapabilities, EnemyHealthChanged};
use super::engagement::{Engagement, EngagementEffect, Facing, TargetView, TickInput};
use crate::combat::Health;
use crate::core::{ClipFinished, ClipPlayer, DamageEvent, DeathEvent, EnemyDestroyed, SoundEvent};
use crate::player::{Player, PLAYER_GROUP};

/// Event writers the engagement effects are routed to.
///
/// Strikes are left to the caller: damage intake reads `DamageEvent`s and
/// cannot write them in the same system.
#[derive(SystemParam)]
pub struct EffectWriters<'w> {
    sounds: EventWriter<'w, SoundEvent>,
    deaths: EventWriter<'w, DeathEvent>,
    health: EventWriter<'w, EnemyHealthChanged>,
    destroyed: EventWriter<'w, EnemyDestroyed>,
}

/// Apply queued effects of one enemy, draining `effects`. Returns `true` when
/// the enemy struck its target.
fn route_effects(
    entity: Entity,
    capabilities: &EnemyCapabilities,
    clips: &mut ClipPlayer,
    effects: &mut Vec<EngagementEffect>,
    writers: &mut EffectWriters,
) -> bool {
    let mut struck = false;
    for effect in effects.drain(..) {
        match effect {
            EngagementEffect::PlayClip(clip) => {
                clips.play(clip.name());
            }
            EngagementEffect::PlaySound(sound) => {
                if let Some(path) = capabilities.sound_path(sound) {
                    writers.sounds.send(SoundEvent::new(path));
                }
            }
            EngagementEffect::StrikeTarget => struck = true,
            EngagementEffect::HealthChanged { percent } => {
                writers.health.send(EnemyHealthChanged { entity, percent });
            }
            EngagementEffect::Died => {
                info!("Enemy {:?} died", entity);
                writers.deaths.send(DeathEvent { entity });
            }
            EngagementEffect::Destroyed => {
                writers.destroyed.send(EnemyDestroyed { entity });
            }
        }
    }
    struck
}

/// Collision groups of a dead enemy: it still rests on the level but no
/// longer blocks the player.
pub fn corpse_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_1, Group::ALL.difference(PLAYER_GROUP))
}

fn sync_body(engagement: &Engagement, velocity: &mut Velocity, sprite: Option<Mut<Sprite>>) {
    velocity.linvel.x = engagement.velocity_x();
    if let Some(mut sprite) = sprite {
        let flip = engagement.facing() == Facing::Left;
        if sprite.flip_x != flip {
            sprite.flip_x = flip;
        }
    }
}

/// Tick every enemy's engagement machine against the player.
///
/// A missing or dead player leaves enemies patrolling.
pub fn run_engagement(
    time: Res<Time>,
    player_query: Query<(Entity, &Transform, &Health), (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (
            Entity,
            &Transform,
            &EnemyCapabilities,
            &mut Engagement,
            &mut Velocity,
            &mut ClipPlayer,
            Option<&mut Sprite>,
            Option<&CollidingEntities>,
        ),
        (With<Enemy>, Without<Player>),
    >,
    mut damage_events: EventWriter<DamageEvent>,
    mut writers: EffectWriters,
) {
    let player = player_query.get_single().ok();
    let target = player.map(|(_, transform, health)| TargetView {
        position: transform.translation.truncate(),
        alive: !health.is_dead(),
    });
    let player_entity = player.map(|(entity, _, _)| entity);

    let now = time.elapsed();
    let mut effects = Vec::new();

    for (entity, transform, capabilities, mut engagement, mut velocity, mut clips, sprite, colliding) in
        enemy_query.iter_mut()
    {
        if !engagement.is_alive() {
            continue;
        }

        let in_contact = player_entity
            .zip(colliding)
            .is_some_and(|(player, colliding)| colliding.contains(player));

        let input = TickInput {
            now,
            position: transform.translation.truncate(),
            target,
            in_contact,
        };
        engagement.tick(&input, &mut effects);

        sync_body(&engagement, &mut velocity, sprite);
        let struck = route_effects(entity, capabilities, &mut clips, &mut effects, &mut writers);
        if let (true, Some(target)) = (struck, player_entity) {
            damage_events.send(DamageEvent {
                target,
                source: entity,
            });
        }
    }
}

/// Apply hits aimed at enemies.
pub fn apply_enemy_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    source_query: Query<&Transform, Without<Enemy>>,
    mut enemy_query: Query<
        (
            &Transform,
            &EnemyCapabilities,
            &mut Engagement,
            &mut Velocity,
            &mut ClipPlayer,
            Option<&mut Sprite>,
        ),
        With<Enemy>,
    >,
    mut writers: EffectWriters,
) {
    let mut effects = Vec::new();

    for event in damage_events.read() {
        let Ok((transform, capabilities, mut engagement, mut velocity, mut clips, sprite)) =
            enemy_query.get_mut(event.target)
        else {
            continue;
        };

        let attacker = source_query
            .get(event.source)
            .ok()
            .map(|source| source.translation.truncate());

        let was_alive = engagement.is_alive();
        engagement.apply_damage(transform.translation.truncate(), attacker, &mut effects);

        sync_body(&engagement, &mut velocity, sprite);
        route_effects(event.target, capabilities, &mut clips, &mut effects, &mut writers);

        if was_alive && !engagement.is_alive() {
            commands.entity(event.target).insert(corpse_groups());
        }
    }
}

/// Despawn enemies once their death clip completed.
pub fn finish_dead_enemies(
    mut commands: Commands,
    mut finished: EventReader<ClipFinished>,
    mut enemy_query: Query<(&EnemyCapabilities, &mut Engagement, &mut ClipPlayer), With<Enemy>>,
    mut writers: EffectWriters,
) {
    let mut effects = Vec::new();

    for event in finished.read() {
        let Ok((capabilities, mut engagement, mut clips)) = enemy_query.get_mut(event.entity) else {
            continue;
        };

        if engagement.finish_death(&mut effects) {
            route_effects(event.entity, capabilities, &mut clips, &mut effects, &mut writers);
            commands.entity(event.entity).despawn_recursive();
        }
    }
}
