//! Headless app tests for the enemy systems.

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::{CollisionGroups, Velocity};

use teravia::combat::{CombatPlugin, Health};
use teravia::core::{ClipPlayer, CorePlugin, DamageEvent, EnemyDestroyed, GameState};
use teravia::enemies::{
    enemy_bundle, EnemyHealthChanged, EnemyPlugin, EnemyRegistry, EnemySpawn, Engagement,
    EngagementPhase, Facing,
};
use teravia::player::{player_bundle, PlayerConfig, PlayerPlugin, PLAYER_GROUP};
use teravia::ui::{EnemyHealthBar, UiPlugin};

#[derive(Resource, Default)]
struct Destroyed(Vec<Entity>);

fn record_destroyed(mut events: EventReader<EnemyDestroyed>, mut destroyed: ResMut<Destroyed>) {
    destroyed.0.extend(events.read().map(|event| event.entity));
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .add_plugins((CorePlugin, PlayerPlugin, CombatPlugin, EnemyPlugin, UiPlugin))
        .init_resource::<Destroyed>()
        .add_systems(Update, record_destroyed);

    // Loading reads the shipped enemy definitions
    app.update();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app
}

fn spawn_enemy(app: &mut App, kind: &str, x_min: f32, facing: Facing) -> Entity {
    let spawn = EnemySpawn {
        kind: kind.to_string(),
        x_min,
        y: 0.0,
        facing,
    };
    let definition = app
        .world()
        .resource::<EnemyRegistry>()
        .get(kind)
        .cloned()
        .expect("shipped definition");
    app.world_mut().spawn(enemy_bundle(&definition, &spawn)).id()
}

fn spawn_player(app: &mut App, x: f32) -> Entity {
    let config = app.world().resource::<PlayerConfig>().clone();
    app.world_mut()
        .spawn(player_bundle(&config, Vec2::new(x, 0.0)))
        .id()
}

fn hit(app: &mut App, target: Entity, source: Entity) {
    app.world_mut().send_event(DamageEvent { target, source });
    app.update();
}

#[test]
fn test_enemy_chases_then_strikes_player() {
    let mut app = test_app();
    let enemy = spawn_enemy(&mut app, "cat", 0.0, Facing::Right);
    let player = spawn_player(&mut app, 300.0);

    app.update();

    let engagement = app.world().get::<Engagement>(enemy).unwrap();
    assert_eq!(engagement.phase(), EngagementPhase::Engaged);
    assert_eq!(app.world().get::<Velocity>(enemy).unwrap().linvel.x, 200.0);
    assert!(app.world().get::<ClipPlayer>(enemy).unwrap().is_playing("run"));

    // Within attack range the enemy stops and strikes
    app.world_mut()
        .get_mut::<Transform>(player)
        .unwrap()
        .translation
        .x = 50.0;
    app.update();

    assert_eq!(app.world().get::<Velocity>(enemy).unwrap().linvel.x, 0.0);
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 95.0);
}

#[test]
fn test_three_hits_kill_and_remove_enemy() {
    let mut app = test_app();
    let enemy = spawn_enemy(&mut app, "cat", 0.0, Facing::Right);
    let player = spawn_player(&mut app, 2000.0);
    app.update();

    hit(&mut app, enemy, player);
    hit(&mut app, enemy, player);
    assert!(app.world().get::<Engagement>(enemy).unwrap().is_alive());

    hit(&mut app, enemy, player);
    let engagement = app.world().get::<Engagement>(enemy).unwrap();
    assert_eq!(engagement.health(), 0.0);
    assert_eq!(engagement.phase(), EngagementPhase::Dead);
    assert_eq!(app.world().get::<Velocity>(enemy).unwrap().linvel.x, 0.0);

    // The corpse no longer blocks the player
    let player_groups = app.world().get::<CollisionGroups>(player).unwrap();
    assert!(player_groups.memberships.contains(PLAYER_GROUP));
    let corpse_groups = app.world().get::<CollisionGroups>(enemy).unwrap();
    assert!(!corpse_groups.filters.contains(PLAYER_GROUP));

    // Dying cats bleed
    let children = app.world().get::<Children>(enemy).unwrap();
    assert_eq!(children.len(), 1);

    // A fourth hit on a dead enemy changes nothing
    hit(&mut app, enemy, player);
    assert!(app.world().entities().contains(enemy));

    for _ in 0..30 {
        app.update();
    }

    assert!(!app.world().entities().contains(enemy));
    assert_eq!(app.world().resource::<Destroyed>().0, vec![enemy]);
}

#[test]
fn test_wounded_enemy_keeps_blocking_player() {
    let mut app = test_app();
    let enemy = spawn_enemy(&mut app, "cat", 0.0, Facing::Right);
    let player = spawn_player(&mut app, 2000.0);
    app.update();

    hit(&mut app, enemy, player);
    assert!(app.world().get::<CollisionGroups>(enemy).is_none());
}

#[test]
fn test_pause_holds_grace_deadline() {
    let mut app = test_app();
    let enemy = spawn_enemy(&mut app, "cat", 0.0, Facing::Right);
    let player = spawn_player(&mut app, 300.0);
    app.update();

    // Losing sight starts the cat's 3 s grace period
    app.world_mut()
        .get_mut::<Transform>(player)
        .unwrap()
        .translation
        .x = 2000.0;
    app.update();
    assert!(app.world().get::<Engagement>(enemy).unwrap().grace_deadline().is_some());
    let x = app.world().get::<Transform>(enemy).unwrap().translation.x;

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Paused);
    for _ in 0..50 {
        app.update();
    }
    assert!(app.world().resource::<Time<Virtual>>().is_paused());

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app.update();

    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    let engagement = app.world().get::<Engagement>(enemy).unwrap();
    assert_eq!(engagement.phase(), EngagementPhase::Engaged);
    assert!(engagement.grace_deadline().is_some());
    assert_eq!(app.world().get::<Transform>(enemy).unwrap().translation.x, x);
}

#[test]
fn test_health_bar_appears_on_first_hit() {
    let mut app = test_app();
    let enemy = spawn_enemy(&mut app, "tomcat", 0.0, Facing::Right);
    let player = spawn_player(&mut app, 2000.0);
    app.update();

    assert!(app.world().get::<Children>(enemy).is_none());

    hit(&mut app, enemy, player);
    // Bars are added from the health event on the following frame at the latest
    app.update();

    let mut bars = app
        .world_mut()
        .query_filtered::<&Parent, With<EnemyHealthBar>>();
    let parents: Vec<Entity> = bars.iter(app.world()).map(|parent| parent.get()).collect();
    assert_eq!(parents, vec![enemy]);

    // Second hit reuses the existing bar
    hit(&mut app, enemy, player);
    app.update();
    let mut bars = app
        .world_mut()
        .query_filtered::<Entity, With<EnemyHealthBar>>();
    assert_eq!(bars.iter(app.world()).count(), 1);
}

#[test]
fn test_dead_player_is_ignored() {
    let mut app = test_app();
    let enemy = spawn_enemy(&mut app, "cat", 0.0, Facing::Right);
    let player = spawn_player(&mut app, 300.0);
    app.world_mut().get_mut::<Health>(player).unwrap().current = 0.0;

    app.update();

    let engagement = app.world().get::<Engagement>(enemy).unwrap();
    assert_eq!(engagement.phase(), EngagementPhase::Patrol);
    assert_eq!(app.world().get::<Velocity>(enemy).unwrap().linvel.x, 100.0);
}

#[test]
fn test_health_events_report_percent() {
    let mut app = test_app();
    let enemy = spawn_enemy(&mut app, "cat", 0.0, Facing::Right);
    let player = spawn_player(&mut app, 2000.0);

    hit(&mut app, enemy, player);

    let events = app.world().resource::<Events<EnemyHealthChanged>>();
    let mut reader = events.get_cursor();
    let percents: Vec<f32> = reader.read(events).map(|event| event.percent).collect();
    assert_eq!(percents.len(), 1);
    assert!((percents[0] - 66.666_67).abs() < 1e-3);
}
