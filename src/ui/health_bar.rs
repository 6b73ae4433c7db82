//! Health bars: colour and width rules, and the bar shown above wounded enemies.

use bevy::prelude::*;
use bevy::sprite::Anchor;

use crate::core::{DeathEvent, WidthTween};
use crate::enemies::{EnemyCapabilities, EnemyHealthChanged};

/// Size of an enemy's bar at full health.
pub const ENEMY_BAR_SIZE: Vec2 = Vec2::new(50.0, 7.0);

/// Height of the bar's centre above the enemy's centre.
const ENEMY_BAR_OFFSET: f32 = 50.0;

/// Seconds the fill takes to reach a new width.
pub const BAR_TWEEN_SECS: f32 = 0.2;

/// Fill colour for `percent` health: red when empty, green when full.
pub fn bar_color(percent: f32) -> Color {
    let percent = percent.clamp(0.0, 100.0);
    Color::hsl(percent / 100.0 * 90.0, 1.0, 0.5)
}

/// Fill width of a bar `full_width` wide at `percent` health.
pub fn bar_width(full_width: f32, percent: f32) -> f32 {
    full_width * percent.clamp(0.0, 100.0) / 100.0
}

/// Bar above an enemy, child of that enemy.
#[derive(Component)]
pub struct EnemyHealthBar;

/// Inner part of an [`EnemyHealthBar`] that shrinks with health.
#[derive(Component)]
pub struct EnemyHealthFill;

/// Create or update the bar of enemies that show one.
pub fn update_enemy_health_bars(
    mut commands: Commands,
    mut changes: EventReader<EnemyHealthChanged>,
    enemy_query: Query<(&EnemyCapabilities, Option<&Children>)>,
    bar_query: Query<&Children, With<EnemyHealthBar>>,
    mut fill_query: Query<(&mut WidthTween, &mut Sprite), With<EnemyHealthFill>>,
) {
    for change in changes.read() {
        let Ok((capabilities, children)) = enemy_query.get(change.entity) else {
            continue;
        };
        if !capabilities.has_health_bar {
            continue;
        }

        let width = bar_width(ENEMY_BAR_SIZE.x, change.percent);
        let color = bar_color(change.percent);

        let existing = children.and_then(|children| {
            children
                .iter()
                .filter_map(|&child| bar_query.get(child).ok())
                .flat_map(|bar_children| bar_children.iter().copied())
                .find(|&fill| fill_query.contains(fill))
        });

        if let Some(fill) = existing {
            if let Ok((mut tween, mut sprite)) = fill_query.get_mut(fill) {
                tween.retarget(width);
                sprite.color = color;
            }
            continue;
        }

        // First hit: the fill starts full and shrinks to the new width
        let mut tween = WidthTween::new(ENEMY_BAR_SIZE.x, BAR_TWEEN_SECS);
        tween.retarget(width);

        let bar = commands
            .spawn((
                EnemyHealthBar,
                Sprite {
                    color: Color::BLACK,
                    custom_size: Some(ENEMY_BAR_SIZE),
                    ..default()
                },
                Transform::from_xyz(0.0, ENEMY_BAR_OFFSET, 2.0),
            ))
            .with_children(|parent| {
                parent.spawn((
                    EnemyHealthFill,
                    tween,
                    Sprite {
                        color,
                        custom_size: Some(ENEMY_BAR_SIZE),
                        anchor: Anchor::CenterLeft,
                        ..default()
                    },
                    Transform::from_xyz(-ENEMY_BAR_SIZE.x / 2.0, 0.0, 0.1),
                ));
            })
            .id();

        commands.entity(change.entity).add_child(bar);
    }
}

/// Remove the bar of enemies that died.
pub fn remove_dead_enemy_bars(
    mut commands: Commands,
    mut deaths: EventReader<DeathEvent>,
    enemy_query: Query<&Children, With<EnemyCapabilities>>,
    bar_query: Query<Entity, With<EnemyHealthBar>>,
) {
    for death in deaths.read() {
        let Ok(children) = enemy_query.get(death.entity) else {
            continue;
        };
        for &child in children.iter() {
            if bar_query.contains(child) {
                commands.entity(child).despawn_recursive();
            }
        }
    }
}
