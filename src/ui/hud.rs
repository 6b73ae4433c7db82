//! In-game HUD - the player's health bar.

use bevy::prelude::*;

use super::health_bar::{bar_color, bar_width};
use crate::combat::Health;
use crate::core::GameState;
use crate::player::Player;

/// Size of the HUD health bar at full health.
const HUD_BAR_SIZE: Vec2 = Vec2::new(150.0, 15.0);

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnEnter(GameState::Loading), cleanup_hud)
        .add_systems(
            Update,
            update_health_bar.run_if(in_state(GameState::InGame).or(in_state(GameState::GameOver))),
        );
}

/// Spawn the HUD UI. Returning from pause keeps the existing one.
fn spawn_hud(mut commands: Commands, existing: Query<(), With<HudRoot>>) {
    if !existing.is_empty() {
        return;
    }

    // Top-left corner, fixed to the screen
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(20.0),
                top: Val::Px(20.0),
                width: Val::Px(HUD_BAR_SIZE.x),
                height: Val::Px(HUD_BAR_SIZE.y),
                ..default()
            },
            BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
            HudRoot,
        ))
        .with_children(|bg| {
            bg.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(bar_color(100.0)),
                HealthBar,
            ));
        });
}

/// Update health bar based on player health.
fn update_health_bar(
    player_query: Query<&Health, (With<Player>, Changed<Health>)>,
    mut bar_query: Query<(&mut Node, &mut BackgroundColor), With<HealthBar>>,
) {
    let Ok(health) = player_query.get_single() else {
        return;
    };
    let Ok((mut bar, mut color)) = bar_query.get_single_mut() else {
        return;
    };

    let percent = health.percentage() * 100.0;
    bar.width = Val::Px(bar_width(HUD_BAR_SIZE.x, percent));
    color.0 = bar_color(percent);
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
