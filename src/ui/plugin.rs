//! UI plugin - HUD, enemy health bars, pause and game over screens.

use bevy::prelude::*;

use super::health_bar;
use super::hud;
use crate::core::GameState;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Setup HUD systems
        hud::setup_hud_systems(app);

        app
            // Enemy bars follow health events even on the frame the game ends
            .add_systems(
                Update,
                (
                    health_bar::update_enemy_health_bars,
                    health_bar::remove_dead_enemy_bars,
                )
                    .chain()
                    .run_if(not(in_state(GameState::Loading))),
            )

            // Pause menu
            .add_systems(OnEnter(GameState::Paused), setup_pause_menu)
            .add_systems(OnExit(GameState::Paused), cleanup_pause_menu)

            // Game over
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), cleanup_game_over)

            .add_systems(
                Update,
                menu_input.run_if(in_state(GameState::Paused).or(in_state(GameState::GameOver))),
            );
    }
}

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

/// Marker for game over UI entities.
#[derive(Component)]
struct GameOverUi;

/// Marker for menu buttons.
#[derive(Component, Clone, Copy)]
enum MenuButton {
    Resume,
    Retry,
    Quit,
}

/// Full-screen overlay with a title, filled by `buttons`.
fn spawn_overlay(
    commands: &mut Commands,
    marker: impl Component,
    background: Color,
    title: &str,
    title_color: Color,
    buttons: &[(&str, MenuButton)],
) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(background),
            marker,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(title_color),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            for (text, button) in buttons {
                spawn_menu_button(parent, text, *button);
            }
        });
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.15, 0.15, 0.2)),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

/// Set up the pause menu.
fn setup_pause_menu(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        PauseMenuUi,
        Color::srgba(0.0, 0.0, 0.0, 0.7),
        "PAUSED",
        Color::srgb(0.8, 0.8, 0.85),
        &[("Resume", MenuButton::Resume), ("Quit", MenuButton::Quit)],
    );
}

/// Set up the game over screen.
fn setup_game_over(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        GameOverUi,
        Color::srgba(0.1, 0.0, 0.0, 0.8),
        "GAME OVER",
        Color::srgb(0.8, 0.2, 0.2),
        &[("Retry", MenuButton::Retry), ("Quit", MenuButton::Quit)],
    );
}

/// Handle menu button interactions.
fn menu_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = Color::srgb(0.3, 0.3, 0.35).into();
                match button {
                    MenuButton::Resume => next_state.set(GameState::InGame),
                    // Reloading rebuilds the level from scratch
                    MenuButton::Retry => next_state.set(GameState::Loading),
                    MenuButton::Quit => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = Color::srgb(0.25, 0.25, 0.3).into();
            }
            Interaction::None => {
                *bg_color = Color::srgb(0.15, 0.15, 0.2).into();
            }
        }
    }
}

/// Clean up pause menu entities.
fn cleanup_pause_menu(mut commands: Commands, query: Query<Entity, With<PauseMenuUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Clean up game over entities.
fn cleanup_game_over(mut commands: Commands, query: Query<Entity, With<GameOverUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
