//! Teravia - Entry Point
//!
//! Controls:
//! - Left/Right arrows: Run
//! - Up arrow: Jump, press again in the air to double jump
//! - Space: Attack
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier2d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Teravia".to_string(),
                        resolution: (1365.0, 768.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                // Pixel art
                .set(ImagePlugin::default_nearest()),
        )

        // Physics, in pixels
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(100.0))

        // Audio backend
        .add_plugins(AudioPlugin)

        // Our game plugin
        .add_plugins(teravia::TeraviaPlugin)

        .run();
}
