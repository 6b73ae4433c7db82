//! Audio plugin - plays [`SoundEvent`]s through kira.

use bevy::prelude::*;
use bevy_kira_audio::prelude::*;

use crate::core::SoundEvent;

/// Audio plugin - turns sound requests into playing sounds.
///
/// Expects `bevy_kira_audio::AudioPlugin` to be added by the app.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, play_sounds);
    }
}

/// Play every requested sound once.
fn play_sounds(
    mut sounds: EventReader<SoundEvent>,
    asset_server: Option<Res<AssetServer>>,
    audio: Option<Res<Audio>>,
) {
    let (Some(asset_server), Some(audio)) = (asset_server, audio) else {
        sounds.clear();
        return;
    };

    for sound in sounds.read() {
        debug!("Playing sound {} at volume {}", sound.path, sound.volume);
        audio
            .play(asset_server.load(sound.path.clone()))
            .with_volume(sound.volume);
    }
}
