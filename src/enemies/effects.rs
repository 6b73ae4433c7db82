//! Death effects: the blood overlay of variants that bleed.

use std::collections::HashMap;

use bevy::prelude::*;

use super::components::{BloodSplatter, Enemy, EnemyCapabilities};
use crate::core::{ClipFinished, ClipPlayer, ClipSheets, DeathEvent};

/// Clip name of the blood overlay in an enemy's clip table.
pub const BLOOD_CLIP: &str = "blood";

/// Spawn a blood overlay on dying enemies that have one.
///
/// The overlay is a child of the enemy so it goes away with it at the latest.
pub fn spawn_blood_splatter(
    mut commands: Commands,
    mut deaths: EventReader<DeathEvent>,
    asset_server: Option<Res<AssetServer>>,
    mut layouts: Option<ResMut<Assets<TextureAtlasLayout>>>,
    enemy_query: Query<(&EnemyCapabilities, &ClipPlayer), With<Enemy>>,
) {
    for event in deaths.read() {
        let Ok((capabilities, enemy_clips)) = enemy_query.get(event.entity) else {
            continue;
        };
        if !capabilities.has_blood_effect {
            continue;
        }
        let Some(spec) = enemy_clips.clips().get(BLOOD_CLIP) else {
            warn!(
                "Enemy {:?} bleeds but has no '{}' clip",
                event.entity, BLOOD_CLIP
            );
            continue;
        };

        let clips = HashMap::from([(BLOOD_CLIP.to_string(), spec.clone())]);
        let mut player = ClipPlayer::new(clips.clone());
        player.play(BLOOD_CLIP);

        let blood = commands
            .spawn((
                BloodSplatter,
                player,
                Sprite::default(),
                Transform::from_xyz(0.0, 0.0, 1.0),
            ))
            .id();

        if let (Some(asset_server), Some(layouts)) = (asset_server.as_deref(), layouts.as_deref_mut()) {
            let sheets = ClipSheets::load(asset_server, layouts, &capabilities.texture_prefix, &clips);
            commands.entity(blood).insert(sheets);
        }

        commands.entity(event.entity).add_child(blood);
    }
}

/// Remove blood overlays whose clip completed.
pub fn despawn_finished_blood(
    mut commands: Commands,
    mut finished: EventReader<ClipFinished>,
    blood_query: Query<Entity, With<BloodSplatter>>,
) {
    for event in finished.read() {
        if event.clip != BLOOD_CLIP {
            continue;
        }
        if let Ok(blood) = blood_query.get(event.entity) {
            commands.entity(blood).despawn_recursive();
        }
    }
}
