//! Enemy-related components.

use bevy::prelude::*;

use super::data::EnemyDefinition;
use super::engagement::EnemySound;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy kind identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyKind(pub String);

/// What an enemy variant can show and play besides its engagement logic.
#[derive(Component, Clone, Debug, Default)]
pub struct EnemyCapabilities {
    pub has_blood_effect: bool,
    pub has_health_bar: bool,
    pub texture_prefix: String,
    pub alert_sound: Option<String>,
    pub die_sound: Option<String>,
}

impl EnemyCapabilities {
    pub fn from_definition(definition: &EnemyDefinition) -> Self {
        Self {
            has_blood_effect: definition.has_blood_effect,
            has_health_bar: definition.has_health_bar,
            texture_prefix: definition.texture_prefix.clone(),
            alert_sound: definition.sounds.alert.clone(),
            die_sound: definition.sounds.die.clone(),
        }
    }

    pub fn sound_path(&self, sound: EnemySound) -> Option<&str> {
        match sound {
            EnemySound::Alert => self.alert_sound.as_deref(),
            EnemySound::Die => self.die_sound.as_deref(),
        }
    }
}

/// Sent when an enemy's health changed after a hit.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyHealthChanged {
    pub entity: Entity,
    /// Remaining health in percent, within [0, 100]
    pub percent: f32,
}

/// Blood splatter overlay, child of the enemy it belongs to.
#[derive(Component)]
pub struct BloodSplatter;
