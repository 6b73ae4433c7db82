//! Global events used for cross-system communication.
//!
//! Enemy AI, combat, audio and UI never call into each other directly: the
//! engagement systems send a `DamageEvent` when an enemy strikes, combat
//! applies it, and so on.

use bevy::prelude::*;

/// Sent when an entity is hit.
///
/// Each hit carries no amount: enemies lose a fixed share of their health,
/// the player a fixed number of life points.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving the hit
    pub target: Entity,
    /// Entity delivering the hit
    pub source: Entity,
}

/// Sent once when an entity dies.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    pub entity: Entity,
}

/// Sent once when a dead enemy finished its death animation and was removed.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyDestroyed {
    pub entity: Entity,
}

/// Request to play a one-shot sound.
#[derive(Event, Debug, Clone)]
pub struct SoundEvent {
    /// Asset path of the sound
    pub path: String,
    /// Linear amplitude, 1.0 is unchanged
    pub volume: f64,
}

impl SoundEvent {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            volume: 1.0,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

/// Sent when a one-shot animation clip reaches its end.
#[derive(Event, Debug, Clone)]
pub struct ClipFinished {
    pub entity: Entity,
    pub clip: String,
}
