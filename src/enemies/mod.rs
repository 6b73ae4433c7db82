//! Enemies module - enemy entities, engagement AI, and spawning.

mod ai;
mod components;
pub mod data;
mod effects;
pub mod engagement;
mod plugin;
mod spawning;

pub use ai::{apply_enemy_damage, corpse_groups, finish_dead_enemies, run_engagement};
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use effects::BLOOD_CLIP;
pub use engagement::{
    DamageOutcome, EnemyClip, EnemySound, Engagement, EngagementConfig, EngagementEffect,
    EngagementPhase, Facing, PatrolBounds, TargetView, TickInput,
};
pub use plugin::EnemyPlugin;
pub use spawning::{enemy_bundle, spawn_enemy, EnemySpawn};
