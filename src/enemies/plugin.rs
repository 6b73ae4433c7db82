//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::components::EnemyHealthChanged;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::effects;
use crate::combat::CombatSet;
use crate::core::GameState;

/// Enemy plugin - handles enemy definitions, engagement AI, death and effects.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .add_event::<EnemyHealthChanged>()
            // Definitions must be loaded before the level spawns enemies
            .add_systems(OnEnter(GameState::Loading), load_enemy_definitions)
            // Hits from the player land in the same frame they were swung,
            // strikes reach the player before its damage intake runs
            .add_systems(
                Update,
                (
                    ai::run_engagement,
                    ai::apply_enemy_damage,
                    effects::spawn_blood_splatter,
                    ai::finish_dead_enemies,
                    effects::despawn_finished_blood,
                )
                    .chain()
                    .after(CombatSet::Input)
                    .before(CombatSet::Damage)
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
