//! Enemy data loading from RON files.
//!
//! Every enemy variant is one definition: the capability set (blood effect,
//! health bar, texture prefix) plus the engagement tuning. There is no
//! per-variant code.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::engagement::EngagementConfig;
use crate::core::ClipSpec;
use crate::world::DataLoadError;

/// Directory scanned for enemy definitions.
pub const ENEMIES_DIR: &str = "assets/data/enemies";

/// Sounds an enemy variant plays. Missing paths stay silent.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EnemySounds {
    #[serde(default)]
    pub alert: Option<String>,
    #[serde(default)]
    pub die: Option<String>,
}

/// Collider configuration for an enemy type.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ColliderConfig {
    pub half_width: f32,
    pub half_height: f32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_width: 40.0,
            half_height: 30.0,
        }
    }
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    /// Sheets are looked up under `sprites/<texture_prefix>/`
    pub texture_prefix: String,
    #[serde(default)]
    pub has_blood_effect: bool,
    #[serde(default)]
    pub has_health_bar: bool,
    #[serde(default = "default_patrol_speed")]
    pub patrol_speed: f32,
    #[serde(default = "default_chase_multiplier")]
    pub chase_multiplier: f32,
    /// Width of the patrol, starting at the spawn's `x_min`
    #[serde(default = "default_patrol_range")]
    pub patrol_range: f32,
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
    /// Milliseconds before giving up on a target that went out of sight
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,
    #[serde(default = "default_strike_cooldown_ms")]
    pub strike_cooldown_ms: u64,
    #[serde(default)]
    pub strike_requires_contact: bool,
    #[serde(default)]
    pub collider: ColliderConfig,
    #[serde(default)]
    pub clips: HashMap<String, ClipSpec>,
    #[serde(default)]
    pub sounds: EnemySounds,
}

fn default_patrol_speed() -> f32 {
    100.0
}

fn default_chase_multiplier() -> f32 {
    2.0
}

fn default_patrol_range() -> f32 {
    400.0
}

fn default_attack_range() -> f32 {
    100.0
}

fn default_grace_ms() -> u64 {
    3000
}

fn default_strike_cooldown_ms() -> u64 {
    500
}

impl EnemyDefinition {
    /// Engagement tuning for this variant.
    pub fn to_config(&self) -> EngagementConfig {
        EngagementConfig {
            patrol_speed: self.patrol_speed,
            chase_multiplier: self.chase_multiplier,
            attack_range: self.attack_range,
            grace: Duration::from_millis(self.grace_ms),
            strike_cooldown: Duration::from_millis(self.strike_cooldown_ms),
            strike_requires_contact: self.strike_requires_contact,
            ..default()
        }
    }

    /// Parse and validate a definition. `path` is only used for messages.
    pub fn from_ron(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        let definition: Self =
            ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
                path: path.to_string(),
                details: e.to_string(),
            })?;
        definition.validate(path)?;
        Ok(definition)
    }

    fn validate(&self, path: &str) -> Result<(), DataLoadError> {
        let invalid = |field: &'static str, details: String| DataLoadError::InvalidValue {
            path: path.to_string(),
            field,
            details,
        };

        if !(self.patrol_speed > 0.0) {
            return Err(invalid("patrol_speed", format!("{} is not positive", self.patrol_speed)));
        }
        if !(self.chase_multiplier > 0.0) {
            return Err(invalid(
                "chase_multiplier",
                format!("{} is not positive", self.chase_multiplier),
            ));
        }
        if !(self.patrol_range >= 0.0) {
            return Err(invalid("patrol_range", format!("{} is negative", self.patrol_range)));
        }
        Ok(())
    }
}

/// Read one definition file.
pub fn read_enemy_definition(path: &Path) -> Result<EnemyDefinition, DataLoadError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    EnemyDefinition::from_ron(&contents, &display)
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by kind.
    pub fn get(&self, kind: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(kind)
    }

    /// Load every `*.ron` file in `dir`, keyed by file stem. Bad files are
    /// logged and skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, DataLoadError> {
        let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
            path: dir.display().to_string(),
            details: e.to_string(),
        })?;

        let mut registry = Self::default();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }

            let kind = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            match read_enemy_definition(&path) {
                Ok(definition) => {
                    info!("Loaded enemy definition: {} ({})", definition.name, kind);
                    registry.definitions.insert(kind, definition);
                }
                Err(e) => error!("{}", e),
            }
        }
        Ok(registry)
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new(ENEMIES_DIR);

    if !enemies_dir.exists() {
        warn!("Enemy definitions directory not found: {:?}", enemies_dir);
        return;
    }

    match EnemyRegistry::load_dir(enemies_dir) {
        Ok(loaded) => *registry = loaded,
        Err(e) => error!("{}", e),
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAT: &str = r#"(
        name: "Cat",
        texture_prefix: "cat",
        has_blood_effect: true,
        grace_ms: 2000,
        clips: {
            "walk": (frames: 10, fps: 15.0, looping: true),
            "dead": (frames: 10, fps: 10.0),
        },
        sounds: (die: Some("audio/cat/die.ogg")),
    )"#;

    #[test]
    fn test_parse_with_defaults() {
        let definition = EnemyDefinition::from_ron(CAT, "cat.ron").unwrap();
        assert_eq!(definition.name, "Cat");
        assert!(definition.has_blood_effect);
        assert!(!definition.has_health_bar);
        assert_eq!(definition.patrol_speed, 100.0);
        assert_eq!(definition.patrol_range, 400.0);
        assert_eq!(definition.clips.len(), 2);
        assert!(!definition.clips["dead"].looping);
        assert_eq!(definition.sounds.alert, None);
        assert_eq!(definition.sounds.die.as_deref(), Some("audio/cat/die.ogg"));
    }

    #[test]
    fn test_to_config() {
        let definition = EnemyDefinition::from_ron(CAT, "cat.ron").unwrap();
        let config = definition.to_config();
        assert_eq!(config.grace, Duration::from_millis(2000));
        assert_eq!(config.chase_speed(), 200.0);
        assert_eq!(config.sight_range_x, 500.0);
        assert_eq!(config.sight_range_y, 200.0);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = EnemyDefinition::from_ron("(name: 3)", "broken.ron").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { .. }));
        assert!(err.to_string().contains("broken.ron"));
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let contents = r#"(name: "Still", texture_prefix: "still", patrol_speed: 0.0)"#;
        let err = EnemyDefinition::from_ron(contents, "still.ron").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidValue {
                field: "patrol_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_enemy_definition(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }

    #[test]
    fn test_shipped_definitions_load() {
        let registry = EnemyRegistry::load_dir(Path::new(ENEMIES_DIR)).unwrap();
        let cat = registry.get("cat").expect("cat definition");
        assert!(cat.has_blood_effect);
        let tomcat = registry.get("tomcat").expect("tomcat definition");
        assert!(tomcat.has_health_bar);
    }
}
