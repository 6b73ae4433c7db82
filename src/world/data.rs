//! Level data structures and RON loading.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;
use crate::enemies::EnemySpawn;

/// Level loaded when the game starts.
pub const LEVEL_PATH: &str = "assets/data/levels/level1.ron";

/// Thickness of the walls closing off both level sides.
pub const WALL_THICKNESS: f32 = 32.0;

/// A solid rectangle the player and enemies stand on, bottom-left anchored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// One side-scrolling level. Coordinates are world units with y up and the
/// origin at the level's bottom-left corner.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Top of the ground, which spans the whole level
    pub ground_height: f32,
    /// Downward acceleration in units per second squared
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    pub player_spawn: (f32, f32),
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
}

fn default_gravity() -> f32 {
    3000.0
}

impl Default for LevelDefinition {
    fn default() -> Self {
        Self {
            name: "Empty".to_string(),
            width: 1365.0,
            height: 768.0,
            ground_height: 128.0,
            gravity: default_gravity(),
            player_spawn: (30.0, 384.0),
            platforms: Vec::new(),
            enemies: Vec::new(),
        }
    }
}

impl LevelDefinition {
    pub fn player_spawn(&self) -> Vec2 {
        Vec2::new(self.player_spawn.0, self.player_spawn.1)
    }

    /// The ground as a platform spanning the level.
    pub fn ground(&self) -> Platform {
        Platform {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.ground_height,
        }
    }

    /// Walls just outside the left and right level edges, spanning its height.
    pub fn walls(&self) -> [Platform; 2] {
        let wall = |x| Platform {
            x,
            y: 0.0,
            width: WALL_THICKNESS,
            height: self.height,
        };
        [wall(-WALL_THICKNESS), wall(self.width)]
    }

    /// Parse and validate a level. `path` is only used for messages.
    pub fn from_ron(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        let level: Self = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })?;

        let invalid = |field: &'static str, details: String| DataLoadError::InvalidValue {
            path: path.to_string(),
            field,
            details,
        };
        if !(level.width > 0.0 && level.height > 0.0) {
            return Err(invalid(
                "width",
                format!("level size {}x{} is empty", level.width, level.height),
            ));
        }
        if !(level.ground_height >= 0.0 && level.ground_height < level.height) {
            return Err(invalid(
                "ground_height",
                format!("{} is outside the level", level.ground_height),
            ));
        }
        Ok(level)
    }
}

/// Load a level definition from a RON file.
pub fn load_level(path: &Path) -> Result<LevelDefinition, DataLoadError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;

    let level = LevelDefinition::from_ron(&contents, &display)?;
    info!(
        "Loaded level '{}' with {} enemies",
        level.name,
        level.enemies.len()
    );
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::Facing;

    #[test]
    fn test_parse_level() {
        let level = LevelDefinition::from_ron(
            r#"(
                name: "Test",
                width: 2000.0,
                height: 768.0,
                ground_height: 128.0,
                player_spawn: (30.0, 384.0),
                platforms: [(x: 380.0, y: 200.0, width: 500.0, height: 40.0)],
                enemies: [
                    (kind: "cat", x_min: 400.0, y: 205.0),
                    (kind: "cat", x_min: 1150.0, y: 205.0, facing: Left),
                ],
            )"#,
            "test.ron",
        )
        .unwrap();

        assert_eq!(level.gravity, 3000.0);
        assert_eq!(level.player_spawn(), Vec2::new(30.0, 384.0));
        assert_eq!(level.platforms[0].center(), Vec2::new(630.0, 220.0));
        assert_eq!(level.enemies[1].facing, Facing::Left);
        assert_eq!(level.ground().half_size(), Vec2::new(1000.0, 64.0));
    }

    #[test]
    fn test_walls_close_off_level_sides() {
        let level = LevelDefinition {
            width: 2000.0,
            height: 768.0,
            ..default()
        };
        let [left, right] = level.walls();

        // Inner faces sit on the level edges
        assert_eq!(left.x + left.width, 0.0);
        assert_eq!(right.x, 2000.0);
        for wall in [&left, &right] {
            assert_eq!(wall.y, 0.0);
            assert_eq!(wall.height, 768.0);
        }
        assert_eq!(left.center(), Vec2::new(-16.0, 384.0));
        assert_eq!(right.center(), Vec2::new(2016.0, 384.0));
    }

    #[test]
    fn test_ground_must_be_inside_level() {
        let err = LevelDefinition::from_ron(
            r#"(name: "Sunk", width: 100.0, height: 100.0, ground_height: 200.0, player_spawn: (0.0, 0.0))"#,
            "sunk.ron",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidValue {
                field: "ground_height",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_level() {
        let err = load_level(Path::new("assets/data/levels/missing.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }

    #[test]
    fn test_shipped_level_loads() {
        let level = load_level(Path::new(LEVEL_PATH)).unwrap();
        assert_eq!(level.enemies.len(), 6);
        assert_eq!(level.gravity, 3000.0);

        let ground_cats: Vec<_> = level.enemies.iter().take(4).collect();
        for (i, spawn) in ground_cats.iter().enumerate() {
            assert_eq!(spawn.x_min, 400.0 + i as f32 * 750.0);
            let expected = if i % 2 == 0 { Facing::Right } else { Facing::Left };
            assert_eq!(spawn.facing, expected);
        }
    }
}
