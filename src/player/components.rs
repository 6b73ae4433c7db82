//! Player-related components.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use bevy_rapier2d::prelude::Group;

use crate::core::ClipSpec;
use crate::enemies::Facing;

/// Collision group the player body is a member of.
pub const PLAYER_GROUP: Group = Group::GROUP_2;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Tracks jump and facing state between frames.
#[derive(Component, Debug, Default)]
pub struct PlayerMotion {
    pub facing: Facing,
    pub grounded: bool,
    /// Jump key was already down last frame
    pub jump_key_held: bool,
    pub can_double_jump: bool,
    /// When the current jump started, for the double-jump window
    pub jump_started: Option<Duration>,
}

/// What a jump key press does this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpKind {
    Jump,
    DoubleJump,
}

impl PlayerMotion {
    /// Register a jump key press at `now` and decide which jump, if any, starts.
    ///
    /// A jump only starts on a fresh press. The double jump is available once
    /// per jump, within `double_jump_window` of leaving the ground.
    pub fn press_jump(&mut self, now: Duration, double_jump_window: Duration) -> Option<JumpKind> {
        let fresh_press = !self.jump_key_held;
        self.jump_key_held = true;

        if !fresh_press {
            return None;
        }

        if self.grounded {
            self.can_double_jump = true;
            self.jump_started = Some(now);
            return Some(JumpKind::Jump);
        }

        let within_window = self
            .jump_started
            .is_some_and(|started| now.saturating_sub(started) < double_jump_window);
        if self.can_double_jump && within_window {
            self.can_double_jump = false;
            return Some(JumpKind::DoubleJump);
        }

        None
    }

    pub fn release_jump(&mut self) {
        self.jump_key_held = false;
    }
}

/// Horizontal speed after accelerating toward `direction` (-1 or 1) for `dt` seconds.
pub fn run_velocity(current: f32, direction: f32, acceleration: f32, max_speed: f32, dt: f32) -> f32 {
    (current + direction * acceleration * dt).clamp(-max_speed, max_speed)
}

/// Configuration for the player character.
#[derive(Resource, Clone)]
pub struct PlayerConfig {
    /// Horizontal acceleration in units per second squared
    pub acceleration: f32,
    /// Top running speed in units per second
    pub max_run_speed: f32,
    /// Vertical take-off speed
    pub jump_speed: f32,
    /// Take-off speed multiplier of the double jump
    pub double_jump_multiplier: f32,
    pub double_jump_window: Duration,
    /// Minimum time between two attacks
    pub attack_cooldown: Duration,
    /// Reach of the player's attack
    pub attack_reach: f32,
    /// Minimum time between two accepted hits on the player
    pub hurt_cooldown: Duration,
    /// Life lost per enemy strike
    pub hurt_damage: f32,
    pub max_health: f32,
    /// How long the player stays tinted after a hit
    pub hurt_flash: Duration,
    /// Collider half extents
    pub half_size: Vec2,
    pub texture_prefix: String,
    pub clips: HashMap<String, ClipSpec>,
    pub jump_sound: Option<String>,
    pub attack_sound: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            acceleration: 10_000.0,
            max_run_speed: 700.0,
            jump_speed: 800.0,
            double_jump_multiplier: 1.5,
            double_jump_window: Duration::from_millis(500),
            attack_cooldown: Duration::from_millis(200),
            attack_reach: 80.0,
            hurt_cooldown: Duration::from_millis(500),
            hurt_damage: 5.0,
            max_health: 100.0,
            hurt_flash: Duration::from_millis(100),
            half_size: Vec2::new(30.0, 50.0),
            texture_prefix: "knight".to_string(),
            clips: HashMap::from([
                ("idle".to_string(), ClipSpec::new(10, 10.0, true)),
                ("run".to_string(), ClipSpec::new(10, 30.0, true)),
                ("jump".to_string(), ClipSpec::new(10, 20.0, false)),
                ("attack".to_string(), ClipSpec::new(4, 25.0, false)),
                ("dead".to_string(), ClipSpec::new(10, 10.0, false)),
            ]),
            jump_sound: Some("audio/player/jump.ogg".to_string()),
            attack_sound: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_jump_needs_fresh_press() {
        let mut motion = PlayerMotion {
            grounded: true,
            ..default()
        };
        assert_eq!(motion.press_jump(ms(0), WINDOW), Some(JumpKind::Jump));
        motion.grounded = false;
        assert_eq!(motion.press_jump(ms(50), WINDOW), None);
    }

    #[test]
    fn test_double_jump_within_window() {
        let mut motion = PlayerMotion {
            grounded: true,
            ..default()
        };
        motion.press_jump(ms(0), WINDOW);
        motion.grounded = false;
        motion.release_jump();

        assert_eq!(motion.press_jump(ms(300), WINDOW), Some(JumpKind::DoubleJump));
        motion.release_jump();
        assert_eq!(motion.press_jump(ms(350), WINDOW), None);
    }

    #[test]
    fn test_double_jump_window_expires() {
        let mut motion = PlayerMotion {
            grounded: true,
            ..default()
        };
        motion.press_jump(ms(0), WINDOW);
        motion.grounded = false;
        motion.release_jump();

        assert_eq!(motion.press_jump(ms(500), WINDOW), None);
    }

    #[test]
    fn test_no_double_jump_after_walking_off_ledge() {
        let mut motion = PlayerMotion::default();
        assert_eq!(motion.press_jump(ms(0), WINDOW), None);
    }

    #[test]
    fn test_run_velocity_caps_at_max_speed() {
        assert_eq!(run_velocity(0.0, 1.0, 10_000.0, 700.0, 0.0625), 625.0);
        assert_eq!(run_velocity(650.0, 1.0, 10_000.0, 700.0, 0.0625), 700.0);
        assert_eq!(run_velocity(700.0, -1.0, 10_000.0, 700.0, 0.0625), 75.0);
        assert_eq!(run_velocity(-690.0, -1.0, 10_000.0, 700.0, 0.1), -700.0);
    }
}
