//! Combat-related components.

use std::time::Duration;

use bevy::prelude::*;

// Re-export from core to avoid duplication
pub use crate::core::{DamageEvent, DeathEvent};

/// Component for entities that can take damage.
#[derive(Component, Debug)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Remove up to `amount`, never below zero. Returns what was removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.current).max(0.0);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        (self.current / self.maximum).clamp(0.0, 1.0)
    }
}

/// Leading-edge throttle: the first call passes, later calls are dropped
/// until `interval` has elapsed.
#[derive(Debug, Clone)]
pub struct Throttle {
    pub interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn is_ready(&self, now: Duration) -> bool {
        self.last
            .map_or(true, |last| now.saturating_sub(last) >= self.interval)
    }

    /// Returns `true` and starts a new interval when ready.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last = Some(now);
        true
    }
}

/// Limits how often the player can be hurt.
#[derive(Component, Debug, Clone)]
pub struct HurtThrottle(pub Throttle);

impl HurtThrottle {
    pub fn new(interval: Duration) -> Self {
        Self(Throttle::new(interval))
    }
}

/// Limits how often the player can swing.
#[derive(Component, Debug, Clone)]
pub struct AttackThrottle(pub Throttle);

impl AttackThrottle {
    pub fn new(interval: Duration) -> Self {
        Self(Throttle::new(interval))
    }
}

/// Red tint shown briefly after a hit.
#[derive(Component)]
pub struct HurtFlash(pub Timer);

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_health_never_negative() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(5.0), 5.0);
        assert_eq!(health.current, 95.0);

        assert_eq!(health.take_damage(500.0), 95.0);
        assert_eq!(health.current, 0.0);
        assert!(health.is_dead());
        assert_eq!(health.take_damage(5.0), 0.0);
    }

    #[test]
    fn test_health_percentage() {
        let mut health = Health::new(200.0);
        health.take_damage(50.0);
        assert_eq!(health.percentage(), 0.75);
    }

    #[test]
    fn test_twenty_hits_kill_player() {
        let mut health = Health::new(100.0);
        for _ in 0..19 {
            health.take_damage(5.0);
        }
        assert!(!health.is_dead());
        health.take_damage(5.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_throttle_drops_calls_inside_interval() {
        let mut throttle = Throttle::new(ms(500));
        assert!(throttle.try_fire(ms(1000)));
        assert!(!throttle.try_fire(ms(1200)));
        assert!(!throttle.try_fire(ms(1499)));
        assert!(throttle.try_fire(ms(1500)));
        assert!(!throttle.is_ready(ms(1600)));
    }
}
