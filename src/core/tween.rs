//! Linear width tweening for bar sprites.

use bevy::prelude::*;

/// Animates a sprite's width toward a target over a fixed duration.
#[derive(Component, Debug, Clone)]
pub struct WidthTween {
    from: f32,
    to: f32,
    /// Seconds a full transition takes
    pub duration: f32,
    elapsed: f32,
}

impl WidthTween {
    pub fn new(width: f32, duration: f32) -> Self {
        Self {
            from: width,
            to: width,
            duration,
            elapsed: duration,
        }
    }

    /// Start a new transition from the current width.
    pub fn retarget(&mut self, to: f32) {
        if to == self.to {
            return;
        }
        self.from = self.value();
        self.to = to;
        self.elapsed = 0.0;
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    pub fn advance(&mut self, delta: f32) {
        self.elapsed = (self.elapsed + delta).min(self.duration);
    }
}

/// System that drives bar widths toward their targets.
pub fn update_width_tweens(time: Res<Time>, mut query: Query<(&mut WidthTween, &mut Sprite)>) {
    let dt = time.delta_secs();

    for (mut tween, mut sprite) in query.iter_mut() {
        tween.advance(dt);
        let width = tween.value();
        let height = sprite.custom_size.map_or(0.0, |size| size.y);
        sprite.custom_size = Some(Vec2::new(width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tween_is_settled() {
        let tween = WidthTween::new(50.0, 0.2);
        assert_eq!(tween.value(), 50.0);
    }

    #[test]
    fn test_linear_progress() {
        let mut tween = WidthTween::new(50.0, 0.2);
        tween.retarget(25.0);
        assert_eq!(tween.value(), 50.0);

        tween.advance(0.1);
        assert!((tween.value() - 37.5).abs() < 1e-4);

        tween.advance(0.5);
        assert_eq!(tween.value(), 25.0);
    }

    #[test]
    fn test_retarget_midway_starts_from_current_width() {
        let mut tween = WidthTween::new(100.0, 1.0);
        tween.retarget(0.0);
        tween.advance(0.5);
        tween.retarget(100.0);
        assert!((tween.value() - 50.0).abs() < 1e-4);
        assert_eq!(tween.target(), 100.0);
    }
}
