//! Enemy engagement state machine.
//!
//! Decides, every tick, an enemy's facing, horizontal velocity, animation clip
//! and whether it strikes its target. The machine holds no ECS handles: the
//! AI systems feed it a [`TickInput`] and route the [`EngagementEffect`]s it
//! pushes to the physics body, clip player, audio and combat systems.
//!
//! Each tick runs in a fixed order: grace deadline, patrol boundary,
//! visibility, then distance/attack.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

/// Health lost per hit. Three hits bring a full enemy to zero.
pub const DEFAULT_HEALTH_STEP: f64 = 100.0 / 3.0;

const MAX_HEALTH: f64 = 100.0;

/// Residual health below this after a hit is treated as zero.
const HEALTH_EPSILON: f64 = 1e-9;

/// Horizontal orientation, used for movement direction and sprite mirroring.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Negative values face left, everything else faces right.
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Facing that looks from `from_x` toward `to_x`, `None` when both are aligned.
    pub fn toward(from_x: f32, to_x: f32) -> Option<Self> {
        if to_x < from_x {
            Some(Facing::Left)
        } else if to_x > from_x {
            Some(Facing::Right)
        } else {
            None
        }
    }
}

/// Left and right turnaround points of a patrol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolBounds {
    pub min: f32,
    pub max: f32,
}

impl PatrolBounds {
    /// Patrol starting at `x_min` and extending `range` units to the right.
    pub fn from_origin(x_min: f32, range: f32) -> Self {
        Self {
            min: x_min,
            max: x_min + range,
        }
    }

    /// Patrol of `half_range` units on each side of `center`.
    pub fn around(center: f32, half_range: f32) -> Self {
        Self {
            min: center - half_range,
            max: center + half_range,
        }
    }

    /// Spawn x for an enemy starting with `facing`: the end it walks away from.
    pub fn start_x(&self, facing: Facing) -> f32 {
        match facing {
            Facing::Right => self.min,
            Facing::Left => self.max,
        }
    }
}

/// Tuning for one enemy variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementConfig {
    /// Patrol speed in units per second.
    pub patrol_speed: f32,
    /// Chase speed as a multiple of the patrol speed.
    pub chase_multiplier: f32,
    /// Target must be strictly closer than this horizontally.
    pub sight_range_x: f32,
    /// Target may be at most this far away vertically.
    pub sight_range_y: f32,
    /// Straight-line distance at or under which the enemy stops and strikes.
    pub attack_range: f32,
    /// Delay after losing sight of the target before returning to patrol.
    pub grace: Duration,
    /// Minimum time between two strikes.
    pub strike_cooldown: Duration,
    /// Strikes also need physical contact with the target.
    pub strike_requires_contact: bool,
    /// Health lost per hit, out of a maximum of 100.
    pub health_step: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 100.0,
            chase_multiplier: 2.0,
            sight_range_x: 500.0,
            sight_range_y: 200.0,
            attack_range: 100.0,
            grace: Duration::from_millis(3000),
            strike_cooldown: Duration::from_millis(500),
            strike_requires_contact: false,
            health_step: DEFAULT_HEALTH_STEP,
        }
    }
}

impl EngagementConfig {
    pub fn chase_speed(&self) -> f32 {
        self.patrol_speed * self.chase_multiplier
    }
}

/// Animation clips an enemy switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyClip {
    Walk,
    Run,
    Dead,
}

impl EnemyClip {
    pub fn name(self) -> &'static str {
        match self {
            EnemyClip::Walk => "walk",
            EnemyClip::Run => "run",
            EnemyClip::Dead => "dead",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemySound {
    /// Target spotted.
    Alert,
    Die,
}

/// Side effects requested by the machine, applied by the caller in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngagementEffect {
    /// Switch to a clip that is not already playing.
    PlayClip(EnemyClip),
    PlaySound(EnemySound),
    /// Apply the enemy's damage to its target.
    StrikeTarget,
    /// Health changed after a hit, in percent of the maximum.
    HealthChanged { percent: f32 },
    /// Fired exactly once, on the transition to dead.
    Died,
    /// Fired exactly once, when the death animation completed.
    Destroyed,
}

/// Observable phase. Chasing and attacking share `Engaged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementPhase {
    Patrol,
    Engaged,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Enemy was already dead.
    Ignored,
    Wounded,
    Killed,
}

/// What the enemy can see of its target this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub position: Vec2,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Simulation clock, monotonic.
    pub now: Duration,
    pub position: Vec2,
    pub target: Option<TargetView>,
    /// Enemy body currently touches the target.
    pub in_contact: bool,
}

/// Per-enemy engagement state.
#[derive(Component, Debug, Clone)]
pub struct Engagement {
    config: EngagementConfig,
    bounds: PatrolBounds,
    facing: Facing,
    velocity_x: f32,
    health: f64,
    alive: bool,
    destroyed: bool,
    player_detected: bool,
    grace_deadline: Option<Duration>,
    next_strike_at: Option<Duration>,
    clip: EnemyClip,
}

impl Engagement {
    pub fn new(config: EngagementConfig, bounds: PatrolBounds, facing: Facing) -> Self {
        let velocity_x = facing.sign() * config.patrol_speed;
        Self {
            config,
            bounds,
            facing,
            velocity_x,
            health: MAX_HEALTH,
            alive: true,
            destroyed: false,
            player_detected: false,
            grace_deadline: None,
            next_strike_at: None,
            clip: EnemyClip::Walk,
        }
    }

    /// Start with `health` instead of full health, clamped to [0, 100].
    pub fn with_health(mut self, health: f64) -> Self {
        self.health = health.clamp(0.0, MAX_HEALTH);
        self
    }

    pub fn config(&self) -> &EngagementConfig {
        &self.config
    }

    pub fn bounds(&self) -> PatrolBounds {
        self.bounds
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Horizontal velocity the physics body should carry.
    pub fn velocity_x(&self) -> f32 {
        self.velocity_x
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn health_percent(&self) -> f32 {
        (self.health / MAX_HEALTH * 100.0).clamp(0.0, 100.0) as f32
    }

    pub fn clip(&self) -> EnemyClip {
        self.clip
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_engaged(&self) -> bool {
        self.alive && self.player_detected
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn grace_deadline(&self) -> Option<Duration> {
        self.grace_deadline
    }

    pub fn phase(&self) -> EngagementPhase {
        if !self.alive {
            EngagementPhase::Dead
        } else if self.player_detected {
            EngagementPhase::Engaged
        } else {
            EngagementPhase::Patrol
        }
    }

    /// Directional sight check: the target must be on the faced side, within
    /// `sight_range_y` vertically and strictly within `sight_range_x` horizontally.
    pub fn is_target_visible(&self, position: Vec2, target: Vec2) -> bool {
        Facing::toward(position.x, target.x) == Some(self.facing)
            && (target.y - position.y).abs() <= self.config.sight_range_y
            && (position.x - target.x).abs() < self.config.sight_range_x
    }

    /// Advance one simulation tick.
    pub fn tick(&mut self, input: &TickInput, effects: &mut Vec<EngagementEffect>) {
        if !self.alive {
            return;
        }

        self.expire_grace(input.now, effects);

        if !self.player_detected {
            self.patrol(input.position.x);
        }

        // A dead target is treated the same as no target.
        let target = input.target.filter(|target| target.alive);
        let visible = target
            .filter(|target| self.is_target_visible(input.position, target.position));

        match visible {
            Some(target) => {
                if !self.player_detected {
                    self.engage(input.position, target.position, effects);
                }
                self.grace_deadline = None;
                self.pursue(input, target.position, effects);
            }
            None if self.player_detected && self.grace_deadline.is_none() => {
                self.grace_deadline = Some(input.now + self.config.grace);
            }
            None => {}
        }
    }

    /// Take one hit. `attacker` is used to turn around when hit from behind.
    pub fn apply_damage(
        &mut self,
        position: Vec2,
        attacker: Option<Vec2>,
        effects: &mut Vec<EngagementEffect>,
    ) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - self.config.health_step).max(0.0);
        if self.health < HEALTH_EPSILON {
            self.health = 0.0;
        }
        effects.push(EngagementEffect::HealthChanged {
            percent: self.health_percent(),
        });

        if self.health == 0.0 {
            self.die(effects);
            return DamageOutcome::Killed;
        }

        let hit_from_behind = attacker
            .and_then(|attacker| Facing::toward(position.x, attacker.x))
            .is_some_and(|side| side != self.facing);
        if hit_from_behind {
            self.facing = self.facing.flipped();
            self.velocity_x = -self.velocity_x;
        }

        DamageOutcome::Wounded
    }

    /// Kill outright. Returns `false` when already dead.
    pub fn kill(&mut self, effects: &mut Vec<EngagementEffect>) -> bool {
        if !self.alive {
            return false;
        }
        self.health = 0.0;
        self.die(effects);
        true
    }

    /// Report that the death animation completed. Returns `true` exactly once.
    pub fn finish_death(&mut self, effects: &mut Vec<EngagementEffect>) -> bool {
        if self.alive || self.destroyed {
            return false;
        }
        self.destroyed = true;
        effects.push(EngagementEffect::Destroyed);
        true
    }

    fn expire_grace(&mut self, now: Duration, effects: &mut Vec<EngagementEffect>) {
        let Some(deadline) = self.grace_deadline else {
            return;
        };
        if now < deadline {
            return;
        }

        self.grace_deadline = None;
        self.player_detected = false;
        self.velocity_x = self.facing.sign() * self.config.patrol_speed;
        self.set_clip(EnemyClip::Walk, effects);
    }

    fn patrol(&mut self, x: f32) {
        // Velocity is authoritative for the boundary check.
        let moving = if self.velocity_x != 0.0 {
            Facing::from_sign(self.velocity_x)
        } else {
            self.facing
        };
        if moving != self.facing {
            warn!(
                "Enemy facing {:?} disagrees with velocity {}",
                self.facing, self.velocity_x
            );
        }

        match moving {
            Facing::Right if x >= self.bounds.max => self.turn(Facing::Left),
            Facing::Left if x <= self.bounds.min => self.turn(Facing::Right),
            _ => {}
        }
    }

    fn turn(&mut self, facing: Facing) {
        self.facing = facing;
        self.velocity_x = facing.sign() * self.config.patrol_speed;
    }

    fn engage(&mut self, position: Vec2, target: Vec2, effects: &mut Vec<EngagementEffect>) {
        if let Some(facing) = Facing::toward(position.x, target.x) {
            self.facing = facing;
        }
        self.player_detected = true;
        self.velocity_x = self.facing.sign() * self.config.chase_speed();
        self.set_clip(EnemyClip::Run, effects);
        effects.push(EngagementEffect::PlaySound(EnemySound::Alert));
    }

    fn pursue(&mut self, input: &TickInput, target: Vec2, effects: &mut Vec<EngagementEffect>) {
        if input.position.distance(target) > self.config.attack_range {
            if let Some(facing) = Facing::toward(input.position.x, target.x) {
                self.facing = facing;
            }
            self.velocity_x = self.facing.sign() * self.config.chase_speed();
            return;
        }

        self.velocity_x = 0.0;

        let cooled_down = self
            .next_strike_at
            .map_or(true, |next| input.now >= next);
        let touching = !self.config.strike_requires_contact || input.in_contact;
        if cooled_down && touching {
            effects.push(EngagementEffect::StrikeTarget);
            self.next_strike_at = Some(input.now + self.config.strike_cooldown);
        }
    }

    fn die(&mut self, effects: &mut Vec<EngagementEffect>) {
        self.alive = false;
        self.player_detected = false;
        self.grace_deadline = None;
        self.velocity_x = 0.0;
        self.set_clip(EnemyClip::Dead, effects);
        effects.push(EngagementEffect::PlaySound(EnemySound::Die));
        effects.push(EngagementEffect::Died);
    }

    fn set_clip(&mut self, clip: EnemyClip, effects: &mut Vec<EngagementEffect>) {
        if self.clip != clip {
            self.clip = clip;
            effects.push(EngagementEffect::PlayClip(clip));
        }
    }
}
