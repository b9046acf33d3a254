//! Player, collectible, hazard and projectile records
//!
//! Entities are plain data plus the one-shot operations that flip their
//! terminal flags. Once `collected` is set or `alive` is cleared an instance is
//! never processed again.

use glam::Vec2;

use super::body::Body;
use super::catalog::{CollectibleDef, HazardDef};
use super::timer::Timer;

/// Player hitbox (px)
pub const PLAYER_SIZE: Vec2 = Vec2::new(28.0, 38.0);
/// Collectible hitbox (px)
pub const ITEM_SIZE: Vec2 = Vec2::new(28.0, 28.0);
/// Hazard hitbox (px)
pub const HAZARD_SIZE: Vec2 = Vec2::new(30.0, 30.0);
/// Water bullet hitbox (px)
pub const PROJECTILE_SIZE: Vec2 = Vec2::new(12.0, 8.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
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
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: u8,
    pub max_health: u8,
    pub facing: Facing,
    pub on_ground: bool,
    invincibility: Timer,
    shoot_cooldown: Timer,
}

impl Player {
    pub fn new(pos: Vec2, max_health: u8) -> Self {
        Self {
            body: Body::new(pos, PLAYER_SIZE),
            health: max_health,
            max_health,
            facing: Facing::default(),
            on_ground: false,
            invincibility: Timer::idle(),
            shoot_cooldown: Timer::idle(),
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_active()
    }

    /// Ticks left in the invincibility window (0 when vulnerable)
    pub fn invincible_ticks_left(&self) -> u32 {
        self.invincibility.remaining()
    }

    pub fn can_shoot(&self) -> bool {
        !self.shoot_cooldown.is_active()
    }

    /// Lose one point of health and open the invincibility window.
    ///
    /// Returns false (no effect) while invincible or already at zero.
    pub fn take_damage(&mut self, window_ticks: u32) -> bool {
        if self.is_invincible() || self.health == 0 {
            return false;
        }
        self.health -= 1;
        self.invincibility.restart(window_ticks);
        true
    }

    /// Jump only from the ground
    pub fn try_jump(&mut self, velocity: f32) -> bool {
        if !self.on_ground {
            return false;
        }
        self.body.vel.y = velocity;
        self.on_ground = false;
        true
    }

    /// Start the shot cooldown if it has elapsed
    pub fn try_shoot(&mut self, cooldown_ticks: u32) -> bool {
        if !self.can_shoot() {
            return false;
        }
        self.shoot_cooldown.restart(cooldown_ticks);
        true
    }

    /// Apply a horizontal intent (-1, 0, 1) at `speed`
    pub fn steer(&mut self, direction: f32, speed: f32) {
        self.body.vel.x = direction * speed;
        if direction < 0.0 {
            self.facing = Facing::Left;
        } else if direction > 0.0 {
            self.facing = Facing::Right;
        }
    }

    pub fn advance_timers(&mut self) {
        self.invincibility.advance();
        self.shoot_cooldown.advance();
    }

    pub fn cancel_timers(&mut self) {
        self.invincibility.cancel();
        self.shoot_cooldown.cancel();
    }
}

/// A collectible instance
#[derive(Debug, Clone)]
pub struct Collectible {
    pub id: u32,
    pub def: &'static CollectibleDef,
    pub body: Body,
    collected: bool,
}

impl Collectible {
    pub fn new(id: u32, def: &'static CollectibleDef, body: Body) -> Self {
        Self {
            id,
            def,
            body,
            collected: false,
        }
    }

    /// One-shot collection: yields the definition the first time only
    pub fn collect(&mut self) -> Option<&'static CollectibleDef> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.def)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

/// Vertical bobbing for drifting contaminants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float {
    pub base_y: f32,
    pub amplitude: f32,
    pub period: f32,
}

/// A hazard instance
#[derive(Debug, Clone)]
pub struct Hazard {
    pub id: u32,
    pub def: &'static HazardDef,
    pub body: Body,
    pub hit_points: u8,
    pub float: Option<Float>,
    alive: bool,
}

impl Hazard {
    pub fn new(id: u32, def: &'static HazardDef, body: Body) -> Self {
        Self {
            id,
            def,
            body,
            hit_points: def.hit_points.max(1),
            float: None,
            alive: true,
        }
    }

    pub fn with_float(mut self, float: Float) -> Self {
        self.float = Some(float);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Remove one hit point. Returns true only on the hit that kills.
    pub fn take_damage(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.hit_points = self.hit_points.saturating_sub(1);
        if self.hit_points == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Immediate death regardless of hit points. True only the first time.
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.hit_points = 0;
        self.alive = false;
        true
    }

    /// Sinusoidal vertical position at `time_secs`
    pub fn apply_float(&mut self, time_secs: f32) {
        if let Some(f) = self.float {
            let phase = time_secs / f.period * std::f32::consts::TAU;
            self.body.pos.y = f.base_y + phase.sin() * f.amplitude;
        }
    }
}

/// A water bullet
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub body: Body,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::{CONTAMINANTS, LEVEL_COLLECTIBLES};

    #[test]
    fn test_collect_is_one_shot() {
        let body = Body::new(Vec2::ZERO, ITEM_SIZE);
        let mut item = Collectible::new(1, &LEVEL_COLLECTIBLES[0], body);
        let first = item.collect().map(|d| d.score);
        let second = item.collect().map(|d| d.score);
        assert_eq!(first, Some(15));
        assert_eq!(second, None);
        assert!(item.is_collected());
    }

    #[test]
    fn test_hazard_dies_once() {
        // factory: 3 hp
        let mut hazard = Hazard::new(1, &CONTAMINANTS[4], Body::new(Vec2::ZERO, HAZARD_SIZE));
        assert!(!hazard.take_damage());
        assert!(!hazard.take_damage());
        assert!(hazard.take_damage());
        assert!(!hazard.is_alive());
        assert!(!hazard.take_damage());
        assert!(!hazard.kill());
    }

    #[test]
    fn test_invincibility_blocks_damage() {
        let mut player = Player::new(Vec2::ZERO, 3);
        assert!(player.take_damage(10));
        assert_eq!(player.health, 2);
        assert!(!player.take_damage(10));
        for _ in 0..10 {
            player.advance_timers();
        }
        assert!(player.take_damage(10));
        assert_eq!(player.health, 1);
    }

    #[test]
    fn test_invincibility_counts_down() {
        let mut player = Player::new(Vec2::ZERO, 3);
        assert_eq!(player.invincible_ticks_left(), 0);
        player.take_damage(10);
        assert_eq!(player.invincible_ticks_left(), 10);
        for _ in 0..3 {
            player.advance_timers();
        }
        assert_eq!(player.invincible_ticks_left(), 7);
        player.cancel_timers();
        assert_eq!(player.invincible_ticks_left(), 0);
        assert!(!player.is_invincible());
    }

    #[test]
    fn test_health_never_underflows() {
        let mut player = Player::new(Vec2::ZERO, 1);
        assert!(player.take_damage(1));
        player.advance_timers();
        assert!(!player.take_damage(1));
        assert_eq!(player.health, 0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut player = Player::new(Vec2::ZERO, 3);
        assert!(!player.try_jump(-420.0));
        player.on_ground = true;
        assert!(player.try_jump(-420.0));
        assert_eq!(player.body.vel.y, -420.0);
        assert!(!player.try_jump(-420.0));
    }

    #[test]
    fn test_shoot_cooldown() {
        let mut player = Player::new(Vec2::ZERO, 3);
        assert!(player.try_shoot(3));
        assert!(!player.try_shoot(3));
        player.advance_timers();
        player.advance_timers();
        assert!(!player.can_shoot());
        player.advance_timers();
        assert!(player.try_shoot(3));
    }

    #[test]
    fn test_steer_sets_facing() {
        let mut player = Player::new(Vec2::ZERO, 3);
        player.steer(-1.0, 300.0);
        assert_eq!(player.facing, Facing::Left);
        assert_eq!(player.body.vel.x, -300.0);
        player.steer(0.0, 300.0);
        assert_eq!(player.facing, Facing::Left);
        assert_eq!(player.body.vel.x, 0.0);
    }
}
