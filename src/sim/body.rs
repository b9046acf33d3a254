//! Axis-aligned bodies and contact classification
//!
//! Screen coordinates: +x right, +y down. A body is a box centred on `pos`.

use glam::Vec2;

/// A moving axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            half: size / 2.0,
        }
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.half.x
    }

    /// Strict overlap (touching edges don't count)
    pub fn overlaps(&self, other: &Body) -> bool {
        let d = (self.pos - other.pos).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }

    /// Explicit Euler step
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
    }
}

/// How a player/hazard contact resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Landed on top: the hazard dies
    Stomp,
    /// Anything else: the player is hurt
    Damage,
}

/// Classify a contact between the player and a hazard.
///
/// Stomp requires downward motion and a vertical overlap (player bottom past
/// hazard top) no deeper than `tolerance`.
pub fn classify_contact(player: &Body, hazard: &Body, tolerance: f32) -> Contact {
    let falling = player.vel.y > 0.0;
    let overlap = player.bottom() - hazard.top();
    if falling && overlap <= tolerance {
        Contact::Stomp
    } else {
        Contact::Damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(30.0, 30.0))
    }

    #[test]
    fn test_overlap() {
        assert!(body(0.0, 0.0).overlaps(&body(20.0, 20.0)));
        assert!(!body(0.0, 0.0).overlaps(&body(30.0, 0.0)));
        assert!(!body(0.0, 0.0).overlaps(&body(0.0, 45.0)));
    }

    #[test]
    fn test_stomp_from_above() {
        // Player bottom 4px into hazard top, moving down
        let player = body(0.0, 100.0 - 30.0 + 4.0).with_vel(Vec2::new(0.0, 200.0));
        let hazard = body(0.0, 100.0);
        assert_eq!(classify_contact(&player, &hazard, 10.0), Contact::Stomp);
    }

    #[test]
    fn test_rising_contact_damages() {
        let player = body(0.0, 100.0 - 30.0 + 4.0).with_vel(Vec2::new(0.0, -200.0));
        let hazard = body(0.0, 100.0);
        assert_eq!(classify_contact(&player, &hazard, 10.0), Contact::Damage);
    }

    #[test]
    fn test_side_contact_damages() {
        // Level with the hazard: overlap is the full body height
        let player = body(-20.0, 100.0).with_vel(Vec2::new(150.0, 50.0));
        let hazard = body(0.0, 100.0);
        assert_eq!(classify_contact(&player, &hazard, 10.0), Contact::Damage);
    }

    #[test]
    fn test_integrate_applies_gravity() {
        let mut b = body(0.0, 0.0).with_vel(Vec2::new(10.0, 0.0));
        b.integrate(100.0, 0.5);
        assert_eq!(b.vel, Vec2::new(10.0, 50.0));
        assert_eq!(b.pos, Vec2::new(5.0, 25.0));
    }
}
