//! Player capsule physics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Viewport;
use crate::consts::{PLAYER_SPIN_SPEED, PLAYER_START_SIDES};
use crate::settings::PhysicsSettings;
use crate::wrap_angle;

/// The player's capsule (drawn as a spinning polygon, collided as a circle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Vertical velocity (positive = falling)
    pub velocity_y: f32,
    pub gravity: f32,
    /// Velocity a jump sets (negative = up)
    pub lift: f32,
    /// Spin animation angle (radians)
    pub angle: f32,
    /// Polygon side count shown by the renderer
    pub sides: u32,
}

impl Player {
    /// Place a fresh player at the left quarter, vertically centred
    pub fn new(viewport: &Viewport, physics: &PhysicsSettings) -> Self {
        Self {
            pos: Vec2::new(viewport.width * 0.25, viewport.height / 2.0),
            radius: physics.player_radius,
            velocity_y: 0.0,
            gravity: physics.gravity,
            lift: physics.lift,
            angle: 0.0,
            sides: PLAYER_START_SIDES,
        }
    }

    /// Integrate gravity and clamp against ceiling and floor
    pub fn update(&mut self, viewport: &Viewport) {
        self.velocity_y += self.gravity;
        self.pos.y += self.velocity_y;

        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.velocity_y = 0.0;
        }

        let ground = viewport.ground_y();
        if self.pos.y + self.radius > ground {
            self.pos.y = ground - self.radius;
            self.velocity_y = 0.0;
        }
    }

    pub fn jump(&mut self) {
        self.velocity_y = self.lift;
    }

    /// Advance the spin animation (frozen while halted)
    pub fn spin(&mut self, halted: bool) {
        if !halted {
            self.angle = wrap_angle(self.angle + PLAYER_SPIN_SPEED);
        }
    }

    /// Approximate position one tick ago (`y - vy`, no stored history)
    #[inline]
    pub fn previous_y(&self) -> f32 {
        self.pos.y - self.velocity_y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn setup() -> (Viewport, Player) {
        let vp = Viewport::new(800.0, 600.0, 100.0);
        let player = Player::new(&vp, &Settings::default().physics);
        (vp, player)
    }

    #[test]
    fn test_spawn_position() {
        let (_, player) = setup();
        assert_eq!(player.pos, Vec2::new(200.0, 300.0));
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn test_gravity_integration() {
        let (vp, mut player) = setup();
        player.update(&vp);
        assert!((player.velocity_y - 0.6).abs() < 1e-6);
        assert!((player.pos.y - 300.6).abs() < 1e-4);
        assert!((player.previous_y() - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_floor_clamp() {
        let (vp, mut player) = setup();
        for _ in 0..200 {
            player.update(&vp);
        }
        assert_eq!(player.pos.y, 500.0 - player.radius);
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn test_ceiling_clamp_after_jumps() {
        let (vp, mut player) = setup();
        for _ in 0..20 {
            player.jump();
            player.update(&vp);
        }
        assert_eq!(player.pos.y, player.radius);
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn test_spin_frozen_when_halted() {
        let (_, mut player) = setup();
        player.spin(false);
        let angle = player.angle;
        assert!(angle > 0.0);
        player.spin(true);
        assert_eq!(player.angle, angle);
        for _ in 0..200 {
            player.spin(false);
        }
        assert!(player.angle < std::f32::consts::TAU);
    }
}
