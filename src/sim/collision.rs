//! Player vs obstacle contact resolution
//!
//! The capsule can rest on barrier surfaces and bump its head on them, but
//! running into a barrier from the side is lethal. Classification uses the
//! capsule's position one tick ago to tell a landing from a side impact.

use super::geometry::span_overlaps;
use super::obstacles::Obstacle;
use super::player::Player;
use super::state::Viewport;

/// How the capsule touched a single obstacle this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No horizontal overlap, or inside the gap
    Clear,
    /// Came down onto the ceiling segment's surface line
    Landed,
    /// Rose into the ceiling segment's underside
    HeadBump,
    /// Came down onto the floor segment's top surface
    LandedOnBase,
    /// Hit a segment side-on
    Lethal,
}

/// Classify and resolve the capsule against one obstacle
///
/// `prev_y` is the capsule's vertical position one tick ago. Snapping
/// contacts move the capsule and zero its vertical velocity.
pub fn resolve_obstacle(
    player: &mut Player,
    prev_y: f32,
    obs: &Obstacle,
    viewport: &Viewport,
) -> Contact {
    let r = player.radius;
    let hit_x = span_overlaps(player.pos.x, r, obs.x, obs.right());
    if !hit_x {
        return Contact::Clear;
    }

    let base = obs.bottom_surface(viewport);
    let hit_top = obs.top > 0.0 && player.top() < obs.top;
    let hit_bottom = obs.bottom > 0.0 && player.bottom() > base;
    let vy = player.velocity_y;

    if hit_top && vy > 0.0 && prev_y + r <= obs.top {
        player.pos.y = obs.top - r;
        player.velocity_y = 0.0;
        return Contact::Landed;
    }

    if hit_top && vy < 0.0 && prev_y - r >= obs.top {
        player.pos.y = obs.top + r;
        player.velocity_y = 0.0;
        return Contact::HeadBump;
    }

    if hit_bottom && vy > 0.0 && prev_y + r <= base {
        player.pos.y = base - r;
        player.velocity_y = 0.0;
        return Contact::LandedOnBase;
    }

    if hit_top || hit_bottom {
        return Contact::Lethal;
    }

    Contact::Clear
}

/// Resolve the capsule against every obstacle; returns the terminal flag
///
/// Scanning stops at the first lethal contact.
pub fn check_collision(player: &mut Player, obstacles: &[Obstacle], viewport: &Viewport) -> bool {
    let prev_y = player.previous_y();
    for obs in obstacles {
        if resolve_obstacle(player, prev_y, obs, viewport) == Contact::Lethal {
            return true;
        }
    }
    false
}
