//! Circle vs axis-aligned rectangle contact kernel
//!
//! Every circle/rectangle test in the simulation goes through these
//! functions: the player resolver, agent navigation and shard shattering
//! all share the same closest-point math.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Point of the rectangle closest to `p` (p itself when inside)
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// Result of a minimum translation vector query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mtv {
    /// Whether the circle overlaps the rectangle
    pub hit: bool,
    /// Unit direction to push the circle out along
    pub normal: Vec2,
    /// Distance to push along `normal`
    pub depth: f32,
}

impl Mtv {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            depth: 0.0,
        }
    }

    /// Displacement that separates the circle (zero on a miss)
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.normal * self.depth
    }
}

/// True iff the circle strictly overlaps the rectangle
#[inline]
pub fn overlaps(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Smallest push that moves the circle out of the rectangle
///
/// When the center sits inside the rectangle the closest point coincides
/// with it and no direction can be derived; the circle is then pushed out
/// through the nearest face with `depth = radius`, which clears that single
/// axis only.
pub fn minimum_translation_vector(center: Vec2, radius: f32, rect: &Rect) -> Mtv {
    let closest = rect.closest_point(center);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq >= radius * radius {
        return Mtv::miss();
    }

    let dist = dist_sq.sqrt();
    if dist == 0.0 {
        let left = (center.x - rect.left()).abs();
        let right = (rect.right() - center.x).abs();
        let top = (center.y - rect.top()).abs();
        let bottom = (rect.bottom() - center.y).abs();
        let least = left.min(right).min(top).min(bottom);

        // Ties resolve left, right, top, bottom in that order
        let normal = if least == left {
            Vec2::NEG_X
        } else if least == right {
            Vec2::X
        } else if least == top {
            Vec2::NEG_Y
        } else {
            Vec2::Y
        };
        return Mtv {
            hit: true,
            normal,
            depth: radius,
        };
    }

    Mtv {
        hit: true,
        normal: delta / dist,
        depth: radius - dist,
    }
}

/// True iff two circles strictly overlap
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

/// True iff the open interval `(center - radius, center + radius)` overlaps
/// the open interval `(min, max)`
#[inline]
pub fn span_overlaps(center: f32, radius: f32, min: f32, max: f32) -> bool {
    center + radius > min && center - radius < max
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RECT: Rect = Rect::new(500.0, 0.0, 100.0, 150.0);

    #[test]
    fn test_overlap_edge_is_not_overlap() {
        // Exactly touching the right face
        assert!(!overlaps(Vec2::new(615.0, 50.0), 15.0, &RECT));
        assert!(overlaps(Vec2::new(614.9, 50.0), 15.0, &RECT));
    }

    #[test]
    fn test_overlap_corner() {
        // Near the bottom-right corner but outside the radius diagonally
        assert!(!overlaps(Vec2::new(611.0, 161.0), 15.0, &RECT));
        assert!(overlaps(Vec2::new(609.0, 159.0), 15.0, &RECT));
    }

    #[test]
    fn test_mtv_side_push() {
        let mtv = minimum_translation_vector(Vec2::new(610.0, 50.0), 15.0, &RECT);
        assert!(mtv.hit);
        assert_eq!(mtv.normal, Vec2::X);
        assert!((mtv.depth - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_mtv_miss() {
        let mtv = minimum_translation_vector(Vec2::new(700.0, 50.0), 15.0, &RECT);
        assert_eq!(mtv, Mtv::miss());
        assert_eq!(mtv.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_mtv_center_inside_picks_nearest_face() {
        // 3 from the right face, 20 from top
        let mtv = minimum_translation_vector(Vec2::new(597.0, 20.0), 15.0, &RECT);
        assert!(mtv.hit);
        assert_eq!(mtv.normal, Vec2::X);
        assert_eq!(mtv.depth, 15.0);

        // Nearest to the bottom face
        let mtv = minimum_translation_vector(Vec2::new(550.0, 140.0), 15.0, &RECT);
        assert_eq!(mtv.normal, Vec2::Y);

        // Nearest to the top face
        let mtv = minimum_translation_vector(Vec2::new(550.0, 4.0), 15.0, &RECT);
        assert_eq!(mtv.normal, Vec2::NEG_Y);

        // Nearest to the left face
        let mtv = minimum_translation_vector(Vec2::new(502.0, 70.0), 15.0, &RECT);
        assert_eq!(mtv.normal, Vec2::NEG_X);
    }

    #[test]
    fn test_circles_and_spans() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(19.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
        assert!(span_overlaps(95.0, 10.0, 100.0, 200.0));
        assert!(!span_overlaps(90.0, 10.0, 100.0, 200.0));
    }

    proptest! {
        #[test]
        fn prop_far_circles_never_overlap(
            cx in -1000.0f32..1000.0,
            cy in -1000.0f32..1000.0,
            r in 0.5f32..80.0,
            rx in -500.0f32..500.0,
            ry in -500.0f32..500.0,
            rw in 1.0f32..300.0,
            rh in 1.0f32..300.0,
        ) {
            let rect = Rect::new(rx, ry, rw, rh);
            let center = Vec2::new(cx, cy);
            let dist = center.distance(rect.closest_point(center));
            if dist > r {
                prop_assert!(!overlaps(center, r, &rect));
            }
        }

        #[test]
        fn prop_mtv_separates(
            cx in -200.0f32..400.0,
            cy in -200.0f32..400.0,
            r in 1.0f32..60.0,
            rw in 10.0f32..200.0,
            rh in 10.0f32..200.0,
        ) {
            let rect = Rect::new(0.0, 0.0, rw, rh);
            let center = Vec2::new(cx, cy);
            let mtv = minimum_translation_vector(center, r, &rect);
            prop_assert_eq!(mtv.hit, overlaps(center, r, &rect));

            let inside = center == rect.closest_point(center);
            if mtv.hit && !inside {
                // Nudge a hair past the contact to absorb float rounding
                let moved = center + mtv.normal * (mtv.depth + 1e-3);
                prop_assert!(!overlaps(moved, r, &rect));
                prop_assert!((mtv.normal.length() - 1.0).abs() < 1e-3);
            }
            if mtv.hit && inside {
                prop_assert_eq!(mtv.depth, r);
                prop_assert!(mtv.normal.x == 0.0 || mtv.normal.y == 0.0);
            }
        }
    }
}
