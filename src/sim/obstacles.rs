//! Procedurally generated gated barriers
//!
//! Each obstacle is a column with an optional segment hanging from the
//! ceiling and an optional segment standing on the floor. The passable
//! interval between them is the gap.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::Viewport;
use crate::settings::ObstacleSettings;

/// Stable obstacle identifier (never reused within a run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// Which barrier segments an obstacle has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateLayout {
    TopOnly,
    BottomOnly,
    Both,
}

impl GateLayout {
    pub const ALL: [GateLayout; 3] = [GateLayout::TopOnly, GateLayout::BottomOnly, GateLayout::Both];

    pub fn has_top(&self) -> bool {
        !matches!(self, GateLayout::BottomOnly)
    }

    pub fn has_bottom(&self) -> bool {
        !matches!(self, GateLayout::TopOnly)
    }
}

/// A gated barrier pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Leading (left) edge
    pub x: f32,
    pub width: f32,
    /// Height of the ceiling segment (0 = absent)
    pub top: f32,
    /// Height of the floor segment above the ground line (0 = absent)
    pub bottom: f32,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Ceiling segment, if present
    pub fn top_rect(&self) -> Option<Rect> {
        (self.top > 0.0).then(|| Rect::new(self.x, 0.0, self.width, self.top))
    }

    /// Floor segment, if present
    pub fn bottom_rect(&self, viewport: &Viewport) -> Option<Rect> {
        (self.bottom > 0.0).then(|| {
            Rect::new(self.x, self.bottom_surface(viewport), self.width, self.bottom)
        })
    }

    /// Present segments, ceiling first
    pub fn rects(&self, viewport: &Viewport) -> impl Iterator<Item = Rect> {
        self.top_rect().into_iter().chain(self.bottom_rect(viewport))
    }

    /// Y of the floor segment's upper surface (the ground line when absent)
    #[inline]
    pub fn bottom_surface(&self, viewport: &Viewport) -> f32 {
        viewport.ground_y() - self.bottom
    }

    /// Passable interval `(gap_top, gap_bottom)`
    pub fn gap(&self, viewport: &Viewport) -> (f32, f32) {
        let gap_top = if self.top > 0.0 { self.top } else { 0.0 };
        (gap_top, self.bottom_surface(viewport))
    }
}

/// Scrolling set of obstacles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    frame_count: u64,
    next_id: u32,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a tick and spawn one obstacle at the right edge on cadence ticks
    ///
    /// Nothing is counted or spawned while `halted`.
    pub fn spawn_tick(
        &mut self,
        halted: bool,
        viewport: &Viewport,
        tuning: &ObstacleSettings,
        rng: &mut Pcg32,
    ) -> Option<ObstacleId> {
        if halted {
            return None;
        }
        self.frame_count += 1;
        if self.frame_count % u64::from(tuning.spawn_interval.max(1)) != 0 {
            return None;
        }

        let layout = GateLayout::ALL[rng.random_range(0..GateLayout::ALL.len())];
        let (top, bottom) = split_gap(viewport, tuning, layout, rng.random::<f32>());
        let id = self.push(viewport.width, tuning.width, top, bottom);
        log::debug!(
            "Obstacle {:?} spawned: {:?} top={:.1} bottom={:.1}",
            id,
            layout,
            top,
            bottom
        );
        Some(id)
    }

    /// Insert an obstacle directly, returning its new id
    pub fn push(&mut self, x: f32, width: f32, top: f32, bottom: f32) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            x,
            width,
            top: top.max(0.0),
            bottom: bottom.max(0.0),
        });
        id
    }

    /// Scroll left by `speed`; frozen while halted
    pub fn advance(&mut self, halted: bool, speed: f32) {
        if halted {
            return;
        }
        for obs in &mut self.obstacles {
            obs.x -= speed;
        }
    }

    /// Remove obstacles whose trailing edge has passed x = 0
    pub fn evict_offscreen(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.right() >= 0.0);
        before - self.obstacles.len()
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

/// Split the lane into `(top, bottom)` segment heights for a layout
///
/// `u` in [0, 1) places the gap. Heights are never negative: when the lane
/// is shorter than the minimum gap both segments collapse to zero, and the
/// margins shrink to fit whatever room is left.
pub fn split_gap(
    viewport: &Viewport,
    tuning: &ObstacleSettings,
    layout: GateLayout,
    u: f32,
) -> (f32, f32) {
    let available = (viewport.ground_y() - tuning.min_gap).max(0.0);
    let margin = tuning.min_margin.max(0.0).min(available / 2.0);
    let span = available - 2.0 * margin;
    let top = (margin + u.clamp(0.0, 1.0) * span).clamp(0.0, available);
    let bottom = available - top;

    (
        if layout.has_top() { top } else { 0.0 },
        if layout.has_bottom() { bottom } else { 0.0 },
    )
}
