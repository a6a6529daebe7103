//! Decorative background polygons

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::{EntityPool, Pooled};
use super::state::Viewport;
use crate::settings::BackdropSettings;

/// Number of palette entries the renderer provides for decorations
pub const BACKDROP_PALETTE_LEN: u32 = 7;

/// A slowly spinning translucent polygon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoration {
    pub pos: Vec2,
    pub size: f32,
    pub sides: u32,
    pub palette_index: u32,
    pub angle: f32,
    pub rotation: f32,
}

impl Pooled for Decoration {
    fn x(&self) -> f32 {
        self.pos.x
    }

    fn translate_x(&mut self, dx: f32) {
        self.pos.x += dx;
    }

    fn size(&self) -> f32 {
        self.size
    }
}

impl Decoration {
    pub fn spawn(viewport: &Viewport, rng: &mut Pcg32) -> Self {
        let size = rng.random::<f32>() * 50.0 + 15.0;
        let lane = (viewport.ground_y() - size * 2.0).max(0.0);
        Self {
            pos: Vec2::new(viewport.width, rng.random::<f32>() * lane + size),
            size,
            sides: rng.random_range(3..=8),
            palette_index: rng.random_range(0..BACKDROP_PALETTE_LEN),
            angle: rng.random::<f32>() * std::f32::consts::TAU,
            rotation: rng.random::<f32>() * 0.02 - 0.01,
        }
    }
}

/// Scrolling backdrop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backdrop {
    pool: EntityPool<Decoration>,
}

impl Backdrop {
    pub fn new(tuning: &BackdropSettings) -> Self {
        Self {
            pool: EntityPool::new(tuning.speed, tuning.spawn_interval),
        }
    }

    /// Spawn, scroll (slowed while halted), spin and evict
    pub fn update(
        &mut self,
        halted: bool,
        viewport: &Viewport,
        tuning: &BackdropSettings,
        rng: &mut Pcg32,
    ) {
        self.pool
            .spawn_tick(halted, viewport, |vp| Decoration::spawn(vp, rng));
        self.pool
            .advance(if halted { tuning.halt_multiplier } else { 1.0 });
        for deco in self.pool.iter_mut() {
            deco.angle += deco.rotation;
        }
        self.pool.evict_offscreen();
    }

    pub fn draw<F>(&self, draw_one: F)
    where
        F: FnMut(&Decoration),
    {
        self.pool.draw(draw_one);
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use rand::SeedableRng;

    #[test]
    fn test_backdrop_spawns_and_slows_when_halted() {
        let vp = Viewport::new(800.0, 600.0, 100.0);
        let tuning = Settings::default().backdrop;
        let mut rng = Pcg32::seed_from_u64(4);
        let mut backdrop = Backdrop::new(&tuning);

        for _ in 0..tuning.spawn_interval {
            backdrop.update(false, &vp, &tuning, &mut rng);
        }
        assert_eq!(backdrop.len(), 1);
        let mut x = 0.0;
        backdrop.draw(|d| x = d.pos.x);
        assert_eq!(x, vp.width - tuning.speed);

        backdrop.update(true, &vp, &tuning, &mut rng);
        let mut halted_x = 0.0;
        backdrop.draw(|d| halted_x = d.pos.x);
        assert!((x - halted_x - tuning.speed * tuning.halt_multiplier).abs() < 1e-4);
    }

    #[test]
    fn test_decorations_fit_lane() {
        let vp = Viewport::new(800.0, 600.0, 100.0);
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..100 {
            let d = Decoration::spawn(&vp, &mut rng);
            assert!(d.pos.y >= d.size && d.pos.y <= vp.ground_y() - d.size + 1e-3);
            assert!((3..=8).contains(&d.sides));
            assert!(d.palette_index < BACKDROP_PALETTE_LEN);
        }
    }
}
