//! Collectible shards drifting through the lane
//!
//! Shards scroll left with a sinusoidal wobble, break on any barrier they
//! touch and are picked up when the player flies close enough.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::overlaps;
use super::obstacles::ObstacleField;
use super::pool::{EntityPool, Pooled};
use super::state::Viewport;
use crate::settings::ShardSettings;

/// A collectible shard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shard {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Pooled for Shard {
    fn x(&self) -> f32 {
        self.pos.x
    }

    fn translate_x(&mut self, dx: f32) {
        self.pos.x += dx;
    }

    /// Shards linger until fully past x = -2 * size
    fn size(&self) -> f32 {
        self.size * 2.0
    }
}

impl Shard {
    pub fn spawn(viewport: &Viewport, tuning: &ShardSettings, rng: &mut Pcg32) -> Self {
        let lane = viewport.ground_y() - tuning.size * 2.0;
        Self {
            pos: Vec2::new(
                viewport.width + tuning.size,
                rng.random::<f32>() * lane + tuning.size,
            ),
            vel: Vec2::new(-tuning.speed, (rng.random::<f32>() - 0.5) * 0.8),
            size: tuning.size,
            rotation: rng.random::<f32>() * std::f32::consts::TAU,
            rotation_speed: (rng.random::<f32>() - 0.5) * 0.1,
        }
    }
}

/// What happened to a shard this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShardOutcome {
    Shattered(Vec2),
    Picked(Vec2),
}

/// Pool of shards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardField {
    pool: EntityPool<Shard>,
}

impl ShardField {
    /// Spawn cadence follows the screen height of `viewport`
    pub fn new(tuning: &ShardSettings, viewport: &Viewport) -> Self {
        Self {
            pool: EntityPool::self_propelled(tuning.spawn_interval(viewport.height)),
        }
    }

    pub fn generate(
        &mut self,
        halted: bool,
        viewport: &Viewport,
        tuning: &ShardSettings,
        rng: &mut Pcg32,
    ) -> bool {
        self.pool
            .spawn_tick(halted, viewport, |vp| Shard::spawn(vp, tuning, rng))
    }

    /// Move shards and break the ones touching a barrier
    ///
    /// Returns one `Shattered` outcome per broken shard.
    pub fn update(
        &mut self,
        halted: bool,
        tuning: &ShardSettings,
        field: &ObstacleField,
        viewport: &Viewport,
    ) -> Vec<ShardOutcome> {
        for shard in self.pool.iter_mut() {
            if halted {
                shard.vel = Vec2::new(tuning.speed * 0.15, 0.0);
            } else {
                shard.vel.x = -tuning.speed;
            }

            shard.pos += shard.vel;
            shard.rotation += shard.rotation_speed;

            if !halted {
                shard.vel.y += shard.rotation.sin() * 0.08;
                if shard.vel.y.abs() > 2.5 {
                    shard.vel.y *= 0.92;
                }
            }
        }

        self.pool
            .remove_where(|shard| {
                field.iter().any(|obs| {
                    obs.rects(viewport)
                        .any(|rect| overlaps(shard.pos, shard.size, &rect))
                })
            })
            .into_iter()
            .map(|shard| ShardOutcome::Shattered(shard.pos))
            .collect()
    }

    pub fn remove_offscreen(&mut self) -> usize {
        self.pool.evict_offscreen()
    }

    /// Pick up every shard within reach of the player
    pub fn collect(
        &mut self,
        player_pos: Vec2,
        player_radius: f32,
        tuning: &ShardSettings,
    ) -> Vec<ShardOutcome> {
        self.pool
            .remove_where(|shard| {
                shard.pos.distance(player_pos) < player_radius + shard.size + tuning.pickup_reach
            })
            .into_iter()
            .map(|shard| ShardOutcome::Picked(shard.pos))
            .collect()
    }

    pub fn draw<F>(&self, draw_one: F)
    where
        F: FnMut(&Shard),
    {
        self.pool.draw(draw_one);
    }

    pub fn shards(&self) -> &[Shard] {
        self.pool.as_slice()
    }

    pub fn shards_mut(&mut self) -> std::slice::IterMut<'_, Shard> {
        self.pool.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
