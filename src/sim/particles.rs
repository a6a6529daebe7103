//! Short-lived visual particles
//!
//! Fed by agent kills and shard shatters/pickups. Particles never affect
//! gameplay; the pool is capped and spawns past the cap are dropped.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Viewport;

/// What spawned a particle (drives its physics and colour)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Agent death debris
    Explosion,
    /// Shard broken on a barrier
    Shatter,
    /// Shard picked up, homing toward the pickup point
    Collect { target: Vec2 },
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub sides: u32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Remaining life in ticks
    pub life: f32,
    pub max_life: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Fade factor in [0, 1]
    pub fn opacity(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0).powf(1.5)
    }
}

#[inline]
fn rand_range(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    rng.random::<f32>() * (max - min) + min
}

/// Capped particle pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
    /// Player gravity; particles fall at a fraction of it
    gravity: f32,
}

impl ParticleSystem {
    pub fn new(max_particles: usize, gravity: f32) -> Self {
        Self {
            particles: Vec::new(),
            max_particles,
            gravity,
        }
    }

    fn push(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.max_particles {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Debris burst for a dead agent: `max(8, 3 * sides)` pieces
    pub fn spawn_explosion(&mut self, pos: Vec2, radius: f32, sides: u32, rng: &mut Pcg32) -> usize {
        let count = (sides as usize * 3).max(8);
        let mut spawned = 0;
        for _ in 0..count {
            let size = rand_range(rng, 2.5, (radius * 0.25).max(4.0));
            let sides = rng.random_range(3..=5);
            let rotation = rand_range(rng, 0.0, std::f32::consts::TAU);
            let heading = rand_range(rng, 0.0, std::f32::consts::TAU);
            let speed = rand_range(rng, 2.0, 7.0);
            let vel = Vec2::new(
                heading.cos() * speed + rand_range(rng, -0.5, 0.5),
                heading.sin() * speed + rand_range(rng, -0.5, 0.5),
            );
            let rotation_speed = rand_range(rng, -0.25, 0.25);
            let life = rand_range(rng, 25.0, 45.0);
            if self.push(Particle {
                pos,
                vel,
                size,
                sides,
                rotation,
                rotation_speed,
                life,
                max_life: life,
                kind: ParticleKind::Explosion,
            }) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Four fragments for a shard that hit a barrier
    pub fn spawn_shatter(&mut self, pos: Vec2, rng: &mut Pcg32) -> usize {
        let mut spawned = 0;
        for _ in 0..4 {
            let size = rand_range(rng, 2.5, 4.5);
            let heading = rand_range(rng, 0.0, std::f32::consts::TAU);
            let speed = rand_range(rng, 2.0, 6.0);
            let vel = Vec2::new(
                heading.cos() * speed + rand_range(rng, -0.5, 0.5),
                heading.sin() * speed + rand_range(rng, -0.5, 0.5),
            );
            let rotation = rand_range(rng, 0.0, std::f32::consts::TAU);
            let rotation_speed = rand_range(rng, -0.15, 0.15);
            let life = rand_range(rng, 25.0, 40.0);
            if self.push(Particle {
                pos,
                vel,
                size,
                sides: 3,
                rotation,
                rotation_speed,
                life,
                max_life: 30.0,
                kind: ParticleKind::Shatter,
            }) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Three sparks that home toward `target` (the pickup point)
    pub fn spawn_collect(&mut self, pos: Vec2, target: Vec2, rng: &mut Pcg32) -> usize {
        let mut spawned = 0;
        for _ in 0..3 {
            let size = rand_range(rng, 2.0, 3.5);
            let heading = rand_range(rng, 0.0, std::f32::consts::TAU);
            let speed = rand_range(rng, 1.0, 3.0);
            let rotation = rand_range(rng, 0.0, std::f32::consts::TAU);
            let rotation_speed = rand_range(rng, -0.25, 0.25);
            let life = rand_range(rng, 18.0, 30.0);
            if self.push(Particle {
                pos,
                vel: Vec2::from_angle(heading) * speed,
                size,
                sides: 3,
                rotation,
                rotation_speed,
                life,
                max_life: 25.0,
                kind: ParticleKind::Collect { target },
            }) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Integrate, bounce off the ground line and age out
    ///
    /// Homing is suspended while `halted`.
    pub fn update(&mut self, halted: bool, viewport: &Viewport) {
        let ground = viewport.ground_y();
        let gravity = self.gravity;

        for p in self.particles.iter_mut() {
            let (gravity_scale, bounce) = match p.kind {
                ParticleKind::Explosion => (0.35, -0.35),
                ParticleKind::Shatter | ParticleKind::Collect { .. } => (0.3, -0.5),
            };
            p.vel.y += gravity * gravity_scale;

            if let ParticleKind::Collect { target } = p.kind {
                if !halted {
                    let to_target = target - p.pos;
                    let dist = to_target.length();
                    if dist > 5.0 {
                        p.vel += to_target / dist * 0.2;
                        p.vel *= 0.95;
                    } else {
                        p.vel *= 0.9;
                    }
                }
            }

            p.pos += p.vel;
            p.rotation += p.rotation_speed;

            if p.pos.y + p.size > ground {
                p.pos.y = ground - p.size;
                p.vel.y *= bounce;
                p.vel.x *= 0.8;
            }

            p.life -= 1.0;
        }

        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
