//! Generic pooled entity lifecycle
//!
//! An [`EntityPool`] spawns one entity per cadence tick through a caller
//! supplied factory, scrolls its entities left, evicts whatever has left the
//! screen and hands each entity to a draw callback. Several pools with
//! different speeds, cadences and entity types run side by side without
//! sharing any state.

use serde::{Deserialize, Serialize};

use super::state::Viewport;

/// Minimal contract an entity needs to live in an [`EntityPool`]
pub trait Pooled {
    /// Left-anchored horizontal position
    fn x(&self) -> f32;

    /// Shift the entity horizontally
    fn translate_x(&mut self, dx: f32);

    /// Horizontal extent past `x` that must also leave the screen before eviction
    fn size(&self) -> f32 {
        0.0
    }
}

/// Timed spawner + scroller + evictor for one kind of entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool<T> {
    entities: Vec<T>,
    /// Leftward speed (pixels per tick) before the caller's multiplier
    speed: f32,
    /// Spawn every N counted ticks
    spawn_interval: u32,
    frame_count: u64,
}

impl<T: Pooled> EntityPool<T> {
    pub fn new(speed: f32, spawn_interval: u32) -> Self {
        Self {
            entities: Vec::new(),
            speed,
            spawn_interval: spawn_interval.max(1),
            frame_count: 0,
        }
    }

    /// Pool whose entities move under their own velocity (`advance` is a no-op)
    pub fn self_propelled(spawn_interval: u32) -> Self {
        Self::new(0.0, spawn_interval)
    }

    /// Count one tick and, on a cadence tick, add exactly one entity from `factory`
    ///
    /// Halted ticks are not counted, so the cadence resumes where it left off.
    /// Returns true when an entity was spawned.
    pub fn spawn_tick<F>(&mut self, halted: bool, viewport: &Viewport, factory: F) -> bool
    where
        F: FnOnce(&Viewport) -> T,
    {
        if halted {
            return false;
        }
        self.frame_count += 1;
        if self.frame_count % u64::from(self.spawn_interval) != 0 {
            return false;
        }
        self.entities.push(factory(viewport));
        true
    }

    /// Scroll every entity left by `speed * multiplier`
    pub fn advance(&mut self, multiplier: f32) {
        let dx = -self.speed * multiplier;
        for entity in &mut self.entities {
            entity.translate_x(dx);
        }
    }

    /// Drop entities whose right edge (`x + size`) is at or past the left boundary
    ///
    /// Returns the number of evicted entities.
    pub fn evict_offscreen(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.x() + e.size() > 0.0);
        before - self.entities.len()
    }

    /// Explicitly remove entities matching `pred`, returning them in pool order
    pub fn remove_where<P>(&mut self, mut pred: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| pred(e));
        self.entities = kept;
        removed
    }

    /// Hand every entity to a draw callback
    pub fn draw<F>(&self, mut draw_one: F)
    where
        F: FnMut(&T),
    {
        for entity in &self.entities {
            draw_one(entity);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.entities.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.frame_count = 0;
    }
}
