//! Gate Runner - a side-scrolling gate runner simulation
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (obstacles, player, agents, effects)
//! - `settings`: Data-driven game tuning and device presets

pub mod settings;
pub mod sim;

pub use settings::{DevicePreset, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Ticks per second the host is expected to drive the simulation at
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Screen width at or below which the mobile preset is used
    pub const MOBILE_MAX_WIDTH: f32 = 768.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 30.0;
    pub const PLAYER_START_SIDES: u32 = 3;
    /// Spin animation speed (radians per tick)
    pub const PLAYER_SPIN_SPEED: f32 = 0.06;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 100.0;
    pub const OBSTACLE_SPAWN_INTERVAL: u32 = 150;
    pub const OBSTACLE_MIN_MARGIN: f32 = 40.0;

    /// Agent defaults
    pub const AGENT_CRUISE_SPEED: f32 = 2.0;
    pub const AGENT_CLIMB_SPEED: f32 = 1.4;
    /// How far ahead of an obstacle's leading edge an agent "sees" it
    pub const AGENT_SIDE_SNAP: f32 = 6.0;
    /// Distance at which a climbing agent snaps onto its target height
    pub const AGENT_TARGET_SNAP: f32 = 0.8;
    /// Fraction of cruise speed agents drift backwards while halted
    pub const AGENT_HALT_DRIFT: f32 = 0.15;
    pub const AGENT_CORRECTION_PASSES: u32 = 3;
    pub const AGENT_SPAWN_INTERVAL: u32 = 120;

    /// Collectible shard defaults
    pub const SHARD_SIZE: f32 = 10.0;
    pub const SHARD_SPEED: f32 = 3.0;
    /// Base shard spawn chance per tick, plus a bonus per 100 px of height
    pub const SHARD_SPAWN_RATE: f32 = 0.015;
    pub const SHARD_SPAWN_RATE_PER_100PX: f32 = 0.002;
    /// Extra reach added to the player radius when picking up shards
    pub const SHARD_PICKUP_REACH: f32 = 10.0;

    /// Background decoration defaults
    pub const BACKDROP_SPEED: f32 = 3.0;
    pub const BACKDROP_SPAWN_INTERVAL: u32 = 100;
    /// Speed multiplier applied to decorations while halted
    pub const BACKDROP_HALT_MULTIPLIER: f32 = 0.1;

    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 512;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}
