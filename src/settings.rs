//! Game tuning and device presets
//!
//! Every magic number the simulation uses lives here so a run can be
//! re-tuned from a JSON file without touching gameplay code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Device profile the defaults are tuned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DevicePreset {
    #[default]
    Desktop,
    Mobile,
}

impl DevicePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DevicePreset::Desktop => "Desktop",
            DevicePreset::Mobile => "Mobile",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" | "pc" => Some(DevicePreset::Desktop),
            "mobile" | "phone" => Some(DevicePreset::Mobile),
            _ => None,
        }
    }

    /// Pick the preset for a given screen width
    pub fn for_screen_width(width: f32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            DevicePreset::Mobile
        } else {
            DevicePreset::Desktop
        }
    }

    /// Height of the solid floor strip at the bottom of the screen
    pub fn floor_height(&self) -> f32 {
        match self {
            DevicePreset::Desktop => 100.0,
            DevicePreset::Mobile => 80.0,
        }
    }

    /// Vertical gap between the two barrier segments
    pub fn obstacle_gap(&self) -> f32 {
        match self {
            DevicePreset::Desktop => 600.0,
            DevicePreset::Mobile => 700.0,
        }
    }

    /// Obstacle scroll speed (pixels per tick)
    pub fn obstacle_speed(&self) -> f32 {
        match self {
            DevicePreset::Desktop => 3.0,
            DevicePreset::Mobile => 2.5,
        }
    }
}

/// Player capsule physics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSettings {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative = up)
    pub lift: f32,
    pub floor_height: f32,
    pub player_radius: f32,
}

/// Obstacle field generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSettings {
    pub width: f32,
    /// Scroll speed (pixels per tick)
    pub speed: f32,
    pub min_gap: f32,
    /// Minimum height of a present barrier segment
    pub min_margin: f32,
    pub spawn_interval: u32,
}

/// Hostile agent navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Leftward cruise speed (pixels per tick, positive)
    pub cruise_speed: f32,
    pub climb_speed: f32,
    pub side_snap: f32,
    pub target_snap: f32,
    pub halt_drift: f32,
    pub correction_passes: u32,
    pub spawn_interval: u32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_sides: u32,
    pub max_sides: u32,
}

/// Collectible shards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardSettings {
    pub size: f32,
    pub speed: f32,
    /// Base spawn chance per tick
    pub spawn_rate: f32,
    /// Extra spawn chance per full 100 px of screen height
    pub spawn_rate_per_100px: f32,
    pub pickup_reach: f32,
}

impl ShardSettings {
    /// Spawn cadence matching the expected spawn rate on a screen this tall
    pub fn spawn_interval(&self, screen_height: f32) -> u32 {
        let steps = (screen_height.max(0.0) / 100.0).floor();
        let chance = self.spawn_rate + steps * self.spawn_rate_per_100px;
        if !(chance.is_finite() && chance > 0.0) {
            return u32::MAX;
        }
        (1.0 / chance).round().max(1.0) as u32
    }
}

/// Background decorations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackdropSettings {
    pub speed: f32,
    pub spawn_interval: u32,
    pub halt_multiplier: f32,
}

/// XP curve and rewards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionSettings {
    pub base_xp: f32,
    pub xp_multiplier: f32,
    pub xp_per_side: u32,
    pub shards_per_kill: u32,
    pub aura_ticks: u32,
}

/// Complete game tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub preset: DevicePreset,
    /// Run seed (None = caller picks one)
    #[serde(default)]
    pub seed: Option<u64>,
    pub physics: PhysicsSettings,
    pub obstacles: ObstacleSettings,
    pub agents: AgentSettings,
    pub shards: ShardSettings,
    pub backdrop: BackdropSettings,
    pub progression: ProgressionSettings,
    pub max_particles: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(DevicePreset::Desktop)
    }
}

impl Settings {
    /// Create settings from a device preset (applies preset defaults)
    pub fn from_preset(preset: DevicePreset) -> Self {
        Self {
            preset,
            seed: None,
            physics: PhysicsSettings {
                gravity: 0.6,
                lift: -15.0,
                floor_height: preset.floor_height(),
                player_radius: PLAYER_RADIUS,
            },
            obstacles: ObstacleSettings {
                width: OBSTACLE_WIDTH,
                speed: preset.obstacle_speed(),
                min_gap: preset.obstacle_gap(),
                min_margin: OBSTACLE_MIN_MARGIN,
                spawn_interval: OBSTACLE_SPAWN_INTERVAL,
            },
            agents: AgentSettings {
                cruise_speed: AGENT_CRUISE_SPEED,
                climb_speed: AGENT_CLIMB_SPEED,
                side_snap: AGENT_SIDE_SNAP,
                target_snap: AGENT_TARGET_SNAP,
                halt_drift: AGENT_HALT_DRIFT,
                correction_passes: AGENT_CORRECTION_PASSES,
                spawn_interval: AGENT_SPAWN_INTERVAL,
                min_radius: 10.0,
                max_radius: 25.0,
                min_sides: 3,
                max_sides: 7,
            },
            shards: ShardSettings {
                size: SHARD_SIZE,
                speed: SHARD_SPEED,
                spawn_rate: SHARD_SPAWN_RATE,
                spawn_rate_per_100px: SHARD_SPAWN_RATE_PER_100PX,
                pickup_reach: SHARD_PICKUP_REACH,
            },
            backdrop: BackdropSettings {
                speed: BACKDROP_SPEED,
                spawn_interval: BACKDROP_SPAWN_INTERVAL,
                halt_multiplier: BACKDROP_HALT_MULTIPLIER,
            },
            progression: ProgressionSettings {
                base_xp: 300.0,
                xp_multiplier: 3.0,
                xp_per_side: 1,
                shards_per_kill: 2,
                aura_ticks: 60,
            },
            max_particles: MAX_PARTICLES,
        }
    }

    /// Defaults for a screen of the given width
    pub fn for_screen_width(width: f32) -> Self {
        Self::from_preset(DevicePreset::for_screen_width(width))
    }

    /// Apply a device preset (updates the device-dependent values only)
    pub fn apply_preset(&mut self, preset: DevicePreset) {
        self.preset = preset;
        self.physics.floor_height = preset.floor_height();
        self.obstacles.min_gap = preset.obstacle_gap();
        self.obstacles.speed = preset.obstacle_speed();
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a file, falling back to the width-based preset
    pub fn load_or_default(path: Option<&Path>, screen_width: f32) -> Self {
        let Some(path) = path else {
            return Self::for_screen_width(screen_width);
        };
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}, using default settings");
                Self::for_screen_width(screen_width)
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: &'static str) -> SettingsError {
            SettingsError::Invalid { field, reason }
        }

        let finite = [
            ("physics.gravity", self.physics.gravity),
            ("physics.lift", self.physics.lift),
            ("obstacles.speed", self.obstacles.speed),
            ("agents.cruise_speed", self.agents.cruise_speed),
            ("agents.climb_speed", self.agents.climb_speed),
            ("agents.halt_drift", self.agents.halt_drift),
            ("shards.speed", self.shards.speed),
            ("backdrop.speed", self.backdrop.speed),
            ("backdrop.halt_multiplier", self.backdrop.halt_multiplier),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        let positive = [
            ("physics.player_radius", self.physics.player_radius),
            ("obstacles.width", self.obstacles.width),
            ("agents.min_radius", self.agents.min_radius),
            ("shards.size", self.shards.size),
            ("shards.spawn_rate", self.shards.spawn_rate),
            ("progression.base_xp", self.progression.base_xp),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, "must be positive"));
            }
        }

        let non_negative = [
            ("physics.floor_height", self.physics.floor_height),
            ("obstacles.min_gap", self.obstacles.min_gap),
            ("obstacles.min_margin", self.obstacles.min_margin),
            ("agents.side_snap", self.agents.side_snap),
            ("agents.target_snap", self.agents.target_snap),
            ("shards.pickup_reach", self.shards.pickup_reach),
            ("shards.spawn_rate_per_100px", self.shards.spawn_rate_per_100px),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, "must not be negative"));
            }
        }

        let intervals = [
            ("obstacles.spawn_interval", self.obstacles.spawn_interval),
            ("agents.spawn_interval", self.agents.spawn_interval),
            ("backdrop.spawn_interval", self.backdrop.spawn_interval),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(invalid(field, "spawn interval must be at least one tick"));
            }
        }

        if self.agents.max_radius < self.agents.min_radius {
            return Err(invalid("agents.max_radius", "must be >= agents.min_radius"));
        }
        if self.agents.min_sides < 3 || self.agents.max_sides < self.agents.min_sides {
            return Err(invalid("agents.min_sides", "sides must be >= 3 and ordered"));
        }
        if !(self.progression.xp_multiplier.is_finite() && self.progression.xp_multiplier >= 1.0) {
            return Err(invalid("progression.xp_multiplier", "must be >= 1"));
        }

        Ok(())
    }
}
