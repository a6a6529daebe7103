//! Experience, level and shard ledger

use serde::{Deserialize, Serialize};

use crate::settings::ProgressionSettings;

/// Result of crediting a kill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillReward {
    pub xp: u32,
    /// New level if this kill crossed the threshold
    pub level_up: Option<u32>,
}

/// UI snapshot of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionStatus {
    pub level: u32,
    pub xp: u32,
    pub xp_required: u32,
    /// Progress toward the next level, 0-100
    pub progress: f32,
    pub shards: u32,
    pub kills: u32,
    pub total_xp: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    /// XP toward the next level (surplus carries over on level-up)
    pub xp: u32,
    pub total_xp: u32,
    pub shards: u32,
    pub kills: u32,
    /// Remaining ticks of the level-up aura
    pub aura_ticks: u32,
    tuning: ProgressionSettings,
}

impl Progression {
    pub fn new(tuning: &ProgressionSettings) -> Self {
        Self {
            level: 1,
            xp: 0,
            total_xp: 0,
            shards: 0,
            kills: 0,
            aura_ticks: 0,
            tuning: tuning.clone(),
        }
    }

    /// XP needed to leave `level`: `floor(base * multiplier^(level - 1))`
    pub fn xp_required(&self, level: u32) -> u32 {
        let exponent = level.saturating_sub(1) as i32;
        (self.tuning.base_xp * self.tuning.xp_multiplier.powi(exponent)).floor() as u32
    }

    /// Credit a killed agent with `sides` sides
    pub fn add_kill(&mut self, sides: u32) -> KillReward {
        let xp = sides * self.tuning.xp_per_side;
        self.xp += xp;
        self.total_xp += xp;
        self.shards += self.tuning.shards_per_kill;
        self.kills += 1;
        KillReward {
            xp,
            level_up: self.check_level_up(),
        }
    }

    /// Credit shards picked up in flight
    pub fn add_collected(&mut self, count: u32) {
        self.shards += count;
    }

    /// One level at most per call; surplus XP carries over
    fn check_level_up(&mut self) -> Option<u32> {
        let required = self.xp_required(self.level);
        if self.xp < required {
            return None;
        }
        self.xp -= required;
        self.level += 1;
        self.aura_ticks = self.tuning.aura_ticks;
        log::info!("Level up: {} (carry-over {} xp)", self.level, self.xp);
        Some(self.level)
    }

    pub fn update_aura(&mut self) {
        self.aura_ticks = self.aura_ticks.saturating_sub(1);
    }

    pub fn has_aura(&self) -> bool {
        self.aura_ticks > 0
    }

    /// Aura intensity in [0, 1]
    pub fn aura_alpha(&self) -> f32 {
        if self.aura_ticks == 0 || self.tuning.aura_ticks == 0 {
            return 0.0;
        }
        self.aura_ticks as f32 / self.tuning.aura_ticks as f32
    }

    pub fn status(&self) -> ProgressionStatus {
        let xp_required = self.xp_required(self.level);
        let progress = if xp_required == 0 {
            100.0
        } else {
            self.xp as f32 / xp_required as f32 * 100.0
        };
        ProgressionStatus {
            level: self.level,
            xp: self.xp,
            xp_required,
            progress,
            shards: self.shards,
            kills: self.kills,
            total_xp: self.total_xp,
        }
    }
}
