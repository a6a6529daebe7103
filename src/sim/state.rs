//! Game state and core simulation types
//!
//! Everything a run needs lives in one `GameState`; nothing is global, so
//! several simulations can run side by side and a seed fully determines a run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::agents::AgentController;
use super::background::Backdrop;
use super::collectibles::ShardField;
use super::obstacles::ObstacleField;
use super::particles::ParticleSystem;
use super::player::Player;
use super::progression::Progression;
use crate::settings::Settings;

/// Screen dimensions supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Height of the floor strip at the bottom of the screen
    pub floor_height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32, floor_height: f32) -> Self {
        Self {
            width,
            height,
            floor_height,
        }
    }

    /// Y coordinate of the floor line (the lane is `[0, ground_y]`)
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - self.floor_height
    }
}

/// Events emitted during a tick for audio/UI/renderer consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    AgentKilled { position: Vec2, sides: u32, xp: u32 },
    CollectibleShattered { position: Vec2 },
    CollectiblePicked { position: Vec2 },
    LevelUp { level: u32 },
    /// Player ran into a barrier; forward motion is halted
    TerminalCollision,
    /// The blocking contact cleared and motion resumed
    Recovered,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub tick_count: u64,
    pub viewport: Viewport,
    pub settings: Settings,
    pub player: Player,
    pub obstacles: ObstacleField,
    pub agents: AgentController,
    pub shards: ShardField,
    pub backdrop: Backdrop,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    pub progression: Progression,
    /// Set while the player is in a side-on barrier contact
    pub terminal_collision: bool,
    /// Number of times the terminal flag was raised this run
    pub terminal_count: u32,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl GameState {
    pub fn new(seed: u64, viewport: Viewport, settings: Settings) -> Self {
        log::info!(
            "New simulation: seed={} viewport={}x{} floor={} preset={}",
            seed,
            viewport.width,
            viewport.height,
            viewport.floor_height,
            settings.preset.as_str()
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tick_count: 0,
            viewport,
            player: Player::new(&viewport, &settings.physics),
            obstacles: ObstacleField::new(),
            agents: AgentController::new(&settings.agents),
            shards: ShardField::new(&settings.shards, &viewport),
            backdrop: Backdrop::new(&settings.backdrop),
            particles: ParticleSystem::new(settings.max_particles, settings.physics.gravity),
            progression: Progression::new(&settings.progression),
            terminal_collision: false,
            terminal_count: 0,
            events: Vec::new(),
            settings,
        }
    }

    /// Adopt new screen dimensions
    ///
    /// Every entity collection restarts empty and the player is re-centred.
    /// Progression and the agent score survive.
    pub fn resize(&mut self, viewport: Viewport) {
        log::info!(
            "Resize: {}x{} -> {}x{}",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height
        );
        self.viewport = viewport;
        self.player = Player::new(&viewport, &self.settings.physics);
        self.obstacles = ObstacleField::new();

        let score = self.agents.score;
        self.agents = AgentController::new(&self.settings.agents);
        self.agents.score = score;

        self.shards = ShardField::new(&self.settings.shards, &viewport);
        self.backdrop = Backdrop::new(&self.settings.backdrop);
        self.particles.clear();
        self.terminal_collision = false;
        self.events.clear();
    }

    /// Whether forward progress is currently halted
    #[inline]
    pub fn halted(&self) -> bool {
        self.terminal_collision
    }

    /// Take the events emitted by the last tick
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
