//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per rendered frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order; obstacles carry stable ids)
//! - No rendering or platform dependencies

pub mod agents;
pub mod background;
pub mod collectibles;
pub mod collision;
pub mod geometry;
pub mod obstacles;
pub mod particles;
pub mod player;
pub mod pool;
pub mod progression;
pub mod state;
pub mod tick;

pub use agents::{Agent, AgentController, AgentKill, Behavior};
pub use background::{Backdrop, Decoration};
pub use collectibles::{Shard, ShardField, ShardOutcome};
pub use collision::{Contact, check_collision, resolve_obstacle};
pub use geometry::{Mtv, Rect, minimum_translation_vector, overlaps};
pub use obstacles::{GateLayout, Obstacle, ObstacleField, ObstacleId};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use player::Player;
pub use pool::{EntityPool, Pooled};
pub use progression::{KillReward, Progression, ProgressionStatus};
pub use state::{GameState, SimEvent, Viewport};
pub use tick::{TickInput, tick};
