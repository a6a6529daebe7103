//! Hostile agents that navigate the obstacle field
//!
//! Navigation is a two-state machine per agent. Cruising agents fly left
//! until an obstacle blocks them; Climbing agents stop and move vertically
//! into that obstacle's gap. Separately from the state machine, every tick
//! ends with a non-interpenetration pass that pushes agents out of any
//! barrier they still overlap, so navigation can never leave an agent
//! embedded in geometry.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{circles_overlap, minimum_translation_vector, overlaps};
use super::obstacles::{Obstacle, ObstacleField, ObstacleId};
use super::pool::{EntityPool, Pooled};
use super::state::Viewport;
use crate::settings::AgentSettings;
use crate::wrap_angle;

/// Navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Flying left at cruise speed
    Cruising,
    /// Moving vertically into the gap of the tracked obstacle
    Climbing { obstacle: ObstacleId },
}

/// An autonomous hostile polygon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    pub sides: u32,
    pub angle: f32,
    pub rotation_speed: f32,
    pub behavior: Behavior,
}

impl Pooled for Agent {
    fn x(&self) -> f32 {
        self.pos.x
    }

    fn translate_x(&mut self, dx: f32) {
        self.pos.x += dx;
    }

    fn size(&self) -> f32 {
        self.radius
    }
}

impl Agent {
    pub fn new(id: u32, pos: Vec2, radius: f32, sides: u32) -> Self {
        Self {
            id,
            pos,
            radius,
            vel: Vec2::ZERO,
            sides,
            angle: 0.0,
            rotation_speed: 0.0,
            behavior: Behavior::Cruising,
        }
    }

    /// Random agent just past the right edge of the screen
    pub fn spawn(id: u32, viewport: &Viewport, tuning: &AgentSettings, rng: &mut Pcg32) -> Self {
        let radius =
            tuning.min_radius + rng.random::<f32>() * (tuning.max_radius - tuning.min_radius).max(0.0);
        let sides = tuning.min_sides
            + rng.random_range(0..=tuning.max_sides.saturating_sub(tuning.min_sides));

        let min_y = radius;
        let max_y = viewport.ground_y() - radius;
        let y = rng.random::<f32>() * (max_y - min_y) + min_y;

        let direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        let mut agent = Self::new(
            id,
            Vec2::new(viewport.width + radius + 5.0, y),
            radius,
            sides,
        );
        agent.angle = rng.random::<f32>() * std::f32::consts::TAU;
        agent.rotation_speed = (rng.random::<f32>() * 0.06 + 0.04) * direction;
        agent.vel = Vec2::new(-tuning.cruise_speed, 0.0);
        agent
    }

    pub fn is_climbing(&self) -> bool {
        matches!(self.behavior, Behavior::Climbing { .. })
    }

    /// Whether the agent overlaps either segment of `obs`
    pub fn overlaps_obstacle(&self, obs: &Obstacle, viewport: &Viewport) -> bool {
        obs.rects(viewport).any(|rect| overlaps(self.pos, self.radius, &rect))
    }
}

/// Vertical range of centre positions that fit inside the gap of `obs`
///
/// None when the gap is narrower than the agent's diameter.
pub fn gap_bounds(radius: f32, obs: &Obstacle, viewport: &Viewport) -> Option<(f32, f32)> {
    let (gap_top, gap_bottom) = obs.gap(viewport);
    let min_y = gap_top + radius;
    let max_y = gap_bottom - radius;
    (min_y <= max_y).then_some((min_y, max_y))
}

/// Height the agent should climb to in order to pass `obs`
pub fn gap_target_y(agent: &Agent, obs: &Obstacle, viewport: &Viewport) -> Option<f32> {
    gap_bounds(agent.radius, obs, viewport).map(|(min_y, max_y)| agent.pos.y.clamp(min_y, max_y))
}

/// Nearest obstacle the agent is running into without already being in its gap
pub fn find_blocking_obstacle(
    agent: &Agent,
    field: &ObstacleField,
    viewport: &Viewport,
    side_snap: f32,
) -> Option<ObstacleId> {
    let r = agent.radius;
    let front = agent.pos.x + r;

    field
        .iter()
        .filter(|obs| front >= obs.x - side_snap && agent.pos.x - r <= obs.right())
        .filter(|obs| {
            let (gap_top, gap_bottom) = obs.gap(viewport);
            let in_gap = agent.pos.y - r >= gap_top && agent.pos.y + r <= gap_bottom;
            !in_gap
        })
        .map(|obs| (obs.id, (front - obs.x).abs()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Push the agent clear of every overlapping barrier, up to `passes` times
///
/// Returns true if any push was applied.
pub fn separate_from_obstacles(
    agent: &mut Agent,
    field: &ObstacleField,
    viewport: &Viewport,
    passes: u32,
) -> bool {
    let mut pushed = false;
    for _ in 0..passes {
        let mut any = false;
        for obs in field.iter() {
            for rect in obs.rects(viewport) {
                let mtv = minimum_translation_vector(agent.pos, agent.radius, &rect);
                if mtv.hit {
                    agent.pos += mtv.offset();
                    any = true;
                }
            }
        }
        if !any {
            break;
        }
        pushed = true;
    }
    pushed
}

/// Advance one agent by one tick
pub fn step_agent(
    agent: &mut Agent,
    halted: bool,
    field: &ObstacleField,
    viewport: &Viewport,
    tuning: &AgentSettings,
) {
    if halted {
        agent.vel = Vec2::new(tuning.cruise_speed * tuning.halt_drift, 0.0);
    } else {
        match agent.behavior {
            Behavior::Cruising => {
                agent.vel = Vec2::new(-tuning.cruise_speed, 0.0);
            }
            Behavior::Climbing { obstacle } => {
                agent.vel.x = 0.0;
                match field.get(obstacle) {
                    None => {
                        agent.behavior = Behavior::Cruising;
                        agent.vel.y = 0.0;
                    }
                    Some(obs) => match gap_target_y(agent, obs, viewport) {
                        // Gap too narrow: hold position
                        None => agent.vel.y = 0.0,
                        Some(target) => {
                            let dy = target - agent.pos.y;
                            if dy.abs() < tuning.target_snap {
                                agent.pos.y = target;
                                agent.vel.y = 0.0;
                            } else {
                                agent.vel.y = dy.signum() * tuning.climb_speed;
                            }
                        }
                    },
                }
            }
        }
    }

    agent.pos += agent.vel;

    // Ceiling first, then floor
    if agent.pos.y - agent.radius < 0.0 {
        agent.pos.y = agent.radius;
    }
    let ground = viewport.ground_y();
    if agent.pos.y + agent.radius > ground {
        agent.pos.y = ground - agent.radius;
    }

    separate_from_obstacles(agent, field, viewport, tuning.correction_passes);

    if !halted {
        agent.behavior = match agent.behavior {
            Behavior::Cruising => {
                match find_blocking_obstacle(agent, field, viewport, tuning.side_snap) {
                    Some(obstacle) => Behavior::Climbing { obstacle },
                    None => Behavior::Cruising,
                }
            }
            Behavior::Climbing { obstacle } => match field.get(obstacle) {
                Some(obs) if agent.overlaps_obstacle(obs, viewport) => {
                    Behavior::Climbing { obstacle }
                }
                _ => Behavior::Cruising,
            },
        };
    }

    agent.angle = wrap_angle(agent.angle + agent.rotation_speed);
}

/// An agent retired by touching the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentKill {
    pub pos: Vec2,
    pub radius: f32,
    pub sides: u32,
}

/// Pool of agents plus their navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentController {
    pool: EntityPool<Agent>,
    next_id: u32,
    /// Total sides of every agent killed this run
    pub score: u64,
}

impl AgentController {
    pub fn new(tuning: &AgentSettings) -> Self {
        Self {
            pool: EntityPool::self_propelled(tuning.spawn_interval),
            next_id: 1,
            score: 0,
        }
    }

    /// Spawn tick for the agent pool
    pub fn generate(
        &mut self,
        halted: bool,
        viewport: &Viewport,
        tuning: &AgentSettings,
        rng: &mut Pcg32,
    ) -> bool {
        let id = self.next_id;
        let spawned = self
            .pool
            .spawn_tick(halted, viewport, |vp| Agent::spawn(id, vp, tuning, rng));
        if spawned {
            self.next_id += 1;
        }
        spawned
    }

    /// Step every agent's navigation and separation
    pub fn update(
        &mut self,
        halted: bool,
        field: &ObstacleField,
        viewport: &Viewport,
        tuning: &AgentSettings,
    ) {
        for agent in self.pool.iter_mut() {
            step_agent(agent, halted, field, viewport, tuning);
        }
    }

    pub fn remove_offscreen(&mut self) -> usize {
        self.pool.evict_offscreen()
    }

    pub fn draw<F>(&self, draw_one: F)
    where
        F: FnMut(&Agent),
    {
        self.pool.draw(draw_one);
    }

    /// Retire every agent touching the player circle
    ///
    /// Kills are returned in pool order for the caller to route to effects
    /// and progression.
    pub fn check_player_contact(&mut self, player_pos: Vec2, player_radius: f32) -> Vec<AgentKill> {
        let kills: Vec<AgentKill> = self
            .pool
            .remove_where(|a| circles_overlap(a.pos, a.radius, player_pos, player_radius))
            .into_iter()
            .map(|a| AgentKill {
                pos: a.pos,
                radius: a.radius,
                sides: a.sides,
            })
            .collect();
        for kill in &kills {
            self.score += u64::from(kill.sides);
            log::debug!("Agent killed at {:?} ({} sides)", kill.pos, kill.sides);
        }
        kills
    }

    pub fn agents(&self) -> &[Agent] {
        self.pool.as_slice()
    }

    pub fn get(&self, id: u32) -> Option<&Agent> {
        self.pool.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Agent> {
        self.pool.iter_mut().find(|a| a.id == id)
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

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 100.0)
    }

    fn tuning() -> AgentSettings {
        let mut tuning = Settings::default().agents;
        tuning.spawn_interval = 1;
        tuning
    }

    /// Controller holding one agent placed at `pos`
    fn controller_with(pos: Vec2, radius: f32, tuning: &AgentSettings) -> (AgentController, u32) {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut agents = AgentController::new(tuning);
        assert!(agents.generate(false, &viewport(), tuning, &mut rng));
        let agent = agents.get_mut(1).unwrap();
        agent.pos = pos;
        agent.radius = radius;
        agent.rotation_speed = 0.0;
        (agents, 1)
    }

    #[test]
    fn test_cruising_agent_starts_climbing_at_obstacle() {
        let vp = viewport();
        let mut tuning = tuning();
        tuning.cruise_speed = 3.0;
        let mut field = ObstacleField::new();
        let obs_id = field.push(500.0, 100.0, 150.0, 0.0);
        let (mut agents, id) = controller_with(Vec2::new(600.0, 20.0), 15.0, &tuning);

        agents.update(false, &field, &vp, &tuning);

        let agent = agents.get(id).unwrap();
        assert_eq!(agent.behavior, Behavior::Climbing { obstacle: obs_id });
        // Pushed back out of the barrier it cruised into
        assert!((agent.pos.x - 615.0).abs() < 1e-3);
        assert!(!agent.overlaps_obstacle(field.get(obs_id).unwrap(), &vp));

        let obs = field.get(obs_id).unwrap();
        assert_eq!(gap_bounds(agent.radius, obs, &vp), Some((165.0, 485.0)));
        assert_eq!(gap_target_y(agent, obs, &vp), Some(165.0));
    }

    #[test]
    fn test_climbing_moves_toward_target() {
        let vp = viewport();
        let tuning = tuning();
        let mut field = ObstacleField::new();
        let obs_id = field.push(500.0, 100.0, 150.0, 0.0);
        let (mut agents, id) = controller_with(Vec2::new(610.0, 100.0), 15.0, &tuning);
        agents.get_mut(id).unwrap().behavior = Behavior::Climbing { obstacle: obs_id };

        agents.update(false, &field, &vp, &tuning);

        let agent = agents.get(id).unwrap();
        assert_eq!(agent.vel.x, 0.0);
        assert!((agent.vel.y - tuning.climb_speed).abs() < 1e-6);
        assert!((agent.pos.y - 101.4).abs() < 1e-4);
    }

    #[test]
    fn test_climbing_snaps_to_target() {
        let vp = viewport();
        let tuning = tuning();
        let mut field = ObstacleField::new();
        let obs_id = field.push(500.0, 100.0, 150.0, 0.0);
        let (mut agents, id) = controller_with(Vec2::new(605.0, 164.5), 15.0, &tuning);
        agents.get_mut(id).unwrap().behavior = Behavior::Climbing { obstacle: obs_id };

        agents.update(false, &field, &vp, &tuning);

        let agent = agents.get(id).unwrap();
        assert_eq!(agent.pos.y, 165.0);
        assert_eq!(agent.vel.y, 0.0);
    }

    #[test]
    fn test_narrow_gap_stalls_without_drift() {
        let vp = viewport();
        let tuning = tuning();
        let mut field = ObstacleField::new();
        // Gap 200..210 is narrower than the 30 px diameter
        let obs_id = field.push(500.0, 100.0, 200.0, 290.0);
        let (mut agents, id) = controller_with(Vec2::new(614.0, 205.0), 15.0, &tuning);
        agents.get_mut(id).unwrap().behavior = Behavior::Climbing { obstacle: obs_id };

        let mut climbed = false;
        for _ in 0..240 {
            agents.update(false, &field, &vp, &tuning);
            let agent = agents.get(id).unwrap();
            assert_eq!(agent.vel.y, 0.0);
            climbed |= agent.is_climbing();
        }
        assert!(climbed);
    }

    #[test]
    fn test_missing_obstacle_returns_to_cruising() {
        let vp = viewport();
        let tuning = tuning();
        let field = ObstacleField::new();
        let (mut agents, id) = controller_with(Vec2::new(400.0, 200.0), 15.0, &tuning);
        agents.get_mut(id).unwrap().behavior = Behavior::Climbing {
            obstacle: ObstacleId(99),
        };

        agents.update(false, &field, &vp, &tuning);
        let agent = agents.get(id).unwrap();
        assert_eq!(agent.behavior, Behavior::Cruising);
        assert_eq!(agent.vel.y, 0.0);

        agents.update(false, &field, &vp, &tuning);
        let agent = agents.get(id).unwrap();
        assert_eq!(agent.vel, Vec2::new(-tuning.cruise_speed, 0.0));
    }

    #[test]
    fn test_evicted_tracked_obstacle_returns_to_cruising() {
        let vp = viewport();
        let tuning = tuning();
        let mut field = ObstacleField::new();
        let obs_id = field.push(-99.0, 100.0, 150.0, 0.0);
        let (mut agents, id) = controller_with(Vec2::new(10.0, 20.0), 15.0, &tuning);
        agents.get_mut(id).unwrap().behavior = Behavior::Climbing { obstacle: obs_id };

        field.advance(false, 5.0);
        assert_eq!(field.evict_offscreen(), 1);
        agents.update(false, &field, &vp, &tuning);
        assert_eq!(agents.get(id).unwrap().behavior, Behavior::Cruising);
    }

    #[test]
    fn test_halted_agents_drift_back_and_keep_state() {
        let vp = viewport();
        let tuning = tuning();
        let mut field = ObstacleField::new();
        let obs_id = field.push(500.0, 100.0, 150.0, 0.0);
        let (mut agents, id) = controller_with(Vec2::new(300.0, 300.0), 15.0, &tuning);
        agents.get_mut(id).unwrap().behavior = Behavior::Climbing { obstacle: obs_id };

        agents.update(true, &field, &vp, &tuning);
        let agent = agents.get(id).unwrap();
        assert_eq!(agent.behavior, Behavior::Climbing { obstacle: obs_id });
        assert!((agent.vel.x - tuning.cruise_speed * tuning.halt_drift).abs() < 1e-6);
        assert_eq!(agent.vel.y, 0.0);
    }

    #[test]
    fn test_separation_clears_stacked_obstacles() {
        let vp = viewport();
        let tuning = tuning();
        let mut field = ObstacleField::new();
        field.push(500.0, 100.0, 150.0, 150.0);
        field.push(590.0, 100.0, 160.0, 0.0);
        let (mut agents, id) = controller_with(Vec2::new(560.0, 155.0), 15.0, &tuning);

        agents.update(false, &field, &vp, &tuning);

        let agent = agents.get(id).unwrap();
        for obs in field.iter() {
            assert!(!agent.overlaps_obstacle(obs, &vp), "still inside {:?}", obs.id);
        }
    }

    #[test]
    fn test_screen_clamp() {
        let vp = viewport();
        let tuning = tuning();
        let field = ObstacleField::new();
        let (mut agents, id) = controller_with(Vec2::new(400.0, 495.0), 15.0, &tuning);
        agents.update(false, &field, &vp, &tuning);
        assert_eq!(agents.get(id).unwrap().pos.y, 485.0);

        agents.get_mut(id).unwrap().pos.y = 3.0;
        agents.update(false, &field, &vp, &tuning);
        assert_eq!(agents.get(id).unwrap().pos.y, 15.0);
    }

    #[test]
    fn test_find_blocking_prefers_nearest_and_skips_gaps() {
        let vp = viewport();
        let mut field = ObstacleField::new();
        field.push(510.0, 100.0, 300.0, 0.0);
        let near = field.push(518.0, 100.0, 300.0, 0.0);
        let agent = Agent::new(1, Vec2::new(500.0, 100.0), 15.0, 3);
        assert_eq!(find_blocking_obstacle(&agent, &field, &vp, 6.0), Some(near));

        // Already below both ceiling segments
        let agent = Agent::new(1, Vec2::new(500.0, 400.0), 15.0, 3);
        assert_eq!(find_blocking_obstacle(&agent, &field, &vp, 6.0), None);

        // Too far ahead of the leading edge
        let agent = Agent::new(1, Vec2::new(480.0, 100.0), 15.0, 3);
        assert_eq!(find_blocking_obstacle(&agent, &field, &vp, 6.0), None);
    }

    #[test]
    fn test_player_contact_kills_and_scores() {
        let tuning = tuning();
        let (mut agents, id) = controller_with(Vec2::new(300.0, 300.0), 15.0, &tuning);
        let sides = agents.get(id).unwrap().sides;

        assert!(agents.check_player_contact(Vec2::new(400.0, 300.0), 30.0).is_empty());
        let kills = agents.check_player_contact(Vec2::new(320.0, 300.0), 30.0);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].sides, sides);
        assert!(agents.is_empty());
        assert_eq!(agents.score, u64::from(sides));
    }

    #[test]
    fn test_spawn_ranges() {
        let vp = viewport();
        let tuning = tuning();
        let mut rng = Pcg32::seed_from_u64(3);
        for id in 0..200 {
            let agent = Agent::spawn(id, &vp, &tuning, &mut rng);
            assert!(agent.radius >= tuning.min_radius && agent.radius <= tuning.max_radius);
            assert!((tuning.min_sides..=tuning.max_sides).contains(&agent.sides));
            assert!((agent.pos.x - (vp.width + agent.radius + 5.0)).abs() < 1e-3);
            assert!(agent.pos.y >= agent.radius - 1e-3);
            assert!(agent.pos.y <= vp.ground_y() - agent.radius + 1e-3);
            assert_eq!(agent.behavior, Behavior::Cruising);
        }
    }

    #[test]
    fn test_offscreen_agents_removed() {
        let vp = viewport();
        let tuning = tuning();
        let field = ObstacleField::new();
        let (mut agents, id) = controller_with(Vec2::new(-14.0, 300.0), 15.0, &tuning);
        agents.update(false, &field, &vp, &tuning);
        assert!(agents.get(id).unwrap().pos.x + 15.0 <= 0.0);
        assert_eq!(agents.remove_offscreen(), 1);
        assert!(agents.is_empty());
    }
}
