//! Fixed-frame simulation tick
//!
//! One call advances every subsystem by exactly one frame. The order below
//! is load-bearing: background, obstacles and agents read the terminal flag
//! left by the previous tick, while particles and collectibles see the flag
//! this tick just computed.

use super::collectibles::ShardOutcome;
use super::collision::check_collision;
use super::state::{GameState, SimEvent};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (click/tap/space)
    pub jump: bool,
    /// Demo mode - a simple controller flies the capsule
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.tick_count += 1;

    let halted = state.terminal_collision;
    let viewport = state.viewport;

    // 1. Player
    if input.jump || (input.autopilot && autopilot_wants_jump(state)) {
        state.player.jump();
    }
    state.player.update(&viewport);
    state.player.spin(halted);

    // 2. Backdrop
    state
        .backdrop
        .update(halted, &viewport, &state.settings.backdrop, &mut state.rng);

    // 3. Obstacles
    state
        .obstacles
        .spawn_tick(halted, &viewport, &state.settings.obstacles, &mut state.rng);
    state
        .obstacles
        .advance(halted, state.settings.obstacles.speed);
    state.obstacles.evict_offscreen();

    // 4. Agents
    let agent_tuning = &state.settings.agents;
    state
        .agents
        .generate(halted, &viewport, agent_tuning, &mut state.rng);
    state
        .agents
        .update(halted, &state.obstacles, &viewport, agent_tuning);
    state.agents.remove_offscreen();

    let kills = state
        .agents
        .check_player_contact(state.player.pos, state.player.radius);
    for kill in kills {
        let reward = state.progression.add_kill(kill.sides);
        state
            .particles
            .spawn_explosion(kill.pos, kill.radius, kill.sides, &mut state.rng);
        state.events.push(SimEvent::AgentKilled {
            position: kill.pos,
            sides: kill.sides,
            xp: reward.xp,
        });
        if let Some(level) = reward.level_up {
            state.events.push(SimEvent::LevelUp { level });
        }
    }

    // 5. Terminal collision
    let colliding = check_collision(&mut state.player, state.obstacles.as_slice(), &viewport);
    match (halted, colliding) {
        (false, true) => {
            state.terminal_count += 1;
            log::info!(
                "Terminal collision at tick {} (player y={:.1})",
                state.tick_count,
                state.player.pos.y
            );
            state.events.push(SimEvent::TerminalCollision);
        }
        (true, false) => {
            log::info!("Recovered at tick {}", state.tick_count);
            state.events.push(SimEvent::Recovered);
        }
        _ => {}
    }
    state.terminal_collision = colliding;

    // 6. Effects
    state.particles.update(colliding, &viewport);

    // 7. Level-up aura
    state.progression.update_aura();

    // 8. Collectibles
    let shard_tuning = &state.settings.shards;
    state
        .shards
        .generate(colliding, &viewport, shard_tuning, &mut state.rng);
    let mut outcomes = state
        .shards
        .update(colliding, shard_tuning, &state.obstacles, &viewport);
    state.shards.remove_offscreen();
    outcomes.extend(
        state
            .shards
            .collect(state.player.pos, state.player.radius, shard_tuning),
    );

    for outcome in outcomes {
        match outcome {
            ShardOutcome::Shattered(position) => {
                state.particles.spawn_shatter(position, &mut state.rng);
                state
                    .events
                    .push(SimEvent::CollectibleShattered { position });
            }
            ShardOutcome::Picked(position) => {
                state
                    .particles
                    .spawn_collect(position, state.player.pos, &mut state.rng);
                state.progression.add_collected(1);
                state.events.push(SimEvent::CollectiblePicked { position });
            }
        }
    }
}

/// Demo controller: jump once the capsule sinks below the next gap's centre
fn autopilot_wants_jump(state: &GameState) -> bool {
    let player = &state.player;
    if player.velocity_y < 0.0 {
        return false;
    }

    let viewport = &state.viewport;
    let target_y = state
        .obstacles
        .iter()
        .filter(|obs| obs.right() >= player.pos.x - player.radius)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|obs| {
            let (gap_top, gap_bottom) = obs.gap(viewport);
            (gap_top + gap_bottom) / 2.0
        })
        .unwrap_or(viewport.ground_y() / 2.0);

    player.pos.y > target_y
}
