//! Gate Runner entry point
//!
//! Runs a headless autopilot simulation and logs a summary.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use gate_runner::consts::TICKS_PER_SECOND;
    use gate_runner::sim::{GameState, SimEvent, TickInput, Viewport, tick};
    use gate_runner::Settings;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let width: f32 = 1280.0;
    let height: f32 = 800.0;
    let settings_path = std::env::var_os("GATE_RUNNER_SETTINGS").map(PathBuf::from);
    let settings = Settings::load_or_default(settings_path.as_deref(), width);
    let seed = settings.seed.unwrap_or(0x5EED_CAFE);
    let viewport = Viewport::new(width, height, settings.physics.floor_height);

    log::info!("Gate Runner (native) starting...");
    let mut state = GameState::new(seed, viewport, settings);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let seconds = 120;
    let mut shattered = 0u32;
    for _ in 0..TICKS_PER_SECOND * seconds {
        tick(&mut state, &input);
        for event in state.drain_events() {
            if let SimEvent::CollectibleShattered { .. } = event {
                shattered += 1;
            }
        }
    }

    let status = state.progression.status();
    log::info!(
        "Ran {} ticks: kills={} score={} level={} xp={}/{} shards={} (shattered {}) terminal collisions={}",
        state.tick_count,
        status.kills,
        state.agents.score,
        status.level,
        status.xp,
        status.xp_required,
        status.shards,
        shattered,
        state.terminal_count
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to run here
}
