//! Headless demo: runs one level with a scripted player
//!
//! Usage: `pursuit [config.ron|config.json]`. Set `RUST_LOG=debug` to follow
//! enemy state switches.

use pursuit::prelude::*;

/// Simulated wall-clock seconds before the demo gives up.
const MAX_SECONDS: f32 = 120.0;
/// Simulated frame time fed to the fixed timestep.
const FRAME_TIME: f32 = 1.0 / 30.0;

fn load_config() -> Result<GameConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading configuration from {path}");
            GameConfig::load(path)
        }
        None => Ok(GameConfig::default()),
    }
}

/// Player route: visit every item position in order.
fn route(config: &GameConfig) -> Vec<Vec3> {
    config.level.pickables.iter().map(|item| item.position).collect()
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::EnemyStateChanged { entity, from, to } => {
            log::debug!("{entity:?}: {from} -> {to}");
        }
        GameEvent::ScoreChanged { score, max_score } => {
            log::info!("Score: {score} / {max_score}");
        }
        GameEvent::SceneRequested { name } => log::info!("scene requested: {name}"),
        other => log::debug!("{other:?}"),
    }
}

fn run() -> Result<(), GameError> {
    let config = load_config()?;
    let mut timestep = FixedTimestep::new(config.session.tick_rate);
    let route = route(&config);
    let mut session = GameSession::new(config)?;

    let mut next_stop = 0;
    let mut elapsed = 0.0;
    while session.outcome() == GameOutcome::InProgress && elapsed < MAX_SECONDS {
        elapsed += FRAME_TIME;

        if let (Some(stop), Some(position)) = (route.get(next_stop), session.player_position()) {
            if position.distance(*stop) < 0.1 {
                next_stop += 1;
            }
        }
        if let Some(stop) = route.get(next_stop) {
            session.set_player_destination(*stop)?;
        }

        for _ in 0..timestep.accumulate(FRAME_TIME) {
            session.tick(timestep.step());
        }

        session.events_mut().swap();
        for event in session.events_mut().drain() {
            report(&event);
        }
    }

    log::info!(
        "finished after {:.1}s: {:?}, health {}, {}",
        elapsed,
        session.outcome(),
        session.health(),
        session.score().display()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Game error: {}", e);
        std::process::exit(1);
    }
}
