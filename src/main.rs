//! Asteroid Siege entry point
//!
//! On the web the page drives `platform::web::WebGame`. Natively this is a
//! headless runner: `asteroid-siege [seed] [ticks]` plays a seeded autopilot
//! session and logs what happened. Set `ASTEROID_SIEGE_TUNING` to a JSON file
//! to override the balance.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use asteroid_siege::sim::{GameEvent, GamePhase, GameState, TickInput};
    use asteroid_siege::{Session, Tuning, shortest_angle_delta};

    const DEFAULT_SEED: u64 = 1;
    const DEFAULT_TICKS: u64 = 60 * 60;

    /// Turn toward the nearest asteroid and shoot when lined up
    fn autopilot(state: &GameState) -> TickInput {
        let ship = &state.ship;
        let Some(target) = state
            .asteroids
            .iter()
            .min_by(|a, b| a.pos.distance(ship.pos).total_cmp(&b.pos.distance(ship.pos)))
        else {
            return TickInput::default();
        };

        let to = target.pos - ship.pos;
        // Screen y grows downward
        let wanted = (-to.y).atan2(to.x);
        let delta = shortest_angle_delta(ship.heading, wanted);

        TickInput {
            left: delta > 0.05,
            right: delta < -0.05,
            thrust: to.length() > 250.0 && state.time_ticks % 90 < 10,
            fire: delta.abs() < 0.2 && state.time_ticks % 8 == 0,
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let seed = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(DEFAULT_SEED);
        let ticks = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(DEFAULT_TICKS);

        let tuning = match std::env::var_os("ASTEROID_SIEGE_TUNING") {
            Some(path) => {
                log::info!("Loading tuning from {:?}", path);
                Tuning::load_from_path(path)?
            }
            None => Tuning::default(),
        };

        let mut session = Session::new(tuning, seed)?;
        session.start();
        log::info!("Headless run: seed {}, {} ticks", seed, ticks);

        // After game over the session keeps counting toward its leaderboard prompt
        'run: for _ in 0..ticks {
            let input = autopilot(session.snapshot());
            for event in &session.tick(&input).events {
                match event {
                    GameEvent::LevelComplete { level } => log::info!("Level {} cleared", level),
                    GameEvent::ShipDestroyed { position } => {
                        log::info!("Ship lost at ({:.0}, {:.0})", position.x, position.y)
                    }
                    GameEvent::AlienDestroyed { was_shot, .. } => {
                        log::info!("Alien down (shot: {})", was_shot)
                    }
                    GameEvent::GameOver { score, level } => {
                        log::info!("Game over: score {} at level {}", score, level)
                    }
                    GameEvent::PromptInitials { score, rank } => {
                        log::info!("Score {} would rank #{}", score, rank);
                        break 'run;
                    }
                    GameEvent::ShowHighScores => {
                        log::info!("Score does not place on the leaderboard");
                        break 'run;
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        let state = session.snapshot();
        println!(
            "seed {} | ticks {} | score {} | level {} | lives {} | {}",
            seed,
            state.time_ticks,
            state.score,
            state.level,
            state.lives,
            if state.phase == GamePhase::GameOver {
                "game over"
            } else {
                "still flying"
            }
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Asteroid Siege (native) starting...");

    if let Err(err) = headless::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
