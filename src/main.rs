//! Whack-a-Mole headless runner
//!
//! Plays one session with an automated player, logging what happens and
//! persisting a new high score. Rendering hosts drive the engine the same way:
//! advance per frame, forward taps, react to events.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use whack_a_mole::consts::HOLE_COUNT;
use whack_a_mole::{GameEngine, GameEvent, HighScore, LogFeedback, NullFeedback, Settings};

/// ~60 Hz host frame
const FRAME: Duration = Duration::from_micros(16_667);

/// Taps moles after a reaction delay, missing some of them
struct DemoPlayer {
    rng: Pcg32,
    accuracy: f64,
    reaction: Duration,
    /// Appearance already reacted to, per hole
    handled: [Option<Duration>; HOLE_COUNT],
}

impl DemoPlayer {
    fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed_de70),
            accuracy: settings.effective_accuracy(),
            reaction: Duration::from_millis(settings.demo_reaction_ms),
            handled: [None; HOLE_COUNT],
        }
    }

    fn play(&mut self, engine: &mut GameEngine) {
        let now = engine.now();
        let ready: Vec<(usize, Duration)> = engine
            .holes()
            .iter()
            .filter(|h| h.is_up)
            .filter_map(|h| h.appear_at.map(|at| (h.index, at)))
            .filter(|&(index, at)| {
                self.handled[index] != Some(at) && now.saturating_sub(at) >= self.reaction
            })
            .collect();

        for (index, at) in ready {
            self.handled[index] = Some(at);
            if self.rng.random_bool(self.accuracy) {
                engine.whack(index);
            }
        }
    }
}

fn data_dir() -> PathBuf {
    std::env::var_os("WHACK_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Whack-a-Mole (headless) starting...");

    let dir = data_dir();
    let settings = Settings::load_from(&Settings::path_in(&dir));
    let score_path = HighScore::path_in(&dir);
    let mut record = HighScore::load_from(&score_path);

    let seed = settings.seed.unwrap_or_else(time_seed);
    log::info!("Session seed: {}", seed);

    let mut engine = GameEngine::new(record.best, seed);
    if settings.feedback {
        engine.set_feedback(LogFeedback::new());
    } else {
        engine.set_feedback(NullFeedback);
    }
    let mut player = DemoPlayer::new(&settings, seed);

    engine.start();
    let mut spawned = 0u32;
    while !engine.is_game_over() {
        engine.advance(FRAME);
        player.play(&mut engine);

        let events: Vec<GameEvent> = engine.drain_events().collect();
        for event in events {
            match event {
                GameEvent::MoleUp { .. } => spawned += 1,
                GameEvent::TimeChanged { remaining } if remaining % 10 == 0 => {
                    log::info!("{}s left, score {}", remaining, engine.score());
                }
                GameEvent::DifficultyChanged { ramp, factor } => {
                    log::info!("Moles speed up (ramp {}, x{:.2})", ramp, factor);
                }
                GameEvent::HighScoreChanged { high_score } => {
                    if record.submit(high_score) {
                        if let Err(e) = record.save_to(&score_path) {
                            log::warn!("Could not save high score: {}", e);
                        }
                    }
                }
                _ => {}
            }
        }

        if settings.realtime {
            thread::sleep(FRAME);
        }
    }

    println!(
        "Score {} ({} moles, best {})",
        engine.score(),
        spawned,
        engine.high_score()
    );
}
