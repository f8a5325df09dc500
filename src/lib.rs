//! Whack-a-Mole - session engine for a reflex game
//!
//! Core modules:
//! - `sim`: Deterministic session engine (countdown, spawns, difficulty, game over)
//! - `feedback`: Injected hit / game-over feedback capability
//! - `highscores`: Host-side high score record
//! - `settings`: Host preferences
//!
//! Rendering, input gestures and storage belong to the host. The engine only
//! publishes state and events; see [`sim::GameEngine`].

pub mod feedback;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use feedback::{Feedback, FeedbackSink, LogFeedback, NullFeedback};
pub use highscores::HighScore;
pub use settings::Settings;
pub use sim::{GameEngine, GameEvent, GamePhase, Snapshot};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Grid is GRID_SIZE x GRID_SIZE holes
    pub const GRID_SIZE: usize = 3;
    pub const HOLE_COUNT: usize = GRID_SIZE * GRID_SIZE;

    /// Countdown at the start of every session
    pub const SESSION_LENGTH: Duration = Duration::from_secs(60);
    /// Fixed period of the tick driver
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Baseline delay between spawn attempts (seconds, closed range)
    pub const SPAWN_INTERVAL_RANGE: (f64, f64) = (0.5, 1.2);
    /// Baseline time a mole stays up (seconds, closed range)
    pub const MOLE_LIFETIME_RANGE: (f64, f64) = (0.9, 1.6);

    /// Active play time per difficulty step
    pub const RAMP_PERIOD: Duration = Duration::from_secs(15);
    /// Range shrink per difficulty step
    pub const RAMP_DECAY: f64 = 0.08;
    /// Ranges never shrink below this fraction of baseline
    pub const MIN_FACTOR: f64 = 0.7;
}

/// Round a duration up to whole seconds (countdown display)
#[inline]
pub fn ceil_secs(d: std::time::Duration) -> u32 {
    d.as_nanos().div_ceil(1_000_000_000) as u32
}
