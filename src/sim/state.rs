//! Session state and core simulation types
//!
//! Everything the rendering layer reads lives here.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use crate::ceil_secs;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh session, waiting for start
    #[default]
    Idle,
    /// Countdown and spawns active
    Running,
    /// Stopped mid-session, resumable
    Paused,
    /// Countdown reached zero
    GameOver,
}

/// Notifications published to the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Reset,
    MoleUp { hole: usize },
    /// Mole hid on its own after its lifetime
    MoleDown { hole: usize },
    Hit { hole: usize, score: u32 },
    /// Displayed countdown changed (whole seconds)
    TimeChanged { remaining: u32 },
    DifficultyChanged { ramp: u32, factor: f64 },
    GameOver { score: u32, high_score: u32 },
    /// New record; the host should persist it
    HighScoreChanged { high_score: u32 },
}

/// Closed range of seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondsRange {
    pub min: f64,
    pub max: f64,
}

impl SecondsRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both bounds multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }

    pub fn contains(&self, secs: f64) -> bool {
        secs >= self.min && secs <= self.max
    }

    /// Uniform sample from the closed range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_secs_f64(rng.random_range(self.min..=self.max))
    }
}

impl From<(f64, f64)> for SecondsRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// One grid cell that can host a mole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub index: usize,
    pub is_up: bool,
    /// Clock time of the last appearance (None = never appeared)
    pub appear_at: Option<Duration>,
    /// How long the current mole stays up
    pub lifetime: Duration,
}

impl Hole {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            is_up: false,
            appear_at: None,
            lifetime: Duration::ZERO,
        }
    }

    /// Raise a mole at `now`
    pub fn raise(&mut self, now: Duration, lifetime: Duration) {
        self.is_up = true;
        self.appear_at = Some(now);
        self.lifetime = lifetime;
    }

    /// True when the mole is up and has outlived its lifetime
    pub fn is_expired(&self, now: Duration) -> bool {
        match self.appear_at {
            Some(at) if self.is_up => now.saturating_sub(at) >= self.lifetime,
            _ => false,
        }
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: GamePhase,
    pub score: u32,
    /// Best score seen, injected by the host at construction
    pub high_score: u32,
    /// Continuous countdown
    pub remaining: Duration,
    /// Running time since the last reset (drives difficulty)
    pub elapsed: Duration,
    /// Always HOLE_COUNT entries, ordered by index
    pub holes: Vec<Hole>,
    pub difficulty: Difficulty,
}

impl SessionState {
    pub fn new(high_score: u32) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            high_score,
            remaining: SESSION_LENGTH,
            elapsed: Duration::ZERO,
            holes: (0..HOLE_COUNT).map(Hole::new).collect(),
            difficulty: Difficulty::default(),
        }
    }

    /// Back to initial values, keeping the high score
    pub fn reset(&mut self) {
        *self = Self::new(self.high_score);
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Countdown as displayed: whole seconds, rounded up
    pub fn time_remaining(&self) -> u32 {
        ceil_secs(self.remaining)
    }

    pub fn moles_up(&self) -> usize {
        self.holes.iter().filter(|h| h.is_up).count()
    }
}

/// Read-only view for the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub is_running: bool,
    pub is_game_over: bool,
    pub score: u32,
    pub high_score: u32,
    pub time_remaining: u32,
    pub elapsed_ms: u64,
    /// Up/down per hole, indexed like the grid (row-major)
    pub moles: [bool; HOLE_COUNT],
    pub ramp: u32,
    pub spawn_interval: SecondsRange,
    pub mole_lifetime: SecondsRange,
}

impl From<&SessionState> for Snapshot {
    fn from(state: &SessionState) -> Self {
        let mut moles = [false; HOLE_COUNT];
        for hole in &state.holes {
            moles[hole.index] = hole.is_up;
        }
        Self {
            phase: state.phase,
            is_running: state.is_running(),
            is_game_over: state.is_game_over(),
            score: state.score,
            high_score: state.high_score,
            time_remaining: state.time_remaining(),
            elapsed_ms: state.elapsed.as_millis() as u64,
            moles,
            ramp: state.difficulty.ramp,
            spawn_interval: state.difficulty.spawn_interval,
            mole_lifetime: state.difficulty.mole_lifetime,
        }
    }
}
