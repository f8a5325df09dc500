//! Deterministic session engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only, advanced by the host
//! - Seeded RNG only
//! - Stable iteration order (by hole index)
//! - No rendering, storage or platform dependencies

pub mod difficulty;
pub mod engine;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use difficulty::{Difficulty, ramp_factor, ramp_step};
pub use engine::GameEngine;
pub use scheduler::{Scheduler, TimerKind};
pub use state::{GameEvent, GamePhase, Hole, SecondsRange, SessionState, Snapshot};
pub use tick::{spawn, tick};
