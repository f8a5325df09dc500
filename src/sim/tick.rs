//! Timer handlers
//!
//! `tick` runs on the fixed-period driver, `spawn` on the irregular one. Both
//! are no-ops unless the session is running.

use std::time::Duration;

use rand::Rng;

use super::state::{GameEvent, SessionState};
use crate::consts::*;

/// Advance the session by one TICK_INTERVAL at clock time `now`.
///
/// Returns true when the countdown has run out; the caller finishes the session.
pub fn tick(state: &mut SessionState, now: Duration, events: &mut Vec<GameEvent>) -> bool {
    if !state.is_running() {
        return false;
    }

    state.elapsed += TICK_INTERVAL;

    let shown = state.time_remaining();
    state.remaining = state.remaining.saturating_sub(TICK_INTERVAL);
    let remaining = state.time_remaining();
    if remaining != shown {
        events.push(GameEvent::TimeChanged { remaining });
    }

    for hole in state.holes.iter_mut() {
        if hole.is_expired(now) {
            hole.is_up = false;
            log::debug!("Mole {} hid after {:?}", hole.index, hole.lifetime);
            events.push(GameEvent::MoleDown { hole: hole.index });
        }
    }

    if state.difficulty.update(state.elapsed) {
        log::info!(
            "Difficulty ramp {} (factor {:.2})",
            state.difficulty.ramp,
            state.difficulty.factor
        );
        events.push(GameEvent::DifficultyChanged {
            ramp: state.difficulty.ramp,
            factor: state.difficulty.factor,
        });
    }

    state.remaining.is_zero()
}

/// Try to raise a mole in a random empty hole at clock time `now`.
///
/// Returns the chosen hole, or None when the grid is full.
pub fn spawn<R: Rng + ?Sized>(
    state: &mut SessionState,
    rng: &mut R,
    now: Duration,
    events: &mut Vec<GameEvent>,
) -> Option<usize> {
    if !state.is_running() {
        return None;
    }

    let down: Vec<usize> = state
        .holes
        .iter()
        .filter(|h| !h.is_up)
        .map(|h| h.index)
        .collect();
    if down.is_empty() {
        return None;
    }

    let index = down[rng.random_range(0..down.len())];
    let lifetime = state.difficulty.mole_lifetime.sample(rng);
    state.holes[index].raise(now, lifetime);
    log::debug!("Mole {} up for {:?}", index, lifetime);
    events.push(GameEvent::MoleUp { hole: index });
    Some(index)
}
