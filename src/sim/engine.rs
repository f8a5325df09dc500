//! Session controller
//!
//! Owns the session state, the two timer drivers and the RNG. The host calls
//! [`GameEngine::advance`] with elapsed wall time, forwards taps to
//! [`GameEngine::whack`], and reads state back through accessors, snapshots,
//! or the event queue.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::scheduler::{Scheduler, TimerKind};
use super::state::{GameEvent, GamePhase, Hole, SecondsRange, SessionState, Snapshot};
use super::tick::{spawn, tick};
use crate::consts::*;
use crate::feedback::{Feedback, FeedbackSink, NullFeedback};

pub struct GameEngine {
    state: SessionState,
    scheduler: Scheduler,
    seed: u64,
    rng: Pcg32,
    feedback: Box<dyn FeedbackSink>,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Create an idle session. `high_score` is the host's persisted best (0 if none).
    pub fn new(high_score: u32, seed: u64) -> Self {
        Self {
            state: SessionState::new(high_score),
            scheduler: Scheduler::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            feedback: Box::new(NullFeedback),
            events: Vec::new(),
        }
    }

    /// Fresh session with no prior high score
    pub fn with_seed(seed: u64) -> Self {
        Self::new(0, seed)
    }

    pub fn with_feedback(mut self, sink: impl FeedbackSink + 'static) -> Self {
        self.set_feedback(sink);
        self
    }

    pub fn set_feedback(&mut self, sink: impl FeedbackSink + 'static) {
        self.feedback = Box::new(sink);
    }

    /// Enter Running. Resumes a paused session; a finished one is reset first.
    pub fn start(&mut self) {
        if self.state.is_running() {
            return;
        }
        if self.state.is_game_over() {
            self.reset();
        }

        self.state.phase = GamePhase::Running;
        self.scheduler.schedule(TimerKind::Tick, TICK_INTERVAL);
        self.schedule_spawn();
        log::info!(
            "Session running ({}s left, score {})",
            self.state.time_remaining(),
            self.state.score
        );
        self.events.push(GameEvent::Started);
    }

    /// Stop both drivers, keeping all state for a later `start`
    pub fn pause(&mut self) {
        self.scheduler.cancel(TimerKind::Tick);
        self.scheduler.cancel(TimerKind::Spawn);
        if !self.state.is_running() {
            return;
        }

        self.state.phase = GamePhase::Paused;
        log::info!("Session paused ({}s left)", self.state.time_remaining());
        self.events.push(GameEvent::Paused);
    }

    /// Back to a fresh idle session. Stops the drivers if running; the high
    /// score is kept.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.state.reset();
        log::info!("Session reset");
        self.events.push(GameEvent::Reset);
    }

    /// Tap on hole `index`. Returns true on a hit; anything else is a no-op.
    pub fn whack(&mut self, index: usize) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let Some(hole) = self.state.holes.get_mut(index) else {
            return false;
        };
        if !hole.is_up {
            return false;
        }

        hole.is_up = false;
        self.state.score += 1;
        log::debug!("Hit hole {} (score {})", index, self.state.score);
        self.feedback.emit(Feedback::Hit);
        self.events.push(GameEvent::Hit {
            hole: index,
            score: self.state.score,
        });
        true
    }

    /// Move the clock forward by `dt`, firing every driver that comes due
    pub fn advance(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;
        while let Some(kind) = self.scheduler.pop_due(until) {
            self.fire(kind);
        }
        self.scheduler.advance_to(until);
    }

    fn fire(&mut self, kind: TimerKind) {
        // Firings only exist while running, but never mutate a stopped session
        if !self.state.is_running() {
            return;
        }
        let now = self.scheduler.now();

        match kind {
            TimerKind::Tick => {
                if tick(&mut self.state, now, &mut self.events) {
                    self.finish();
                } else {
                    self.scheduler.schedule(TimerKind::Tick, TICK_INTERVAL);
                }
            }
            TimerKind::Spawn => {
                self.schedule_spawn();
                spawn(&mut self.state, &mut self.rng, now, &mut self.events);
            }
        }
    }

    fn schedule_spawn(&mut self) {
        let delay = self.state.difficulty.spawn_interval.sample(&mut self.rng);
        self.scheduler.schedule(TimerKind::Spawn, delay);
    }

    /// Countdown expired
    fn finish(&mut self) {
        self.scheduler.cancel_all();
        self.state.phase = GamePhase::GameOver;

        if self.state.score > self.state.high_score {
            self.state.high_score = self.state.score;
            log::info!("New high score: {}", self.state.high_score);
            self.events.push(GameEvent::HighScoreChanged {
                high_score: self.state.high_score,
            });
        }

        log::info!(
            "Game over: score {}, best {}",
            self.state.score,
            self.state.high_score
        );
        self.feedback.emit(Feedback::GameOver);
        self.events.push(GameEvent::GameOver {
            score: self.state.score,
            high_score: self.state.high_score,
        });
    }

    /// Take all events published since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    /// Displayed countdown in whole seconds (rounded up)
    pub fn time_remaining(&self) -> u32 {
        self.state.time_remaining()
    }

    pub fn elapsed(&self) -> Duration {
        self.state.elapsed
    }

    pub fn holes(&self) -> &[Hole] {
        &self.state.holes
    }

    pub fn spawn_interval_range(&self) -> SecondsRange {
        self.state.difficulty.spawn_interval
    }

    pub fn mole_lifetime_range(&self) -> SecondsRange {
        self.state.difficulty.mole_lifetime
    }

    /// Engine clock
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn recording_engine(high_score: u32) -> (GameEngine, Rc<RefCell<Vec<Feedback>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let engine = GameEngine::new(high_score, 12345)
            .with_feedback(move |f: Feedback| sink.borrow_mut().push(f));
        (engine, seen)
    }

    fn first_up(engine: &GameEngine) -> Option<usize> {
        engine.holes().iter().find(|h| h.is_up).map(|h| h.index)
    }

    /// Advance in tick-sized steps until a mole shows up
    fn wait_for_mole(engine: &mut GameEngine) -> usize {
        for _ in 0..50 {
            if let Some(index) = first_up(engine) {
                return index;
            }
            engine.advance(TICK_INTERVAL);
        }
        panic!("no mole appeared");
    }

    #[test]
    fn test_initial_state() {
        let engine = GameEngine::new(8, 1);
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.high_score(), 8);
        assert_eq!(engine.time_remaining(), 60);
        assert!(!engine.is_running());
        assert!(!engine.is_game_over());
        assert_eq!(engine.holes().len(), 9);
    }

    #[test]
    fn test_idle_engine_does_nothing() {
        let mut engine = GameEngine::with_seed(1);
        engine.advance(Duration::from_secs(10));
        assert_eq!(engine.time_remaining(), 60);
        assert_eq!(engine.elapsed(), Duration::ZERO);
        assert!(first_up(&engine).is_none());
        assert_eq!(engine.now(), Duration::from_secs(10));
    }

    #[test]
    fn test_countdown_after_start() {
        let mut engine = GameEngine::with_seed(1);
        engine.start();

        engine.advance(ms(100));
        assert_eq!(engine.time_remaining(), 60);

        engine.advance(ms(900));
        assert_eq!(engine.time_remaining(), 59);
        assert_eq!(engine.elapsed(), ms(1000));
    }

    #[test]
    fn test_chunking_does_not_matter() {
        let mut a = GameEngine::with_seed(77);
        let mut b = GameEngine::with_seed(77);
        a.start();
        b.start();

        a.advance(Duration::from_secs(20));
        for _ in 0..1200 {
            b.advance(Duration::from_micros(16_667));
        }
        // 1200 frames overshoot 20s slightly
        a.advance(b.now() - a.now());

        assert_eq!(a.now(), b.now());
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.holes(), b.holes());
    }

    #[test]
    fn test_double_start_is_noop() {
        let mut engine = GameEngine::with_seed(3);
        engine.start();
        engine.start();
        let started = engine
            .drain_events()
            .filter(|e| *e == GameEvent::Started)
            .count();
        assert_eq!(started, 1);

        // A second tick driver would count down twice as fast
        engine.advance(Duration::from_secs(1));
        assert_eq!(engine.time_remaining(), 59);
    }

    #[test]
    fn test_first_spawn_within_interval() {
        let mut engine = GameEngine::with_seed(9);
        engine.start();
        engine.advance(ms(499));
        assert!(first_up(&engine).is_none());
        engine.advance(ms(701));
        assert!(first_up(&engine).is_some());
    }

    #[test]
    fn test_whack_hit() {
        let (mut engine, seen) = recording_engine(0);
        engine.start();
        let index = wait_for_mole(&mut engine);

        assert!(engine.whack(index));
        assert_eq!(engine.score(), 1);
        assert!(!engine.holes()[index].is_up);
        assert_eq!(*seen.borrow(), vec![Feedback::Hit]);
        assert!(
            engine
                .drain_events()
                .any(|e| e == GameEvent::Hit { hole: index, score: 1 })
        );

        // Same hole again: already down
        assert!(!engine.whack(index));
        assert_eq!(engine.score(), 1);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_whack_noops() {
        let (mut engine, seen) = recording_engine(0);

        // Not running
        engine.state.holes[0].raise(Duration::ZERO, Duration::from_secs(5));
        assert!(!engine.whack(0));
        assert!(engine.holes()[0].is_up);

        engine.start();
        assert!(!engine.whack(9));
        assert!(!engine.whack(usize::MAX));
        let empty = engine.holes().iter().find(|h| !h.is_up).map(|h| h.index);
        assert!(!engine.whack(empty.unwrap()));

        // Paused
        engine.pause();
        assert!(!engine.whack(0));

        assert_eq!(engine.score(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_pause_freezes_session() {
        let mut engine = GameEngine::with_seed(5);
        engine.start();
        engine.advance(Duration::from_secs(5));
        engine.pause();
        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Paused);

        let frozen = engine.snapshot();
        engine.drain_events().for_each(drop);
        engine.advance(Duration::from_secs(10));
        assert_eq!(engine.snapshot(), frozen);
        assert_eq!(engine.drain_events().count(), 0);

        engine.start();
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.time_remaining(), 55);
        engine.advance(Duration::from_secs(1));
        assert_eq!(engine.time_remaining(), 54);
        assert_eq!(engine.elapsed(), Duration::from_secs(6));
    }

    #[test]
    fn test_pause_when_idle_stays_idle() {
        let mut engine = GameEngine::with_seed(5);
        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.drain_events().count(), 0);
    }

    #[test]
    fn test_reset_while_running_stops_drivers() {
        let mut engine = GameEngine::new(4, 11);
        engine.start();
        engine.advance(Duration::from_secs(3));
        engine.reset();

        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.time_remaining(), 60);
        assert_eq!(engine.elapsed(), Duration::ZERO);
        assert_eq!(engine.high_score(), 4);
        assert!(first_up(&engine).is_none());

        engine.advance(Duration::from_secs(3));
        assert_eq!(engine.time_remaining(), 60);
        assert!(first_up(&engine).is_none());
    }

    #[test]
    fn test_full_session_ends_in_game_over() {
        let (mut engine, seen) = recording_engine(0);
        engine.start();
        engine.advance(ms(59_900));
        assert!(engine.is_running());
        assert_eq!(engine.time_remaining(), 1);

        engine.advance(ms(100));
        assert!(engine.is_game_over());
        assert!(!engine.is_running());
        assert_eq!(engine.time_remaining(), 0);
        assert_eq!(engine.elapsed(), Duration::from_secs(60));
        assert_eq!(*seen.borrow(), vec![Feedback::GameOver]);

        // Drivers are gone
        let frozen = engine.snapshot();
        engine.advance(Duration::from_secs(5));
        assert_eq!(engine.snapshot(), frozen);
    }

    #[test]
    fn test_new_high_score_on_finish() {
        let mut engine = GameEngine::new(5, 1);
        engine.start();
        engine.state.score = 7;
        engine.state.remaining = TICK_INTERVAL;
        engine.advance(TICK_INTERVAL);

        assert!(engine.is_game_over());
        assert_eq!(engine.high_score(), 7);
        let events: Vec<_> = engine.drain_events().collect();
        assert!(events.contains(&GameEvent::HighScoreChanged { high_score: 7 }));
        assert!(events.contains(&GameEvent::GameOver {
            score: 7,
            high_score: 7
        }));
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let (mut engine, seen) = recording_engine(5);
        engine.start();
        engine.state.score = 3;
        engine.state.remaining = TICK_INTERVAL;
        engine.advance(TICK_INTERVAL);

        assert!(engine.is_game_over());
        assert_eq!(engine.high_score(), 5);
        assert!(
            !engine
                .drain_events()
                .any(|e| matches!(e, GameEvent::HighScoreChanged { .. }))
        );
        assert_eq!(*seen.borrow(), vec![Feedback::GameOver]);
    }

    #[test]
    fn test_start_after_game_over_resets() {
        let mut engine = GameEngine::new(0, 2);
        engine.start();
        engine.state.score = 4;
        engine.advance(Duration::from_secs(60));
        assert!(engine.is_game_over());
        assert_eq!(engine.high_score(), 4);

        engine.start();
        assert!(engine.is_running());
        assert!(!engine.is_game_over());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.time_remaining(), 60);
        assert_eq!(engine.high_score(), 4);
    }

    #[test]
    fn test_ranges_shrink_over_time() {
        let mut engine = GameEngine::with_seed(8);
        engine.start();
        assert_eq!(engine.spawn_interval_range(), SecondsRange::new(0.5, 1.2));

        engine.advance(Duration::from_secs(15));
        let spawn = engine.spawn_interval_range();
        assert!((spawn.min - 0.46).abs() < 1e-9);
        assert!((engine.mole_lifetime_range().max - 1.472).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = GameEngine::with_seed(2024);
        let mut b = GameEngine::with_seed(2024);
        a.start();
        b.start();
        a.advance(Duration::from_secs(30));
        b.advance(Duration::from_secs(30));
        assert_eq!(a.holes(), b.holes());
        assert_eq!(a.seed(), 2024);
    }
}
