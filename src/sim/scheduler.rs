//! Virtual-time timer queue
//!
//! Holds at most one outstanding firing per [`TimerKind`]. Scheduling a kind
//! supersedes its previous firing, and cancelling is idempotent. Superseded and
//! cancelled entries stay in the heap and are dropped when they surface, so a
//! firing is only delivered while its generation is still live.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// The two drivers of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Fixed-period countdown driver
    Tick,
    /// Irregular, self-rescheduling spawn driver
    Spawn,
}

impl TimerKind {
    fn slot(self) -> usize {
        match self {
            TimerKind::Tick => 0,
            TimerKind::Spawn => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Duration,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    kind: TimerKind,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    queue: BinaryHeap<Reverse<Entry>>,
    live: [Option<u64>; 2],
    next_generation: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Arm `kind` to fire `delay` from now, replacing any pending firing
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        let generation = self.next_generation;
        self.next_generation += 1;
        let seq = self.next_seq;
        self.next_seq += 1;

        self.live[kind.slot()] = Some(generation);
        self.queue.push(Reverse(Entry {
            due: self.now + delay,
            seq,
            kind,
            generation,
        }));
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.live[kind.slot()] = None;
    }

    pub fn cancel_all(&mut self) {
        self.live = [None; 2];
        self.queue.clear();
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.live[kind.slot()].is_some()
    }

    /// Pop the next live firing due at or before `until`, moving the clock to
    /// its due time. The fired kind is disarmed until scheduled again.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerKind> {
        while let Some(Reverse(entry)) = self.queue.peek().copied() {
            if entry.due > until {
                return None;
            }
            self.queue.pop();

            let slot = entry.kind.slot();
            if self.live[slot] != Some(entry.generation) {
                continue; // stale
            }
            self.live[slot] = None;
            self.now = self.now.max(entry.due);
            return Some(entry.kind);
        }
        None
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
