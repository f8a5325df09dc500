//! Hit / game-over feedback
//!
//! The engine signals feedback unconditionally; the host decides whether that
//! becomes haptics, sound, or nothing.

/// Feedback event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Mole whacked
    Hit,
    /// Countdown ran out
    GameOver,
}

/// Capability injected into the engine
pub trait FeedbackSink {
    fn emit(&mut self, feedback: Feedback);
}

/// Ignores everything (platforms without haptics)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn emit(&mut self, _feedback: Feedback) {}
}

/// Writes feedback to the log, counting what it saw
#[derive(Debug, Default)]
pub struct LogFeedback {
    pub hits: u32,
    muted: bool,
}

impl LogFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl FeedbackSink for LogFeedback {
    fn emit(&mut self, feedback: Feedback) {
        if self.muted {
            return;
        }
        match feedback {
            Feedback::Hit => {
                self.hits += 1;
                log::debug!("*thwack* ({} hits)", self.hits);
            }
            Feedback::GameOver => log::info!("*buzz* game over after {} hits", self.hits),
        }
    }
}

impl<F: FnMut(Feedback)> FeedbackSink for F {
    fn emit(&mut self, feedback: Feedback) {
        self(feedback)
    }
}
