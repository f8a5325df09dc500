//! High score record
//!
//! The engine never touches storage: it is handed the best score at
//! construction and emits `GameEvent::HighScoreChanged` on a new record. This
//! module is the host side of that contract, persisted as JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persisted best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// Stable storage key (file stem on native)
    pub const STORAGE_KEY: &'static str = "whack_a_mole_high_score";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// File holding the record inside `dir`
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", Self::STORAGE_KEY))
    }

    /// Record a finished session's score. Returns true if it is a new best.
    pub fn submit(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from `path`. Missing or unreadable records start from 0.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScore>(&json) {
                Ok(score) => {
                    log::info!("Loaded high score {}", score.best);
                    score
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt high score at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}
