//! Host preferences
//!
//! Gameplay constants are fixed (see `consts`); these only shape how the host
//! runs a session. Persisted as JSON next to the high score.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Host settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Route hit / game-over feedback to the log
    pub feedback: bool,
    /// Fixed RNG seed (None = time based)
    pub seed: Option<u64>,

    // === Demo player ===
    /// Chance (0.0 - 1.0) the demo player hits a mole it reacts to
    pub demo_accuracy: f64,
    /// How long a mole must be up before the demo player reacts
    pub demo_reaction_ms: u64,
    /// Pace the session in wall time instead of as fast as possible
    pub realtime: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feedback: true,
            seed: None,
            demo_accuracy: 0.75,
            demo_reaction_ms: 450,
            realtime: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "whack_a_mole_settings";

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", Self::STORAGE_KEY))
    }

    /// Accuracy clamped to a valid probability
    pub fn effective_accuracy(&self) -> f64 {
        if self.demo_accuracy.is_finite() {
            self.demo_accuracy.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if let Ok(json) = fs::read_to_string(path) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring bad settings at {}: {}", path.display(), e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
