//! High score
//!
//! A single best score persisted under a fixed key. Read once when the shell
//! starts, written when a finished run beats it.

use crate::persistence::KeyValueStore;

/// Best score seen on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "neon_thunder_hs";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score would replace the stored best
    pub fn beaten_by(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run's score. Returns true if it became the new best.
    pub fn submit(&mut self, score: u64) -> bool {
        if self.beaten_by(score) {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from the store; missing or unparsable values read as 0
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(Self::STORAGE_KEY) else {
            log::info!("No high score found, starting fresh");
            return Self::default();
        };
        match raw.trim().parse::<u64>() {
            Ok(best) => {
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Err(_) => {
                log::warn!("Ignoring unreadable high score {:?}", raw);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match store.set(Self::STORAGE_KEY, &self.best.to_string()) {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("High score not saved: {}", e),
        }
    }
}
