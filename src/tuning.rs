//! Data-driven game balance
//!
//! Every knob defaults to the shipped balance; a JSON file may override any
//! subset of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a tuning file is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },
}

/// Balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Number of waves in a campaign; clearing the last one wins the run
    pub campaign_waves: u32,
    /// Kills needed to clear a campaign wave (also the endless wave length)
    pub kills_per_wave: u32,
    /// Ship movement per tick at full intent
    pub player_speed: f32,
    /// Multiplier applied to bullet velocity each tick
    pub bullet_speed: f32,
    /// Base enemy speed before wave scaling
    pub enemy_speed_base: f32,
    /// Probability that a spawned enemy is a Chaser
    pub chaser_chance: f64,
    /// Probability that a destroyed enemy drops a powerup
    pub powerup_drop_chance: f64,
    /// Ticks between automatic volleys
    pub fire_interval_ticks: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            campaign_waves: 5,
            kills_per_wave: 20,
            player_speed: 5.0,
            bullet_speed: 12.0,
            enemy_speed_base: 2.0,
            chaser_chance: 0.2,
            powerup_drop_chance: 0.15,
            fire_interval_ticks: 10,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.campaign_waves == 0 {
            return Err(TuningError::Zero { field: "campaign_waves" });
        }
        if self.kills_per_wave == 0 {
            return Err(TuningError::Zero { field: "kills_per_wave" });
        }
        if self.fire_interval_ticks == 0 {
            return Err(TuningError::Zero { field: "fire_interval_ticks" });
        }
        for (field, value) in [
            ("chaser_chance", self.chaser_chance),
            ("powerup_drop_chance", self.powerup_drop_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Probability { field, value });
            }
        }
        Ok(())
    }
}
