//! Wave quota and run outcome
//!
//! Campaign waves stop the simulation once the kill quota is met and the
//! shell decides between the next wave and victory. Endless waves roll over
//! in place and never stop.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameMode, World};

/// Where a run stands between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    InWave,
    WaveComplete,
    GameOver,
    Victory,
}

/// Outcome of a quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveCheck {
    /// Quota not met yet
    Ongoing,
    /// Campaign wave finished; the tick must stop here
    Complete,
    /// Endless wave rolled over to the given number
    Advanced(u32),
}

/// One-shot notification that a run left the `InWave` phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    WaveComplete { wave: u32, score: u64 },
    Victory { score: u64 },
    GameOver { score: u64 },
}

impl Transition {
    pub fn score(&self) -> u64 {
        match *self {
            Transition::WaveComplete { score, .. } | Transition::Victory { score } | Transition::GameOver { score } => {
                score
            }
        }
    }

    /// Whether the run is finished for good
    pub fn is_final(&self) -> bool {
        !matches!(self, Transition::WaveComplete { .. })
    }
}

/// Check the kill quota at the start of a tick
pub fn check_wave(world: &mut World) -> WaveCheck {
    if world.kills_this_wave < world.tuning.kills_per_wave {
        return WaveCheck::Ongoing;
    }

    match world.mode {
        GameMode::Campaign => {
            world.is_wave_complete = true;
            log::info!("Wave {} cleared with score {}", world.current_wave, world.score);
            WaveCheck::Complete
        }
        GameMode::Endless => {
            world.current_wave += 1;
            world.kills_this_wave = 0;
            world.events.push(GameEvent::WaveAdvanced {
                wave: world.current_wave,
            });
            log::info!("Endless wave {} begins", world.current_wave);
            WaveCheck::Advanced(world.current_wave)
        }
    }
}

/// Phase implied by the world's flags. Game over wins if both are set.
pub fn phase_of(world: &World) -> RunPhase {
    if world.is_over {
        RunPhase::GameOver
    } else if world.is_wave_complete {
        if world.mode == GameMode::Campaign && world.current_wave >= world.tuning.campaign_waves {
            RunPhase::Victory
        } else {
            RunPhase::WaveComplete
        }
    } else {
        RunPhase::InWave
    }
}

/// The transition a world has reached, if any
pub fn transition_of(world: &World) -> Option<Transition> {
    match phase_of(world) {
        RunPhase::InWave => None,
        RunPhase::WaveComplete => Some(Transition::WaveComplete {
            wave: world.current_wave,
            score: world.score,
        }),
        RunPhase::Victory => Some(Transition::Victory { score: world.score }),
        RunPhase::GameOver => Some(Transition::GameOver { score: world.score }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PlayerCount, WorldConfig};
    use glam::Vec2;

    fn world(mode: GameMode) -> World {
        World::new(WorldConfig::new(mode, PlayerCount::One, Vec2::new(800.0, 600.0), 7))
    }

    #[test]
    fn test_campaign_quota_completes_wave() {
        let mut w = world(GameMode::Campaign);
        w.kills_this_wave = 19;
        assert_eq!(check_wave(&mut w), WaveCheck::Ongoing);
        assert_eq!(phase_of(&w), RunPhase::InWave);

        w.kills_this_wave = 20;
        assert_eq!(check_wave(&mut w), WaveCheck::Complete);
        assert_eq!(
            transition_of(&w),
            Some(Transition::WaveComplete { wave: 1, score: 0 })
        );
    }

    #[test]
    fn test_last_campaign_wave_is_victory() {
        let mut w = world(GameMode::Campaign);
        w.current_wave = 5;
        w.kills_this_wave = 20;
        w.score = 9000;
        check_wave(&mut w);
        assert_eq!(phase_of(&w), RunPhase::Victory);
        let t = transition_of(&w).unwrap();
        assert!(t.is_final());
        assert_eq!(t.score(), 9000);
    }

    #[test]
    fn test_endless_rolls_over_in_place() {
        let mut w = world(GameMode::Endless);
        w.kills_this_wave = 20;
        assert_eq!(check_wave(&mut w), WaveCheck::Advanced(2));
        assert_eq!(w.current_wave, 2);
        assert_eq!(w.kills_this_wave, 0);
        assert!(!w.is_wave_complete);
        assert_eq!(w.events, vec![GameEvent::WaveAdvanced { wave: 2 }]);
        assert_eq!(phase_of(&w), RunPhase::InWave);
    }

    #[test]
    fn test_game_over_wins_over_wave_complete() {
        let mut w = world(GameMode::Campaign);
        w.is_wave_complete = true;
        w.is_over = true;
        assert_eq!(phase_of(&w), RunPhase::GameOver);
    }
}
