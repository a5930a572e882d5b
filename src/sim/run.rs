//! Loop driver
//!
//! A [`Run`] owns the world from the first wave to a terminal transition and
//! turns the tick's event queue into audio cues. [`FixedStep`] converts
//! host frame times into a whole number of simulation ticks.

use glam::Vec2;

use super::progression::{self, RunPhase, Transition};
use super::state::{GameEvent, GameMode, PlayerCount, World, WorldConfig};
use super::tick::{TickInput, tick};
use crate::audio::AudioCues;
use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Result of driving a run for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Reported exactly once, on the tick that left the wave
    Ended(Transition),
    /// Nothing left to simulate until the shell acts
    Halted,
}

/// One play-through from `start` to victory or game over
#[derive(Debug, Clone)]
pub struct Run {
    world: World,
    /// Set once the current transition has been reported
    reported: bool,
}

impl Run {
    pub fn start(
        players: PlayerCount,
        mode: GameMode,
        bounds: Vec2,
        seed: u64,
        tuning: Tuning,
        settings: &Settings,
    ) -> Self {
        log::info!("Starting {:?} run with {} ship(s), seed {}", mode, players.get(), seed);
        let config = WorldConfig::new(mode, players, bounds, seed)
            .with_tuning(tuning)
            .with_settings(settings);
        Self::from_world(World::new(config))
    }

    /// Drive an existing world, e.g. one prepared by a test
    pub fn from_world(world: World) -> Self {
        Self { world, reported: false }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn phase(&self) -> RunPhase {
        progression::phase_of(&self.world)
    }

    pub fn score(&self) -> u64 {
        self.world.score
    }

    /// Advance one tick and forward its events to the audio collaborator
    pub fn tick(&mut self, input: &TickInput, cues: &mut dyn AudioCues) -> RunStatus {
        if self.reported {
            return RunStatus::Halted;
        }

        let phase = tick(&mut self.world, input);
        for event in self.world.drain_events() {
            match event {
                GameEvent::Shot { weapon, .. } => cues.play_shoot(weapon),
                GameEvent::EnemyDestroyed { .. } => cues.play_explosion(),
                GameEvent::PowerupCollected { .. } => cues.play_powerup(),
                GameEvent::PlayerHit { .. } | GameEvent::PlayerDestroyed { .. } | GameEvent::WaveAdvanced { .. } => {}
            }
        }

        if phase == RunPhase::InWave {
            return RunStatus::Running;
        }
        match progression::transition_of(&self.world) {
            Some(transition) => {
                self.reported = true;
                RunStatus::Ended(transition)
            }
            None => RunStatus::Running,
        }
    }

    /// Rebuild the world for the next campaign wave. Only valid after a
    /// `WaveComplete` transition; otherwise the run is left as is.
    pub fn next_wave(&mut self) -> bool {
        if self.phase() != RunPhase::WaveComplete {
            log::warn!("next_wave requested in phase {:?}", self.phase());
            return false;
        }
        self.world.begin_next_wave();
        self.reported = false;
        log::info!("Wave {} begins", self.world.current_wave);
        true
    }

    pub fn resize(&mut self, bounds: Vec2) {
        self.world.resize(bounds);
    }
}

/// Accumulator scheduler: whole ticks per host frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed seconds and return how many ticks to run.
    ///
    /// Long frames are clamped and the tick count is capped, so a stalled
    /// tab never triggers a burst of catch-up work.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulator += frame_time.clamp(0.0, MAX_FRAME_TIME);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Drop any leftover time, e.g. after a pause
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
