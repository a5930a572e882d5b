//! Sound cues
//!
//! The simulation only knows the [`AudioCues`] trait. In the browser the
//! cues are synthesized with Web Audio oscillators; elsewhere they are
//! dropped or counted. A looping bassline plays under a run.

use crate::sim::state::WeaponType;

/// Fire-and-forget sound cues raised by a run
pub trait AudioCues {
    fn play_shoot(&mut self, weapon: WeaponType);
    fn play_explosion(&mut self);
    fn play_powerup(&mut self);
}

/// No audio device
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioCues for SilentAudio {
    fn play_shoot(&mut self, _weapon: WeaponType) {}
    fn play_explosion(&mut self) {}
    fn play_powerup(&mut self) {}
}

/// One bar of the bassline: E1 and E2 alternating
pub const BASSLINE_HZ: [f32; 4] = [41.20, 82.41, 41.20, 82.41];
/// Length of one bassline note in seconds
pub const MUSIC_STEP: f64 = 0.25;
/// Bars are queued this long before they start
const MUSIC_LOOKAHEAD: f64 = 0.1;

/// Decides when the next bassline bar goes out, against the audio clock
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MusicClock {
    next_bar: Option<f64>,
}

impl MusicClock {
    /// Start looping from `now`. Already playing is left alone.
    pub fn start(&mut self, now: f64) {
        if self.next_bar.is_none() {
            self.next_bar = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_bar = None;
    }

    pub fn is_playing(&self) -> bool {
        self.next_bar.is_some()
    }

    /// Start time of a bar that should be queued now, if any. A clock that
    /// fell behind (e.g. a backgrounded tab) resumes at `now` instead of
    /// stacking the missed bars.
    pub fn due(&mut self, now: f64) -> Option<f64> {
        let next = self.next_bar?;
        if next > now + MUSIC_LOOKAHEAD {
            return None;
        }
        let start = next.max(now);
        self.next_bar = Some(start + MUSIC_STEP * BASSLINE_HZ.len() as f64);
        Some(start)
    }
}

/// Counts cues instead of playing them (headless sessions, tests)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CueCounter {
    pub shots: [u32; 3],
    pub explosions: u32,
    pub powerups: u32,
}

impl CueCounter {
    pub fn total_shots(&self) -> u32 {
        self.shots.iter().sum()
    }
}

impl AudioCues for CueCounter {
    fn play_shoot(&mut self, weapon: WeaponType) {
        let slot = match weapon {
            WeaponType::Blaster => 0,
            WeaponType::Spread => 1,
            WeaponType::Laser => 2,
        };
        self.shots[slot] += 1;
    }

    fn play_explosion(&mut self) {
        self.explosions += 1;
    }

    fn play_powerup(&mut self) {
        self.powerups += 1;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCues, BASSLINE_HZ, MUSIC_STEP, MusicClock};
    use crate::settings::Settings;
    use crate::sim::state::WeaponType;

    /// Procedural synthesizer on top of an `AudioContext`
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        music: MusicClock,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
                music: MusicClock::default(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Begin the bassline loop (run start)
        pub fn start_music(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            self.resume();
            self.music.start(ctx.current_time());
        }

        pub fn stop_music(&mut self) {
            self.music.stop();
        }

        /// Queue the next bar when it is due. Called once per frame.
        pub fn update_music(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            let Some(start) = self.music.due(ctx.current_time()) else {
                return;
            };
            if self.volume > 0.0 {
                Self::bass_bar(ctx, start, self.volume * 0.4);
            }
        }

        /// Four sawtooth notes through a lowpass "wub" envelope
        fn bass_bar(ctx: &AudioContext, start: f64, level: f32) {
            for (i, &freq) in BASSLINE_HZ.iter().enumerate() {
                let t = start + i as f64 * MUSIC_STEP;
                let (Ok(osc), Ok(filter), Ok(gain)) = (ctx.create_oscillator(), ctx.create_biquad_filter(), ctx.create_gain())
                else {
                    return;
                };

                osc.set_type(OscillatorType::Sawtooth);
                osc.frequency().set_value(freq);
                filter.set_type(BiquadFilterType::Lowpass);
                if osc.connect_with_audio_node(&filter).is_err()
                    || filter.connect_with_audio_node(&gain).is_err()
                    || gain.connect_with_audio_node(&ctx.destination()).is_err()
                {
                    return;
                }

                filter.frequency().set_value_at_time(100.0, t).ok();
                filter.frequency().exponential_ramp_to_value_at_time(600.0, t + 0.1).ok();
                filter.frequency().exponential_ramp_to_value_at_time(100.0, t + MUSIC_STEP).ok();

                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().linear_ramp_to_value_at_time(level, t + 0.05).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, t + MUSIC_STEP - 0.05).ok();

                osc.start_with_when(t).ok();
                osc.stop_with_when(t + MUSIC_STEP).ok();
            }
        }

        /// Live context and volume, or nothing if the cue should be skipped
        fn output(&self) -> Option<(&AudioContext, f32)> {
            if self.volume <= 0.0 {
                return None;
            }
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some((ctx, self.volume))
        }

        fn create_osc(ctx: &AudioContext, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One oscillator sweeping `from` -> `to` Hz over `len` seconds
        fn chirp(ctx: &AudioContext, osc_type: OscillatorType, from: f32, to: f32, len: f64, level: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + len).ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, t + len).ok();

            osc.start().ok();
            osc.stop_with_when(t + len).ok();
        }
    }

    impl AudioCues for AudioManager {
        fn play_shoot(&mut self, weapon: WeaponType) {
            let Some((ctx, vol)) = self.output() else { return };
            match weapon {
                WeaponType::Blaster => Self::chirp(ctx, OscillatorType::Square, 400.0, 100.0, 0.1, vol * 0.05),
                WeaponType::Spread => Self::chirp(ctx, OscillatorType::Triangle, 600.0, 200.0, 0.1, vol * 0.08),
                WeaponType::Laser => Self::chirp(ctx, OscillatorType::Sawtooth, 800.0, 100.0, 0.3, vol * 0.1),
            }
        }

        /// Low rumble with a short crack on top
        fn play_explosion(&mut self) {
            let Some((ctx, vol)) = self.output() else { return };
            Self::chirp(ctx, OscillatorType::Sawtooth, 100.0, 30.0, 0.4, vol * 0.3);

            if let Some((osc, gain)) = Self::create_osc(ctx, 1500.0, OscillatorType::Square) {
                let t = ctx.current_time();
                gain.gain().set_value_at_time(vol * 0.08, t).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.1).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        fn play_powerup(&mut self) {
            let Some((ctx, vol)) = self.output() else { return };
            let Some((osc, gain)) = Self::create_osc(ctx, 440.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.3).ok();
            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency().set_value_at_time(880.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(1760.0, t + 0.2).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_clock_queues_one_bar_ahead() {
        let mut clock = MusicClock::default();
        assert_eq!(clock.due(0.0), None);

        clock.start(2.0);
        assert!(clock.is_playing());
        assert_eq!(clock.due(2.0), Some(2.0));
        // Next bar is a second out, not yet inside the lookahead
        assert_eq!(clock.due(2.5), None);
        assert_eq!(clock.due(2.95), Some(3.0));

        // Restarting while playing keeps the schedule
        clock.start(3.2);
        assert_eq!(clock.due(3.5), None);

        clock.stop();
        assert!(!clock.is_playing());
        assert_eq!(clock.due(3.95), None);
    }

    #[test]
    fn test_music_clock_skips_missed_bars() {
        let mut clock = MusicClock::default();
        clock.start(0.0);
        assert_eq!(clock.due(0.0), Some(0.0));
        assert_eq!(clock.due(30.0), Some(30.0));
        assert_eq!(clock.due(30.5), None);
        assert_eq!(clock.due(30.95), Some(31.0));
    }

    #[test]
    fn test_counter_tallies_by_weapon() {
        let mut cues = CueCounter::default();
        cues.play_shoot(WeaponType::Blaster);
        cues.play_shoot(WeaponType::Laser);
        cues.play_shoot(WeaponType::Laser);
        cues.play_explosion();
        assert_eq!(cues.shots, [1, 0, 2]);
        assert_eq!(cues.total_shots(), 3);
        assert_eq!(cues.explosions, 1);
        assert_eq!(cues.powerups, 0);
    }
}
