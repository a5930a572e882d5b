//! Application shell
//!
//! Screen flow around the simulation: menu, briefing, play, the short
//! level-complete pause between campaign waves, and the two end screens.
//! Owns the persistent pieces (high score, settings) and reports what the
//! host needs to act on as [`ShellEvent`]s.

use glam::Vec2;

use crate::audio::AudioCues;
use crate::briefing::Briefing;
use crate::consts::LEVEL_COMPLETE_TICKS;
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::platform::InputState;
use crate::settings::Settings;
use crate::sim::{FixedStep, GameMode, PlayerCount, Run, RunStatus, Transition};
use crate::tuning::Tuning;

/// What is on screen
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Menu,
    /// Waiting for (or showing) the briefing for a wave
    Briefing { wave: u32 },
    Playing,
    /// Campaign pause before the next briefing
    LevelComplete { ticks_left: u32 },
    GameOver { score: u64 },
    Victory { score: u64 },
}

/// Things the host reacts to (DOM updates, briefing fetches)
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    /// A briefing for this wave should be fetched and handed back
    BriefingNeeded { wave: u32 },
    LevelComplete { wave: u32, score: u64 },
    GameOver { score: u64, new_best: bool },
    Victory { score: u64, new_best: bool },
}

pub struct App {
    store: Box<dyn KeyValueStore>,
    high_score: HighScore,
    settings: Settings,
    tuning: Tuning,
    bounds: Vec2,
    seed: u64,

    screen: Screen,
    players: PlayerCount,
    mode: GameMode,
    run: Option<Run>,
    briefing: Option<Briefing>,
    step: FixedStep,
}

impl App {
    /// Read persisted state once and land on the menu
    pub fn new(store: Box<dyn KeyValueStore>, tuning: Tuning, bounds: Vec2, seed: u64) -> Self {
        let high_score = HighScore::load(store.as_ref());
        let settings = Settings::load(store.as_ref());
        Self {
            store,
            high_score,
            settings,
            tuning,
            bounds,
            seed,
            screen: Screen::Menu,
            players: PlayerCount::One,
            mode: GameMode::Campaign,
            run: None,
            briefing: None,
            step: FixedStep::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn briefing(&self) -> Option<&Briefing> {
        self.briefing.as_ref()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings.save(self.store.as_mut());
    }

    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        if let Some(run) = &mut self.run {
            run.resize(bounds);
        }
    }

    /// Menu choice made: start a new run at the wave 1 briefing
    pub fn start_game(&mut self, players: PlayerCount, mode: GameMode) -> ShellEvent {
        self.players = players;
        self.mode = mode;
        self.seed = self.seed.wrapping_add(1);
        self.run = Some(Run::start(players, mode, self.bounds, self.seed, self.tuning.clone(), &self.settings));
        self.enter_briefing(1)
    }

    fn enter_briefing(&mut self, wave: u32) -> ShellEvent {
        self.briefing = None;
        self.screen = Screen::Briefing { wave };
        ShellEvent::BriefingNeeded { wave }
    }

    /// Hand over a fetched (or substituted) briefing. Stale ones are dropped.
    pub fn briefing_loaded(&mut self, wave: u32, briefing: Briefing) {
        if self.screen == (Screen::Briefing { wave }) {
            self.briefing = Some(briefing);
        } else {
            log::debug!("Dropping stale briefing for wave {}", wave);
        }
    }

    /// Player dismissed the briefing. Allowed before the text arrives.
    pub fn confirm_briefing(&mut self) {
        if matches!(self.screen, Screen::Briefing { .. }) && self.run.is_some() {
            self.step.reset();
            self.screen = Screen::Playing;
        }
    }

    /// Leave an end screen
    pub fn return_to_menu(&mut self) {
        self.run = None;
        self.briefing = None;
        self.screen = Screen::Menu;
    }

    /// Advance by one host frame of `dt` seconds
    pub fn frame(&mut self, dt: f32, input: &InputState, cues: &mut dyn AudioCues) -> Vec<ShellEvent> {
        let mut events = Vec::new();
        let steps = self.step.advance(dt);

        for _ in 0..steps {
            match self.screen {
                Screen::Playing => {
                    let Some(run) = &mut self.run else {
                        self.screen = Screen::Menu;
                        break;
                    };
                    let world = run.world();
                    let tick_input = input.intents(&world.players, world.bounds, self.players);
                    if let RunStatus::Ended(transition) = run.tick(&tick_input, cues) {
                        events.push(self.finish(transition));
                    }
                }
                Screen::LevelComplete { ticks_left } => {
                    if ticks_left > 1 {
                        self.screen = Screen::LevelComplete {
                            ticks_left: ticks_left - 1,
                        };
                    } else if let Some(run) = &mut self.run {
                        run.next_wave();
                        let wave = run.world().current_wave;
                        events.push(self.enter_briefing(wave));
                    }
                }
                _ => break,
            }
        }
        events
    }

    fn finish(&mut self, transition: Transition) -> ShellEvent {
        match transition {
            Transition::WaveComplete { wave, score } => self.on_level_complete(wave, score),
            Transition::Victory { score } => {
                let new_best = self.record_score(score);
                self.screen = Screen::Victory { score };
                log::info!("Campaign won with {}", score);
                ShellEvent::Victory { score, new_best }
            }
            Transition::GameOver { score } => self.on_game_over(score),
        }
    }

    /// A campaign wave was cleared with more waves to go
    pub fn on_level_complete(&mut self, wave: u32, score: u64) -> ShellEvent {
        self.screen = Screen::LevelComplete {
            ticks_left: LEVEL_COMPLETE_TICKS,
        };
        ShellEvent::LevelComplete { wave, score }
    }

    /// Every ship was lost
    pub fn on_game_over(&mut self, score: u64) -> ShellEvent {
        let new_best = self.record_score(score);
        self.screen = Screen::GameOver { score };
        log::info!("Game over with {}", score);
        ShellEvent::GameOver { score, new_best }
    }

    fn record_score(&mut self, score: u64) -> bool {
        if self.high_score.submit(score) {
            self.high_score.save(self.store.as_mut());
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::consts::SIM_DT;
    use crate::persistence::MemoryStore;

    fn app() -> App {
        App::new(Box::new(MemoryStore::new()), Tuning::default(), Vec2::new(800.0, 600.0), 1)
    }

    fn play(app: &mut App, ticks: u32) -> Vec<ShellEvent> {
        let input = InputState::new();
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(app.frame(SIM_DT * 1.01, &input, &mut SilentAudio));
        }
        events
    }

    #[test]
    fn test_menu_to_playing() {
        let mut app = app();
        assert_eq!(app.screen(), &Screen::Menu);
        let event = app.start_game(PlayerCount::Two, GameMode::Campaign);
        assert_eq!(event, ShellEvent::BriefingNeeded { wave: 1 });

        // Briefing screen holds the simulation
        assert!(play(&mut app, 5).is_empty());
        assert_eq!(app.run().map(|r| r.world().tick_counter), Some(0));

        app.briefing_loaded(1, Briefing::offline(1));
        assert_eq!(app.briefing().map(|b| b.title.as_str()), Some("Sector 1 Initiated"));
        app.confirm_briefing();
        assert_eq!(app.screen(), &Screen::Playing);
        play(&mut app, 5);
        assert!(app.run().map(|r| r.world().tick_counter).unwrap_or(0) >= 4);
    }

    #[test]
    fn test_stale_briefing_ignored() {
        let mut app = app();
        app.start_game(PlayerCount::One, GameMode::Campaign);
        app.briefing_loaded(2, Briefing::offline(2));
        assert!(app.briefing().is_none());
    }

    #[test]
    fn test_campaign_wave_pause_then_next_briefing() {
        let mut app = app();
        app.start_game(PlayerCount::One, GameMode::Campaign);
        app.confirm_briefing();
        if let Some(run) = &mut app.run {
            run.world_mut().kills_this_wave = 20;
            run.world_mut().score = 2000;
        }

        let events = play(&mut app, 2);
        assert_eq!(events, vec![ShellEvent::LevelComplete { wave: 1, score: 2000 }]);
        assert!(matches!(app.screen(), Screen::LevelComplete { .. }));

        let events = play(&mut app, LEVEL_COMPLETE_TICKS + 2);
        assert_eq!(events, vec![ShellEvent::BriefingNeeded { wave: 2 }]);
        assert_eq!(app.screen(), &Screen::Briefing { wave: 2 });
        assert_eq!(app.run().map(|r| r.score()), Some(2000));
    }

    #[test]
    fn test_game_over_persists_best_once() {
        let mut app = app();
        app.start_game(PlayerCount::One, GameMode::Endless);
        app.confirm_briefing();
        if let Some(run) = &mut app.run {
            let world = run.world_mut();
            world.score = 4200;
            world.players[0].health = 20;
            let pos = world.players[0].body.pos;
            world.insert_enemy(crate::sim::EnemyVariant::Basic, pos, Vec2::ZERO, 20.0, 30);
        }

        let events = play(&mut app, 3);
        assert_eq!(
            events,
            vec![ShellEvent::GameOver {
                score: 4300,
                new_best: true
            }]
        );
        assert_eq!(app.screen(), &Screen::GameOver { score: 4300 });
        assert_eq!(app.high_score(), 4300);
        assert_eq!(app.store.get(HighScore::STORAGE_KEY).as_deref(), Some("4300"));

        app.return_to_menu();
        assert_eq!(app.screen(), &Screen::Menu);
        assert!(app.run().is_none());
    }

    #[test]
    fn test_victory_screen() {
        let mut app = app();
        app.start_game(PlayerCount::One, GameMode::Campaign);
        app.confirm_briefing();
        if let Some(run) = &mut app.run {
            run.world_mut().current_wave = 5;
            run.world_mut().kills_this_wave = 20;
        }
        let events = play(&mut app, 2);
        assert_eq!(events, vec![ShellEvent::Victory { score: 0, new_best: false }]);
        assert_eq!(app.screen(), &Screen::Victory { score: 0 });
    }
}
