//! Neon Thunder entry point
//!
//! The browser build wires the canvas, DOM, and input events to the app
//! shell and runs it from `requestAnimationFrame`. The native build runs an
//! unattended session and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use neon_thunder::app::{App, Screen, ShellEvent};
    use neon_thunder::audio::AudioManager;
    use neon_thunder::briefing::{self, Briefing};
    use neon_thunder::consts::SIM_DT;
    use neon_thunder::persistence::LocalStorage;
    use neon_thunder::platform::InputState;
    use neon_thunder::renderer::{RenderError, RenderState, build_scene};
    use neon_thunder::sim::{GameMode, PlayerCount};
    use neon_thunder::tuning::Tuning;

    /// Overlay element ids, one per screen
    const OVERLAYS: [&str; 6] = ["menu", "briefing", "hud", "level-complete", "game-over", "victory"];

    /// Game instance holding all state
    struct Game {
        app: App,
        render_state: Option<RenderState>,
        audio: AudioManager,
        input: InputState,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// Mode picked on the menu, applied by the start buttons
        selected_mode: GameMode,
        briefing_endpoint: Option<String>,
    }

    impl Game {
        fn logical_size(&self) -> Vec2 {
            Vec2::new(self.canvas.client_width() as f32, self.canvas.client_height() as f32)
        }

        fn handle(game: &Rc<RefCell<Game>>, event: ShellEvent) {
            match event {
                ShellEvent::BriefingNeeded { wave } => request_briefing(game.clone(), wave),
                ShellEvent::LevelComplete { wave, score } => {
                    log::info!("Sector {} cleared ({})", wave, score);
                }
                ShellEvent::GameOver { score, new_best } | ShellEvent::Victory { score, new_best } => {
                    game.borrow_mut().audio.stop_music();
                    if let Some(doc) = document() {
                        set_text(&doc, "#final-score", &score.to_string());
                        set_text(&doc, "#new-best", if new_best { "NEW HIGH SCORE" } else { "" });
                    }
                }
            }
        }

        fn render(&mut self) {
            let Some(render_state) = &mut self.render_state else { return };
            let Some(run) = self.app.run() else { return };
            let vertices = build_scene(run.world());
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(RenderError::Surface(wgpu::SurfaceError::Lost)) => {
                    let (w, h) = render_state.size;
                    let view = render_state.view;
                    render_state.resize(w, h, view);
                }
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }

        /// Show the overlay for the current screen and refresh HUD text
        fn update_dom(&self) {
            let Some(doc) = document() else { return };

            let active = match self.app.screen() {
                Screen::Menu => "menu",
                Screen::Briefing { .. } => "briefing",
                Screen::Playing => "hud",
                Screen::LevelComplete { .. } => "level-complete",
                Screen::GameOver { .. } => "game-over",
                Screen::Victory { .. } => "victory",
            };
            for id in OVERLAYS {
                if let Some(el) = doc.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if id == active { "overlay" } else { "overlay hidden" });
                }
            }

            set_text(&doc, "#hud-best .hud-value", &self.app.high_score().to_string());

            if let Screen::Briefing { wave } = self.app.screen() {
                match self.app.briefing() {
                    Some(b) => {
                        set_text(&doc, "#briefing-title", &b.title);
                        set_text(&doc, "#briefing-description", &b.description);
                        set_text(&doc, "#briefing-intel", &b.enemy_intel);
                    }
                    None => set_text(&doc, "#briefing-title", &format!("Decrypting wave {}...", wave)),
                }
            }

            let Some(run) = self.app.run() else { return };
            let world = run.world();
            set_text(&doc, "#hud-score .hud-value", &format!("{:06}", world.score));
            let wave = match self.app.mode() {
                GameMode::Campaign => format!("LEVEL {}/{}", world.current_wave, world.tuning.campaign_waves),
                GameMode::Endless => format!("WAVE {}", world.current_wave),
            };
            set_text(&doc, "#hud-wave .hud-value", &wave);
            for (slot, selector) in ["#hud-p1 .hud-value", "#hud-p2 .hud-value"].iter().enumerate() {
                let health = world
                    .players
                    .iter()
                    .find(|p| p.slot.index() == slot)
                    .map(|p| p.health.to_string())
                    .unwrap_or_else(|| "-".to_string());
                set_text(&doc, selector, &health);
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(doc: &Document, selector: &str, text: &str) {
        if let Some(el) = doc.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    /// Fetch a briefing off the frame loop and hand it to the shell when ready
    fn request_briefing(game: Rc<RefCell<Game>>, wave: u32) {
        let endpoint = game.borrow().briefing_endpoint.clone();
        let Some(endpoint) = endpoint else {
            game.borrow_mut().app.briefing_loaded(wave, Briefing::offline(wave));
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = briefing::fetch_briefing(&endpoint, wave).await;
            let briefing = briefing::resolve(result, wave);
            game.borrow_mut().app.briefing_loaded(wave, briefing);
        });
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Neon Thunder starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document.get_element_by_id("canvas").ok_or("no canvas")?.dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let bounds = Vec2::new(client_w as f32, client_h as f32);

        let seed = js_sys::Date::now() as u64;
        let store = Box::new(LocalStorage::new());
        let app = App::new(store, Tuning::default(), bounds, seed);
        let audio = AudioManager::new(app.settings());
        let briefing_endpoint = canvas.get_attribute("data-briefing-endpoint").filter(|s| !s.is_empty());
        if briefing_endpoint.is_none() {
            log::info!("No briefing endpoint configured, using offline briefings");
        }

        let game = Rc::new(RefCell::new(Game {
            app,
            render_state: None,
            audio,
            input: InputState::new(),
            canvas: canvas.clone(),
            last_time: 0.0,
            selected_mode: GameMode::Campaign,
            briefing_endpoint,
        }));

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let view = (bounds.x, bounds.y);
                        match RenderState::new(surface, &adapter, width, height, view).await {
                            Ok(rs) => game.borrow_mut().render_state = Some(rs),
                            Err(e) => log::error!("Renderer unavailable: {}", e),
                        }
                    }
                    Err(e) => log::error!("No GPU adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());

        game.borrow().update_dom();
        request_animation_frame(game);

        log::info!("Neon Thunder running!");
        Ok(())
    }

    fn touch_pos(canvas: &HtmlCanvasElement, touch: &web_sys::Touch) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let key = event.key();
                if key.starts_with("Arrow") || key == " " {
                    event.prevent_default();
                }
                match key.as_str() {
                    "Enter" | " " => g.app.confirm_briefing(),
                    "m" | "M" => {
                        let mut settings = g.app.settings().clone();
                        settings.muted = !settings.muted;
                        g.audio.apply_settings(&settings);
                        g.app.update_settings(settings);
                    }
                    "Escape" => {
                        if matches!(g.app.screen(), Screen::GameOver { .. } | Screen::Victory { .. }) {
                            g.app.return_to_menu();
                        }
                    }
                    _ => g.input.key_down(&key),
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur drops held keys so ships don't drift
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let pos = touch_pos(&canvas_clone, &touch);
                        if name == "touchstart" {
                            g.input.touch_start(touch.identifier(), pos);
                        } else {
                            g.input.touch_move(touch.identifier(), pos);
                        }
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        g.input.touch_end(touch.identifier());
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Missing #{} button", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        for (id, mode) in [("mode-campaign", GameMode::Campaign), ("mode-endless", GameMode::Endless)] {
            let game = game.clone();
            on_click(id, move |_| game.borrow_mut().selected_mode = mode);
        }

        for (id, players) in [("btn-solo", PlayerCount::One), ("btn-coop", PlayerCount::Two)] {
            let game = game.clone();
            on_click(id, move |_| {
                let event = {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.audio.start_music();
                    let mode = g.selected_mode;
                    g.app.start_game(players, mode)
                };
                Game::handle(&game, event);
            });
        }

        {
            let game = game.clone();
            on_click("btn-launch", move |_| game.borrow_mut().app.confirm_briefing());
        }

        for id in ["btn-menu-over", "btn-menu-victory"] {
            let game = game.clone();
            on_click(id, move |_| game.borrow_mut().app.return_to_menu());
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let logical = g.logical_size();
            let (w, h) = ((logical.x as f64 * dpr) as u32, (logical.y as f64 * dpr) as u32);
            g.canvas.set_width(w);
            g.canvas.set_height(h);
            if let Some(rs) = &mut g.render_state {
                rs.resize(w, h, (logical.x, logical.y));
            }
            g.app.resize(logical);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let events = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let Game { app, input, audio, .. } = &mut *g;
            let events = app.frame(dt, input, audio);
            audio.update_music();
            g.render();
            g.update_dom();
            events
        };

        for event in events {
            Game::handle(&game, event);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;

    use neon_thunder::app::{App, ShellEvent};
    use neon_thunder::audio::CueCounter;
    use neon_thunder::briefing::Briefing;
    use neon_thunder::consts::{SIM_DT, TICK_RATE};
    use neon_thunder::persistence::MemoryStore;
    use neon_thunder::platform::InputState;
    use neon_thunder::sim::{GameMode, PlayerCount};
    use neon_thunder::tuning::Tuning;

    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 10 * 60 * TICK_RATE;
    /// Autopilot switches strafing direction this often
    const SWEEP_TICKS: u32 = 90;

    #[derive(Parser, Debug)]
    #[command(name = "neon-thunder")]
    #[command(about = "Run an unattended Neon Thunder session and log how it went")]
    pub struct Cli {
        /// Balance overrides as JSON; missing fields keep their defaults
        pub tuning: Option<PathBuf>,
        /// Play endless waves instead of the campaign
        #[arg(long)]
        pub endless: bool,
        /// Fly two ships
        #[arg(long)]
        pub coop: bool,
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
    }

    impl Cli {
        pub fn mode(&self) -> GameMode {
            if self.endless { GameMode::Endless } else { GameMode::Campaign }
        }

        pub fn players(&self) -> PlayerCount {
            if self.coop { PlayerCount::Two } else { PlayerCount::One }
        }

        /// Tuning from the given file, or defaults when absent or invalid
        pub fn load_tuning(&self) -> Tuning {
            let Some(path) = &self.tuning else {
                return Tuning::default();
            };
            let parsed = std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
            match parsed {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                    Tuning::default()
                }
            }
        }
    }

    /// Strafe back and forth near the bottom of the screen. A second ship
    /// mirrors the first on the arrow keys.
    fn steer(input: &mut InputState, frame: u32, players: PlayerCount) {
        let rightward = (frame / SWEEP_TICKS) % 2 == 0;
        let (hold, release) = if rightward { ("d", "a") } else { ("a", "d") };
        input.key_up(release);
        input.key_down(hold);
        if players == PlayerCount::Two {
            let (hold, release) = if rightward { ("arrowleft", "arrowright") } else { ("arrowright", "arrowleft") };
            input.key_up(release);
            input.key_down(hold);
        }
    }

    pub fn run(cli: &Cli) {
        let (mode, players) = (cli.mode(), cli.players());
        let bounds = Vec2::new(800.0, 600.0);
        let mut app = App::new(Box::new(MemoryStore::new()), cli.load_tuning(), bounds, cli.seed);
        let mut input = InputState::new();
        let mut cues = CueCounter::default();

        let mut pending = vec![app.start_game(players, mode)];
        let mut frame = 0;
        let mut outcome = None;

        while frame < MAX_FRAMES && outcome.is_none() {
            for event in pending.drain(..) {
                match event {
                    ShellEvent::BriefingNeeded { wave } => {
                        let briefing = Briefing::offline(wave);
                        log::info!("{}: {} {}", briefing.title, briefing.description, briefing.enemy_intel);
                        app.briefing_loaded(wave, briefing);
                        app.confirm_briefing();
                    }
                    ShellEvent::LevelComplete { wave, score } => {
                        log::info!("Wave {} cleared at {:.1}s, score {}", wave, frame as f32 * SIM_DT, score);
                    }
                    end @ (ShellEvent::GameOver { .. } | ShellEvent::Victory { .. }) => outcome = Some(end),
                }
            }

            steer(&mut input, frame, players);
            pending = app.frame(SIM_DT, &input, &mut cues);
            frame += 1;
        }

        let wave = app.run().map(|r| r.world().current_wave).unwrap_or(0);
        match outcome {
            Some(ShellEvent::Victory { score, .. }) => log::info!("Victory with {} after {} frames", score, frame),
            Some(ShellEvent::GameOver { score, .. }) => {
                log::info!("Game over on wave {} with {} after {} frames", wave, score, frame)
            }
            _ => log::info!("Stopped on wave {} after {} frames", wave, frame),
        }
        log::info!(
            "Cues: {} shots, {} explosions, {} powerups; best score {}",
            cues.total_shots(),
            cues.explosions,
            cues.powerups,
            app.high_score()
        );
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Thunder (native, headless) starting...");
    use clap::Parser;

    let cli = headless::Cli::parse();
    headless::run(&cli);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
