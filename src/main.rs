//! Gravity Flip entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Flip when a spike in the current lane is about to arrive and the other
/// lane is clear for the crossing.
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(session: &gravity_flip::sim::GameSession) -> gravity_flip::sim::TickInput {
    use gravity_flip::consts::*;
    use gravity_flip::sim::{Lane, TickInput};

    let player = &session.player;
    if !player.is_on_surface {
        return TickInput::default();
    }

    let speed = session.progression.current_speed().abs();
    let velocity = session.progression.current_player_velocity();
    // Time to cross between the platforms, and how far spikes scroll meanwhile
    let crossing = (FLOOR_Y - CEILING_Y - 2.0 * SURFACE_OFFSET) / velocity;
    let reach = speed * crossing + session.hitboxes.spike.x + session.hitboxes.player.x;

    let (mine, other) = if player.is_ceiling {
        (Lane::Ceiling, Lane::Floor)
    } else {
        (Lane::Floor, Lane::Ceiling)
    };
    let ahead = |lane: Lane, window: f32| {
        session
            .obstacles
            .obstacles()
            .iter()
            .filter(|o| o.lane == lane)
            .any(|o| o.pos.x > PLAYER_X - session.hitboxes.spike.x && o.pos.x - PLAYER_X < window)
    };

    TickInput {
        flip: ahead(mine, reach * 0.5) && !ahead(other, reach),
        restart: false,
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};

    use gravity_flip::audio::AudioManager;
    use gravity_flip::consts::*;
    use gravity_flip::persistence::LocalStorageStore;
    use gravity_flip::platform::assets::{PLATFORM_SPRITE, PLAYER_SPRITE, SPIKE_SPRITE};
    use gravity_flip::platform::{AssetProvider, InputLatch, ProceduralAssets};
    use gravity_flip::sim::{GameSession, Lane, Surface};
    use gravity_flip::ui::CONTROLS_HINT;
    use gravity_flip::{Leaderboard, SessionController, SessionState, Settings, Tuning};

    const BACKGROUND: &str = "#f0e6d2";

    /// Game instance holding all state
    struct Game {
        controller: SessionController,
        latch: InputLatch,
        ctx: CanvasRenderingContext2d,
        assets: ProceduralAssets,
        last_time: f64,
    }

    impl Game {
        /// Run simulation for one animation frame
        fn update(&mut self, dt: f32) {
            let input = self.latch.take();
            self.controller.update(input, dt);
        }

        /// Toggle a setting from the keyboard and persist it
        fn settings_hotkey(&mut self, key: &str) {
            let mut settings = self.controller.settings().clone();
            if !settings.apply_hotkey(key) {
                return;
            }
            if let Err(e) = settings.save() {
                log::warn!("Could not save settings: {}", e);
            }
            self.controller.set_settings(settings);
        }

        /// Draw the current frame
        fn render(&self) {
            let ctx = &self.ctx;
            ctx.set_fill_style_str(BACKGROUND);
            ctx.fill_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);

            let Some(session) = self.controller.session() else {
                return;
            };

            if let Some(platform) = self.assets.sprite(PLATFORM_SPRITE) {
                ctx.set_fill_style_str(&platform.css_color());
                for surface in [Surface::Floor, Surface::Ceiling] {
                    let b = session.hitboxes.platform_box(surface);
                    let min = b.min();
                    let size = b.half * 2.0;
                    ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                }
            }

            self.draw_spikes(session);

            if let Some(guy) = self.assets.sprite(PLAYER_SPRITE) {
                let size = guy.size * PLAYER_SCALE;
                let p = session.player.pos;
                ctx.set_fill_style_str(&guy.css_color());
                ctx.fill_rect(
                    (p.x - size.x / 2.0) as f64,
                    (p.y - size.y / 2.0) as f64,
                    size.x as f64,
                    size.y as f64,
                );
            }

            if self.controller.settings().debug_hitboxes {
                self.draw_hitboxes(session);
            }

            if let Some(hud) = self.controller.hud() {
                if hud.flash_alpha > 0.0 {
                    ctx.set_global_alpha(hud.flash_alpha as f64);
                    ctx.set_fill_style_str("#ffffff");
                    ctx.fill_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);
                    ctx.set_global_alpha(1.0);
                }
            }
        }

        /// Triangles: floor spikes point up, ceiling spikes point down
        fn draw_spikes(&self, session: &GameSession) {
            let Some(spike) = self.assets.sprite(SPIKE_SPRITE) else {
                return;
            };
            let ctx = &self.ctx;
            let half = spike.size * SPIKE_SCALE * 0.5;
            ctx.set_fill_style_str(&spike.css_color());
            for o in session.obstacles.obstacles() {
                let (x, y) = (o.pos.x as f64, o.pos.y as f64);
                let (hx, hy) = (half.x as f64, half.y as f64);
                let (tip, base) = match o.lane {
                    Lane::Floor => (y - hy, y + hy),
                    Lane::Ceiling => (y + hy, y - hy),
                };
                ctx.begin_path();
                ctx.move_to(x - hx, base);
                ctx.line_to(x, tip);
                ctx.line_to(x + hx, base);
                ctx.close_path();
                ctx.fill();
            }
        }

        fn draw_hitboxes(&self, session: &GameSession) {
            let ctx = &self.ctx;
            ctx.set_stroke_style_str("#ff00ff");
            let mut boxes = vec![session.player.hitbox(session.hitboxes.player)];
            boxes.extend(
                session
                    .obstacles
                    .obstacles()
                    .iter()
                    .map(|o| o.hitbox(session.hitboxes.spike)),
            );
            for b in boxes {
                let min = b.min();
                let size = b.half * 2.0;
                ctx.stroke_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(hud) = self.controller.hud() else {
                return;
            };

            set_text(&document, "hud-distance", &hud.distance_text());
            set_text(&document, "hud-speed", &hud.speed_text());
            set_text(&document, "hud-phase", &hud.phase_text());
            set_text(&document, "hud-multiplier", &hud.multiplier_text());
            set_text(&document, "hud-surface", &hud.surface_text());
            set_text(&document, "hud-debug", &hud.debug_text());
            set_text(&document, "hud-scoreboard", &hud.scoreboard_text());
            set_text(
                &document,
                "hud-top-scores",
                &hud.top_scores_text().unwrap_or_default(),
            );
            set_text(&document, "controls-hint", CONTROLS_HINT);
            set_visible(&document, "controls-hint", hud.controls_hint);

            show_optional(&document, "phase-banner", hud.banner_text());
            show_optional(&document, "game-over", hud.game_over_text());
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn show_optional(document: &Document, id: &str, text: Option<String>) {
        match text {
            Some(text) => {
                set_text(document, id, &text);
                set_visible(document, id, true);
            }
            None => set_visible(document, id, false),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Gravity Flip starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(SCREEN_WIDTH as u32);
        canvas.set_height(SCREEN_HEIGHT as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = Settings::load().unwrap_or_else(|e| {
            log::warn!("Could not load settings: {}", e);
            Settings::default()
        });
        let leaderboard = Leaderboard::load().unwrap_or_else(|e| {
            log::warn!("Could not load leaderboard: {}", e);
            Leaderboard::new()
        });
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let mut controller = SessionController::new(
            Tuning::default(),
            Box::new(LocalStorageStore::default()),
            Box::new(leaderboard),
            Box::new(audio),
        );
        controller.set_settings(settings);
        controller.use_assets(&ProceduralAssets);

        let seed = js_sys::Date::now() as u64;
        controller.start(seed);

        let game = Rc::new(RefCell::new(Game {
            controller,
            latch: InputLatch::new(),
            ctx,
            assets: ProceduralAssets,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, &canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Gravity Flip running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Space: one flip per press, auto-repeat ignored. Other keys toggle settings.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if key != " " {
                    if !event.repeat() {
                        game.borrow_mut().settings_hotkey(&key);
                    }
                    return;
                }
                event.prevent_default();
                if event.repeat() {
                    return;
                }
                // Only the restart tap leaves the game-over screen
                game.borrow_mut().latch.key_down();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " {
                    game.borrow_mut().latch.key_up();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer / tap: flip while running, restart from the game-over screen
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                let mut g = game.borrow_mut();
                if g.controller.state() == SessionState::GameOver {
                    g.latch.request_restart();
                } else {
                    g.latch.pointer_down();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Longest headless run before giving up (seconds of game time)
#[cfg(not(target_arch = "wasm32"))]
const MAX_RUN_SECS: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gravity_flip::consts::SIM_DT;
    use gravity_flip::persistence::{JsonFileStore, MemoryStore};
    use gravity_flip::platform::{HighScoreStore, NullAudio, ProceduralAssets};
    use gravity_flip::sim::GameEvent;
    use gravity_flip::{Leaderboard, SessionController, SessionState, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Gravity Flip (native, autopilot) starting...");

    // gravity-flip [--no-save] [TUNING.json] [SEED]
    let (flags, mut args): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|a| a.starts_with("--"));
    args.reverse();
    let tuning = match args.pop() {
        Some(path) => match Tuning::from_file(&path) {
            Ok(t) => {
                log::info!("Loaded tuning from {}", path);
                t
            }
            Err(e) => {
                log::error!("Bad tuning file {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = args
        .pop()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| gravity_flip::platform::now_ms() as u64);

    let store: Box<dyn HighScoreStore> = if flags.iter().any(|f| f == "--no-save") {
        Box::new(MemoryStore::default())
    } else {
        let file = JsonFileStore::from_env();
        log::info!("High score file: {}", file.path().display());
        Box::new(file)
    };

    let mut controller = SessionController::new(
        tuning,
        store,
        Box::new(Leaderboard::new()),
        Box::new(NullAudio),
    );
    controller.use_assets(&ProceduralAssets);
    controller.start(seed);

    for _ in 0..MAX_RUN_SECS * 60 {
        let input = controller
            .session()
            .map(autopilot)
            .unwrap_or_default();
        for event in controller.update(input, SIM_DT) {
            if let GameEvent::FatalCollision { cause } = event {
                log::info!("Hit: {:?}", cause);
            }
        }
        if controller.state() == SessionState::GameOver {
            break;
        }
    }

    if let Some(hud) = controller.hud() {
        println!("{}", hud.scoreboard_text());
        match hud.game_over {
            Some(distance) => println!("Distance: {} (phase {})", distance, hud.phase),
            None => println!("Survived {}s, distance {}", MAX_RUN_SECS, hud.distance),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
