//! Agua 2030 entry point
//!
//! Web: DOM shell around the scene flow (keyboard + touch in, HUD and
//! overlays out). Native: a headless demo session played by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, TouchEvent};

    use agua_2030::consts::*;
    use agua_2030::flow::{App, Scene, SceneTrigger, TARGETS, WinPage};
    use agua_2030::hud::TouchControls;
    use agua_2030::settings::Settings;
    use agua_2030::sim::TickInput;
    use agua_2030::tuning::Variant;

    /// Ticks per on/off phase of the invincibility blink
    const FLASH_TICKS: u32 = 9;

    /// Browser-side game instance
    struct Game {
        app: App,
        /// Keyboard state, held between frames
        keys: TickInput,
        last_time: f64,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                app: App::new(settings, seed),
                keys: TickInput::default(),
                last_time: 0.0,
            }
        }

        fn update(&mut self, dt: f32) {
            self.app.update(dt, &self.keys);
        }

        /// Confirm key / tap: whatever moves the current scene forward
        fn confirm(&mut self) {
            if let Some(trigger) = self.app.scene().primary_action() {
                self.app.trigger(trigger);
            }
        }

        fn choose_variant(&mut self, variant: Variant) {
            self.app.settings.variant = variant;
            self.app.settings.save();
            self.app.trigger(SceneTrigger::Start);
        }

        /// Drop every held input (tab hidden, window blur)
        fn release_inputs(&mut self) {
            let idle_mode = self.keys.idle_mode;
            self.keys = TickInput {
                idle_mode,
                ..Default::default()
            };
            if let Some(hud) = self.app.hud_mut() {
                hud.touch.release_all();
            }
        }

        /// Mirror HUD and scene overlays into the DOM
        fn update_overlays(&self) {
            let Some(document) = document() else {
                return;
            };
            let scene = self.app.scene();

            show(&document, "menu", scene == Scene::Menu);
            show(&document, "hud", scene == Scene::Playing);
            if let Some(pad) = document.get_element_by_id("touch-controls") {
                let class = if scene != Scene::Playing || !self.app.settings.touch_controls {
                    "hidden"
                } else if self.app.hud().is_some_and(|hud| hud.touch.any_pressed()) {
                    "pressed"
                } else {
                    ""
                };
                let _ = pad.set_attribute("class", class);
            }

            if let Some(hud) = self.app.hud() {
                set_text(&document, "hud-score", &hud.score.to_string());
                set_text(&document, "hud-health", &hud.health_text());
                set_text(&document, "hud-progress-label", &hud.progress_label());
                if let Some(fill) = document.get_element_by_id("hud-progress-fill") {
                    let style = format!("width: {:.0}px", hud.bar_fill_width());
                    let _ = fill.set_attribute("style", &style);
                }
            }

            // Blink the health row while invincible
            if let Some(el) = document.get_element_by_id("hud-health") {
                let ticks_left = self
                    .app
                    .session()
                    .filter(|s| s.is_running())
                    .map_or(0, |s| s.player.invincible_ticks_left());
                let flashing = !self.app.settings.reduced_motion
                    && ticks_left > 0
                    && (ticks_left / FLASH_TICKS) % 2 == 0;
                let class = if flashing { "hud-item flash" } else { "hud-item" };
                let _ = el.set_attribute("class", class);
            }

            match scene {
                Scene::GameOver { summary } => {
                    show(&document, "game-over", true);
                    show(&document, "win", false);
                    set_text(&document, "final-score", &summary.score.to_string());
                    set_text(&document, "final-items", &summary.items_collected.to_string());
                    let percent = format!("{}%", summary.progress_percent);
                    set_text(&document, "final-progress", &percent);
                }
                Scene::Won { summary, page } => {
                    show(&document, "game-over", false);
                    show(&document, "win", true);
                    show(&document, "win-summary", page == WinPage::Summary);
                    show(&document, "win-target", page != WinPage::Summary);
                    set_text(&document, "win-score", &summary.score.to_string());
                    set_text(&document, "win-items", &summary.items_collected.to_string());
                    set_text(&document, "win-progress", &format!("{}%", summary.progress_percent));
                    if let WinPage::Target(i) = page {
                        if let Some(target) = page.target() {
                            set_text(&document, "target-id", target.id);
                            set_text(&document, "target-title", target.title);
                        }
                        set_text(&document, "target-page", &format!("{}/{}", i + 1, TARGETS.len()));
                        show(&document, "prev-btn", i > 0);
                        show(&document, "play-again-btn", i + 1 == TARGETS.len());
                    }
                }
                Scene::Menu | Scene::Playing => {
                    show(&document, "game-over", false);
                    show(&document, "win", false);
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Agua 2030 starting...");

        let Some(document) = document() else {
            log::error!("No document, nothing to attach to");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        log::info!("Variant {}, base seed {}", settings.variant.as_str(), seed);
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_touch_controls(&document, game.clone());
        setup_auto_release(&document, game.clone());

        game.borrow().update_overlays();
        request_animation_frame(game);

        log::info!("Agua 2030 running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = true,
                    "ArrowRight" | "d" | "D" => g.keys.right = true,
                    "ArrowUp" | "w" | "W" | " " => g.keys.jump = true,
                    "x" | "X" | "f" | "F" => g.keys.shoot = true,
                    "Enter" => g.confirm(),
                    "Escape" => {
                        g.app.trigger(SceneTrigger::Quit);
                    }
                    "i" | "I" => {
                        g.keys.idle_mode = !g.keys.idle_mode;
                        log::info!("Idle mode: {}", g.keys.idle_mode);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = false,
                    "ArrowRight" | "d" | "D" => g.keys.right = false,
                    "ArrowUp" | "w" | "W" | " " => g.keys.jump = false,
                    "x" | "X" | "f" | "F" => g.keys.shoot = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(
        document: &Document,
        id: &str,
        game: &Rc<RefCell<Game>>,
        action: impl Fn(&mut Game) + 'static,
    ) {
        let Some(el) = document.get_element_by_id(id) else {
            log::debug!("No #{} element", id);
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut game.borrow_mut());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "start-btn", &game, Game::confirm);
        for variant in Variant::ALL {
            let id = format!("variant-{}", variant.as_str().to_lowercase());
            on_click(document, &id, &game, move |g| g.choose_variant(variant));
        }
        on_click(document, "restart-btn", &game, |g| {
            g.app.trigger(SceneTrigger::Restart);
        });
        on_click(document, "next-btn", &game, |g| {
            g.app.trigger(SceneTrigger::NextPage);
        });
        on_click(document, "prev-btn", &game, |g| {
            g.app.trigger(SceneTrigger::PreviousPage);
        });
        on_click(document, "play-again-btn", &game, |g| {
            g.app.trigger(SceneTrigger::PlayAgain);
        });
        on_click(document, "quit-btn", &game, |g| {
            g.app.trigger(SceneTrigger::Quit);
        });
    }

    /// Hold-to-press on-screen buttons, stored on the HUD
    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons: [(&str, fn(&mut TouchControls, bool)); 4] = [
            ("touch-left", |t: &mut TouchControls, down: bool| t.left = down),
            ("touch-right", |t: &mut TouchControls, down: bool| t.right = down),
            ("touch-jump", |t: &mut TouchControls, down: bool| t.jump = down),
            ("touch-shoot", |t: &mut TouchControls, down: bool| t.shoot = down),
        ];

        for (id, set) in buttons {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            let phases = [("touchstart", true), ("touchend", false), ("touchcancel", false)];
            for (event_name, down) in phases {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    if let Some(hud) = game.borrow_mut().app.hud_mut() {
                        set(&mut hud.touch, down);
                    }
                });
                let _ = el
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Release held keys and buttons when the page loses focus
    fn setup_auto_release(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().release_inputs();
                    log::info!("Inputs released (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().release_inputs();
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.update_overlays();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use agua_2030::{Settings, Variant};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Agua 2030 (native) starting...");

    let mut args = std::env::args().skip(1);
    let variant = match args.next() {
        None => Variant::default(),
        Some(name) => match Variant::from_str(&name) {
            Some(variant) => variant,
            None => {
                log::error!("Unknown variant '{}' (expected catcher, platformer or runner)", name);
                std::process::exit(2);
            }
        },
    };
    let seed = match args.next() {
        None => None,
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::error!("Invalid seed '{}': {}", raw, e);
                std::process::exit(2);
            }
        },
    };

    let settings = Settings {
        seed,
        ..Settings::load().with_variant(variant)
    };
    headless::run(settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use agua_2030::consts::TICKS_PER_SECOND;
    use agua_2030::sim::{GameEvent, TickInput};
    use agua_2030::{App, Scene, SceneTrigger, Settings};

    /// Give up on a demo that hasn't finished after ten minutes of game time
    const MAX_TICKS: u64 = TICKS_PER_SECOND as u64 * 600;

    /// Play one session with the autopilot and print the result
    pub fn run(settings: Settings) {
        let base_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let mut app = App::new(settings, base_seed);
        app.trigger(SceneTrigger::Start);

        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut ticks = 0;
        while app.scene() == Scene::Playing && ticks < MAX_TICKS {
            for event in app.step(&demo) {
                match event {
                    GameEvent::Collected { key, score, .. } => log::debug!("+{} {}", score, key),
                    GameEvent::PlayerHit { health, .. } => log::info!("Hit! health={}", health),
                    GameEvent::HazardKilled { bonus, source, .. } => {
                        log::info!("Contaminant cleared by {:?} (+{})", source, bonus)
                    }
                    GameEvent::Ended { outcome, cause } => {
                        let secs = ticks as f32 / TICKS_PER_SECOND as f32;
                        log::info!("{:?} after {:.1}s ({:?})", outcome, secs, cause);
                    }
                    _ => {}
                }
            }
            ticks += 1;
        }

        match app.scene() {
            Scene::Won { summary, .. } => println!(
                "Won: score {}, {} items, {}% of the way to 2030",
                summary.score, summary.items_collected, summary.progress_percent
            ),
            Scene::GameOver { summary } => println!(
                "Game over: score {}, {} items, {}% of the way to 2030",
                summary.score, summary.items_collected, summary.progress_percent
            ),
            _ => {
                log::warn!("No result after {} ticks, stopping", ticks);
                app.trigger(SceneTrigger::Quit);
            }
        }
    }
}
