//! Apple Knight entry point
//!
//! Handles platform-specific initialization and runs the game loop.

/// Level document bundled into the binary
const LEVELS_JSON: &str = include_str!("../assets/levels.json");

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use apple_knight::persistence::{KeyValueStore, LocalStorageStore, MemoryStore, StorageError};
    use apple_knight::platform::{FixedTimestep, Simulation};
    use apple_knight::renderer::CanvasRenderer;
    use apple_knight::{Game, Tuning, level::LevelSet};

    /// LocalStorage when the browser allows it, memory otherwise
    enum HostStore {
        Local(LocalStorageStore),
        Memory(MemoryStore),
    }

    impl KeyValueStore for HostStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match self {
                HostStore::Local(s) => s.get(key),
                HostStore::Memory(s) => s.get(key),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            match self {
                HostStore::Local(s) => s.set(key, value),
                HostStore::Memory(s) => s.set(key, value),
            }
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            match self {
                HostStore::Local(s) => s.remove(key),
                HostStore::Memory(s) => s.remove(key),
            }
        }
    }

    /// Everything the scheduler drives
    struct World {
        game: Game<HostStore>,
        renderer: CanvasRenderer,
        /// Level generation whose background was last requested
        background_generation: u64,
    }

    impl Simulation for World {
        fn step(&mut self) {
            self.game.step();
        }

        fn draw(&mut self) {
            let state = &self.game.state;
            if state.generation != self.background_generation {
                self.background_generation = state.generation;
                self.renderer
                    .load_background(state.level.background.as_deref(), state.generation);
            }

            for event in self.game.take_events() {
                log::debug!("{:?}", event);
            }
            self.renderer
                .render(&self.game.snapshot(), self.game.settings.show_minimap);
        }
    }

    /// Scheduler and world are separate fields so a frame can borrow both
    struct App {
        scheduler: FixedTimestep,
        world: World,
    }

    impl App {
        fn frame(&mut self, timestamp: f64) {
            let App { scheduler, world } = self;
            scheduler.frame(timestamp, world);
        }

        fn pause(&mut self, reason: &str) {
            if self.scheduler.is_paused() {
                return;
            }
            self.scheduler.pause();
            self.world.game.input.release_all();
            self.world.game.checkpoint();
            log::info!("Auto-paused ({})", reason);
        }

        fn resume(&mut self) {
            if self.scheduler.is_paused() {
                self.scheduler.resume();
                log::info!("Resumed");
            }
        }

        fn toggle_pause(&mut self) {
            if self.scheduler.is_paused() {
                self.resume();
            } else {
                self.pause("player");
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Apple Knight starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let tuning = Tuning::default();
        canvas.set_width(tuning.world.viewport_width as u32);
        canvas.set_height(tuning.world.level_height as u32);

        let store = match LocalStorageStore::open() {
            Some(store) => HostStore::Local(store),
            None => {
                log::warn!("LocalStorage unavailable, progress will not persist");
                HostStore::Memory(MemoryStore::new())
            }
        };
        let levels = LevelSet::load_or_default(Some(super::LEVELS_JSON), &tuning);
        let game = Game::new(levels, tuning, store);

        let renderer = match CanvasRenderer::new(&canvas) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Canvas setup failed: {:?}", e);
                return;
            }
        };

        let app = Rc::new(RefCell::new(App {
            scheduler: FixedTimestep::new(),
            world: World {
                game,
                renderer,
                background_generation: 0,
            },
        }));

        setup_keyboard(app.clone());
        setup_auto_pause(app.clone());
        request_animation_frame(app);

        log::info!("Apple Knight running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                let key = event.key();
                match key.as_str() {
                    "Escape" | "p" | "P" => app.toggle_pause(),
                    "Enter" if app.world.game.is_finished() => app.world.game.new_game(),
                    "m" | "M" => app.world.game.toggle_minimap(),
                    "PageUp" => {
                        app.world.game.previous_level();
                    }
                    _ => {
                        if app.world.game.input.key_down(&key) {
                            event.prevent_default();
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().world.game.input.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut app = app.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.pause("tab hidden");
                } else {
                    app.resume();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().pause("window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().resume();
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Frames to simulate in the headless run
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAMES: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use apple_knight::persistence::MemoryStore;
    use apple_knight::platform::{FixedTimestep, Simulation};
    use apple_knight::{Game, Tuning, level::LevelSet};

    /// Walks right and hops, with nothing to draw
    struct Headless {
        game: Game<MemoryStore>,
        frames: u32,
    }

    impl Simulation for Headless {
        fn step(&mut self) {
            self.game.input.key_down("d");
            if self.game.state.time_ticks % 45 == 0 {
                self.game.input.key_down("w");
            } else {
                self.game.input.key_up("w");
            }
            self.game.step();
        }

        fn draw(&mut self) {
            self.frames += 1;
            for event in self.game.take_events() {
                log::info!("{:?}", event);
            }
        }
    }

    env_logger::init();
    log::info!("Apple Knight (native) starting headless run...");

    // Optional tuning override file
    let tuning = match std::env::var("APPLE_KNIGHT_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };
    let levels = LevelSet::load_or_default(Some(LEVELS_JSON), &tuning);
    let mut sim = Headless {
        game: Game::new(levels, tuning, MemoryStore::new()),
        frames: 0,
    };

    let mut scheduler = FixedTimestep::new();
    let mut steps = 0;
    for frame in 0..HEADLESS_FRAMES {
        steps += scheduler.frame(frame as f64 * 1000.0 / 60.0, &mut sim);
        if sim.game.is_finished() {
            break;
        }
    }

    let snapshot = sim.game.snapshot();
    log::info!(
        "Ran {} steps over {} frames: level {}/{}, score {}, apples {}/{}, player at ({:.1}, {:.1})",
        steps,
        sim.frames,
        snapshot.level_index + 1,
        snapshot.level_count,
        snapshot.score,
        snapshot.collected,
        snapshot.required,
        snapshot.player.rect.pos.x,
        snapshot.player.rect.pos.y
    );
}
