//! Mini Golf entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent, Window};

    use mini_golf::audio::AudioManager;
    use mini_golf::consts::*;
    use mini_golf::renderer::SceneRenderer;
    use mini_golf::sim::{GameEvent, GamePhase, GameState, TickInput, pointer_to_aim, tick};
    use mini_golf::{Difficulty, ScoreCard, Settings, StartupError};

    /// Master volume change per `-`/`=` press
    const VOLUME_STEP: f32 = 0.1;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<SceneRenderer>,
        input: TickInput,
        last_time: f64,
        canvas: HtmlCanvasElement,
        settings: Settings,
        scorecard: ScoreCard,
        audio: AudioManager,
        /// Space is held; ignore key repeat
        space_down: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(difficulty: Difficulty, canvas: HtmlCanvasElement, settings: Settings) -> Self {
            let audio = AudioManager::new(settings.effective_volume());
            Self {
                state: GameState::new(difficulty),
                renderer: None,
                input: TickInput::default(),
                last_time: 0.0,
                canvas,
                settings,
                scorecard: ScoreCard::load(),
                audio,
                space_down: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Apply a settings change, push it to the audio, and persist it
        fn change_settings(&mut self, change: impl FnOnce(&mut Settings)) {
            change(&mut self.settings);
            self.audio.set_volume(self.settings.effective_volume());
            self.settings.save();
            log::info!(
                "Volume {:.0}%{}, FPS {}",
                self.settings.master_volume * 100.0,
                if self.settings.muted { " (muted)" } else { "" },
                if self.settings.show_fps { "on" } else { "off" }
            );
        }

        /// Pointer position to an aim vector on the course
        fn pointer_aim(&self, event: &PointerEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            pointer_to_aim(
                Vec2::new(event.client_x() as f32, event.client_y() as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
                Vec2::new(rect.width() as f32, rect.height() as f32),
            )
        }

        /// Advance one animation frame
        fn update(&mut self, dt: f32, time: f64) {
            tick(&mut self.state, &self.input, dt);

            // Clear one-shot inputs after processing
            self.input = TickInput::default();

            self.audio.play_events(&self.state.events);
            for event in &self.state.events {
                if let GameEvent::Holed { strokes } = *event {
                    let difficulty = self.state.difficulty;
                    if let Some(rank) =
                        self.scorecard
                            .add_round(strokes, difficulty, js_sys::Date::now())
                    {
                        log::info!("Round of {} is #{} on the scorecard", strokes, rank);
                        self.scorecard.save();
                    }
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut renderer) = self.renderer {
                match renderer.render(&self.state, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        renderer.resize(renderer.size.0, renderer.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Match the canvas backing store to its CSS size
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = canvas_pixel_size(&window, &self.canvas);
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(ref mut renderer) = self.renderer {
                renderer.resize(width, height);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };

            set_text("hud-strokes", &self.state.strokes.to_string());
            set_text(
                "hud-power",
                &format!("{}%", (self.state.shot.power() * 100.0).round() as u32),
            );
            set_text("hud-difficulty", self.state.difficulty.as_str());
            let best = self
                .scorecard
                .best_for(self.state.difficulty)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            set_text("hud-best", &best);

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("hole-message") {
                if self.state.phase == GamePhase::Holed {
                    let strokes = self.state.strokes;
                    let plural = if strokes == 1 { "stroke" } else { "strokes" };
                    el.set_text_content(Some(&format!(
                        "In the hole! {} {} - press R to play again",
                        strokes, plural
                    )));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    /// CSS size of the canvas in device pixels
    fn canvas_pixel_size(window: &Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let mut client_w = canvas.client_width() as f64;
        let mut client_h = canvas.client_height() as f64;
        // Not laid out yet: fall back to the viewport
        if client_w <= 0.0 || client_h <= 0.0 {
            client_w = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(800.0);
            client_h = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(600.0);
        }
        (
            ((client_w * dpr) as u32).max(1),
            ((client_h * dpr) as u32).max(1),
        )
    }

    /// `?difficulty=` from the page URL
    fn requested_difficulty(window: &Window) -> Option<String> {
        let search = window.location().search().ok()?;
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        params.get("difficulty")
    }

    /// Create the game canvas inside `#gameContainer` (or the body)
    fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, StartupError> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|_| StartupError::MissingElement("canvas"))?
            .dyn_into()
            .map_err(|_| StartupError::NotACanvas("canvas"))?;
        canvas.set_id("canvas");
        let style = canvas.style();
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("height", "100%");
        let _ = style.set_property("display", "block");
        let _ = style.set_property("touch-action", "none");

        let parent: web_sys::Element = match document.get_element_by_id("gameContainer") {
            Some(container) => container,
            None => {
                log::debug!("No #gameContainer, attaching canvas to body");
                document
                    .body()
                    .ok_or(StartupError::MissingElement("body"))?
                    .into()
            }
        };
        parent
            .append_child(&canvas)
            .map_err(|_| StartupError::MissingElement("gameContainer"))?;
        Ok(canvas)
    }

    pub async fn run() -> Result<(), StartupError> {
        log::info!("Mini Golf starting...");

        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoDocument)?;

        let mut settings = Settings::load();
        let requested = requested_difficulty(&window);
        let difficulty = settings.resolve_difficulty(requested.as_deref());
        log::info!("Difficulty: {}", difficulty.as_str());
        // A course picked from the URL becomes the default for next time
        if requested.is_some() && settings.remember_difficulty(difficulty) {
            settings.save();
        }

        let canvas = create_canvas(&document)?;
        let (width, height) = canvas_pixel_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new(
            difficulty,
            canvas.clone(),
            settings,
        )));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| StartupError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut renderer = SceneRenderer::new(surface, &adapter, width, height).await?;
        renderer.set_start_time(window.performance().map(|p| p.now()).unwrap_or(0.0));
        game.borrow_mut().renderer = Some(renderer);

        setup_pointer_handlers(&canvas, game.clone());
        setup_key_handlers(&window, game.clone());
        setup_resize_handler(&window, game.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Mini Golf running!");
        Ok(())
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Press: aim at the pointer and start charging
        {
            let game = game.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let aim = g.pointer_aim(&event);
                g.input.aim = Some(aim);
                g.input.charge = true;
                // Keep receiving the release if the pointer leaves the canvas
                let _ = target.set_pointer_capture(event.pointer_id());
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let aim = g.pointer_aim(&event);
                g.input.aim = Some(aim);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.release = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_key_handlers(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.rotate_aim -= AIM_KEY_STEP,
                    "ArrowRight" => g.input.rotate_aim += AIM_KEY_STEP,
                    "Space" => {
                        event.prevent_default();
                        if !g.space_down {
                            g.space_down = true;
                            g.audio.resume();
                            g.input.charge = true;
                        }
                    }
                    "KeyR" => g.input.restart = true,
                    "KeyM" => g.change_settings(Settings::toggle_mute),
                    "KeyF" => g.change_settings(Settings::toggle_fps),
                    "Minus" => g.change_settings(|s| s.adjust_volume(-VOLUME_STEP)),
                    "Equal" => g.change_settings(|s| s.adjust_volume(VOLUME_STEP)),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.space_down = false;
                    g.input.release = true;
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(window: &Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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

            g.update(dt, time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    wasm_game::run().await.map_err(|e| {
        log::error!("Startup failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let arg = std::env::args().nth(1);
    let difficulty = mini_golf::Difficulty::from_option(arg.as_deref());
    log::info!("Mini Golf (native, headless) on {}", difficulty.as_str());
    log::info!("The playable game runs in the browser - build with `trunk serve`");

    let result = headless::play_round(difficulty, headless::MAX_SHOTS);
    match result.strokes_to_hole {
        Some(strokes) => println!(
            "{}: holed in {} stroke(s) after {:.1}s of play",
            difficulty.as_str(),
            strokes,
            result.seconds
        ),
        None => println!(
            "{}: not holed after {} strokes, {:.2} m short",
            difficulty.as_str(),
            result.strokes,
            result.distance_left
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted round with no window: settle, aim at the hole, putt, repeat
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use mini_golf::Difficulty;
    use mini_golf::consts::*;
    use mini_golf::sim::{GamePhase, GameState, TickInput, tick};

    pub const MAX_SHOTS: u32 = 12;
    /// Give up waiting for the ball after this many frames
    const MAX_ROLL_FRAMES: u32 = 60 * 30;

    pub struct RoundResult {
        pub strokes_to_hole: Option<u32>,
        pub strokes: u32,
        pub distance_left: f32,
        pub seconds: f32,
    }

    /// Tick until the ball rests or drops; false if it never does
    fn wait_for_rest(state: &mut GameState) -> bool {
        for _ in 0..MAX_ROLL_FRAMES {
            tick(state, &TickInput::default(), SIM_DT);
            if state.phase != GamePhase::Rolling {
                return true;
            }
        }
        false
    }

    pub fn play_round(difficulty: Difficulty, max_shots: u32) -> RoundResult {
        let mut state = GameState::new(difficulty);
        let mut frames = 0u64;

        for _ in 0..max_shots {
            if !wait_for_rest(&mut state) {
                log::warn!("Ball never came to rest");
                break;
            }
            if state.phase == GamePhase::Holed {
                break;
            }

            let ball = state.world.body(state.ball).position;
            let to_hole = state.course.hole - ball;
            let aim = Vec2::new(to_hole.x, to_hole.z);
            // Rolling speed that stops at the hole, plus the share lost to
            // sliding before the ball rolls (5/7); slope is ignored
            let decel = ROLLING_RESISTANCE * GRAVITY;
            let launch_speed = 1.4 * (2.0 * decel * aim.length()).sqrt();
            let power = (BALL_MASS * launch_speed / state.tuning.max_impulse).clamp(0.02, 1.0);
            let charge_frames = (power / (CHARGE_RATE * SIM_DT)).round().max(1.0) as u32;

            let press = TickInput {
                aim: Some(aim),
                charge: true,
                ..Default::default()
            };
            tick(&mut state, &press, SIM_DT);
            for _ in 1..charge_frames {
                tick(&mut state, &TickInput::default(), SIM_DT);
            }
            let release = TickInput {
                release: true,
                ..Default::default()
            };
            tick(&mut state, &release, SIM_DT);
            log::info!(
                "Stroke {}: {:.1} m to the hole, power {:.0}%",
                state.strokes,
                aim.length(),
                power * 100.0
            );
            frames = state.time_ticks;
        }

        if state.phase == GamePhase::Rolling {
            wait_for_rest(&mut state);
        }
        frames = frames.max(state.time_ticks);

        RoundResult {
            strokes_to_hole: (state.phase == GamePhase::Holed).then_some(state.strokes),
            strokes: state.strokes,
            distance_left: state.distance_to_hole(),
            seconds: frames as f32 * SIM_DT,
        }
    }
}
