//! Brick Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop. The web
//! build draws on a 2D canvas; the native build runs a headless autoplay
//! session and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use brick_breaker::Settings;
    use brick_breaker::audio::{AudioManager, SoundEffect};
    use brick_breaker::consts::*;
    use brick_breaker::sim::{
        BlockKind, GamePhase, GameState, LevelSet, PaddleKind, Snapshot, TickInput, tick,
    };
    use brick_breaker::tuning::Tuning;

    /// Background fills, indexed by the level's background reference
    const BACKGROUNDS: [&str; 4] = ["#000040", "#003000", "#300030", "#202020"];
    const WALL_COLOR: &str = "#a0a0b0";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        audio: AudioManager,
        ctx: CanvasRenderingContext2d,
        /// Canvas pixels per field unit
        scale: f64,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(state: GameState, ctx: CanvasRenderingContext2d) -> Self {
            let settings = Settings::load();
            let audio = AudioManager::new(&settings);
            Self {
                state,
                settings,
                audio,
                ctx,
                scale: 1.0,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Fit the field into the canvas's client box
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let client_w = canvas.client_width() as f64 * dpr;
            let client_h = canvas.client_height() as f64 * dpr;
            let fit = (client_w / FIELD_WIDTH as f64).min(client_h / FIELD_HEIGHT as f64);
            self.scale = if self.settings.integer_scaling {
                fit.floor().max(1.0)
            } else {
                fit.max(0.25)
            };
            canvas.set_width((FIELD_WIDTH as f64 * self.scale) as u32);
            canvas.set_height((FIELD_HEIGHT as f64 * self.scale) as u32);
        }

        /// Client coordinates to field x
        fn to_field_x(&self, canvas: &HtmlCanvasElement, client_x: f32) -> f32 {
            let rect = canvas.get_bounding_client_rect();
            let width = rect.width().max(1.0) as f32;
            (client_x - rect.left() as f32) / width * FIELD_WIDTH
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if let Err(e) = tick(&mut self.state, &self.input) {
                    log::error!("Could not load level: {}", e);
                    self.state.phase = GamePhase::Menu;
                }
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot input
                self.input.launch = false;
            }

            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        fn render(&self) -> Result<(), JsValue> {
            let snap = self.state.snapshot();
            let ctx = &self.ctx;
            ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0)?;

            let bg = BACKGROUNDS[snap.background as usize % BACKGROUNDS.len()];
            ctx.set_fill_style_str(bg);
            ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

            // Walls and ceiling
            let border = BORDER_WIDTH as f64;
            ctx.set_fill_style_str(WALL_COLOR);
            ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, border);
            ctx.fill_rect(0.0, 0.0, border, FIELD_HEIGHT as f64);
            ctx.fill_rect(FIELD_WIDTH as f64 - border, 0.0, border, FIELD_HEIGHT as f64);

            if snap.phase != GamePhase::Menu {
                self.draw_entities(&snap);
            }
            self.draw_hud(&snap)
        }

        fn draw_entities(&self, snap: &Snapshot) {
            let ctx = &self.ctx;
            for block in snap.blocks.iter().filter(|b| b.alive) {
                let color = if block.frame % 2 == 1 {
                    "#ffffff"
                } else if block.damaged {
                    "#808090"
                } else {
                    block_color(block.kind)
                };
                ctx.set_fill_style_str(color);
                ctx.fill_rect(
                    block.rect.left() as f64,
                    block.rect.top() as f64,
                    block.rect.size.x as f64 - 1.0,
                    block.rect.size.y as f64 - 1.0,
                );
            }

            let paddle = &snap.paddle;
            ctx.set_fill_style_str(match paddle.kind {
                PaddleKind::Spawn if paddle.frame % 2 == 1 => "#ffffff",
                PaddleKind::Spawn | PaddleKind::Normal => "#c0c0c0",
            });
            ctx.fill_rect(
                paddle.rect.left() as f64,
                paddle.rect.top() as f64,
                paddle.rect.size.x as f64,
                paddle.rect.size.y as f64,
            );

            let ball = &snap.ball;
            ctx.set_fill_style_str(if ball.frame % 2 == 1 { "#e0e0ff" } else { "#ffffff" });
            ctx.fill_rect(
                ball.rect.left() as f64,
                ball.rect.top() as f64,
                ball.rect.size.x as f64,
                ball.rect.size.y as f64,
            );
        }

        fn draw_hud(&self, snap: &Snapshot) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            ctx.set_font("8px monospace");
            ctx.set_fill_style_str("#ffffff");
            ctx.set_text_align("left");
            ctx.fill_text(&format!("1UP {:06}", snap.score), 10.0, 7.0)?;
            ctx.set_text_align("right");
            ctx.fill_text(&format!("HIGH {:06}", snap.best_score), 214.0, 7.0)?;

            ctx.set_text_align("center");
            let mid = FIELD_WIDTH as f64 / 2.0;
            match snap.phase {
                GamePhase::Menu => {
                    ctx.fill_text("BRICK BREAKER", mid, 110.0)?;
                    ctx.fill_text("CLICK OR PRESS SPACE", mid, 140.0)?;
                }
                GamePhase::LevelIntro => {
                    ctx.fill_text(&format!("ROUND {}", snap.level), mid, 150.0)?;
                    ctx.fill_text(&snap.level_name.to_uppercase(), mid, 162.0)?;
                }
                GamePhase::Playing | GamePhase::LevelCleared | GamePhase::BallLost => {}
            }
            Ok(())
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.set_muted(self.settings.muted);
            self.settings.save();
            log::info!("Muted: {}", self.settings.muted);
        }
    }

    fn block_color(kind: BlockKind) -> &'static str {
        match kind {
            BlockKind::White => "#f0f0f0",
            BlockKind::Orange => "#ff8000",
            BlockKind::Cyan => "#00e0f0",
            BlockKind::Green => "#00c000",
            BlockKind::Red => "#e00000",
            BlockKind::Blue => "#0060ff",
            BlockKind::Pink => "#ff60c0",
            BlockKind::Yellow => "#f0e000",
            BlockKind::Silver => "#b0b0c0",
            BlockKind::Gold => "#d0a000",
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Brick Breaker starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d =
            canvas.get_context("2d")?.ok_or("no 2d context")?.dyn_into()?;

        let levels = LevelSet::builtin().map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("{} levels loaded", levels.len());
        let state = GameState::new(Tuning::default(), levels);

        let game = Rc::new(RefCell::new(Game::new(state, ctx)));
        game.borrow_mut().resize(&canvas);

        setup_input_handlers(&canvas, game.clone())?;
        setup_focus_handlers(game.clone())?;

        request_animation_frame(game);

        log::info!("Brick Breaker running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Mouse move - absolute position
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.to_field_x(&canvas_clone, event.client_x() as f32);
                g.input.target_x = Some(x);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse click - launch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.launch = true;
                g.audio.resume();
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.to_field_x(&canvas_clone, touch.client_x() as f32);
                    g.input.target_x = Some(x);
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start (launch)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.launch = true;
                g.audio.resume();
                if let Some(touch) = event.touches().get(0) {
                    let x = g.to_field_x(&canvas_clone, touch.client_x() as f32);
                    g.input.target_x = Some(x);
                }
            });
            canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        g.input.launch = true;
                        g.audio.resume();
                    }
                    "m" | "M" => g.toggle_mute(),
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window resize
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize(&canvas_clone);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Silence audio while the window is in the background
    fn setup_focus_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
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
            if let Err(e) = g.render() {
                log::warn!("Render error: {:?}", e);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brick Breaker (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let tuning = match std::env::var("BRICK_BREAKER_TUNING") {
        Ok(path) => brick_breaker::Tuning::from_json(&std::fs::read_to_string(path)?)?,
        Err(_) => brick_breaker::Tuning::default(),
    };
    let levels = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading levels from {}", path);
            brick_breaker::sim::LevelSet::from_json(&std::fs::read_to_string(path)?, &tuning)?
        }
        None => brick_breaker::sim::LevelSet::builtin()?,
    };

    autoplay::run(tuning, levels, 60 * brick_breaker::consts::TICK_RATE as u64)?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session steered by a simple tracking autopilot
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use brick_breaker::sim::{GameEvent, GamePhase, GameState, LevelError, LevelSet, TickInput, tick};
    use brick_breaker::tuning::Tuning;

    pub fn run(tuning: Tuning, levels: LevelSet, max_ticks: u64) -> Result<(), LevelError> {
        let mut state = GameState::new(tuning, levels);
        let mut started = false;

        for _ in 0..max_ticks {
            let input = steer(&state);
            tick(&mut state, &input)?;
            for event in state.drain_events() {
                match event {
                    GameEvent::BlockHit { .. } | GameEvent::PaddleHit => {
                        log::debug!("t={} {:?}", state.time_ticks, event)
                    }
                    GameEvent::LevelStarted { .. } => started = true,
                    _ => log::info!("t={} {:?}", state.time_ticks, event),
                }
            }
            if started && state.phase == GamePhase::Menu {
                break;
            }
        }

        log::info!(
            "Session over after {} ticks: level {}, score {}, best {}",
            state.time_ticks,
            state.level_index + 1,
            state.scoreboard.score,
            state.scoreboard.best_score
        );
        Ok(())
    }

    /// Follow the ball with a slowly drifting offset so it does not settle
    /// into a vertical loop
    fn steer(state: &GameState) -> TickInput {
        let drift = ((state.time_ticks / 400) % 5) as f32 - 2.0;
        let target = state.ball.center().x + drift * 4.0;
        TickInput {
            target_x: Some(target),
            launch: state.phase == GamePhase::Menu || state.paddle.is_holding(&state.ball),
        }
    }
}
