//! Hidden Picture entry point
//!
//! Web: builds the DOM surfaces, wires input and boots the first theme.
//! Native: a headless harness that plays a level file from the terminal.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlImageElement, PointerEvent};

    use hidden_picture::catalog::ThemeCatalog;
    use hidden_picture::consts::{FOUND_FEEDBACK, TIMER_TICK_MS};
    use hidden_picture::hud::{Hud, Scene, format_timer};
    use hidden_picture::level::{Item, Level, LevelKey};
    use hidden_picture::platform::web::{
        FetchLevelSource, IntervalScheduler, WebClock, init_overlay_logger,
    };
    use hidden_picture::settings::Settings;
    use hidden_picture::sim::{Frontend, Game, SurfaceMetrics, boot, start_level};

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn percent(v: f32) -> String {
        format!("{}%", v * 100.0)
    }

    /// The `#game-view` container, its background image and the overlay box
    /// aligned with the rendered image
    struct Stage {
        view: Element,
        background: HtmlImageElement,
        image_box: HtmlElement,
    }

    impl Stage {
        fn new(document: &Document) -> Result<Self, JsValue> {
            let view = document
                .get_element_by_id("game-view")
                .ok_or_else(|| JsValue::from_str("missing #game-view"))?;

            let background: HtmlImageElement = document.create_element("img")?.dyn_into()?;
            background.set_class_name("game-background");
            background.set_draggable(false);

            let image_box: HtmlElement = document.create_element("div")?.dyn_into()?;
            image_box.set_class_name("image-box");

            view.append_child(&background)?;
            view.append_child(&image_box)?;
            Ok(Self {
                view,
                background,
                image_box,
            })
        }

        /// Rendered box of the background inside `#game-view`
        fn metrics(&self) -> SurfaceMetrics {
            let rect = self.view.get_bounding_client_rect();
            let container = Vec2::new(rect.width() as f32, rect.height() as f32);
            let intrinsic = Vec2::new(
                self.background.natural_width() as f32,
                self.background.natural_height() as f32,
            );
            SurfaceMetrics::contain(container, intrinsic)
        }

        /// Keep the overlay box on top of the letterboxed image
        fn fit(&self) {
            let metrics = self.metrics();
            let origin = metrics.to_container(Vec2::ZERO);
            let style = self.image_box.style();
            let _ = style.set_property("left", &format!("{}px", origin.x));
            let _ = style.set_property("top", &format!("{}px", origin.y));
            let _ = style.set_property("width", &format!("{}px", metrics.size.x));
            let _ = style.set_property("height", &format!("{}px", metrics.size.y));
        }

        /// Container-relative pointer position
        fn pointer(&self, event: &PointerEvent) -> Vec2 {
            let rect = self.view.get_bounding_client_rect();
            Vec2::new(
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            )
        }

        /// Absolutely positioned child of the image box, in level coordinates
        fn place(&self, tag: &str, class: &str, center: Vec2) -> Option<HtmlElement> {
            let el: HtmlElement = document()?.create_element(tag).ok()?.dyn_into().ok()?;
            el.set_class_name(class);
            let style = el.style();
            let _ = style.set_property("left", &percent(center.x));
            let _ = style.set_property("top", &percent(center.y));
            self.image_box.append_child(&el).ok()?;
            Some(el)
        }
    }

    struct DomScene {
        stage: Rc<Stage>,
        feedback_ms: u32,
    }

    impl Scene for DomScene {
        fn render_level(&mut self, level: &Level) {
            self.stage.image_box.set_inner_html("");
            self.stage.background.set_src(&level.background);

            for item in &level.items {
                let Some(src) = item.image.as_deref() else {
                    continue;
                };
                if let Some(sprite) = self.stage.place("img", "item-sprite", item.center()) {
                    let _ = sprite.set_attribute("src", src);
                    let _ = sprite.set_attribute("alt", &item.name);
                    let style = sprite.style();
                    let _ = style.set_property("width", &percent(item.width));
                    let _ = style.set_property("height", &percent(item.height));
                }
            }
            self.stage.fit();
        }

        fn show_found(&mut self, item: &Item) {
            let Some(label) = self.stage.place("div", "feedback", item.center()) else {
                return;
            };
            label.set_text_content(Some(FOUND_FEEDBACK));

            let remove = Closure::once_into_js(move || label.remove());
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    remove.unchecked_ref(),
                    self.feedback_ms as i32,
                );
            }
        }

        fn show_level_complete(&mut self, score: u32) {
            let announce = Closure::once_into_js(move || {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&format!("Level Complete! Score: {}", score));
                }
            });
            // Let the final "FOUND!" paint before the modal blocks
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    announce.unchecked_ref(),
                    100,
                );
            }
        }
    }

    struct DomHud {
        score: Element,
        timer: Element,
        items: Element,
        message: Element,
    }

    impl DomHud {
        fn new(document: &Document) -> Result<Self, JsValue> {
            let layer = document
                .get_element_by_id("ui-layer")
                .ok_or_else(|| JsValue::from_str("missing #ui-layer"))?;
            layer.set_inner_html(
                r#"
      <div class="hud-top">
        <div class="score-board">Score: <span id="score-val">0</span></div>
        <div class="timer">Time: <span id="timer-val">00:00</span></div>
      </div>
      <div id="hud-message" class="hud-message hidden"></div>
      <div class="hud-bottom">
        <div id="item-list" class="item-list"></div>
      </div>
    "#,
            );

            let get = |id: &str| {
                document
                    .get_element_by_id(id)
                    .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))
            };
            Ok(Self {
                score: get("score-val")?,
                timer: get("timer-val")?,
                items: get("item-list")?,
                message: get("hud-message")?,
            })
        }

        fn item_element_id(item_id: &str) -> String {
            format!("hud-item-{}", item_id)
        }
    }

    impl Hud for DomHud {
        fn init_items(&mut self, items: &[Item]) {
            self.items.set_inner_html("");
            let _ = self.message.set_attribute("class", "hud-message hidden");
            let Some(document) = document() else {
                return;
            };

            for item in items {
                let Ok(row) = document.create_element("div") else {
                    continue;
                };
                row.set_class_name("hud-item");
                row.set_id(&Self::item_element_id(&item.id));

                for (class, text) in [
                    ("item-icon", item.preview.as_deref().unwrap_or("")),
                    ("item-name", item.name.as_str()),
                ] {
                    if let Ok(span) = document.create_element("span") {
                        span.set_class_name(class);
                        span.set_text_content(Some(text));
                        let _ = row.append_child(&span);
                    }
                }
                let _ = self.items.append_child(&row);
            }
        }

        fn update_score(&mut self, score: u32) {
            self.score.set_text_content(Some(&score.to_string()));
        }

        fn update_timer(&mut self, elapsed_secs: u64) {
            self.timer.set_text_content(Some(&format_timer(elapsed_secs)));
        }

        fn mark_item_found(&mut self, item_id: &str) {
            let el = document().and_then(|d| d.get_element_by_id(&Self::item_element_id(item_id)));
            if let Some(el) = el {
                let _ = el.class_list().add_1("found");
            }
        }

        fn show_message(&mut self, message: &str) {
            self.message.set_text_content(Some(message));
            let _ = self.message.set_attribute("class", "hud-message");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        let logger = if settings.debug_overlay {
            init_overlay_logger(log::Level::Info).map_err(|e| e.to_string())
        } else {
            console_log::init_with_level(log::Level::Info).map_err(|e| e.to_string())
        };
        if let Err(e) = logger {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Hidden Picture starting...");

        if let Err(e) = setup(settings) {
            log::error!("Startup failed: {:?}", e);
        }
    }

    fn setup(settings: Settings) -> Result<(), JsValue> {
        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let stage = Rc::new(Stage::new(&document)?);
        let hud = DomHud::new(&document)?;

        let game: Rc<RefCell<Game>> = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            let weak = weak.clone();
            let scheduler = IntervalScheduler::new(move || {
                if let Some(game) = weak.upgrade() {
                    if let Ok(mut g) = game.try_borrow_mut() {
                        g.tick();
                    }
                }
            });
            let frontend = Frontend {
                hud: Box::new(hud),
                scene: Box::new(DomScene {
                    stage: stage.clone(),
                    feedback_ms: settings.feedback_ms,
                }),
                clock: Box::new(WebClock),
                scheduler: Box::new(scheduler),
            };
            RefCell::new(Game::new(frontend, settings.clone()))
        });
        log::info!("HUD timer every {}ms", TIMER_TICK_MS);

        setup_input_handlers(&stage, game.clone());
        setup_layout_handlers(&stage);

        let mut catalog = ThemeCatalog::new();
        catalog.load_themes();
        setup_theme_bar(&document, &catalog, game.clone());
        setup_stop_button(&document, game.clone());

        let source = Rc::new(FetchLevelSource::new(settings.data_url.clone()));
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = boot(&game, &mut catalog, &*source).await {
                log::error!("{}", e);
            }
        });

        log::info!("Hidden Picture running!");
        Ok(())
    }

    fn setup_input_handlers(stage: &Rc<Stage>, game: Rc<RefCell<Game>>) {
        let stage_clone = stage.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            event.prevent_default();
            let point = stage_clone.pointer(&event);
            let metrics = stage_clone.metrics();
            if let Ok(mut g) = game.try_borrow_mut() {
                let outcome = g.handle_pointer(point, &metrics);
                log::debug!("Pointer at {} -> {:?}", point, outcome);
            }
        });
        let _ = stage
            .view
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_layout_handlers(stage: &Rc<Stage>) {
        // Refit once the image's intrinsic size is known
        {
            let stage_clone = stage.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                stage_clone.fit();
            });
            let _ = stage
                .background
                .add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // And whenever the window changes size
        if let Some(window) = web_sys::window() {
            let stage_clone = stage.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                stage_clone.fit();
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_theme_bar(document: &Document, catalog: &ThemeCatalog, game: Rc<RefCell<Game>>) {
        let Some(bar) = document.get_element_by_id("theme-bar") else {
            return;
        };
        let data_url = game.borrow().settings().data_url.clone();
        let start_level_id = game.borrow().settings().start_level;
        let source = Rc::new(FetchLevelSource::new(data_url));

        for theme in catalog.themes() {
            let Ok(button) = document.create_element("button") else {
                continue;
            };
            button.set_text_content(Some(&theme.name));

            let game = game.clone();
            let source = source.clone();
            let theme_id = theme.id.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let game = game.clone();
                let source = source.clone();
                let key = LevelKey::new(theme_id.clone(), start_level_id);
                wasm_bindgen_futures::spawn_local(async move {
                    // Failures are already reported on the HUD
                    let _ = start_level(&game, &*source, key).await;
                });
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
            let _ = bar.append_child(&button);
        }
    }

    fn setup_stop_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("stop-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Ok(mut g) = game.try_borrow_mut() {
                    g.stop();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::RefCell;
    use std::io::BufRead;

    use glam::Vec2;

    use hidden_picture::catalog::ThemeCatalog;
    use hidden_picture::hud::{Hud, Scene, format_timer};
    use hidden_picture::level::{DirLevelSource, Item, Level, LevelKey};
    use hidden_picture::platform::{ManualScheduler, SystemClock};
    use hidden_picture::settings::Settings;
    use hidden_picture::sim::{Frontend, Game, PointerOutcome, SurfaceMetrics, boot, start_level};

    /// Prints HUD and scene notifications to the terminal
    struct ConsoleUi;

    impl Hud for ConsoleUi {
        fn init_items(&mut self, items: &[Item]) {
            println!("Find {} items:", items.len());
            for item in items {
                println!("  {} {}", item.preview.as_deref().unwrap_or("-"), item.name);
            }
        }

        fn update_score(&mut self, score: u32) {
            println!("Score: {}", score);
        }

        fn update_timer(&mut self, elapsed_secs: u64) {
            println!("Time: {}", format_timer(elapsed_secs));
        }

        fn mark_item_found(&mut self, item_id: &str) {
            println!("[x] {}", item_id);
        }

        fn show_message(&mut self, message: &str) {
            eprintln!("{}", message);
        }
    }

    impl Scene for ConsoleUi {
        fn render_level(&mut self, level: &Level) {
            println!("Background: {}", level.background);
        }

        fn show_found(&mut self, item: &Item) {
            println!("FOUND! {} at ({:.2}, {:.2})", item.name, item.x, item.y);
        }

        fn show_level_complete(&mut self, score: u32) {
            println!("Level Complete! Score: {}", score);
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Hidden Picture (native) starting...");

        // usage: hidden-picture [data-dir] [theme] [level]
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut settings = Settings::load();
        if let Some(dir) = args.first() {
            settings.data_url = dir.clone();
        } else {
            settings.data_url = "data".to_string();
        }

        let source = DirLevelSource::new(&settings.data_url);
        let frontend = Frontend {
            hud: Box::new(ConsoleUi),
            scene: Box::new(ConsoleUi),
            clock: Box::new(SystemClock),
            scheduler: Box::new(ManualScheduler),
        };
        let game = RefCell::new(Game::new(frontend, settings.clone()));

        let started = match args.get(1) {
            Some(theme_id) => {
                let level = args
                    .get(2)
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(settings.start_level);
                let mut catalog = ThemeCatalog::new();
                catalog.load_themes();
                match catalog.find(theme_id) {
                    Ok(theme) => futures::executor::block_on(start_level(
                        &game,
                        &source,
                        LevelKey::new(theme.id.clone(), level),
                    ))
                    .map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                }
            }
            None => {
                let mut catalog = ThemeCatalog::new();
                futures::executor::block_on(boot(&game, &mut catalog, &source))
                    .map_err(|e| e.to_string())
            }
        };
        if let Err(e) = started {
            log::error!("{}", e);
            std::process::exit(1);
        }

        println!("Click with `x y` (normalized), `stop` to give up.");
        // Terminal input is already in level space
        let surface = SurfaceMetrics::fill(Vec2::ONE);
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            let mut game = game.borrow_mut();

            if line == "stop" {
                game.stop();
                break;
            }

            let coords: Vec<f32> = line
                .split_whitespace()
                .filter_map(|t| t.parse().ok())
                .collect();
            let [x, y] = coords.as_slice() else {
                println!("expected `x y`");
                continue;
            };

            game.tick();
            if let PointerOutcome::Found { won: true, .. } =
                game.handle_pointer(Vec2::new(*x, *y), &surface)
            {
                break;
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}
