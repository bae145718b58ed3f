//! Browser implementations of the platform traits

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::{Clock, Scheduler, TickHandle, format_log_line};
use crate::error::LevelLoadError;
use crate::level::{Level, LevelKey, LevelSource};

/// `Date.now()` clock
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClock;

impl Clock for WebClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// `setInterval` scheduler.
///
/// Owns the tick callback for its whole lifetime; each `every` call registers
/// it once more and hands back the interval id.
pub struct IntervalScheduler {
    callback: Closure<dyn FnMut()>,
}

impl IntervalScheduler {
    pub fn new(on_tick: impl FnMut() + 'static) -> Self {
        Self {
            callback: Closure::<dyn FnMut()>::new(on_tick),
        }
    }
}

struct IntervalHandle {
    id: i32,
}

impl TickHandle for IntervalHandle {
    fn cancel(self: Box<Self>) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}

/// Stand-in when the browser refused to schedule
struct NoInterval;

impl TickHandle for NoInterval {
    fn cancel(self: Box<Self>) {}
}

impl Scheduler for IntervalScheduler {
    fn every(&mut self, period_ms: u32) -> Box<dyn TickHandle> {
        let id = web_sys::window().and_then(|w| {
            w.set_interval_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .ok()
        });
        match id {
            Some(id) => Box::new(IntervalHandle { id }),
            None => {
                log::error!("Failed to schedule HUD timer");
                Box::new(NoInterval)
            }
        }
    }
}

/// Fetches `<base>/<theme>-<level>.json` over HTTP
#[derive(Debug, Clone)]
pub struct FetchLevelSource {
    base_url: String,
}

impl FetchLevelSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

fn transport(e: JsValue) -> LevelLoadError {
    LevelLoadError::Transport(format!("{:?}", e))
}

impl LevelSource for FetchLevelSource {
    async fn load_level(&self, key: &LevelKey) -> Result<Level, LevelLoadError> {
        let url = key.url(&self.base_url);
        log::debug!("Fetching {}", url);

        let window =
            web_sys::window().ok_or_else(|| LevelLoadError::Transport("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_str(&url))
            .await
            .map_err(transport)?
            .dyn_into()
            .map_err(transport)?;

        match response.status() {
            404 => return Err(LevelLoadError::NotFound(key.clone())),
            _ if !response.ok() => {
                return Err(LevelLoadError::Status {
                    status: response.status(),
                });
            }
            _ => {}
        }

        let body = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(transport)?;
        let json = body
            .as_string()
            .ok_or_else(|| LevelLoadError::Transport("response body is not text".into()))?;
        Level::from_json(&json)
    }
}

/// Logger mirroring records to the console and an on-screen panel
struct OverlayLogger;

static OVERLAY_LOGGER: OverlayLogger = OverlayLogger;

const OVERLAY_ID: &str = "debug-overlay";

impl OverlayLogger {
    fn panel() -> Option<web_sys::Element> {
        let document = web_sys::window()?.document()?;
        if let Some(panel) = document.get_element_by_id(OVERLAY_ID) {
            return Some(panel);
        }
        let panel = document.create_element("div").ok()?;
        panel.set_id(OVERLAY_ID);
        document.body()?.append_child(&panel).ok()?;
        Some(panel)
    }

    fn append(line: &str, level: log::Level) -> Option<()> {
        let panel = Self::panel()?;
        let document = web_sys::window()?.document()?;
        let row = document.create_element("div").ok()?;
        row.set_text_content(Some(line));
        if level == log::Level::Error {
            row.set_class_name("error");
        }
        panel.append_child(&row).ok()?;
        panel.set_scroll_top(panel.scroll_height());
        Some(())
    }
}

impl log::Log for OverlayLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_log_line(record.level(), &local_time(), &record.args().to_string());

        let js_line = JsValue::from_str(&line);
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&js_line),
            log::Level::Warn => web_sys::console::warn_1(&js_line),
            _ => web_sys::console::log_1(&js_line),
        }
        let _ = Self::append(&line, record.level());
    }

    fn flush(&self) {}
}

fn local_time() -> String {
    js_sys::Date::new_0().to_locale_time_string("en-US").into()
}

/// Install the overlay logger as the global `log` backend.
///
/// Panics are shown in the panel as well as the console.
pub fn init_overlay_logger(level: log::Level) -> Result<(), log::SetLoggerError> {
    log::set_logger(&OVERLAY_LOGGER)?;
    log::set_max_level(level.to_level_filter());
    std::panic::set_hook(Box::new(|info| {
        console_error_panic_hook::hook(info);
        let line = format_log_line(log::Level::Error, &local_time(), &format!("panic: {}", info));
        let _ = OverlayLogger::append(&line, log::Level::Error);
    }));
    Ok(())
}
