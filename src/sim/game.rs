//! Game driver
//!
//! Wraps a [`GameSession`] with its collaborators: HUD, scene, clock and the
//! recurring timer. Level loads are tagged with a request token; only the
//! latest request may change the session.

use std::cell::RefCell;

use glam::Vec2;

use super::hit::{SurfaceMetrics, hit_test};
use super::state::{FoundOutcome, GamePhase, GameSession};
use crate::catalog::ThemeCatalog;
use crate::consts::TIMER_TICK_MS;
use crate::error::{GameError, LevelLoadError};
use crate::hud::{Hud, Scene};
use crate::level::{Level, LevelKey, LevelSource};
use crate::platform::{Clock, Scheduler, TickHandle};
use crate::settings::Settings;

/// Platform collaborators the game talks to
pub struct Frontend {
    pub hud: Box<dyn Hud>,
    pub scene: Box<dyn Scene>,
    pub clock: Box<dyn Clock>,
    pub scheduler: Box<dyn Scheduler>,
}

/// Handle for one in-flight level request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    token: u64,
    key: LevelKey,
}

impl LoadTicket {
    pub fn key(&self) -> &LevelKey {
        &self.key
    }
}

/// What became of a completed level request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The level is now playing
    Started,
    /// A newer request was made meanwhile; the result was dropped
    Superseded,
}

/// What a pointer press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Not playing, or outside the image
    Ignored,
    Found { item_id: String, won: bool },
    Miss { score: u32 },
}

pub struct Game {
    session: GameSession,
    frontend: Frontend,
    settings: Settings,
    /// Token of the most recent level request
    latest_token: u64,
    /// Active 1 Hz HUD timer, present only while playing
    ticker: Option<Box<dyn TickHandle>>,
}

impl Game {
    pub fn new(frontend: Frontend, settings: Settings) -> Self {
        Self {
            session: GameSession::new(),
            frontend,
            settings,
            latest_token: 0,
            ticker: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    /// Register a new level request. Supersedes any request still in flight.
    pub fn begin_load(&mut self, key: LevelKey) -> LoadTicket {
        self.latest_token += 1;
        self.cancel_ticker();
        self.session.begin_loading();
        log::info!("Starting level {} (request #{})", key, self.latest_token);
        LoadTicket {
            token: self.latest_token,
            key,
        }
    }

    /// Apply the result of a level request.
    ///
    /// Stale results are dropped without touching anything. A failure only
    /// moves the session to `LoadFailed`; level, score and timer are kept.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Level, LevelLoadError>,
    ) -> Result<LoadOutcome, LevelLoadError> {
        if ticket.token != self.latest_token {
            log::info!(
                "Discarding level {} (request #{} superseded by #{})",
                ticket.key,
                ticket.token,
                self.latest_token
            );
            return Ok(LoadOutcome::Superseded);
        }

        // Sources other than `Level::from_json` may hand over unchecked levels
        let level = match result.and_then(|level| level.validate().map(|()| level)) {
            Ok(level) => level,
            Err(e) => {
                log::error!("Failed to load level {}: {}", ticket.key, e);
                self.session.load_failed();
                self.frontend
                    .hud
                    .show_message(&format!("Could not start level {}", ticket.key));
                return Err(e);
            }
        };

        let now = self.frontend.clock.now_ms();
        log::info!("Level {} loaded ({} items)", ticket.key, level.items.len());
        self.session.start(ticket.key, level, now);

        if let Some(level) = self.session.level() {
            self.frontend.hud.init_items(&level.items);
            self.frontend.scene.render_level(level);
        }
        self.frontend.hud.update_score(0);
        self.frontend.hud.update_timer(0);

        self.ticker = Some(self.frontend.scheduler.every(TIMER_TICK_MS));
        Ok(LoadOutcome::Started)
    }

    /// Resolve a pointer press given in container pixels
    pub fn handle_pointer(&mut self, point: Vec2, surface: &SurfaceMetrics) -> PointerOutcome {
        if !self.session.is_playing() {
            return PointerOutcome::Ignored;
        }
        let Some(local) = surface.locate(point) else {
            log::debug!("Pointer at {} is outside the image", point);
            return PointerOutcome::Ignored;
        };
        let Some(level) = self.session.level() else {
            return PointerOutcome::Ignored;
        };

        let hit = hit_test(local, surface, &level.items, self.session.found()).map(|i| i.id.clone());
        match hit {
            Some(item_id) => match self.record_found(&item_id) {
                FoundOutcome::Found { won, .. } => PointerOutcome::Found { item_id, won },
                _ => PointerOutcome::Ignored,
            },
            None => match self.record_miss() {
                Some(score) => PointerOutcome::Miss { score },
                None => PointerOutcome::Ignored,
            },
        }
    }

    /// Mark an item found and notify the HUD and scene
    pub fn record_found(&mut self, item_id: &str) -> FoundOutcome {
        let now = self.frontend.clock.now_ms();
        let outcome = self.session.record_found(item_id, now);

        match outcome {
            FoundOutcome::Found { score, won } => {
                log::info!("Found item: {} ({} left)", item_id, self.session.remaining());
                self.frontend.hud.mark_item_found(item_id);
                self.frontend.hud.update_score(score);
                if self.settings.show_feedback {
                    if let Some(item) = self.session.level().and_then(|l| l.item(item_id)) {
                        self.frontend.scene.show_found(item);
                    }
                }
                if won {
                    log::info!("Level complete! Score: {}", score);
                    self.cancel_ticker();
                    self.frontend.hud.update_timer(self.session.elapsed_secs(now));
                    self.frontend.scene.show_level_complete(score);
                }
            }
            FoundOutcome::UnknownItem => log::warn!("Ignoring unknown item `{}`", item_id),
            FoundOutcome::AlreadyFound | FoundOutcome::NotPlaying => {}
        }
        outcome
    }

    /// Apply the miss penalty and notify the HUD
    pub fn record_miss(&mut self) -> Option<u32> {
        let score = self.session.record_miss()?;
        log::debug!("Miss! Score: {}", score);
        self.frontend.hud.update_score(score);
        Some(score)
    }

    /// Abandon the current level
    pub fn stop(&mut self) -> bool {
        let now = self.frontend.clock.now_ms();
        if !self.session.stop(now) {
            return false;
        }
        log::info!("Level stopped");
        self.cancel_ticker();
        self.frontend.hud.update_timer(self.session.elapsed_secs(now));
        true
    }

    /// Timer callback: push elapsed seconds to the HUD
    pub fn tick(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        let elapsed = self.elapsed_secs();
        self.frontend.hud.update_timer(elapsed);
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.session.elapsed_secs(self.frontend.clock.now_ms())
    }

    /// Show a user-visible notice on the HUD
    pub fn report(&mut self, message: &str) {
        self.frontend.hud.show_message(message);
    }

    /// Whether a HUD timer is currently scheduled
    pub fn timer_running(&self) -> bool {
        self.ticker.is_some()
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

/// Load a level and start it, unless a newer request wins the race.
///
/// The game is borrowed only before and after the load, never across it, so
/// input and further requests can be handled while the source is pending.
pub async fn start_level<S: LevelSource>(
    game: &RefCell<Game>,
    source: &S,
    key: LevelKey,
) -> Result<LoadOutcome, LevelLoadError> {
    let ticket = game.borrow_mut().begin_load(key);
    let result = source.load_level(ticket.key()).await;
    game.borrow_mut().finish_load(ticket, result)
}

/// Load the theme catalog and start the first theme's opening level
pub async fn boot<S: LevelSource>(
    game: &RefCell<Game>,
    catalog: &mut ThemeCatalog,
    source: &S,
) -> Result<LoadOutcome, GameError> {
    catalog.load_themes();
    let theme = match catalog.first() {
        Ok(theme) => theme.clone(),
        Err(e) => {
            log::error!("Cannot start: {}", e);
            game.borrow_mut().report("No themes available");
            return Err(e.into());
        }
    };

    let level_id = game.borrow().settings().start_level;
    log::info!("Booting into theme {} ({})", theme.name, theme.id);
    Ok(start_level(game, source, LevelKey::new(theme.id, level_id)).await?)
}
