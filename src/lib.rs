//! Hidden Picture - find the hidden objects in a scene
//!
//! Core modules:
//! - `sim`: Game session state machine and hit testing
//! - `level`: Level data model, validation and sources
//! - `catalog`: Theme catalog
//! - `hud`: HUD and scene contracts driven by the game
//! - `platform`: Browser/native platform abstraction (clock, ticker, fetch)
//! - `settings`: Persisted preferences

pub mod catalog;
pub mod error;
pub mod hud;
pub mod level;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{Theme, ThemeCatalog};
pub use error::{CatalogError, GameError, LevelLoadError};
pub use level::{Item, Level, LevelKey, LevelSource};
pub use settings::Settings;
pub use sim::{Game, GamePhase, GameSession};

/// Game configuration constants
pub mod consts {
    /// Points awarded for finding an item
    pub const FOUND_REWARD: u32 = 100;
    /// Points lost on a click that hits nothing
    pub const MISS_PENALTY: u32 = 10;
    /// HUD timer refresh cadence (1 Hz)
    pub const TIMER_TICK_MS: u32 = 1000;
    /// Level a theme starts on when none is configured
    pub const FIRST_LEVEL: u32 = 1;
    /// Text shown over a found item
    pub const FOUND_FEEDBACK: &str = "FOUND!";
}
