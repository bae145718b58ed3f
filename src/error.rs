//! Error types surfaced at the game boundary.
//!
//! None of these are fatal: a failure leaves the game in a non-playing phase
//! and is reported to the player through the HUD.

use crate::level::LevelKey;

/// Failure to resolve a level document.
#[derive(Debug, thiserror::Error)]
pub enum LevelLoadError {
    #[error("level data source unreachable: {0}")]
    Transport(String),

    #[error("level request failed with status {status}")]
    Status { status: u16 },

    #[error("level {0} not found")]
    NotFound(LevelKey),

    #[error("malformed level data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid level: {0}")]
    Invalid(String),
}

impl LevelLoadError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LevelLoadError::Invalid(reason.into())
    }
}

/// Failure of the theme catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("theme catalog is empty")]
    Empty,

    #[error("unknown theme `{0}`")]
    UnknownTheme(String),
}

/// Errors surfaced while booting or starting a level.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("could not start level: {0}")]
    LevelLoad(#[from] LevelLoadError),
}
