//! Game settings and preferences
//!
//! Read from LocalStorage on the web; native builds use defaults.

use serde::{Deserialize, Serialize};

use crate::consts::FIRST_LEVEL;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Content ===
    /// Base URL (web) or directory (native) holding `<theme>-<level>.json`
    pub data_url: String,
    /// Level each theme starts on
    pub start_level: u32,

    // === Feedback ===
    /// Float a "FOUND!" label over found items
    pub show_feedback: bool,
    /// How long the label stays on screen (ms)
    pub feedback_ms: u32,

    // === Debug ===
    /// Mirror log output into an on-screen panel
    pub debug_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_url: "/data".to_string(),
            start_level: FIRST_LEVEL,

            show_feedback: true,
            feedback_ms: 1000,

            debug_overlay: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "hidden_picture_settings";

    /// Parse stored settings; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                if settings.start_level == 0 {
                    settings.start_level = FIRST_LEVEL;
                }
                Some(settings)
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                None
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native builds have no storage
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
