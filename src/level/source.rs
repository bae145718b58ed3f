//! Level data sources
//!
//! A source resolves a `(theme, level)` key to a validated [`Level`]. Every
//! failure, whatever its cause, comes back as a [`LevelLoadError`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Level;
use crate::error::LevelLoadError;

/// Lookup key for a level document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelKey {
    pub theme_id: String,
    pub level_id: u32,
}

impl LevelKey {
    pub fn new(theme_id: impl Into<String>, level_id: u32) -> Self {
        Self {
            theme_id: theme_id.into(),
            level_id,
        }
    }

    /// Document file name, e.g. `messy-room-1.json`
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", self.theme_id, self.level_id)
    }

    /// Document URL under a base path, e.g. `/data/messy-room-1.json`
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.file_name())
    }
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.theme_id, self.level_id)
    }
}

/// Asynchronous provider of level documents.
///
/// The game never holds a borrow of itself across this await.
#[allow(async_fn_in_trait)]
pub trait LevelSource {
    async fn load_level(&self, key: &LevelKey) -> Result<Level, LevelLoadError>;
}

/// Reads `<dir>/<theme>-<level>.json` from the local filesystem
#[derive(Debug, Clone)]
pub struct DirLevelSource {
    dir: PathBuf,
}

impl DirLevelSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl LevelSource for DirLevelSource {
    async fn load_level(&self, key: &LevelKey) -> Result<Level, LevelLoadError> {
        let path = self.dir.join(key.file_name());
        log::debug!("Reading level {} from {}", key, path.display());

        let json = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LevelLoadError::NotFound(key.clone()),
            _ => LevelLoadError::Transport(format!("{}: {}", path.display(), e)),
        })?;
        Level::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_key_paths() {
        let key = LevelKey::new("messy-room", 1);
        assert_eq!(key.to_string(), "messy-room-1");
        assert_eq!(key.file_name(), "messy-room-1.json");
        assert_eq!(key.url("/data"), "/data/messy-room-1.json");
        assert_eq!(key.url("/data/"), "/data/messy-room-1.json");
    }

    #[test]
    fn test_dir_source_loads_bundled_level() {
        let source = DirLevelSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        let level = block_on(source.load_level(&LevelKey::new("messy-room", 1))).unwrap();
        assert_eq!(level.items[0].id, "sock");
    }

    #[test]
    fn test_dir_source_missing_level() {
        let source = DirLevelSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        let key = LevelKey::new("cyber-city", 99);
        let err = block_on(source.load_level(&key)).unwrap_err();
        assert!(matches!(err, LevelLoadError::NotFound(k) if k == key));
    }
}
