//! Theme catalog
//!
//! Static, ordered list of themes. A networked catalog would have to keep the
//! same ordering contract.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A level theme (e.g. "Messy Room")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
}

impl Theme {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Built-in themes, in display order
const BUILTIN_THEMES: [(&str, &str); 3] = [
    ("messy-room", "Messy Room"),
    ("fantasy-forest", "Fantasy Forest"),
    ("cyber-city", "Cyber City"),
];

#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
    loaded: bool,
}

impl ThemeCatalog {
    /// Create an unloaded catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog over an explicit theme list (may be empty)
    pub fn with_themes(themes: Vec<Theme>) -> Self {
        Self {
            themes,
            loaded: true,
        }
    }

    /// Load the built-in themes unless already loaded. Idempotent.
    pub fn load_themes(&mut self) -> &[Theme] {
        if !self.loaded {
            self.loaded = true;
            self.themes = BUILTIN_THEMES
                .iter()
                .map(|(id, name)| Theme::new(*id, *name))
                .collect();
            log::info!("Loaded {} themes", self.themes.len());
        }
        &self.themes
    }

    /// Themes loaded so far
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// First theme in catalog order
    pub fn first(&self) -> Result<&Theme, CatalogError> {
        self.themes.first().ok_or(CatalogError::Empty)
    }

    pub fn find(&self, id: &str) -> Result<&Theme, CatalogError> {
        self.themes
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CatalogError::UnknownTheme(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_themes_is_ordered_and_idempotent() {
        let mut catalog = ThemeCatalog::new();
        assert!(catalog.themes().is_empty());

        let ids: Vec<String> = catalog.load_themes().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["messy-room", "fantasy-forest", "cyber-city"]);

        catalog.load_themes();
        assert_eq!(catalog.themes().len(), 3);
        assert_eq!(catalog.first().unwrap().name, "Messy Room");
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(ThemeCatalog::new().first(), Err(CatalogError::Empty));

        let mut catalog = ThemeCatalog::with_themes(Vec::new());
        assert!(catalog.load_themes().is_empty());
        assert_eq!(catalog.first(), Err(CatalogError::Empty));
    }

    #[test]
    fn test_find_theme() {
        let mut catalog = ThemeCatalog::new();
        catalog.load_themes();
        assert_eq!(catalog.find("cyber-city").unwrap().name, "Cyber City");
        assert_eq!(
            catalog.find("space"),
            Err(CatalogError::UnknownTheme("space".to_string()))
        );
    }
}
