//! Level documents
//!
//! Coordinates and sizes are fractions of the background image's intrinsic
//! box, never of the viewport.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::LevelLoadError;

/// A hidden object placed in a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Center x, normalized
    pub x: f32,
    /// Center y, normalized
    pub y: f32,
    /// Full width, normalized
    pub width: f32,
    /// Full height, normalized
    pub height: f32,
    /// Sprite drawn over the background (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Checklist glyph shown in the HUD (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl Item {
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / 2.0
    }

    /// Inclusive axis-aligned containment of a normalized point
    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.center() - self.half_extents();
        let max = self.center() + self.half_extents();
        point.cmpge(min).all() && point.cmple(max).all()
    }

    fn validate(&self) -> Result<(), LevelLoadError> {
        let unit = 0.0_f32..=1.0;
        if !unit.contains(&self.x) || !unit.contains(&self.y) {
            return Err(LevelLoadError::invalid(format!(
                "item `{}` center ({}, {}) outside the image",
                self.id, self.x, self.y
            )));
        }
        let extent_ok = |v: f32| v > 0.0 && v <= 1.0;
        if !extent_ok(self.width) || !extent_ok(self.height) {
            return Err(LevelLoadError::invalid(format!(
                "item `{}` has invalid size {}x{}",
                self.id, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A playable scene: background plus items, last item on top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub background: String,
    pub items: Vec<Item>,
}

impl Level {
    /// Decode and validate a level document
    pub fn from_json(json: &str) -> Result<Self, LevelLoadError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Reject levels that could never be played to completion
    pub fn validate(&self) -> Result<(), LevelLoadError> {
        if self.items.is_empty() {
            return Err(LevelLoadError::invalid("level has no items"));
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(LevelLoadError::invalid(format!(
                    "duplicate item id `{}`",
                    item.id
                )));
            }
            item.validate()?;
        }
        Ok(())
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::item;

    #[test]
    fn test_parse_level_document() {
        let json = r#"{
            "background": "bg.png",
            "items": [
                {"id": "a", "name": "Apple", "x": 0.2, "y": 0.3, "width": 0.1, "height": 0.05, "preview": "🍎"},
                {"id": "b", "name": "Book", "x": 0.5, "y": 0.5, "width": 0.2, "height": 0.2, "image": "book.png"}
            ]
        }"#;

        let level = Level::from_json(json).unwrap();
        assert_eq!(level.background, "bg.png");
        assert_eq!(level.items.len(), 2);
        assert_eq!(level.items[0].preview.as_deref(), Some("🍎"));
        assert_eq!(level.items[0].image, None);
        assert_eq!(level.items[1].image.as_deref(), Some("book.png"));
    }

    #[test]
    fn test_bundled_level_is_valid() {
        let level = Level::from_json(include_str!("../../data/messy-room-1.json")).unwrap();
        assert!(!level.items.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = Level::from_json(r#"{"background": "bg.png"}"#).unwrap_err();
        assert!(matches!(err, LevelLoadError::Malformed(_)));

        let err = Level::from_json("not json").unwrap_err();
        assert!(matches!(err, LevelLoadError::Malformed(_)));
    }

    #[test]
    fn test_rejects_empty_level() {
        let err = Level::from_json(r#"{"background": "bg.png", "items": []}"#).unwrap_err();
        assert!(matches!(err, LevelLoadError::Invalid(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let level = Level {
            background: "bg.png".into(),
            items: vec![item("a", 0.2, 0.2, 0.1, 0.1), item("a", 0.6, 0.6, 0.1, 0.1)],
        };
        assert!(matches!(level.validate(), Err(LevelLoadError::Invalid(_))));
    }

    #[test]
    fn test_rejects_out_of_range_geometry() {
        let cases = [
            item("a", 1.2, 0.5, 0.1, 0.1),
            item("a", 0.5, -0.1, 0.1, 0.1),
            item("a", 0.5, 0.5, 0.0, 0.1),
            item("a", 0.5, 0.5, 0.1, 1.5),
            item("a", f32::NAN, 0.5, 0.1, 0.1),
        ];
        for bad in cases {
            let level = Level {
                background: "bg.png".into(),
                items: vec![bad],
            };
            assert!(level.validate().is_err(), "{:?} should be rejected", level.items[0]);
        }
    }

    #[test]
    fn test_contains_is_inclusive_at_edges() {
        let a = item("a", 0.2, 0.2, 0.1, 0.1);
        let left = a.x - a.width / 2.0;
        let top = a.y - a.height / 2.0;

        assert!(a.contains(Vec2::new(0.2, 0.2)));
        assert!(a.contains(Vec2::new(left, 0.2)));
        assert!(a.contains(Vec2::new(0.2, top)));
        assert!(!a.contains(Vec2::new(left - 1e-4, 0.2)));
        assert!(!a.contains(Vec2::new(0.2, top - 1e-4)));
    }
}
