//! Level data: documents, validation and sources

pub mod data;
pub mod source;

pub use data::{Item, Level};
pub use source::{DirLevelSource, LevelKey, LevelSource};
