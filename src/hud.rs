//! HUD and scene contracts
//!
//! Both surfaces are purely reactive: the game pushes one-way notifications
//! after each state transition and never reads anything back.

use crate::level::{Item, Level};

/// Score, timer and item checklist
pub trait Hud {
    /// Rebuild the checklist for a freshly started level
    fn init_items(&mut self, items: &[Item]);
    fn update_score(&mut self, score: u32);
    fn update_timer(&mut self, elapsed_secs: u64);
    fn mark_item_found(&mut self, item_id: &str);
    /// User-visible notice (load failures, empty catalog)
    fn show_message(&mut self, message: &str);
}

/// Background image and feedback effects
pub trait Scene {
    fn render_level(&mut self, level: &Level);
    fn show_found(&mut self, item: &Item);
    fn show_level_complete(&mut self, score: u32);
}

/// Format elapsed seconds as `MM:SS`
pub fn format_timer(elapsed_secs: u64) -> String {
    format!("{:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}
