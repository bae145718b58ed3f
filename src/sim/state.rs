//! Game session state
//!
//! The session owns the active level and the found set. It is a plain value:
//! no HUD, clock or scheduler access happens here, callers pass `now` in.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::{FOUND_REWARD, MISS_PENALTY};
use crate::level::{Level, LevelKey};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting on the level data source
    Loading,
    /// Accepting pointer input
    Playing,
    /// Level over: all items found, or stopped
    Ended { won: bool },
    /// Latest level request failed; previous session data untouched
    LoadFailed,
}

/// Result of marking an item as found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoundOutcome {
    /// Newly found
    Found { score: u32, won: bool },
    /// Already in the found set; nothing changed
    AlreadyFound,
    /// Not an item of the current level; nothing changed
    UnknownItem,
    /// Session not playing; nothing changed
    NotPlaying,
}

#[derive(Debug, Clone, Default)]
pub struct GameSession {
    phase: GamePhase,
    key: Option<LevelKey>,
    level: Option<Level>,
    score: u32,
    found: HashSet<String>,
    start_ms: f64,
    end_ms: Option<f64>,
}

impl GameSession {
    /// Create an empty, idle session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn key(&self) -> Option<&LevelKey> {
        self.key.as_ref()
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn found(&self) -> &HashSet<String> {
        &self.found
    }

    pub fn is_found(&self, item_id: &str) -> bool {
        self.found.contains(item_id)
    }

    /// Items still hidden in the current level
    pub fn remaining(&self) -> usize {
        self.level
            .as_ref()
            .map_or(0, |l| l.items.len().saturating_sub(self.found.len()))
    }

    /// Enter `Loading`. Only the phase changes.
    pub fn begin_loading(&mut self) {
        self.phase = GamePhase::Loading;
    }

    /// Enter `LoadFailed`. Only the phase changes.
    pub fn load_failed(&mut self) {
        self.phase = GamePhase::LoadFailed;
    }

    /// Replace the session with a freshly loaded level and start playing
    pub fn start(&mut self, key: LevelKey, level: Level, now_ms: f64) {
        self.key = Some(key);
        self.level = Some(level);
        self.score = 0;
        self.found.clear();
        self.start_ms = now_ms;
        self.end_ms = None;
        self.phase = GamePhase::Playing;
    }

    /// Mark an item found. Idempotent.
    pub fn record_found(&mut self, item_id: &str, now_ms: f64) -> FoundOutcome {
        if !self.is_playing() {
            return FoundOutcome::NotPlaying;
        }
        let Some(level) = self.level.as_ref() else {
            return FoundOutcome::NotPlaying;
        };
        if level.item(item_id).is_none() {
            return FoundOutcome::UnknownItem;
        }
        if !self.found.insert(item_id.to_string()) {
            return FoundOutcome::AlreadyFound;
        }

        self.score = self.score.saturating_add(FOUND_REWARD);

        let won = self.found.len() == level.items.len();
        if won {
            self.finish(true, now_ms);
        }
        FoundOutcome::Found {
            score: self.score,
            won,
        }
    }

    /// Apply the miss penalty, floored at zero. Returns the new score while playing.
    pub fn record_miss(&mut self) -> Option<u32> {
        if !self.is_playing() {
            return None;
        }
        self.score = self.score.saturating_sub(MISS_PENALTY);
        Some(self.score)
    }

    /// Abandon the level. Returns false if nothing was playing.
    pub fn stop(&mut self, now_ms: f64) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.finish(false, now_ms);
        true
    }

    fn finish(&mut self, won: bool, now_ms: f64) {
        self.phase = GamePhase::Ended { won };
        self.end_ms = Some(now_ms);
    }

    /// Whole seconds played; frozen once the level ends
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        let until = match self.phase {
            GamePhase::Playing => now_ms,
            GamePhase::Ended { .. } => self.end_ms.unwrap_or(now_ms),
            _ => return 0,
        };
        ((until - self.start_ms) / 1000.0).floor().max(0.0) as u64
    }
}
