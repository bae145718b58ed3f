//! Game simulation module
//!
//! All gameplay logic lives here. It has no DOM dependencies:
//! - `state`: the session value (score, found set, phase, timer)
//! - `hit`: pointer normalization and hit testing
//! - `game`: drives the session and notifies the HUD and scene

pub mod game;
pub mod hit;
pub mod state;

pub use game::{Frontend, Game, LoadOutcome, LoadTicket, PointerOutcome, boot, start_level};
pub use hit::{SurfaceMetrics, hit_test};
pub use state::{FoundOutcome, GamePhase, GameSession};
