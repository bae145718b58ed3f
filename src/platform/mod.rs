//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock in milliseconds)
//! - The recurring HUD timer tick
//! - Level fetching and on-screen logging (web only, see `web`)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Source of wall-clock time in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// A scheduled recurring callback.
///
/// Cancelling consumes the handle, so a ticker can only be cancelled once.
pub trait TickHandle {
    fn cancel(self: Box<Self>);
}

/// Schedules the game's recurring timer tick
pub trait Scheduler {
    /// Start calling the game's tick every `period_ms` until cancelled
    fn every(&mut self, period_ms: u32) -> Box<dyn TickHandle>;
}

/// One log line as shown in the debug overlay: `[INFO] 10:42:01 - message`
pub fn format_log_line(level: log::Level, time: &str, message: &str) -> String {
    format!("[{}] {} - {}", level, time, message)
}

/// `std::time` clock for native builds
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Scheduler for hosts without an event loop; the host calls `Game::tick` itself
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualScheduler;

struct ManualTick;

impl TickHandle for ManualTick {
    fn cancel(self: Box<Self>) {}
}

impl Scheduler for ManualScheduler {
    fn every(&mut self, period_ms: u32) -> Box<dyn TickHandle> {
        log::debug!("Timer requested every {}ms (host-driven)", period_ms);
        Box::new(ManualTick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_log_line() {
        assert_eq!(
            format_log_line(log::Level::Error, "10:42:01 AM", "Failed to load level"),
            "[ERROR] 10:42:01 AM - Failed to load level"
        );
        assert_eq!(format_log_line(log::Level::Info, "t", "Miss!"), "[INFO] t - Miss!");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_system_clock_reports_epoch_millis() {
        // Later than 2001-09-09
        assert!(SystemClock.now_ms() > 1.0e12);
    }
}
