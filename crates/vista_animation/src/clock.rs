//! Frame clock
//!
//! Converts wall-clock instants into per-frame deltas for the render callback.

use std::time::{Duration, Instant};

/// Longest delta a single frame may report, in seconds
pub const DEFAULT_MAX_DT: f32 = 0.1;

/// Produces per-frame deltas in seconds
#[derive(Clone, Debug)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    target_fps: u32,
    max_dt: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            target_fps: 120,
            max_dt: DEFAULT_MAX_DT,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    /// Clamp applied to each delta so a stalled tab does not fast-forward animations
    pub fn set_max_dt(&mut self, max_dt: f32) {
        self.max_dt = max_dt.max(0.0);
    }

    /// Nominal frame interval for the target frame rate
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps as f64)
    }

    /// Tick at the current instant
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Tick at `now`. The first tick reports zero.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);

        if dt > self.max_dt {
            tracing::trace!(dt, max_dt = self.max_dt, "frame delta clamped");
        }
        dt.min(self.max_dt)
    }

    /// Forget the previous frame (after the page was hidden, for example)
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn test_delta_between_ticks() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        assert_eq!(clock.tick_at(start + Duration::from_secs(3)), DEFAULT_MAX_DT);

        clock.reset();
        assert_eq!(clock.tick_at(start + Duration::from_secs(4)), 0.0);
    }

    #[test]
    fn test_frame_budget() {
        let mut clock = FrameClock::new();
        clock.set_target_fps(60);
        assert_eq!(clock.frame_budget().as_micros(), 16_666);
    }
}
