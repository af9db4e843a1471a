//! Scroll-scrubbed timelines
//!
//! A scrubbed timeline does not advance on its own: its target progress is set from
//! scroll position and the displayed progress follows it. With a scrub factor of `0`
//! the displayed progress snaps to the target; otherwise it approaches the target
//! exponentially with a time constant of `scrub` seconds, so the lag grows with scroll
//! velocity and vanishes when scrolling stops.

use crate::easing::Easing;

/// Below this distance the displayed progress snaps onto the target
const SETTLE_EPSILON: f32 = 1e-4;

/// A timeline whose progress is driven by scroll position
#[derive(Clone, Debug)]
pub struct ScrubTimeline {
    /// Progress implied by the latest scroll sample (0.0 to 1.0)
    target: f32,
    /// Smoothed progress actually displayed (0.0 to 1.0)
    current: f32,
    /// Smoothing time constant in seconds; 0 snaps
    scrub: f32,
    easing: Easing,
}

impl ScrubTimeline {
    pub fn new(scrub: f32, easing: Easing) -> Self {
        Self {
            target: 0.0,
            current: 0.0,
            scrub: scrub.max(0.0),
            easing,
        }
    }

    /// Set the scroll-implied progress
    pub fn set_target(&mut self, progress: f32) {
        self.target = progress.clamp(0.0, 1.0);
        if self.scrub <= 0.0 {
            self.current = self.target;
        }
    }

    /// Move both target and displayed progress, skipping smoothing
    pub fn jump(&mut self, progress: f32) {
        self.target = progress.clamp(0.0, 1.0);
        self.current = self.target;
    }

    /// Advance smoothing by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.is_settled() {
            return;
        }
        if self.scrub <= 0.0 {
            self.current = self.target;
            return;
        }
        if dt <= 0.0 {
            return;
        }

        let alpha = 1.0 - (-dt / self.scrub).exp();
        self.current += (self.target - self.current) * alpha;
        if (self.target - self.current).abs() < SETTLE_EPSILON {
            self.current = self.target;
        }
    }

    /// Displayed linear progress
    pub fn progress(&self) -> f32 {
        self.current
    }

    /// Displayed progress after easing
    pub fn eased_progress(&self) -> f32 {
        self.easing.apply(self.current)
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn scrub(&self) -> f32 {
        self.scrub
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

impl Default for ScrubTimeline {
    fn default() -> Self {
        Self::new(0.0, Easing::Linear)
    }
}
