//! Scroll regions
//!
//! A region is a range of document scroll offsets bound to a trigger element. The start
//! is where an anchor on the trigger (a fraction of its height) meets a line across the
//! viewport (a fraction of the viewport height). The end is either another such anchor
//! pair or a trailing distance past the start (`+=800`).

use vista_core::{ElementRef, Result, VistaError};

/// Meeting point between a trigger line and a viewport line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Fraction of the trigger's height (0 = top, 1 = bottom)
    pub element: f32,
    /// Fraction of the viewport height (0 = top, 1 = bottom)
    pub viewport: f32,
}

impl Anchor {
    /// Trigger center meets viewport center
    pub const CENTER_CENTER: Anchor = Anchor::new(0.5, 0.5);

    pub const fn new(element: f32, viewport: f32) -> Self {
        Self { element, viewport }
    }

    /// Document scroll offset at which this anchor is met
    pub fn scroll_position(&self, trigger_top: f32, trigger_height: f32, viewport_height: f32) -> f32 {
        trigger_top + self.element * trigger_height - self.viewport * viewport_height
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if !(self.element.is_finite() && self.viewport.is_finite()) {
            return Err(VistaError::invalid(field, "anchor fractions must be finite"));
        }
        Ok(())
    }
}

/// Unit of a trailing scroll distance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceUnit {
    /// Plain scroll pixels, independent of viewport size
    #[default]
    Pixels,
    /// Percent of the viewport height
    ViewportPercent,
}

impl DistanceUnit {
    pub fn to_pixels(&self, amount: f32, viewport_height: f32) -> f32 {
        match self {
            DistanceUnit::Pixels => amount,
            DistanceUnit::ViewportPercent => amount / 100.0 * viewport_height,
        }
    }
}

/// Where a region ends
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegionEnd {
    /// An absolute anchor on the trigger
    Anchor(Anchor),
    /// A distance past the resolved start
    Trailing { distance: f32, unit: DistanceUnit },
}

/// A scroll-driven region bound to a trigger element
#[derive(Clone, Debug)]
pub struct AnimationRegion {
    pub trigger: ElementRef,
    pub start: Anchor,
    pub end: RegionEnd,
    /// Smoothing time constant in seconds; 0 snaps
    pub scrub: f32,
    /// Hold the trigger in place while the region is active
    pub pin: bool,
    /// Reserve layout space for the pin duration
    pub pin_spacing: bool,
}

impl AnimationRegion {
    pub fn new(trigger: ElementRef, start: Anchor, end: RegionEnd) -> Self {
        Self {
            trigger,
            start,
            end,
            scrub: 0.0,
            pin: false,
            pin_spacing: false,
        }
    }

    pub fn scrub(mut self, scrub: f32) -> Self {
        self.scrub = scrub;
        self
    }

    pub fn pinned(mut self, pin_spacing: bool) -> Self {
        self.pin = true;
        self.pin_spacing = pin_spacing;
        self
    }

    /// Reject regions whose start cannot precede their end for any geometry
    ///
    /// Anchor ends must move the meeting point forward: a later (or equal) trigger line
    /// against an earlier (or equal) viewport line, not both equal.
    pub fn validate(&self) -> Result<()> {
        self.start.validate("region.start")?;

        if !(self.scrub.is_finite() && self.scrub >= 0.0) {
            return Err(VistaError::invalid(
                "region.scrub",
                format!("must be a finite value >= 0, got {}", self.scrub),
            ));
        }

        match self.end {
            RegionEnd::Trailing { distance, .. } => {
                if !(distance.is_finite() && distance > 0.0) {
                    return Err(VistaError::MalformedRegion {
                        start: 0.0,
                        end: distance,
                    });
                }
            }
            RegionEnd::Anchor(end) => {
                end.validate("region.end")?;
                let forward = end.element >= self.start.element && end.viewport <= self.start.viewport;
                let same = end == self.start;
                if !forward || same {
                    return Err(VistaError::MalformedRegion {
                        start: self.start.element - self.start.viewport,
                        end: end.element - end.viewport,
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolve to document scroll offsets from the trigger's unpinned layout position
    pub fn resolve(&self, trigger_top: f32, trigger_height: f32, viewport_height: f32) -> ResolvedRegion {
        let start = self
            .start
            .scroll_position(trigger_top, trigger_height, viewport_height);
        let end = match self.end {
            RegionEnd::Anchor(anchor) => {
                anchor.scroll_position(trigger_top, trigger_height, viewport_height)
            }
            RegionEnd::Trailing { distance, unit } => {
                start + unit.to_pixels(distance, viewport_height)
            }
        };
        ResolvedRegion { start, end }
    }
}

/// A region resolved to document scroll offsets
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedRegion {
    pub start: f32,
    pub end: f32,
}

impl ResolvedRegion {
    pub fn distance(&self) -> f32 {
        (self.end - self.start).max(0.0)
    }

    /// Linear progress through the region, clamped to `0..=1`
    pub fn progress(&self, scroll_y: f32) -> f32 {
        let distance = self.distance();
        if distance <= 0.0 {
            return if scroll_y >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / distance).clamp(0.0, 1.0)
    }

    pub fn contains(&self, scroll_y: f32) -> bool {
        scroll_y >= self.start && scroll_y <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trailing(distance: f32) -> AnimationRegion {
        AnimationRegion::new(
            ElementRef::new(),
            Anchor::CENTER_CENTER,
            RegionEnd::Trailing {
                distance,
                unit: DistanceUnit::Pixels,
            },
        )
    }

    #[test]
    fn test_center_center_start() {
        // Trigger at doc y=2000, 800 tall; viewport 800 tall
        let region = trailing(800.0).resolve(2000.0, 800.0, 800.0);
        assert_eq!(region.start, 2000.0);
        assert_eq!(region.end, 2800.0);
        assert_eq!(region.distance(), 800.0);
    }

    #[test]
    fn test_viewport_percent_distance() {
        let mut region = trailing(50.0);
        region.end = RegionEnd::Trailing {
            distance: 50.0,
            unit: DistanceUnit::ViewportPercent,
        };
        let resolved = region.resolve(0.0, 100.0, 1000.0);
        assert_eq!(resolved.distance(), 500.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        let region = ResolvedRegion {
            start: 100.0,
            end: 300.0,
        };
        assert_eq!(region.progress(0.0), 0.0);
        assert_eq!(region.progress(200.0), 0.5);
        assert_eq!(region.progress(900.0), 1.0);
        assert!(region.contains(100.0));
        assert!(!region.contains(301.0));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(trailing(800.0).scrub(0.5).pinned(true).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_trailing() {
        assert!(matches!(
            trailing(0.0).validate(),
            Err(VistaError::MalformedRegion { .. })
        ));
        assert!(matches!(
            trailing(-10.0).validate(),
            Err(VistaError::MalformedRegion { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_backward_anchor_end() {
        let region = AnimationRegion::new(
            ElementRef::new(),
            Anchor::new(1.0, 0.4),
            RegionEnd::Anchor(Anchor::new(0.0, 0.9)),
        );
        assert!(matches!(
            region.validate(),
            Err(VistaError::MalformedRegion { .. })
        ));

        let same = AnimationRegion::new(
            ElementRef::new(),
            Anchor::CENTER_CENTER,
            RegionEnd::Anchor(Anchor::CENTER_CENTER),
        );
        assert!(same.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_forward_anchor_end() {
        // "top 90%" to "bottom 40%"
        let region = AnimationRegion::new(
            ElementRef::new(),
            Anchor::new(0.0, 0.9),
            RegionEnd::Anchor(Anchor::new(1.0, 0.4)),
        );
        assert!(region.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_scrub() {
        let err = trailing(800.0).scrub(-1.0).validate().unwrap_err();
        assert!(matches!(err, VistaError::InvalidConfig { field: "region.scrub", .. }));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn progress_is_monotonic_and_bounded(
                start in -5000.0f32..5000.0,
                distance in 1.0f32..5000.0,
                a in -10000.0f32..10000.0,
                b in -10000.0f32..10000.0,
            ) {
                let region = ResolvedRegion { start, end: start + distance };
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let (p_lo, p_hi) = (region.progress(lo), region.progress(hi));
                prop_assert!((0.0..=1.0).contains(&p_lo));
                prop_assert!((0.0..=1.0).contains(&p_hi));
                prop_assert!(p_lo <= p_hi);
            }

            #[test]
            fn trailing_end_follows_start(
                top in 0.0f32..10000.0,
                height in 0.0f32..2000.0,
                viewport in 100.0f32..2000.0,
                distance in 1.0f32..3000.0,
            ) {
                let region = trailing(distance).resolve(top, height, viewport);
                prop_assert!((region.distance() - distance).abs() < 0.01);
            }
        }
    }
}
