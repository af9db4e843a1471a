//! Pinned, scroll-scrubbed expansion
//!
//! While the page scrolls through the region, the trigger element is held at its
//! viewport position and a nested mask grows from a small rounded shape to the full
//! viewport with square corners. Progress is scrubbed from scroll position and smoothed
//! by the region's scrub factor.
//!
//! The first time the region activates, the controller forces an associated reveal
//! target to its final state and kills it, so the reveal's own fade and scale can't fight
//! the expansion.
//!
//! The region is resolved once, from the trigger's unpinned layout position, on the first
//! sample where the trigger is mounted; a trailing end (`+=800`) is measured from that
//! start. [`PinController::refresh`] re-resolves after a resize.

use vista_animation::{Easing, Interpolate, ScrubTimeline};
use vista_core::fsm::{EventId, StateMachine, StateTransitions};
use vista_core::{GeometrySampler, Result, Size, VistaError};

use crate::region::{AnimationRegion, ResolvedRegion};
use crate::reveal::{RevealAnimator, RevealHandle};
use crate::snapshot::ScrollSnapshot;

/// Size and corner radius of the expanding mask
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaskShape {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl MaskShape {
    pub const fn new(width: f32, height: f32, corner_radius: f32) -> Self {
        Self {
            width,
            height,
            corner_radius,
        }
    }

    /// Full viewport, square corners
    pub fn fill(viewport: Size) -> Self {
        Self::new(viewport.width, viewport.height, 0.0)
    }
}

impl Interpolate for MaskShape {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            width: self.width.lerp(&other.width, t),
            height: self.height.lerp(&other.height, t),
            corner_radius: self.corner_radius.lerp(&other.corner_radius, t),
        }
    }
}

/// Starting mask, sized relative to the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskStart {
    /// Fraction of viewport width
    pub width: f32,
    /// Fraction of viewport height
    pub height: f32,
    /// Pixels
    pub corner_radius: f32,
}

impl MaskStart {
    pub fn resolve(&self, viewport: Size) -> MaskShape {
        MaskShape::new(
            self.width * viewport.width,
            self.height * viewport.height,
            self.corner_radius,
        )
    }
}

impl Default for MaskStart {
    fn default() -> Self {
        Self {
            width: 0.3,
            height: 0.6,
            corner_radius: 24.0,
        }
    }
}

/// Where the scroll position sits relative to the region
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PinPhase {
    #[default]
    Before,
    Active,
    After,
}

/// Region boundary crossings
pub mod pin_events {
    use vista_core::fsm::EventId;

    /// Forward across the start
    pub const ENTER: EventId = 1;
    /// Forward across the end
    pub const LEAVE: EventId = 2;
    /// Backward across the end
    pub const ENTER_BACK: EventId = 3;
    /// Backward across the start
    pub const LEAVE_BACK: EventId = 4;
}

impl StateTransitions for PinPhase {
    fn on_event(&self, event: EventId) -> Option<Self> {
        use pin_events::*;
        match (self, event) {
            (PinPhase::Before, ENTER) => Some(PinPhase::Active),
            (PinPhase::Active, LEAVE) => Some(PinPhase::After),
            (PinPhase::After, ENTER_BACK) => Some(PinPhase::Active),
            (PinPhase::Active, LEAVE_BACK) => Some(PinPhase::Before),
            _ => None,
        }
    }
}

impl PinPhase {
    fn of(region: &ResolvedRegion, scroll_y: f32) -> Self {
        if scroll_y < region.start {
            PinPhase::Before
        } else if scroll_y > region.end {
            PinPhase::After
        } else {
            PinPhase::Active
        }
    }
}

/// Visual output of the pinned region for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinOutput {
    pub phase: PinPhase,
    /// Whether the trigger is currently held in place
    pub pinned: bool,
    /// Translation applied to the trigger to cancel scroll movement
    pub translate_y: f32,
    /// Layout space reserved after the trigger
    pub spacer: f32,
    /// Smoothed linear progress (0.0 to 1.0)
    pub progress: f32,
    pub mask: MaskShape,
}

/// Scroll-scrubbed, pinned expansion of a masked element
pub struct PinController {
    region: AnimationRegion,
    mask_start: MaskStart,
    timeline: ScrubTimeline,
    resolved: Option<ResolvedRegion>,
    phase: StateMachine<PinPhase>,
    /// Reveal target to force visible and kill on first activation
    override_target: Option<RevealHandle>,
    override_fired: bool,
    /// Translation currently applied to the trigger
    pin_offset: f32,
    viewport: Size,
}

impl PinController {
    /// Create a controller. Malformed regions are rejected here, not at scroll time.
    pub fn new(region: AnimationRegion, mask_start: MaskStart) -> Result<Self> {
        region.validate()?;
        if !(mask_start.width >= 0.0 && mask_start.height >= 0.0 && mask_start.corner_radius >= 0.0) {
            return Err(VistaError::invalid("pin.mask", "mask dimensions must be >= 0"));
        }
        Ok(Self {
            timeline: ScrubTimeline::new(region.scrub, Easing::Linear),
            region,
            mask_start,
            resolved: None,
            phase: StateMachine::new(PinPhase::Before),
            override_target: None,
            override_fired: false,
            pin_offset: 0.0,
            viewport: Size::ZERO,
        })
    }

    /// Easing applied to scrubbed progress before interpolating the mask
    pub fn with_easing(mut self, easing: Easing) -> Self {
        let scrub = self.timeline.scrub();
        let progress = self.timeline.progress();
        self.timeline = ScrubTimeline::new(scrub, easing);
        self.timeline.jump(progress);
        self
    }

    /// Reveal target to neutralize when the region first activates
    pub fn override_reveal(&mut self, handle: RevealHandle) {
        self.override_target = Some(handle);
    }

    /// Forget the resolved region so the next sample resolves it again
    pub fn refresh(&mut self) {
        self.resolved = None;
    }

    pub fn resolved(&self) -> Option<ResolvedRegion> {
        self.resolved
    }

    pub fn phase(&self) -> PinPhase {
        self.phase.current_state()
    }

    pub fn region(&self) -> &AnimationRegion {
        &self.region
    }

    /// Process one scroll snapshot
    pub fn update<G: GeometrySampler + ?Sized>(
        &mut self,
        snapshot: &ScrollSnapshot,
        sampler: &G,
        reveals: &mut RevealAnimator,
    ) {
        self.viewport = snapshot.viewport;

        let Some(region) = self.resolve(snapshot, sampler) else {
            tracing::trace!("pin trigger not mounted, skipping");
            return;
        };

        let scroll_y = snapshot.scroll_y;
        self.advance_phase(PinPhase::of(&region, scroll_y), reveals);

        self.timeline.set_target(region.progress(scroll_y));
        self.pin_offset = if self.region.pin {
            (scroll_y - region.start).clamp(0.0, region.distance())
        } else {
            0.0
        };
    }

    /// Advance scrub smoothing by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.timeline.tick(dt);
    }

    pub fn output(&self) -> PinOutput {
        let phase = self.phase.current_state();
        let distance = self.resolved.map(|r| r.distance()).unwrap_or(0.0);
        let from = self.mask_start.resolve(self.viewport);
        PinOutput {
            phase,
            pinned: self.region.pin && phase == PinPhase::Active,
            translate_y: self.pin_offset,
            spacer: if self.region.pin && self.region.pin_spacing {
                distance
            } else {
                0.0
            },
            progress: self.timeline.progress(),
            mask: from.lerp(&MaskShape::fill(self.viewport), self.timeline.eased_progress()),
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.timeline.is_settled()
    }

    fn resolve<G: GeometrySampler + ?Sized>(
        &mut self,
        snapshot: &ScrollSnapshot,
        sampler: &G,
    ) -> Option<ResolvedRegion> {
        if let Some(region) = self.resolved {
            return Some(region);
        }

        let rect = match sampler.require(self.region.trigger.get()?) {
            Ok(rect) => rect,
            Err(err) => {
                tracing::trace!(%err, "pin region not resolved");
                return None;
            }
        };
        // Rendered position includes our own pin translation
        let natural_top = rect.top + snapshot.scroll_y - self.pin_offset;
        let region = self
            .region
            .resolve(natural_top, rect.height, snapshot.viewport_height());
        tracing::debug!(start = region.start, end = region.end, "pin region resolved");
        self.resolved = Some(region);
        Some(region)
    }

    fn advance_phase(&mut self, target: PinPhase, reveals: &mut RevealAnimator) {
        use pin_events::*;

        // A jump can cross both boundaries in one sample
        let steps: &[EventId] = match (self.phase.current_state(), target) {
            (PinPhase::Before, PinPhase::Active) => &[ENTER],
            (PinPhase::Before, PinPhase::After) => &[ENTER, LEAVE],
            (PinPhase::Active, PinPhase::After) => &[LEAVE],
            (PinPhase::Active, PinPhase::Before) => &[LEAVE_BACK],
            (PinPhase::After, PinPhase::Active) => &[ENTER_BACK],
            (PinPhase::After, PinPhase::Before) => &[ENTER_BACK, LEAVE_BACK],
            _ => &[],
        };

        for &event in steps {
            if let Some(phase) = self.phase.send(event) {
                tracing::debug!(?phase, "pin phase");
            }
            if event == ENTER {
                self.fire_override(reveals);
            }
        }
    }

    fn fire_override(&mut self, reveals: &mut RevealAnimator) {
        if self.override_fired {
            return;
        }
        self.override_fired = true;
        if let Some(handle) = self.override_target {
            if !reveals.kill(handle, true) {
                tracing::trace!(?handle, "override target already detached");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{Anchor, DistanceUnit, RegionEnd};
    use crate::reveal::{RevealConfig, RevealPhase};
    use std::cell::Cell;
    use vista_animation::VisualState;
    use vista_core::{ElementId, ElementRect, ElementRef};

    const VIEWPORT: Size = Size::new(1000.0, 800.0);
    const TRIGGER: ElementId = ElementId(1);
    const IMAGE: ElementId = ElementId(2);

    /// Trigger at document y=2000, 800 tall; image inside it, top at document y=2100
    struct Page {
        scroll_y: Cell<f32>,
        pin_offset: Cell<f32>,
    }

    impl Page {
        fn new() -> Self {
            Self {
                scroll_y: Cell::new(0.0),
                pin_offset: Cell::new(0.0),
            }
        }

        fn snapshot(&self) -> ScrollSnapshot {
            ScrollSnapshot::new(self.scroll_y.get(), VIEWPORT, 0)
        }
    }

    impl GeometrySampler for Page {
        fn sample(&self, element: ElementId) -> Option<ElementRect> {
            let doc_top = match element {
                TRIGGER => 2000.0,
                IMAGE => 2100.0,
                _ => return None,
            };
            let top = doc_top - self.scroll_y.get() + self.pin_offset.get();
            Some(ElementRect::new(0.0, top, 1000.0, 800.0))
        }

        fn viewport(&self) -> Size {
            VIEWPORT
        }
    }

    fn region(scrub: f32) -> AnimationRegion {
        AnimationRegion::new(
            ElementRef::mounted(TRIGGER),
            Anchor::CENTER_CENTER,
            RegionEnd::Trailing {
                distance: 800.0,
                unit: DistanceUnit::Pixels,
            },
        )
        .scrub(scrub)
        .pinned(true)
    }

    fn scroll_to(
        page: &Page,
        pin: &mut PinController,
        reveals: &mut RevealAnimator,
        scroll_y: f32,
    ) -> PinOutput {
        page.scroll_y.set(scroll_y);
        let snapshot = page.snapshot();
        reveals.update(&snapshot, page);
        pin.update(&snapshot, page, reveals);
        let out = pin.output();
        page.pin_offset.set(out.translate_y);
        out
    }

    #[test]
    fn test_rejects_malformed_region() {
        let mut bad = region(0.0);
        bad.end = RegionEnd::Trailing {
            distance: 0.0,
            unit: DistanceUnit::Pixels,
        };
        assert!(matches!(
            PinController::new(bad, MaskStart::default()),
            Err(VistaError::MalformedRegion { .. })
        ));
    }

    #[test]
    fn test_resolves_center_center_plus_distance() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let mut pin = PinController::new(region(0.0), MaskStart::default()).unwrap();

        let out = scroll_to(&page, &mut pin, &mut reveals, 0.0);
        assert_eq!(
            pin.resolved(),
            Some(ResolvedRegion {
                start: 2000.0,
                end: 2800.0
            })
        );
        assert_eq!(out.phase, PinPhase::Before);
        assert!(!out.pinned);
        assert_eq!(out.spacer, 800.0);
        assert_eq!(out.mask, MaskShape::new(300.0, 480.0, 24.0));
    }

    #[test]
    fn test_zero_scrub_maps_linearly() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let mut pin = PinController::new(region(0.0), MaskStart::default()).unwrap();

        scroll_to(&page, &mut pin, &mut reveals, 0.0);
        let out = scroll_to(&page, &mut pin, &mut reveals, 2400.0);
        assert_eq!(out.phase, PinPhase::Active);
        assert!(out.pinned);
        assert_eq!(out.progress, 0.5);
        assert_eq!(out.translate_y, 400.0);
        assert_eq!(out.mask, MaskShape::new(650.0, 640.0, 12.0));

        let out = scroll_to(&page, &mut pin, &mut reveals, 5000.0);
        assert_eq!(out.phase, PinPhase::After);
        assert!(!out.pinned);
        assert_eq!(out.progress, 1.0);
        assert_eq!(out.translate_y, 800.0);
        assert_eq!(out.mask, MaskShape::fill(VIEWPORT));
    }

    #[test]
    fn test_trigger_holds_viewport_position_while_pinned() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let mut pin = PinController::new(region(0.0), MaskStart::default()).unwrap();

        scroll_to(&page, &mut pin, &mut reveals, 1900.0);
        for scroll_y in [2000.0, 2200.0, 2500.0, 2800.0] {
            scroll_to(&page, &mut pin, &mut reveals, scroll_y);
            let rect = page.sample(TRIGGER).unwrap();
            assert_eq!(rect.center_y(), 400.0, "scroll {scroll_y}");
        }
    }

    #[test]
    fn test_resolution_is_not_recomputed_per_frame() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let mut pin = PinController::new(region(0.0), MaskStart::default()).unwrap();

        scroll_to(&page, &mut pin, &mut reveals, 2300.0);
        let first = pin.resolved();
        scroll_to(&page, &mut pin, &mut reveals, 2600.0);
        assert_eq!(pin.resolved(), first);

        // Refresh while pinned resolves from the unpinned position
        pin.refresh();
        scroll_to(&page, &mut pin, &mut reveals, 2600.0);
        assert_eq!(pin.resolved(), first);
    }

    #[test]
    fn test_scrub_lags_and_catches_up() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let mut pin = PinController::new(region(0.5), MaskStart::default()).unwrap();

        scroll_to(&page, &mut pin, &mut reveals, 0.0);
        let out = scroll_to(&page, &mut pin, &mut reveals, 2800.0);
        assert_eq!(out.progress, 0.0);
        assert!(pin.is_animating());

        pin.tick(1.0 / 60.0);
        let early = pin.output().progress;
        assert!(early > 0.0 && early < 0.1);

        for _ in 0..600 {
            pin.tick(1.0 / 60.0);
        }
        assert_eq!(pin.output().progress, 1.0);
        assert!(!pin.is_animating());
    }

    #[test]
    fn test_override_kills_reveal_permanently() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let image = reveals
            .attach(ElementRef::mounted(IMAGE), RevealConfig::default())
            .unwrap();
        let mut pin = PinController::new(region(0.5), MaskStart::default()).unwrap();
        pin.override_reveal(image);

        // Image top enters at 720: scroll 1380
        scroll_to(&page, &mut pin, &mut reveals, 1000.0);
        scroll_to(&page, &mut pin, &mut reveals, 1500.0);
        assert_eq!(reveals.phase(image), Some(RevealPhase::Entering));

        scroll_to(&page, &mut pin, &mut reveals, 2100.0);
        assert!(reveals.is_killed(image));
        assert_eq!(reveals.phase(image), Some(RevealPhase::Visible));
        assert_eq!(reveals.visual(image), Some(VisualState::IDENTITY));

        // Back above the original enter line
        for scroll_y in [1500.0, 1000.0, 0.0] {
            scroll_to(&page, &mut pin, &mut reveals, scroll_y);
            reveals.tick(0.5);
        }
        assert_eq!(pin.phase(), PinPhase::Before);
        assert_eq!(reveals.phase(image), Some(RevealPhase::Visible));
        assert_eq!(reveals.visual(image), Some(VisualState::IDENTITY));
    }

    #[test]
    fn test_jump_past_region_still_fires_override() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let image = reveals
            .attach(ElementRef::mounted(IMAGE), RevealConfig::default())
            .unwrap();
        let mut pin = PinController::new(region(0.0), MaskStart::default()).unwrap();
        pin.override_reveal(image);

        scroll_to(&page, &mut pin, &mut reveals, 0.0);
        let out = scroll_to(&page, &mut pin, &mut reveals, 9000.0);
        assert_eq!(out.phase, PinPhase::After);
        assert!(reveals.is_killed(image));
    }

    #[test]
    fn test_unmounted_trigger_skips() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let trigger = ElementRef::new();
        let mut unmounted = region(0.0);
        unmounted.trigger = trigger.clone();
        let mut pin = PinController::new(unmounted, MaskStart::default()).unwrap();

        scroll_to(&page, &mut pin, &mut reveals, 2400.0);
        assert_eq!(pin.resolved(), None);
        assert_eq!(pin.phase(), PinPhase::Before);

        trigger.mount(TRIGGER);
        scroll_to(&page, &mut pin, &mut reveals, 2400.0);
        assert_eq!(pin.phase(), PinPhase::Active);
    }

    #[test]
    fn test_without_pin_spacing() {
        let page = Page::new();
        let mut reveals = RevealAnimator::new();
        let mut pin = PinController::new(region(0.0).pinned(false), MaskStart::default()).unwrap();
        let out = scroll_to(&page, &mut pin, &mut reveals, 2400.0);
        assert!(out.pinned);
        assert_eq!(out.spacer, 0.0);
    }
}
