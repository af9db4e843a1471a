//! Scene orchestration
//!
//! A [`Scene`] owns every animation component of a page and routes input events to them.
//! Each scroll or resize takes one [`ScrollSnapshot`] that every component reads in that
//! turn, in a fixed order:
//!
//! 1. pinned regions (which may kill a reveal target)
//! 2. reveal targets
//! 3. media visibility
//!
//! Frame events advance the time-based parts (reveal tweens and scrub smoothing). Every
//! call returns a [`FrameOutput`] describing the complete visual state after the event.

use rustc_hash::FxHashMap;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};

use vista_animation::{Easing, FrameClock};
use vista_core::events::event_types::*;
use vista_core::{ElementId, ElementRef, Event, GeometrySampler, Size};
use vista_interact::{GlowStyle, HoverGlow, TiltConfig, TiltHost};
use vista_media::{ContainerHandle, MediaCommandRecord, MediaElement, MediaState, ViewportMediaController};
use vista_scroll::{
    MaskShape, MaskStart, PinController, PinOutput, PinPhase, RevealAnimator, RevealConfig,
    RevealHandle, RevealPhase, ScrollSnapshot,
};

use crate::config::{ConfigError, SceneConfig};

new_key_type! {
    pub struct PinHandle;
    pub struct TiltHandle;
    pub struct GlowHandle;
}

/// Visual state of one reveal target
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RevealFrame {
    pub element: u64,
    pub phase: &'static str,
    pub opacity: f32,
    pub scale: f32,
    pub translate_y: f32,
}

/// Output of one pinned region
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PinFrame {
    pub trigger: Option<u64>,
    pub phase: &'static str,
    pub pinned: bool,
    pub translate_y: f32,
    pub spacer: f32,
    pub progress: f32,
    pub mask: MaskFrame,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MaskFrame {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl From<MaskShape> for MaskFrame {
    fn from(mask: MaskShape) -> Self {
        Self {
            width: mask.width,
            height: mask.height,
            corner_radius: mask.corner_radius,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TiltFrame {
    pub element: u64,
    pub rotate_x: f32,
    pub rotate_y: f32,
    pub scale: f32,
    pub transform: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlowFrame {
    pub element: u64,
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
    pub background: String,
}

/// Complete visual state after one event
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrameOutput {
    pub timestamp: u64,
    pub scroll_y: f32,
    pub reveals: Vec<RevealFrame>,
    pub pins: Vec<PinFrame>,
    pub tilts: Vec<TiltFrame>,
    pub glows: Vec<GlowFrame>,
    /// Commands issued during this event only
    pub media: Vec<MediaCommandRecord>,
}

impl FrameOutput {
    pub fn reveal(&self, element: ElementId) -> Option<&RevealFrame> {
        self.reveals.iter().find(|r| r.element == element.to_raw())
    }

    pub fn tilt(&self, element: ElementId) -> Option<&TiltFrame> {
        self.tilts.iter().find(|t| t.element == element.to_raw())
    }

    pub fn glow(&self, element: ElementId) -> Option<&GlowFrame> {
        self.glows.iter().find(|g| g.element == element.to_raw())
    }
}

fn reveal_phase_name(phase: RevealPhase) -> &'static str {
    match phase {
        RevealPhase::Hidden => "hidden",
        RevealPhase::Entering => "entering",
        RevealPhase::Visible => "visible",
        RevealPhase::Exiting => "exiting",
    }
}

fn pin_phase_name(phase: PinPhase) -> &'static str {
    match phase {
        PinPhase::Before => "before",
        PinPhase::Active => "active",
        PinPhase::After => "after",
    }
}

/// All animation components of one page
pub struct Scene {
    reveal_config: RevealConfig,
    pin_config: PinDefaults,
    tilt_config: TiltConfig,
    glow_style: GlowStyle,
    elements: FxHashMap<ElementId, ElementRef>,
    reveals: RevealAnimator,
    pins: SlotMap<PinHandle, PinController>,
    tilts: SlotMap<TiltHandle, TiltHost>,
    glows: SlotMap<GlowHandle, HoverGlow>,
    media: ViewportMediaController,
    media_state: MediaState,
    clock: FrameClock,
    scroll_y: f32,
    viewport: Size,
    timestamp: u64,
}

/// Parsed pin section of the config; the trigger is bound per region
struct PinDefaults {
    settings: crate::config::PinSettings,
    mask_start: MaskStart,
    easing: Easing,
}

impl Scene {
    /// Build an empty scene from validated configuration
    pub fn new(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let media_state = MediaState::new();
        media_state.set_source(config.media.source.clone());

        let mut clock = FrameClock::new();
        clock.set_target_fps(config.clock.target_fps);
        clock.set_max_dt(config.clock.max_dt);

        Ok(Self {
            reveal_config: config.reveal.to_config()?,
            pin_config: PinDefaults {
                settings: config.pin.clone(),
                mask_start: config.pin.mask_start(),
                easing: config.pin.easing()?,
            },
            tilt_config: config.tilt.to_config(),
            glow_style: config.glow.to_style()?,
            elements: FxHashMap::default(),
            reveals: RevealAnimator::new(),
            pins: SlotMap::with_key(),
            tilts: SlotMap::with_key(),
            glows: SlotMap::with_key(),
            media: ViewportMediaController::new(config.media.padding),
            media_state,
            clock,
            scroll_y: 0.0,
            viewport: config.viewport.size(),
            timestamp: 0,
        })
    }

    /// Share an externally owned media state instead of the scene's own
    pub fn with_media_state(mut self, state: MediaState) -> Self {
        self.media_state = state;
        self
    }

    pub fn media_state(&self) -> &MediaState {
        &self.media_state
    }

    /// The shared handle for `id`, populated while the element is mounted
    pub fn element(&mut self, id: ElementId) -> ElementRef {
        self.elements.entry(id).or_default().clone()
    }

    pub fn mount(&mut self, id: ElementId) {
        self.elements.entry(id).or_default().mount(id);
    }

    pub fn unmount(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get(&id) {
            element.unmount();
        }
    }

    pub fn reveal_config(&self) -> &RevealConfig {
        &self.reveal_config
    }

    /// Reveal `id` with the configured defaults
    pub fn add_reveal(&mut self, id: ElementId) -> vista_core::Result<RevealHandle> {
        let config = self.reveal_config;
        self.add_reveal_with(id, config)
    }

    pub fn add_reveal_with(
        &mut self,
        id: ElementId,
        config: RevealConfig,
    ) -> vista_core::Result<RevealHandle> {
        let element = self.element(id);
        self.reveals.attach(element, config)
    }

    pub fn remove_reveal(&mut self, handle: RevealHandle) -> bool {
        self.reveals.detach(handle)
    }

    /// Pin `trigger` with the configured region, optionally killing `override_reveal` on
    /// first activation
    pub fn add_pin(
        &mut self,
        trigger: ElementId,
        override_reveal: Option<RevealHandle>,
    ) -> Result<PinHandle, ConfigError> {
        let element = self.element(trigger);
        let region = self.pin_config.settings.to_region(element)?;
        let mut pin = PinController::new(region, self.pin_config.mask_start)?
            .with_easing(self.pin_config.easing);
        if let Some(handle) = override_reveal {
            pin.override_reveal(handle);
        }
        Ok(self.pins.insert(pin))
    }

    pub fn remove_pin(&mut self, handle: PinHandle) -> bool {
        self.pins.remove(handle).is_some()
    }

    pub fn pin_output(&self, handle: PinHandle) -> Option<PinOutput> {
        self.pins.get(handle).map(|pin| pin.output())
    }

    pub fn add_tilt(&mut self, id: ElementId) -> TiltHandle {
        let element = self.element(id);
        self.tilts.insert(TiltHost::new(element, self.tilt_config))
    }

    pub fn remove_tilt(&mut self, handle: TiltHandle) -> bool {
        self.tilts.remove(handle).is_some()
    }

    pub fn add_glow(&mut self, id: ElementId) -> GlowHandle {
        let element = self.element(id);
        self.glows.insert(HoverGlow::new(element, self.glow_style))
    }

    pub fn remove_glow(&mut self, handle: GlowHandle) -> bool {
        self.glows.remove(handle).is_some()
    }

    pub fn add_media_container(&mut self, id: ElementId) -> ContainerHandle {
        let element = self.element(id);
        self.media.attach(element)
    }

    pub fn add_media(
        &mut self,
        container: ContainerHandle,
        medium: Box<dyn MediaElement>,
    ) -> Option<usize> {
        self.media.add_media(container, medium)
    }

    pub fn remove_media_container(&mut self, handle: ContainerHandle) -> bool {
        self.media.detach(handle)
    }

    pub fn reveals(&self) -> &RevealAnimator {
        &self.reveals
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot::new(self.scroll_y, self.viewport, self.timestamp)
    }

    /// Whether any tween or scrub is still moving
    pub fn is_animating(&self) -> bool {
        self.reveals.is_animating() || self.pins.values().any(|pin| pin.is_animating())
    }

    /// Route one input event
    pub fn handle_event<G: GeometrySampler + ?Sized>(
        &mut self,
        event: &Event,
        sampler: &G,
    ) -> FrameOutput {
        self.timestamp = event.timestamp;
        let mut media = Vec::new();

        match event.event_type {
            SCROLL => {
                if let Some(offset) = event.scroll_offset() {
                    self.scroll_y = offset;
                }
                media = self.scroll_pass(sampler);
            }
            RESIZE => {
                if let Some(size) = event.viewport_size() {
                    self.viewport = size;
                }
                for pin in self.pins.values_mut() {
                    pin.refresh();
                }
                media = self.scroll_pass(sampler);
            }
            POINTER_MOVE | POINTER_ENTER | POINTER_LEAVE => self.route_pointer(event, sampler),
            MOUNT => {
                if let Some(id) = event.target {
                    self.mount(id);
                    media = self.scroll_pass(sampler);
                }
            }
            UNMOUNT => {
                if let Some(id) = event.target {
                    self.unmount(id);
                }
            }
            FRAME => {
                if let vista_core::EventData::Frame { dt } = event.data {
                    self.advance(dt);
                }
            }
            other => tracing::trace!(event_type = other, "unhandled event"),
        }

        self.output(media)
    }

    /// Advance by wall-clock time since the previous call
    pub fn tick(&mut self, timestamp: u64) -> FrameOutput {
        let dt = self.clock.tick();
        self.timestamp = timestamp;
        self.advance(dt);
        self.output(Vec::new())
    }

    fn advance(&mut self, dt: f32) {
        self.reveals.tick(dt);
        for pin in self.pins.values_mut() {
            pin.tick(dt);
        }
    }

    fn scroll_pass<G: GeometrySampler + ?Sized>(&mut self, sampler: &G) -> Vec<MediaCommandRecord> {
        let snapshot = self.snapshot();
        for pin in self.pins.values_mut() {
            pin.update(&snapshot, sampler, &mut self.reveals);
        }
        self.reveals.update(&snapshot, sampler);
        self.media.sample(snapshot.viewport_height(), sampler)
    }

    fn route_pointer<G: GeometrySampler + ?Sized>(&mut self, event: &Event, sampler: &G) {
        let Some(target) = event.target else {
            return;
        };
        let position = event.pointer_position();

        for tilt in self.tilts.values_mut() {
            if tilt.element().get() != Some(target) {
                continue;
            }
            match (event.event_type, position) {
                (POINTER_LEAVE, _) => {
                    tilt.on_pointer_leave();
                }
                (_, Some(point)) => {
                    tilt.on_pointer_move(point, sampler);
                }
                _ => {}
            }
        }

        for glow in self.glows.values_mut() {
            if glow.element().get() != Some(target) {
                continue;
            }
            match event.event_type {
                POINTER_ENTER => {
                    glow.on_pointer_enter();
                }
                POINTER_LEAVE => {
                    glow.on_pointer_leave();
                }
                _ => {}
            }
            if let (POINTER_MOVE, Some(point)) = (event.event_type, position) {
                glow.on_pointer_move(point, sampler);
            }
        }
    }

    fn output(&self, media: Vec<MediaCommandRecord>) -> FrameOutput {
        let reveals = self
            .reveals
            .visuals()
            .filter_map(|(handle, element, visual)| {
                let phase = self.reveals.phase(handle)?;
                Some(RevealFrame {
                    element: element.to_raw(),
                    phase: reveal_phase_name(phase),
                    opacity: visual.opacity,
                    scale: visual.scale,
                    translate_y: visual.translate_y,
                })
            })
            .collect();

        let pins = self
            .pins
            .values()
            .map(|pin| {
                let out = pin.output();
                PinFrame {
                    trigger: pin.region().trigger.get().map(ElementId::to_raw),
                    phase: pin_phase_name(out.phase),
                    pinned: out.pinned,
                    translate_y: out.translate_y,
                    spacer: out.spacer,
                    progress: out.progress,
                    mask: out.mask.into(),
                }
            })
            .collect();

        let tilts = self
            .tilts
            .values()
            .filter_map(|tilt| {
                let element = tilt.element().get()?;
                let t = tilt.transform();
                Some(TiltFrame {
                    element: element.to_raw(),
                    rotate_x: t.rotate_x,
                    rotate_y: t.rotate_y,
                    scale: t.scale,
                    transform: t.to_css(),
                })
            })
            .collect();

        let glows = self
            .glows
            .values()
            .filter_map(|glow| {
                let element = glow.element().get()?;
                let state = glow.state();
                Some(GlowFrame {
                    element: element.to_raw(),
                    x: state.origin.x,
                    y: state.origin.y,
                    opacity: state.opacity(),
                    background: glow.to_css(),
                })
            })
            .collect();

        FrameOutput {
            timestamp: self.timestamp,
            scroll_y: self.scroll_y,
            reveals,
            pins,
            tilts,
            glows,
            media,
        }
    }
}
