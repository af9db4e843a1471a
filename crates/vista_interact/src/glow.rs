//! Cursor-relative hover glow
//!
//! A radial gradient follows the pointer inside a card. Moves update the gradient origin,
//! enter and leave toggle its opacity; the opacity fade itself belongs to the renderer.

use vista_core::events::event_types::{POINTER_ENTER, POINTER_LEAVE};
use vista_core::{Color, ElementRef, GeometrySampler, Point, StateMachine};

use crate::hover::HoverState;

pub const DEFAULT_GLOW_RADIUS: f32 = 100.0;
/// `#656fe288`
pub const DEFAULT_GLOW_INNER: u32 = 0x656f_e288;
/// `#00000026`
pub const DEFAULT_GLOW_OUTER: u32 = 0x0000_0026;
pub const DEFAULT_GLOW_TRANSITION_MS: u32 = 300;

/// Gradient appearance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowStyle {
    /// Circle radius in pixels
    pub radius: f32,
    pub inner: Color,
    pub outer: Color,
    /// Opacity transition the renderer applies
    pub transition_ms: u32,
}

impl Default for GlowStyle {
    fn default() -> Self {
        Self {
            radius: DEFAULT_GLOW_RADIUS,
            inner: Color::from_hex_rgba(DEFAULT_GLOW_INNER),
            outer: Color::from_hex_rgba(DEFAULT_GLOW_OUTER),
            transition_ms: DEFAULT_GLOW_TRANSITION_MS,
        }
    }
}

impl GlowStyle {
    /// CSS `background` value for a gradient centered at `origin`
    pub fn to_css(&self, origin: Point) -> String {
        format!(
            "radial-gradient({}px circle at {}px {}px, {}, {})",
            self.radius,
            origin.x,
            origin.y,
            self.inner.to_css_hex(),
            self.outer.to_css_hex(),
        )
    }
}

/// Glow output
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlowState {
    /// Gradient center relative to the element's top-left
    pub origin: Point,
    pub visible: bool,
}

impl GlowState {
    pub fn opacity(&self) -> f32 {
        if self.visible {
            1.0
        } else {
            0.0
        }
    }
}

/// Glow attached to one element
pub struct HoverGlow {
    element: ElementRef,
    style: GlowStyle,
    hover: StateMachine<HoverState>,
    origin: Point,
}

impl HoverGlow {
    pub fn new(element: ElementRef, style: GlowStyle) -> Self {
        Self {
            element,
            style,
            hover: StateMachine::new(HoverState::Idle),
            origin: Point::ZERO,
        }
    }

    pub fn element(&self) -> &ElementRef {
        &self.element
    }

    pub fn style(&self) -> &GlowStyle {
        &self.style
    }

    pub fn state(&self) -> GlowState {
        GlowState {
            origin: self.origin,
            visible: self.hover.current_state().is_hovered(),
        }
    }

    /// Move the gradient under the pointer. Skipped when the element isn't mounted.
    pub fn on_pointer_move<G: GeometrySampler + ?Sized>(
        &mut self,
        pointer: Point,
        sampler: &G,
    ) -> Option<GlowState> {
        let Some(rect) = self.element.get().and_then(|id| sampler.sample(id)) else {
            tracing::trace!("glow target not mounted, skipping");
            return None;
        };
        self.origin = rect.local_point(pointer);
        Some(self.state())
    }

    pub fn on_pointer_enter(&mut self) -> GlowState {
        self.hover.send(POINTER_ENTER);
        self.state()
    }

    pub fn on_pointer_leave(&mut self) -> GlowState {
        self.hover.send(POINTER_LEAVE);
        self.state()
    }

    /// CSS `background` for the current origin
    pub fn to_css(&self) -> String {
        self.style.to_css(self.origin)
    }
}
