//! 3D tilt toward the pointer
//!
//! The rotation is a pure function of where the pointer sits inside the element:
//!
//! ```text
//! rotate_x = (rel_y - 0.5) * max_rotate_x
//! rotate_y = (rel_x - 0.5) * -max_rotate_y
//! ```
//!
//! so the center of the element is neutral and the edges reach half the configured
//! factor. Leaving the element resets to the identity transform.

use vista_core::events::event_types::{POINTER_ENTER, POINTER_LEAVE};
use vista_core::{ElementRect, ElementRef, GeometrySampler, Point, StateMachine};

use crate::hover::HoverState;

pub const DEFAULT_MAX_ROTATE: f32 = 5.0;
pub const DEFAULT_PERSPECTIVE: f32 = 700.0;
pub const DEFAULT_TILT_SCALE: f32 = 0.95;
/// Transition the renderer applies between transforms
pub const DEFAULT_TRANSITION_MS: u32 = 100;

/// Tilt tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltConfig {
    /// Degrees of X rotation across the full element height
    pub max_rotate_x: f32,
    /// Degrees of Y rotation across the full element width
    pub max_rotate_y: f32,
    /// Perspective distance in pixels
    pub perspective: f32,
    /// Uniform scale while tilted
    pub scale: f32,
    pub transition_ms: u32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_rotate_x: DEFAULT_MAX_ROTATE,
            max_rotate_y: DEFAULT_MAX_ROTATE,
            perspective: DEFAULT_PERSPECTIVE,
            scale: DEFAULT_TILT_SCALE,
            transition_ms: DEFAULT_TRANSITION_MS,
        }
    }
}

impl TiltConfig {
    /// Rotation for a pointer at `pointer` over `rect`
    ///
    /// Returns `None` for a degenerate rect. The pointer is clamped to the rect so a move
    /// event delivered just outside the edge can't exceed the edge rotation.
    pub fn transform_at(&self, pointer: Point, rect: &ElementRect) -> Option<TiltTransform> {
        if rect.is_degenerate() {
            return None;
        }
        let local = rect.local_point(pointer);
        let rel_x = (local.x / rect.width).clamp(0.0, 1.0);
        let rel_y = (local.y / rect.height).clamp(0.0, 1.0);
        Some(TiltTransform {
            rotate_x: (rel_y - 0.5) * self.max_rotate_x,
            rotate_y: (rel_x - 0.5) * -self.max_rotate_y,
            scale: self.scale,
            perspective: self.perspective,
        })
    }

    pub fn identity(&self) -> TiltTransform {
        TiltTransform {
            rotate_x: 0.0,
            rotate_y: 0.0,
            scale: 1.0,
            perspective: self.perspective,
        }
    }
}

/// Tilt output
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltTransform {
    /// Degrees
    pub rotate_x: f32,
    /// Degrees
    pub rotate_y: f32,
    pub scale: f32,
    /// Pixels
    pub perspective: f32,
}

impl TiltTransform {
    pub fn is_identity(&self) -> bool {
        self.rotate_x == 0.0 && self.rotate_y == 0.0 && self.scale == 1.0
    }

    /// CSS `transform` value
    pub fn to_css(&self) -> String {
        format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg) scale3d({s}, {s}, {s})",
            self.perspective,
            self.rotate_x,
            self.rotate_y,
            s = self.scale,
        )
    }
}

impl Default for TiltTransform {
    fn default() -> Self {
        TiltConfig::default().identity()
    }
}

/// A tiltable element
pub struct TiltHost {
    element: ElementRef,
    config: TiltConfig,
    hover: StateMachine<HoverState>,
    transform: TiltTransform,
}

impl TiltHost {
    /// Tilt the element behind `element`; the handle may be shared with other effects
    pub fn new(element: ElementRef, config: TiltConfig) -> Self {
        Self {
            element,
            hover: StateMachine::new(HoverState::Idle),
            transform: config.identity(),
            config,
        }
    }

    pub fn element(&self) -> &ElementRef {
        &self.element
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    pub fn transform(&self) -> TiltTransform {
        self.transform
    }

    pub fn is_hovered(&self) -> bool {
        self.hover.current_state().is_hovered()
    }

    /// Recompute from a pointer move. Returns `None` (keeping the prior transform) when the
    /// element isn't mounted or has no area.
    pub fn on_pointer_move<G: GeometrySampler + ?Sized>(
        &mut self,
        pointer: Point,
        sampler: &G,
    ) -> Option<TiltTransform> {
        let Some(rect) = self.element.get().and_then(|id| sampler.sample(id)) else {
            tracing::trace!("tilt target not mounted, skipping");
            return None;
        };
        // A move implies the pointer is over the element
        self.hover.send(POINTER_ENTER);
        let transform = self.config.transform_at(pointer, &rect)?;
        self.transform = transform;
        Some(transform)
    }

    /// Reset to identity
    pub fn on_pointer_leave(&mut self) -> TiltTransform {
        self.hover.send(POINTER_LEAVE);
        self.transform = self.config.identity();
        self.transform
    }
}
