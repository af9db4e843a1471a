//! Geometry types and the viewport sampling seam
//!
//! Every coordinate in Vista is viewport-relative: `(0, 0)` is the top-left corner of the
//! visible area, `y` grows downward. Geometry is read through a [`GeometrySampler`] at the
//! moment an event is handled and is never cached across frames, since layout may change
//! between samples.

use crate::element::ElementId;
use crate::error::{Result, VistaError};

// ─────────────────────────────────────────────────────────────────────────────
// Core Geometry Types
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or NaN
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Element Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Bounding rectangle of a mounted element, in viewport coordinates
///
/// `bottom` is carried explicitly (it is what visibility checks compare against) and is
/// always `top + height`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub bottom: f32,
}

impl ElementRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            bottom: top + height,
        }
    }

    /// Vertical center line
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    /// A rect with no area cannot host pointer maths (division by width/height)
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Convert a viewport point into coordinates relative to this rect's top-left
    pub fn local_point(&self, point: Point) -> Point {
        Point::new(point.x - self.left, point.y - self.top)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sampler
// ─────────────────────────────────────────────────────────────────────────────

/// Reads element geometry and viewport size on demand
///
/// Implementations must answer from current layout at call time. An element that is not
/// mounted (or has been removed) yields `None`; callers treat that as "skip this update"
/// and keep the prior visual state.
pub trait GeometrySampler {
    /// Bounding rect of `element` relative to the viewport
    fn sample(&self, element: ElementId) -> Option<ElementRect>;

    /// Current viewport size
    fn viewport(&self) -> Size;

    fn viewport_height(&self) -> f32 {
        self.viewport().height
    }

    /// Like [`sample`](Self::sample), but an unmounted element is an error
    fn require(&self, element: ElementId) -> Result<ElementRect> {
        self.sample(element)
            .ok_or(VistaError::MissingElement(element))
    }
}

impl<T: GeometrySampler + ?Sized> GeometrySampler for &T {
    fn sample(&self, element: ElementId) -> Option<ElementRect> {
        (**self).sample(element)
    }

    fn viewport(&self) -> Size {
        (**self).viewport()
    }
}
