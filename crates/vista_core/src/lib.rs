//! Vista Core
//!
//! Foundational primitives shared by every Vista crate:
//!
//! - **Geometry**: viewport-relative element rectangles and the [`GeometrySampler`] seam
//! - **Element handles**: ids and mount/unmount-populated [`ElementRef`]s
//! - **Events**: scroll, pointer, resize and lifecycle input
//! - **State Machines**: typed transition tables for per-target animation phases
//!
//! # Example
//!
//! ```rust
//! use vista_core::{ElementId, ElementRect, GeometrySampler, Size};
//!
//! struct Fixed;
//!
//! impl GeometrySampler for Fixed {
//!     fn sample(&self, element: ElementId) -> Option<ElementRect> {
//!         (element == ElementId::new(1)).then(|| ElementRect::new(0.0, 100.0, 200.0, 50.0))
//!     }
//!
//!     fn viewport(&self) -> Size {
//!         Size::new(1280.0, 800.0)
//!     }
//! }
//!
//! let rect = Fixed.sample(ElementId::new(1)).unwrap();
//! assert_eq!(rect.bottom, 150.0);
//! assert!(Fixed.sample(ElementId::new(2)).is_none());
//! ```

pub mod color;
pub mod element;
pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;

pub use color::Color;
pub use element::{ElementId, ElementRef};
pub use error::{Result, VistaError};
pub use events::{Event, EventData, EventType};
pub use fsm::{EventId, StateMachine, StateTransitions};
pub use geometry::{ElementRect, GeometrySampler, Point, Size};
