//! Vista Scroll Orchestration
//!
//! Scroll position drives two kinds of animation:
//!
//! - **Reveals** ([`RevealAnimator`]): per-element enter/exit tweens triggered when an
//!   element crosses lines drawn across the viewport
//! - **Pinned regions** ([`PinController`]): a scroll range during which a trigger element
//!   is held in place while a nested mask is scrubbed from a small shape to the full
//!   viewport
//!
//! Both consume the same [`ScrollSnapshot`], sampled once per event turn, and read element
//! geometry through [`vista_core::GeometrySampler`].

pub mod pin;
pub mod region;
pub mod reveal;
pub mod snapshot;

pub use pin::{MaskShape, MaskStart, PinController, PinOutput, PinPhase};
pub use region::{Anchor, AnimationRegion, DistanceUnit, RegionEnd, ResolvedRegion};
pub use reveal::{ExitEdge, RevealAnimator, RevealConfig, RevealHandle, RevealPhase, TogglePolicy};
pub use snapshot::ScrollSnapshot;
