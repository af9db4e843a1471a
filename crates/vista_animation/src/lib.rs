//! Vista Animation System
//!
//! Time- and scroll-driven interpolation.
//!
//! # Features
//!
//! - **Easing**: CSS/GSAP-style curves, including cubic-bezier
//! - **Tweens**: fixed-duration animations that can reverse mid-flight without jumping
//! - **Scrubbed timelines**: progress bound to scroll position, with lag smoothing
//! - **Frame clock**: wall-clock to per-frame delta conversion

pub mod clock;
pub mod easing;
pub mod presets;
pub mod scrub;
pub mod tween;

pub use clock::FrameClock;
pub use easing::Easing;
pub use presets::AnimationPreset;
pub use scrub::ScrubTimeline;
pub use tween::{Interpolate, PlayDirection, Tween, VisualState};
