//! Vista Pointer Interactions
//!
//! Pointer-driven effects computed purely from the pointer position and the hovered
//! element's current rect:
//!
//! - **Tilt** ([`TiltHost`]): a small 3D rotation toward the pointer
//! - **Glow** ([`HoverGlow`]): a radial gradient centered under the cursor
//!
//! Neither effect depends on scroll state or on any other instance.

pub mod glow;
pub mod hover;
pub mod tilt;

pub use glow::{GlowState, GlowStyle, HoverGlow};
pub use hover::HoverState;
pub use tilt::{TiltConfig, TiltHost, TiltTransform};
