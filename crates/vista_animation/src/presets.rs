//! Animation presets for common reveal animations
//!
//! Each preset returns an idle [`Tween`] over [`VisualState`]; call `play()` to start it.

use crate::easing::Easing;
use crate::tween::{Tween, VisualState};

/// Default reveal duration in seconds
pub const REVEAL_DURATION: f32 = 1.2;

/// Pre-built animation presets for common patterns
pub struct AnimationPreset;

impl AnimationPreset {
    /// Hidden state of the rise-in reveal: transparent, 70% scale, 80px below
    pub const RISE_IN_FROM: VisualState = VisualState::new(0.0, 0.7, 80.0);

    /// Fade, grow and rise into place (the card reveal)
    pub fn rise_in(duration: f32) -> Tween<VisualState> {
        Tween::new(
            Self::RISE_IN_FROM,
            VisualState::IDENTITY,
            duration,
            Easing::EaseOutQuart,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rise_in_endpoints() {
        let mut tween = AnimationPreset::rise_in(REVEAL_DURATION);
        assert_eq!(tween.value(), AnimationPreset::RISE_IN_FROM);
        tween.seek_end();
        assert_eq!(tween.value(), VisualState::IDENTITY);
        assert_eq!(tween.duration(), REVEAL_DURATION);
    }
}
