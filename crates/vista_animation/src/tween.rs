//! Reversible fixed-duration tweens
//!
//! A [`Tween`] interpolates between two values over a fixed duration. Reversing it runs
//! the same eased curve backwards from wherever it currently is, so interrupting an
//! enter animation with an exit never produces a visual jump.

use crate::easing::Easing;

/// Values that can be linearly interpolated
pub trait Interpolate: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

/// The transform properties driven by scroll reveals
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Uniform scale factor
    pub scale: f32,
    /// Translation Y in pixels
    pub translate_y: f32,
}

impl VisualState {
    /// Fully opaque, unscaled, untranslated
    pub const IDENTITY: VisualState = VisualState {
        opacity: 1.0,
        scale: 1.0,
        translate_y: 0.0,
    };

    pub const fn new(opacity: f32, scale: f32, translate_y: f32) -> Self {
        Self {
            opacity,
            scale,
            translate_y,
        }
    }

    /// Component-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &VisualState, epsilon: f32) -> bool {
        (self.opacity - other.opacity).abs() <= epsilon
            && (self.scale - other.scale).abs() <= epsilon
            && (self.translate_y - other.translate_y).abs() <= epsilon
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Interpolate for VisualState {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: self.opacity.lerp(&other.opacity, t),
            scale: self.scale.lerp(&other.scale, t),
            translate_y: self.translate_y.lerp(&other.translate_y, t),
        }
    }
}

/// Playback direction of a tween
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayDirection {
    #[default]
    Forward,
    Reverse,
}

/// A reversible tween between two values
#[derive(Clone, Debug)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    /// Duration in seconds
    duration: f32,
    easing: Easing,
    /// Linear progress, always within `0..=1`
    position: f32,
    direction: PlayDirection,
    playing: bool,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            easing,
            position: 0.0,
            direction: PlayDirection::Forward,
            playing: false,
        }
    }

    /// Play toward `to` from the current position
    pub fn play(&mut self) {
        self.direction = PlayDirection::Forward;
        if self.duration <= 0.0 {
            self.position = 1.0;
        }
        self.playing = !self.at_end();
    }

    /// Play toward `from` from the current position
    pub fn reverse(&mut self) {
        self.direction = PlayDirection::Reverse;
        if self.duration <= 0.0 {
            self.position = 0.0;
        }
        self.playing = !self.at_start();
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump to the end and stop
    pub fn seek_end(&mut self) {
        self.position = 1.0;
        self.direction = PlayDirection::Forward;
        self.playing = false;
    }

    /// Jump to the start and stop
    pub fn seek_start(&mut self) {
        self.position = 0.0;
        self.direction = PlayDirection::Forward;
        self.playing = false;
    }

    /// Advance by `dt` seconds. Returns true if the tween reached its destination
    /// during this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.playing || dt <= 0.0 {
            return false;
        }

        // play()/reverse() never leave a zero-duration tween playing
        let step = dt / self.duration;
        match self.direction {
            PlayDirection::Forward => {
                self.position = (self.position + step).min(1.0);
                if self.at_end() {
                    self.playing = false;
                    return true;
                }
            }
            PlayDirection::Reverse => {
                self.position = (self.position - step).max(0.0);
                if self.at_start() {
                    self.playing = false;
                    return true;
                }
            }
        }
        false
    }

    /// Linear progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        self.position
    }

    /// Get the current interpolated value
    pub fn value(&self) -> T {
        self.from.lerp(&self.to, self.easing.apply(self.position))
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn direction(&self) -> PlayDirection {
        self.direction
    }

    pub fn at_start(&self) -> bool {
        self.position <= 0.0
    }

    pub fn at_end(&self) -> bool {
        self.position >= 1.0
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reveal() -> Tween<VisualState> {
        Tween::new(
            VisualState::new(0.0, 0.7, 80.0),
            VisualState::IDENTITY,
            1.2,
            Easing::EaseOutQuart,
        )
    }

    #[test]
    fn test_idle_tween_holds_start() {
        let mut tween = reveal();
        assert!(!tween.tick(0.5));
        assert_eq!(tween.value(), VisualState::new(0.0, 0.7, 80.0));
    }

    #[test]
    fn test_play_to_completion() {
        let mut tween = reveal();
        tween.play();
        assert!(tween.is_playing());

        let mut finished = false;
        for _ in 0..100 {
            finished |= tween.tick(1.0 / 60.0);
        }
        assert!(finished);
        assert!(!tween.is_playing());
        assert!(tween.value().approx_eq(&VisualState::IDENTITY, 1e-5));
    }

    #[test]
    fn test_reverse_mid_flight_is_continuous() {
        let mut tween = reveal();
        tween.play();
        tween.tick(0.3);
        let before = tween.value();
        let progress = tween.progress();

        tween.reverse();
        assert_eq!(tween.direction(), PlayDirection::Reverse);
        assert_eq!(tween.progress(), progress);
        assert_eq!(tween.value(), before);

        tween.tick(0.1);
        assert!(tween.progress() < progress);

        assert!(tween.tick(5.0));
        assert!(tween.at_start());
        assert_eq!(tween.value(), VisualState::new(0.0, 0.7, 80.0));
    }

    #[test]
    fn test_reverse_at_start_is_noop() {
        let mut tween = reveal();
        tween.reverse();
        assert!(!tween.is_playing());
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut tween = Tween::new(0.0f32, 10.0, 0.0, Easing::Linear);
        tween.play();
        assert!(!tween.is_playing());
        assert_eq!(tween.value(), 10.0);

        tween.reverse();
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn test_seek() {
        let mut tween = Tween::new(0.0f32, 10.0, 1.0, Easing::Linear);
        tween.play();
        tween.seek_end();
        assert!(!tween.is_playing());
        assert_eq!(tween.value(), 10.0);
        tween.seek_start();
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn test_visual_state_lerp() {
        let a = VisualState::new(0.0, 0.5, 100.0);
        let b = VisualState::IDENTITY;
        let mid = a.lerp(&b, 0.5);
        assert!(mid.approx_eq(&VisualState::new(0.5, 0.75, 50.0), 1e-6));
    }
}
