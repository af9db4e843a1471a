//! Scroll-triggered reveal animations
//!
//! Each registered target owns a reversible tween between a hidden and a visible
//! [`VisualState`] and a small phase machine:
//!
//! ```text
//!   Hidden ──enter──▶ Entering ──settle──▶ Visible
//!     ▲                 │   ▲                 │
//!     │               exit enter              │
//!   settle              ▼   │                 │
//!     └────────────── Exiting ◀────exit───────┘
//! ```
//!
//! Triggers are evaluated from the target's own geometry only:
//!
//! - **enter**: the target's top edge rises to or above the enter line
//!   (`enter_threshold` × viewport height), or is already above it on the first sample.
//!   Under [`ExitEdge::EndLine`] a target that left through the exit line also enters
//!   again when its bottom edge rises back past that line.
//! - **exit**: scrolling back, the target's bottom edge drops back below the exit line
//!   (`exit_threshold` × viewport height) or its top drops back below the enter line.
//!   [`ExitEdge::StartLine`] limits exits to the latter.
//!
//! Under [`TogglePolicy::PlayOnce`] exits never fire.

use slotmap::{new_key_type, SlotMap};
use vista_animation::{AnimationPreset, Easing, Tween, VisualState};
use vista_core::fsm::{EventId, StateMachine, StateTransitions};
use vista_core::{ElementId, ElementRect, ElementRef, GeometrySampler, Result, VistaError};

use crate::snapshot::ScrollSnapshot;

/// Default enter line, as a fraction of viewport height
pub const DEFAULT_ENTER_THRESHOLD: f32 = 0.9;
/// Default exit line, as a fraction of viewport height
pub const DEFAULT_EXIT_THRESHOLD: f32 = 0.4;
/// Default reveal duration in seconds
pub const DEFAULT_DURATION: f32 = vista_animation::presets::REVEAL_DURATION;

new_key_type! {
    /// Subscription handle for a registered reveal target
    pub struct RevealHandle;
}

/// What a target does when the page scrolls back past it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TogglePolicy {
    /// Play forward on enter, reverse on exit
    #[default]
    PlayReverse,
    /// Play forward once; never return to hidden
    PlayOnce,
}

/// Which backward crossings reverse a visible target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExitEdge {
    /// Bottom edge back below the exit line, or top back below the enter line
    #[default]
    EndLine,
    /// Only the top edge back below the enter line
    StartLine,
}

/// Animation phase of a reveal target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealPhase {
    #[default]
    Hidden,
    Entering,
    Visible,
    Exiting,
}

/// Reveal phase events
pub mod reveal_events {
    use vista_core::fsm::EventId;

    pub const ENTER: EventId = 1;
    pub const EXIT: EventId = 2;
    /// The tween reached its destination
    pub const SETTLE: EventId = 3;
}

impl StateTransitions for RevealPhase {
    fn on_event(&self, event: EventId) -> Option<Self> {
        use reveal_events::*;
        match (self, event) {
            (RevealPhase::Hidden, ENTER) => Some(RevealPhase::Entering),
            (RevealPhase::Exiting, ENTER) => Some(RevealPhase::Entering),
            (RevealPhase::Entering, EXIT) => Some(RevealPhase::Exiting),
            (RevealPhase::Visible, EXIT) => Some(RevealPhase::Exiting),
            (RevealPhase::Entering, SETTLE) => Some(RevealPhase::Visible),
            (RevealPhase::Exiting, SETTLE) => Some(RevealPhase::Hidden),
            _ => None,
        }
    }
}

/// Per-target reveal configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealConfig {
    pub initial: VisualState,
    pub final_state: VisualState,
    /// Enter line as a fraction of viewport height
    pub enter_threshold: f32,
    /// Exit line as a fraction of viewport height
    pub exit_threshold: f32,
    /// Seconds
    pub duration: f32,
    pub easing: Easing,
    pub toggle_policy: TogglePolicy,
    pub exit_edge: ExitEdge,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            initial: AnimationPreset::RISE_IN_FROM,
            final_state: VisualState::IDENTITY,
            enter_threshold: DEFAULT_ENTER_THRESHOLD,
            exit_threshold: DEFAULT_EXIT_THRESHOLD,
            duration: DEFAULT_DURATION,
            easing: Easing::EaseOutQuart,
            toggle_policy: TogglePolicy::PlayReverse,
            exit_edge: ExitEdge::EndLine,
        }
    }
}

impl RevealConfig {
    pub fn play_once(mut self) -> Self {
        self.toggle_policy = TogglePolicy::PlayOnce;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("reveal.enter_threshold", self.enter_threshold),
            ("reveal.exit_threshold", self.exit_threshold),
        ] {
            if !value.is_finite() {
                return Err(VistaError::invalid(field, "must be finite"));
            }
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(VistaError::invalid(
                "reveal.duration",
                format!("must be a finite value >= 0, got {}", self.duration),
            ));
        }
        Ok(())
    }
}

/// Where a target's edges sat relative to its trigger lines at the last sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LinePosition {
    /// Top edge at or above the enter line
    past_start: bool,
    /// Bottom edge at or above the exit line
    past_end: bool,
}

impl LinePosition {
    fn of(rect: &ElementRect, config: &RevealConfig, viewport_height: f32) -> Self {
        Self {
            past_start: rect.top <= config.enter_threshold * viewport_height,
            past_end: rect.bottom <= config.exit_threshold * viewport_height,
        }
    }
}

struct RevealTarget {
    element: ElementRef,
    config: RevealConfig,
    tween: Tween<VisualState>,
    phase: StateMachine<RevealPhase>,
    last_position: Option<LinePosition>,
    killed: bool,
}

impl RevealTarget {
    fn new(element: ElementRef, config: RevealConfig) -> Self {
        Self {
            element,
            tween: Tween::new(config.initial, config.final_state, config.duration, config.easing),
            config,
            phase: StateMachine::new(RevealPhase::Hidden),
            last_position: None,
            killed: false,
        }
    }

    /// Work out which trigger (if any) this sample fires
    fn trigger(&self, now: LinePosition) -> Option<EventId> {
        let entered = now.past_start && !self.last_position.is_some_and(|p| p.past_start);
        if entered {
            return Some(reveal_events::ENTER);
        }

        let prev = self.last_position?;
        // An end-line exit is undone by crossing the same line forward again
        let reentered = self.config.exit_edge == ExitEdge::EndLine
            && now.past_start
            && !prev.past_end
            && now.past_end
            && matches!(
                self.phase.current_state(),
                RevealPhase::Hidden | RevealPhase::Exiting
            );
        if reentered {
            return Some(reveal_events::ENTER);
        }

        if self.config.toggle_policy == TogglePolicy::PlayOnce {
            return None;
        }
        let left_start = prev.past_start && !now.past_start;
        let left_end = prev.past_end && !now.past_end;
        let exited = match self.config.exit_edge {
            ExitEdge::EndLine => left_start || left_end,
            ExitEdge::StartLine => left_start,
        };
        exited.then_some(reveal_events::EXIT)
    }

    fn apply(&mut self, event: EventId) {
        let Some(phase) = self.phase.send(event) else {
            return;
        };
        match phase {
            RevealPhase::Entering => self.tween.play(),
            RevealPhase::Exiting => self.tween.reverse(),
            _ => {}
        }
        // Zero-duration tweens arrive immediately
        if !self.tween.is_playing() {
            self.phase.send(reveal_events::SETTLE);
        }
        tracing::debug!(
            element = ?self.element.get(),
            phase = ?self.phase.current_state(),
            "reveal transition"
        );
    }
}

/// Drives scroll-triggered reveal animations for any number of targets
pub struct RevealAnimator {
    targets: SlotMap<RevealHandle, RevealTarget>,
}

impl RevealAnimator {
    pub fn new() -> Self {
        Self {
            targets: SlotMap::with_key(),
        }
    }

    /// Register a target. It starts Hidden, rendered at `config.initial`.
    pub fn attach(&mut self, element: ElementRef, config: RevealConfig) -> Result<RevealHandle> {
        config.validate()?;
        Ok(self.targets.insert(RevealTarget::new(element, config)))
    }

    /// Unregister a target. Safe to call repeatedly; returns whether anything was removed.
    pub fn detach(&mut self, handle: RevealHandle) -> bool {
        self.targets.remove(handle).is_some()
    }

    /// Evaluate every target's triggers against one scroll snapshot
    pub fn update<G: GeometrySampler + ?Sized>(&mut self, snapshot: &ScrollSnapshot, sampler: &G) {
        let viewport_height = snapshot.viewport_height();
        for (handle, target) in self.targets.iter_mut() {
            if target.killed {
                continue;
            }
            let Some(rect) = target.element.get().and_then(|id| sampler.sample(id)) else {
                tracing::trace!(?handle, "reveal target not mounted, skipping");
                continue;
            };

            let position = LinePosition::of(&rect, &target.config, viewport_height);
            if let Some(event) = target.trigger(position) {
                target.apply(event);
            }
            target.last_position = Some(position);
        }
    }

    /// Advance running tweens by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for (_, target) in self.targets.iter_mut() {
            if target.killed {
                continue;
            }
            if target.tween.tick(dt) {
                target.phase.send(reveal_events::SETTLE);
            }
        }
    }

    /// Stop a target permanently.
    ///
    /// With `jump_to_final` the target is set to its final state and reported as
    /// Visible. A killed target ignores all further scroll samples and cannot be resumed.
    pub fn kill(&mut self, handle: RevealHandle, jump_to_final: bool) -> bool {
        let Some(target) = self.targets.get_mut(handle) else {
            return false;
        };
        if jump_to_final {
            target.tween.seek_end();
            target.phase.force(RevealPhase::Visible);
        } else {
            target.tween.pause();
        }
        if !target.killed {
            tracing::debug!(element = ?target.element.get(), jump_to_final, "reveal killed");
        }
        target.killed = true;
        true
    }

    pub fn is_killed(&self, handle: RevealHandle) -> bool {
        self.targets.get(handle).is_some_and(|t| t.killed)
    }

    pub fn phase(&self, handle: RevealHandle) -> Option<RevealPhase> {
        self.targets.get(handle).map(|t| t.phase.current_state())
    }

    /// Current visual state of a target
    pub fn visual(&self, handle: RevealHandle) -> Option<VisualState> {
        self.targets.get(handle).map(|t| t.tween.value())
    }

    /// Visual state of every mounted target
    pub fn visuals(&self) -> impl Iterator<Item = (RevealHandle, ElementId, VisualState)> + '_ {
        self.targets
            .iter()
            .filter_map(|(handle, t)| t.element.get().map(|id| (handle, id, t.tween.value())))
    }

    /// Whether any tween is still running
    pub fn is_animating(&self) -> bool {
        self.targets
            .iter()
            .any(|(_, t)| !t.killed && t.tween.is_playing())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Default for RevealAnimator {
    fn default() -> Self {
        Self::new()
    }
}
