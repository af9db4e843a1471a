//! Typed State Machines
//!
//! Flat state machines whose transition table is a `match` on `(state, event)`.
//! Per-target animation phases (reveal targets, pinned regions) are modelled as small
//! `Copy` enums implementing [`StateTransitions`] and driven through [`StateMachine`],
//! which adds transition history for debugging.
//!
//! ```rust
//! use vista_core::fsm::{EventId, StateMachine, StateTransitions};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Door { Closed, Open }
//!
//! const PUSH: EventId = 1;
//!
//! impl StateTransitions for Door {
//!     fn on_event(&self, event: EventId) -> Option<Self> {
//!         match (self, event) {
//!             (Door::Closed, PUSH) => Some(Door::Open),
//!             (Door::Open, PUSH) => Some(Door::Closed),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut door = StateMachine::new(Door::Closed);
//! door.send(PUSH);
//! assert_eq!(door.current_state(), Door::Open);
//! ```

use smallvec::SmallVec;
use std::hash::Hash;

/// Identifier for an event type sent to a state machine
pub type EventId = u32;

/// Event id recorded in history for [`StateMachine::force`]
pub const FORCED: EventId = u32::MAX;

/// Maximum transitions kept in history
const HISTORY_LIMIT: usize = 32;

/// Transition table for a typed state
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventId) -> Option<Self>;
}

/// A state machine instance over a typed state
#[derive(Clone, Debug)]
pub struct StateMachine<S: StateTransitions> {
    current_state: S,
    /// History of state transitions (for debugging), bounded
    history: SmallVec<[(S, EventId, S); 4]>,
}

impl<S: StateTransitions> StateMachine<S> {
    pub fn new(initial_state: S) -> Self {
        Self {
            current_state: initial_state,
            history: SmallVec::new(),
        }
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: EventId) -> bool {
        self.current_state.on_event(event).is_some()
    }

    /// Send an event, returning the new state when a transition happened
    pub fn send(&mut self, event: EventId) -> Option<S> {
        let from = self.current_state;
        let to = from.on_event(event)?;
        self.record(from, event, to);
        Some(to)
    }

    /// Jump to `state` regardless of the transition table
    pub fn force(&mut self, state: S) {
        let from = self.current_state;
        if from != state {
            self.record(from, FORCED, state);
        }
    }

    /// Get transition history
    pub fn history(&self) -> &[(S, EventId, S)] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn record(&mut self, from: S, event: EventId, to: S) {
        self.current_state = to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((from, event, to));
        tracing::trace!(?from, event, ?to, "state transition");
    }
}

impl<S: StateTransitions + Default> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
