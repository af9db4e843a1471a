//! Hover state shared by pointer effects

use vista_core::events::event_types::{POINTER_ENTER, POINTER_LEAVE};
use vista_core::fsm::{EventId, StateTransitions};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HoverState {
    #[default]
    Idle,
    Hovered,
}

impl HoverState {
    pub fn is_hovered(&self) -> bool {
        matches!(self, HoverState::Hovered)
    }
}

impl StateTransitions for HoverState {
    fn on_event(&self, event: EventId) -> Option<Self> {
        match (self, event) {
            (HoverState::Idle, POINTER_ENTER) => Some(HoverState::Hovered),
            (HoverState::Hovered, POINTER_LEAVE) => Some(HoverState::Idle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::StateMachine;

    #[test]
    fn test_enter_leave() {
        let mut fsm = StateMachine::new(HoverState::Idle);
        assert_eq!(fsm.send(POINTER_ENTER), Some(HoverState::Hovered));
        assert_eq!(fsm.send(POINTER_ENTER), None);
        assert!(fsm.current_state().is_hovered());
        assert_eq!(fsm.send(POINTER_LEAVE), Some(HoverState::Idle));
        assert_eq!(fsm.send(POINTER_LEAVE), None);
    }
}
