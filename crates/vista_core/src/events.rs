//! Input events
//!
//! The boundary of the orchestration layer is event input: scroll position changes,
//! pointer movement relative to the viewport, resizes and element lifecycle signals.

use crate::element::ElementId;
use crate::geometry::{Point, Size};

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;

    // Element lifecycle events
    pub const MOUNT: EventType = 60;
    pub const UNMOUNT: EventType = 61;

    /// Per-frame render callback
    pub const FRAME: EventType = 90;
}

/// An input event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    /// Element the event is addressed to; `None` for window-level events
    pub target: Option<ElementId>,
    pub data: EventData,
    /// Milliseconds since session start
    pub timestamp: u64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// Pointer position in viewport coordinates
    Pointer { x: f32, y: f32 },
    /// Absolute document scroll offset
    Scroll { offset_y: f32 },
    Resize { width: f32, height: f32 },
    /// Frame delta in seconds
    Frame { dt: f32 },
    None,
}

impl Event {
    pub fn pointer_move(target: ElementId, x: f32, y: f32, timestamp: u64) -> Self {
        Self::pointer(event_types::POINTER_MOVE, target, x, y, timestamp)
    }

    pub fn pointer_enter(target: ElementId, x: f32, y: f32, timestamp: u64) -> Self {
        Self::pointer(event_types::POINTER_ENTER, target, x, y, timestamp)
    }

    pub fn pointer_leave(target: ElementId, timestamp: u64) -> Self {
        Self {
            event_type: event_types::POINTER_LEAVE,
            target: Some(target),
            data: EventData::None,
            timestamp,
        }
    }

    pub fn scroll(offset_y: f32, timestamp: u64) -> Self {
        Self {
            event_type: event_types::SCROLL,
            target: None,
            data: EventData::Scroll { offset_y },
            timestamp,
        }
    }

    pub fn resize(width: f32, height: f32, timestamp: u64) -> Self {
        Self {
            event_type: event_types::RESIZE,
            target: None,
            data: EventData::Resize { width, height },
            timestamp,
        }
    }

    pub fn frame(dt: f32, timestamp: u64) -> Self {
        Self {
            event_type: event_types::FRAME,
            target: None,
            data: EventData::Frame { dt },
            timestamp,
        }
    }

    pub fn mount(target: ElementId, timestamp: u64) -> Self {
        Self::lifecycle(event_types::MOUNT, target, timestamp)
    }

    pub fn unmount(target: ElementId, timestamp: u64) -> Self {
        Self::lifecycle(event_types::UNMOUNT, target, timestamp)
    }

    fn pointer(event_type: EventType, target: ElementId, x: f32, y: f32, timestamp: u64) -> Self {
        Self {
            event_type,
            target: Some(target),
            data: EventData::Pointer { x, y },
            timestamp,
        }
    }

    fn lifecycle(event_type: EventType, target: ElementId, timestamp: u64) -> Self {
        Self {
            event_type,
            target: Some(target),
            data: EventData::None,
            timestamp,
        }
    }

    /// Pointer position, if this is a pointer event carrying coordinates
    pub fn pointer_position(&self) -> Option<Point> {
        match self.data {
            EventData::Pointer { x, y } => Some(Point::new(x, y)),
            _ => None,
        }
    }

    pub fn scroll_offset(&self) -> Option<f32> {
        match self.data {
            EventData::Scroll { offset_y } => Some(offset_y),
            _ => None,
        }
    }

    pub fn viewport_size(&self) -> Option<Size> {
        match self.data {
            EventData::Resize { width, height } => Some(Size::new(width, height)),
            _ => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self.event_type,
            event_types::POINTER_MOVE | event_types::POINTER_ENTER | event_types::POINTER_LEAVE
        )
    }
}
