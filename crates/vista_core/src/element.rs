//! Element identity and mount-populated handles
//!
//! Hosts own the element tree; Vista only refers to elements by [`ElementId`]. Interactive
//! components receive an [`ElementRef`] that the host fills on mount and clears on
//! unmount, so several components (a tilt host and a reveal target, say) can share one
//! element without aliasing each other's state.

use std::cell::Cell;
use std::rc::Rc;

/// Unique identifier for a host element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Shared, externally-populated reference to an element
///
/// Cloning shares the slot: every clone observes the same mount state.
#[derive(Clone, Debug, Default)]
pub struct ElementRef {
    slot: Rc<Cell<Option<ElementId>>>,
}

impl ElementRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle that is already mounted
    pub fn mounted(id: ElementId) -> Self {
        let handle = Self::new();
        handle.mount(id);
        handle
    }

    /// Populate the handle (host mount callback)
    pub fn mount(&self, id: ElementId) {
        if let Some(previous) = self.slot.replace(Some(id)) {
            if previous != id {
                tracing::trace!(?previous, ?id, "element ref remounted");
            }
        }
    }

    /// Clear the handle (host unmount callback). Safe to call repeatedly.
    pub fn unmount(&self) {
        self.slot.set(None);
    }

    pub fn get(&self) -> Option<ElementId> {
        self.slot.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.slot.get().is_some()
    }

    /// True when both handles share the same slot
    pub fn same_slot(&self, other: &ElementRef) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}
