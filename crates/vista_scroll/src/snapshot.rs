//! Per-turn scroll snapshot

use vista_core::Size;

/// Scroll state sampled once per event turn
///
/// Every consumer handling the same turn reads the same snapshot, so reveal targets and
/// the pinned region never disagree about where the page is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSnapshot {
    /// Document scroll offset in pixels
    pub scroll_y: f32,
    pub viewport: Size,
    /// Milliseconds since session start
    pub timestamp: u64,
}

impl ScrollSnapshot {
    pub fn new(scroll_y: f32, viewport: Size, timestamp: u64) -> Self {
        Self {
            scroll_y,
            viewport,
            timestamp,
        }
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_height() {
        let snapshot = ScrollSnapshot::new(100.0, Size::new(1280.0, 800.0), 16);
        assert_eq!(snapshot.viewport_height(), 800.0);
        assert_eq!(snapshot.scroll_y, 100.0);
    }
}
