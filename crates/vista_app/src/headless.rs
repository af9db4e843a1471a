//! Headless page for testing and replay
//!
//! A [`HeadlessPage`] holds a static document layout (element boxes in document
//! coordinates) plus a scroll position, and answers geometry queries the way a browser
//! would: viewport-relative rects, `None` for anything unmounted. Rendered translations
//! (the pin offset of a pinned section) apply to an element and everything nested in it.
//! A pin spacer pushes every element laid out at or below its trigger's bottom edge
//! down by the reserved height.
//!
//! [`HeadlessVideo`] is a scriptable [`MediaElement`] that records the commands it
//! receives.

use std::cell::Cell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use vista_core::{ElementId, ElementRect, GeometrySampler, Result, Size, VistaError};
use vista_media::MediaElement;

/// Layout of one element in document coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutBox {
    pub left: f32,
    /// Distance from the top of the document
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Enclosing element; its translation and mount state apply to this one
    pub parent: Option<ElementId>,
}

impl LayoutBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            parent: None,
        }
    }

    pub fn within(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Nesting deeper than this is treated as a cycle
const MAX_DEPTH: usize = 64;

/// A document with fixed layout and a movable viewport
#[derive(Debug)]
pub struct HeadlessPage {
    viewport: Size,
    scroll_y: f32,
    boxes: FxHashMap<ElementId, LayoutBox>,
    mounted: FxHashSet<ElementId>,
    translations: FxHashMap<ElementId, f32>,
    spacers: FxHashMap<ElementId, f32>,
}

impl HeadlessPage {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            scroll_y: 0.0,
            boxes: FxHashMap::default(),
            mounted: FxHashSet::default(),
            translations: FxHashMap::default(),
            spacers: FxHashMap::default(),
        }
    }

    /// Add (and mount) an element
    pub fn insert(&mut self, id: ElementId, layout: LayoutBox) {
        self.boxes.insert(id, layout);
        self.mounted.insert(id);
    }

    /// Add an element without mounting it
    pub fn insert_unmounted(&mut self, id: ElementId, layout: LayoutBox) {
        self.boxes.insert(id, layout);
    }

    /// Returns false if the element has no layout
    pub fn mount(&mut self, id: ElementId) -> bool {
        if !self.boxes.contains_key(&id) {
            return false;
        }
        self.mounted.insert(id);
        true
    }

    /// Returns false if the element was not mounted
    pub fn unmount(&mut self, id: ElementId) -> bool {
        self.mounted.remove(&id)
    }

    pub fn is_mounted(&self, id: ElementId) -> bool {
        self.mounted.contains(&id)
    }

    pub fn layout(&self, id: ElementId) -> Option<&LayoutBox> {
        self.boxes.get(&id)
    }

    /// Scroll the document. Offsets above the top clamp to 0.
    pub fn scroll_to(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Rendered vertical translation of `id` and its descendants
    pub fn set_translate_y(&mut self, id: ElementId, dy: f32) {
        if dy == 0.0 {
            self.translations.remove(&id);
        } else {
            self.translations.insert(id, dy);
        }
    }

    pub fn translate_y(&self, id: ElementId) -> f32 {
        self.translations.get(&id).copied().unwrap_or(0.0)
    }

    /// Reserve `height` of layout space after `trigger`
    pub fn set_spacer(&mut self, trigger: ElementId, height: f32) {
        if height <= 0.0 {
            self.spacers.remove(&trigger);
        } else {
            self.spacers.insert(trigger, height);
        }
    }

    pub fn spacer(&self, trigger: ElementId) -> f32 {
        self.spacers.get(&trigger).copied().unwrap_or(0.0)
    }

    /// Bottom of the lowest element, including reserved spacer height
    pub fn document_height(&self) -> f32 {
        let content = self
            .boxes
            .values()
            .map(|b| b.top + b.height)
            .fold(0.0, f32::max);
        content + self.spacers.values().sum::<f32>()
    }

    /// Spacer height of every pin trigger that ends at or above `layout`
    fn spacer_offset(&self, id: ElementId, layout: &LayoutBox) -> f32 {
        self.spacers
            .iter()
            .filter(|&(&trigger, _)| trigger != id && !self.is_within(id, trigger))
            .filter_map(|(trigger, height)| {
                let trigger_box = self.boxes.get(trigger)?;
                (layout.top >= trigger_box.top + trigger_box.height).then_some(*height)
            })
            .sum()
    }

    fn is_within(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.boxes.get(&id).and_then(|b| b.parent);
        for _ in 0..MAX_DEPTH {
            match current {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => current = self.boxes.get(&parent).and_then(|b| b.parent),
                None => return false,
            }
        }
        false
    }

    /// Summed translation of `id` and its ancestors, or `None` if any is unmounted
    fn rendered_offset(&self, id: ElementId) -> Option<f32> {
        let mut offset = 0.0;
        let mut current = Some(id);
        for _ in 0..MAX_DEPTH {
            let Some(element) = current else {
                return Some(offset);
            };
            if !self.mounted.contains(&element) {
                return None;
            }
            offset += self.translate_y(element);
            current = self.boxes.get(&element)?.parent;
        }
        tracing::warn!(?id, "element nesting too deep, treating as unmounted");
        None
    }
}

impl GeometrySampler for HeadlessPage {
    fn sample(&self, element: ElementId) -> Option<ElementRect> {
        let layout = self.boxes.get(&element)?;
        let offset = self.rendered_offset(element)? + self.spacer_offset(element, layout);
        Some(ElementRect::new(
            layout.left,
            layout.top - self.scroll_y + offset,
            layout.width,
            layout.height,
        ))
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}

#[derive(Debug, Default)]
struct VideoState {
    paused: Cell<bool>,
    autoplay_blocked: Cell<bool>,
    plays: Cell<usize>,
    pauses: Cell<usize>,
}

/// A fake video element; clones share state
#[derive(Clone, Debug, Default)]
pub struct HeadlessVideo {
    state: Rc<VideoState>,
}

impl HeadlessVideo {
    /// A video that is already playing
    pub fn playing() -> Self {
        Self::default()
    }

    pub fn paused() -> Self {
        let video = Self::default();
        video.state.paused.set(true);
        video
    }

    /// Refuse play requests, as an autoplay policy would
    pub fn set_autoplay_blocked(&self, blocked: bool) {
        self.state.autoplay_blocked.set(blocked);
    }

    pub fn play_requests(&self) -> usize {
        self.state.plays.get()
    }

    pub fn pause_requests(&self) -> usize {
        self.state.pauses.get()
    }
}

impl MediaElement for HeadlessVideo {
    fn is_paused(&self) -> bool {
        self.state.paused.get()
    }

    fn play(&mut self) -> Result<()> {
        self.state.plays.set(self.state.plays.get() + 1);
        if self.state.autoplay_blocked.get() {
            return Err(VistaError::MediaCommandRejected(
                "play() blocked by autoplay policy".to_string(),
            ));
        }
        self.state.paused.set(false);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.state.pauses.set(self.state.pauses.get() + 1);
        self.state.paused.set(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: ElementId = ElementId(1);
    const IMAGE: ElementId = ElementId(2);

    fn page() -> HeadlessPage {
        let mut page = HeadlessPage::new(Size::new(1280.0, 800.0));
        page.insert(SECTION, LayoutBox::new(0.0, 2000.0, 1280.0, 800.0));
        page.insert(IMAGE, LayoutBox::new(100.0, 2100.0, 600.0, 400.0).within(SECTION));
        page
    }

    #[test]
    fn test_sample_is_viewport_relative() {
        let mut page = page();
        page.scroll_to(1500.0);
        let rect = page.sample(SECTION).unwrap();
        assert_eq!(rect.top, 500.0);
        assert_eq!(rect.bottom, 1300.0);
        assert_eq!(page.document_height(), 2800.0);
    }

    #[test]
    fn test_translation_applies_to_children() {
        let mut page = page();
        page.scroll_to(2300.0);
        page.set_translate_y(SECTION, 300.0);
        assert_eq!(page.sample(SECTION).unwrap().top, 0.0);
        assert_eq!(page.sample(IMAGE).unwrap().top, 100.0);

        page.set_translate_y(SECTION, 0.0);
        assert_eq!(page.sample(IMAGE).unwrap().top, -200.0);
    }

    #[test]
    fn test_spacer_pushes_following_content() {
        const NEXT: ElementId = ElementId(3);
        let mut page = page();
        page.insert(NEXT, LayoutBox::new(0.0, 2800.0, 1280.0, 600.0));
        page.scroll_to(2400.0);
        page.set_translate_y(SECTION, 400.0);
        page.set_spacer(SECTION, 800.0);

        let section = page.sample(SECTION).unwrap();
        let next = page.sample(NEXT).unwrap();
        assert_eq!((section.top, section.bottom), (0.0, 800.0));
        assert!(next.top >= section.bottom);
        assert_eq!(next.top, 1200.0);
        // Nested content moves with the pin, not the spacer
        assert_eq!(page.sample(IMAGE).unwrap().top, 100.0);
        assert_eq!(page.document_height(), 4200.0);

        page.set_spacer(SECTION, 0.0);
        assert_eq!(page.sample(NEXT).unwrap().top, 400.0);
    }

    #[test]
    fn test_unmounted_parent_hides_child() {
        let mut page = page();
        assert!(page.unmount(SECTION));
        assert!(page.sample(SECTION).is_none());
        assert!(page.sample(IMAGE).is_none());
        assert!(page.mount(SECTION));
        assert!(page.sample(IMAGE).is_some());
        assert!(!page.mount(ElementId(99)));
    }

    #[test]
    fn test_scroll_clamps_at_top() {
        let mut page = page();
        page.scroll_to(-50.0);
        assert_eq!(page.scroll_y(), 0.0);
    }

    #[test]
    fn test_video_records_commands() {
        let video = HeadlessVideo::paused();
        let mut handle = video.clone();
        video.set_autoplay_blocked(true);
        assert!(handle.play().is_err());
        assert!(video.is_paused());

        video.set_autoplay_blocked(false);
        handle.play().unwrap();
        handle.pause().unwrap();
        assert_eq!(video.play_requests(), 2);
        assert_eq!(video.pause_requests(), 1);
        assert!(video.is_paused());
    }
}
