//! Integration tests for a complete page
//!
//! These tests drive a [`Scene`] over a [`HeadlessPage`] the way a host would and verify:
//! - reveals enter, settle and reverse as the page scrolls back and forth
//! - a pinned section forces its image visible and it stays that way
//! - media containers pause once when they leave the padded viewport
//! - the shared media state reflects the last write

use vista_app::{HeadlessPage, HeadlessVideo, LayoutBox, ReplayScript, ReplaySession, Scene, SceneConfig};
use vista_core::{ElementId, Event, Size};
use vista_media::{MediaCommand, MediaElement, MediaState};

const HERO: ElementId = ElementId(1);
const CARD: ElementId = ElementId(2);
const SECTION: ElementId = ElementId(3);
const SECTION_IMAGE: ElementId = ElementId(4);

fn page() -> HeadlessPage {
    let mut page = HeadlessPage::new(Size::new(1280.0, 800.0));
    page.insert(HERO, LayoutBox::new(0.0, 0.0, 1280.0, 800.0));
    page.insert(CARD, LayoutBox::new(40.0, 1000.0, 600.0, 400.0));
    page.insert(SECTION, LayoutBox::new(0.0, 2000.0, 1280.0, 800.0));
    page.insert(
        SECTION_IMAGE,
        LayoutBox::new(0.0, 2100.0, 1280.0, 600.0).within(SECTION),
    );
    page
}

fn scene() -> Scene {
    let mut scene = Scene::new(&SceneConfig::default()).unwrap();
    for id in [HERO, CARD, SECTION, SECTION_IMAGE] {
        scene.mount(id);
    }
    scene
}

struct Driver {
    page: HeadlessPage,
    scene: Scene,
    now: u64,
}

impl Driver {
    fn new() -> Self {
        Self {
            page: page(),
            scene: scene(),
            now: 0,
        }
    }

    fn scroll(&mut self, y: f32) -> vista_app::FrameOutput {
        self.now += 16;
        self.page.scroll_to(y);
        self.scene
            .handle_event(&Event::scroll(y, self.now), &self.page)
    }

    fn settle(&mut self) -> vista_app::FrameOutput {
        self.run_frames(90)
    }

    fn run_frames(&mut self, count: usize) -> vista_app::FrameOutput {
        let mut out = None;
        for _ in 0..count {
            self.now += 16;
            out = Some(
                self.scene
                    .handle_event(&Event::frame(1.0 / 60.0, self.now), &self.page),
            );
        }
        out.unwrap()
    }
}

#[test]
fn test_reveal_round_trip() {
    let mut driver = Driver::new();
    driver.scene.add_reveal(CARD).unwrap();

    let out = driver.scroll(0.0);
    let card = out.reveal(CARD).unwrap();
    assert_eq!(card.phase, "hidden");
    assert_eq!(card.opacity, 0.0);

    // Top edge at 600, above the enter line at 720
    let out = driver.scroll(400.0);
    assert_eq!(out.reveal(CARD).unwrap().phase, "entering");

    let out = driver.settle();
    let card = out.reveal(CARD).unwrap();
    assert_eq!(card.phase, "visible");
    assert_eq!((card.opacity, card.scale, card.translate_y), (1.0, 1.0, 0.0));

    let out = driver.scroll(0.0);
    assert_eq!(out.reveal(CARD).unwrap().phase, "exiting");

    let out = driver.settle();
    let card = out.reveal(CARD).unwrap();
    assert_eq!(card.phase, "hidden");
    assert_eq!(card.opacity, 0.0);
}

#[test]
fn test_pinned_image_stays_visible_after_scrolling_back() {
    let mut driver = Driver::new();
    let image = driver.scene.add_reveal(SECTION_IMAGE).unwrap();
    driver.scene.add_pin(SECTION, Some(image)).unwrap();

    let out = driver.scroll(2100.0);
    assert_eq!(out.pins[0].phase, "active");
    assert!(out.pins[0].pinned);
    assert_eq!(out.reveal(SECTION_IMAGE).unwrap().phase, "visible");

    let out = driver.scroll(0.0);
    assert_eq!(out.pins[0].phase, "before");
    assert!(!out.pins[0].pinned);
    let image_frame = out.reveal(SECTION_IMAGE).unwrap();
    assert_eq!(image_frame.phase, "visible");
    assert_eq!(image_frame.opacity, 1.0);

    let out = driver.settle();
    assert_eq!(out.reveal(SECTION_IMAGE).unwrap().phase, "visible");
}

#[test]
fn test_mask_scrubs_toward_viewport() {
    let mut driver = Driver::new();
    driver.scene.add_pin(SECTION, None).unwrap();

    let out = driver.scroll(2000.0);
    let start = out.pins[0].mask.width;
    assert_eq!(start, 1280.0 * 0.3);

    driver.scroll(2800.0);
    let out = driver.run_frames(600);
    let pin = &out.pins[0];
    assert_eq!(pin.phase, "after");
    assert!((pin.mask.width - 1280.0).abs() < 1.0);
    assert!((pin.mask.height - 800.0).abs() < 1.0);
    assert_eq!(pin.spacer, 800.0);
}

#[test]
fn test_media_pauses_once_outside_padding() {
    let mut driver = Driver::new();
    let videos = [HeadlessVideo::playing(), HeadlessVideo::playing()];
    let container = driver.scene.add_media_container(HERO);
    for video in &videos {
        driver.scene.add_media(container, Box::new(video.clone()));
    }

    // Bottom edge at -50: inside the 100px padding
    let out = driver.scroll(850.0);
    assert!(out.media.is_empty());
    assert!(videos.iter().all(|v| !v.is_paused()));

    // Bottom edge at -150
    let out = driver.scroll(950.0);
    assert_eq!(out.media.len(), 2);
    assert!(out
        .media
        .iter()
        .all(|r| r.command == MediaCommand::Pause && r.accepted));
    assert!(videos.iter().all(|v| v.is_paused()));

    for y in [1000.0, 1200.0, 2000.0] {
        let out = driver.scroll(y);
        assert!(out.media.is_empty());
    }
    assert!(videos.iter().all(|v| v.pause_requests() == 1));

    let out = driver.scroll(0.0);
    assert_eq!(out.media.len(), 2);
    assert!(out.media.iter().all(|r| r.command == MediaCommand::Play));
    assert!(videos.iter().all(|v| !v.is_paused()));
}

#[test]
fn test_injected_media_state_is_shared() {
    let state = MediaState::new();
    let scene = Scene::new(&SceneConfig::default())
        .unwrap()
        .with_media_state(state.clone());

    state.set_source("videos/hero-2.mp4");
    state.set_time(7.25);
    assert_eq!(scene.media_state().source(), "videos/hero-2.mp4");
    assert_eq!(scene.media_state().time(), 7.25);

    scene.media_state().set_audio_enabled(true);
    assert!(state.is_audio_enabled());
}

#[test]
fn test_replay_from_json() {
    let script = ReplayScript::from_json(
        r#"{
            "viewport": { "width": 1000, "height": 800 },
            "elements": [
                { "id": 3, "top": 2000, "height": 800 },
                { "id": 4, "top": 2100, "height": 600, "parent": 3 }
            ],
            "reveals": [4],
            "pin": { "trigger": 3, "kill_reveal": 4 },
            "steps": [
                { "type": "scroll", "y": 2400 },
                { "type": "scroll", "y": 0 },
                { "type": "frames", "count": 60, "dt": 0.016 }
            ]
        }"#,
    )
    .unwrap();

    let mut session = ReplaySession::new(&SceneConfig::default(), &script).unwrap();
    let outputs = session.run(&script.steps);
    assert_eq!(outputs.len(), 62);

    let pinned = &outputs[0];
    assert_eq!(pinned.pins[0].translate_y, 400.0);
    assert_eq!(pinned.pins[0].mask.width, 300.0);

    let last = outputs.last().unwrap();
    assert_eq!(last.pins[0].phase, "before");
    assert_eq!(last.reveal(SECTION_IMAGE).unwrap().phase, "visible");
    assert_eq!(session.page().translate_y(SECTION), 0.0);

    let json = serde_json::to_string(last).unwrap();
    assert!(json.contains("\"phase\":\"visible\""));
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // The card's top stays below the enter line (720) for every offset under 280
        #[test]
        fn reveal_stays_hidden_below_enter_line(
            offsets in prop::collection::vec(0.0f32..279.0, 1..20),
        ) {
            let mut driver = Driver::new();
            driver.scene.add_reveal(CARD).unwrap();
            for y in offsets {
                let out = driver.scroll(y);
                let card = out.reveal(CARD).unwrap();
                prop_assert_eq!(card.phase, "hidden");
                prop_assert_eq!(card.opacity, 0.0);
            }
            let out = driver.settle();
            prop_assert_eq!(out.reveal(CARD).unwrap().phase, "hidden");
        }

        #[test]
        fn media_commands_are_idempotent(y in 0.0f32..3000.0) {
            let mut driver = Driver::new();
            let video = HeadlessVideo::playing();
            let container = driver.scene.add_media_container(HERO);
            driver.scene.add_media(container, Box::new(video.clone()));

            driver.scroll(y);
            let out = driver.scroll(y);
            prop_assert!(out.media.is_empty());
            prop_assert!(video.pause_requests() <= 1);
        }
    }
}
