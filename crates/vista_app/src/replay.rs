//! Scripted replay
//!
//! A [`ReplayScript`] describes a page layout, which components are attached to which
//! elements, and a sequence of input steps. A [`ReplaySession`] plays the steps against a
//! [`HeadlessPage`] and a [`Scene`], applying each frame's pin translations back to the
//! page the way a renderer would.
//!
//! ```json
//! {
//!   "elements": [
//!     { "id": 1, "top": 2000, "height": 800 },
//!     { "id": 2, "top": 2100, "height": 600, "parent": 1 }
//!   ],
//!   "reveals": [2],
//!   "pin": { "trigger": 1, "kill_reveal": 2 },
//!   "steps": [
//!     { "type": "scroll", "y": 2400 },
//!     { "type": "frames", "count": 60, "dt": 0.016 }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use vista_core::{ElementId, Event, Size};
use vista_scroll::RevealHandle;

use crate::config::{SceneConfig, ViewportConfig};
use crate::headless::{HeadlessPage, HeadlessVideo, LayoutBox};
use crate::scene::{FrameOutput, Scene};

/// Page layout and input sequence
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ReplayScript {
    /// Overrides the configured viewport
    #[serde(default)]
    pub viewport: Option<ViewportConfig>,
    pub elements: Vec<ElementSpec>,
    #[serde(default)]
    pub reveals: Vec<u64>,
    #[serde(default)]
    pub pin: Option<PinSpec>,
    #[serde(default)]
    pub tilts: Vec<u64>,
    #[serde(default)]
    pub glows: Vec<u64>,
    #[serde(default)]
    pub media: Vec<MediaSpec>,
    pub steps: Vec<ReplayStep>,
}

/// One element's document layout
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ElementSpec {
    pub id: u64,
    #[serde(default)]
    pub left: f32,
    pub top: f32,
    #[serde(default = "default_element_width")]
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default = "default_true")]
    pub mounted: bool,
}

fn default_element_width() -> f32 {
    1280.0
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PinSpec {
    pub trigger: u64,
    /// Reveal target forced visible and killed when the pin first activates
    #[serde(default)]
    pub kill_reveal: Option<u64>,
}

/// Videos hosted by one container
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MediaSpec {
    pub container: u64,
    #[serde(default = "default_media_count")]
    pub count: usize,
    /// Start paused instead of playing
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub autoplay_blocked: bool,
}

fn default_media_count() -> usize {
    1
}

/// One scripted input
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayStep {
    Scroll {
        y: f32,
    },
    /// A single frame of `dt` seconds
    Frame {
        dt: f32,
    },
    /// `count` frames of `dt` seconds
    Frames {
        count: u32,
        dt: f32,
    },
    PointerMove {
        target: u64,
        x: f32,
        y: f32,
    },
    PointerEnter {
        target: u64,
        x: f32,
        y: f32,
    },
    PointerLeave {
        target: u64,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Mount {
        target: u64,
    },
    Unmount {
        target: u64,
    },
}

impl ReplayScript {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse replay script")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw)
    }
}

/// A scene and headless page driven by scripted input
pub struct ReplaySession {
    page: HeadlessPage,
    scene: Scene,
    videos: Vec<HeadlessVideo>,
    /// Milliseconds of simulated time
    clock_ms: f64,
}

impl ReplaySession {
    /// Lay out the page and attach components
    pub fn new(config: &SceneConfig, script: &ReplayScript) -> Result<Self> {
        let viewport = script
            .viewport
            .as_ref()
            .unwrap_or(&config.viewport)
            .size();

        let mut config = config.clone();
        config.viewport = ViewportConfig {
            width: viewport.width,
            height: viewport.height,
        };
        let mut scene = Scene::new(&config).context("Invalid scene configuration")?;
        let mut page = HeadlessPage::new(viewport);

        for spec in &script.elements {
            let id = ElementId::new(spec.id);
            let mut layout = LayoutBox::new(spec.left, spec.top, spec.width, spec.height);
            layout.parent = spec.parent.map(ElementId::new);
            if spec.mounted {
                page.insert(id, layout);
                scene.mount(id);
            } else {
                page.insert_unmounted(id, layout);
            }
        }

        let known = |id: u64, what: &str| -> Result<ElementId> {
            if script.elements.iter().any(|e| e.id == id) {
                Ok(ElementId::new(id))
            } else {
                anyhow::bail!("{what} refers to unknown element {id}")
            }
        };

        let mut reveals: FxHashMap<u64, RevealHandle> = FxHashMap::default();
        for &id in &script.reveals {
            let handle = scene.add_reveal(known(id, "reveal")?)?;
            reveals.insert(id, handle);
        }

        if let Some(pin) = &script.pin {
            let override_reveal = match pin.kill_reveal {
                Some(id) => Some(
                    *reveals
                        .get(&id)
                        .with_context(|| format!("pin kill_reveal {id} is not a reveal target"))?,
                ),
                None => None,
            };
            scene.add_pin(known(pin.trigger, "pin")?, override_reveal)?;
        }

        for &id in &script.tilts {
            scene.add_tilt(known(id, "tilt")?);
        }
        for &id in &script.glows {
            scene.add_glow(known(id, "glow")?);
        }

        let mut videos = Vec::new();
        for spec in &script.media {
            let container = scene.add_media_container(known(spec.container, "media")?);
            for _ in 0..spec.count {
                let video = if spec.paused {
                    HeadlessVideo::paused()
                } else {
                    HeadlessVideo::playing()
                };
                video.set_autoplay_blocked(spec.autoplay_blocked);
                scene.add_media(container, Box::new(video.clone()));
                videos.push(video);
            }
        }

        Ok(Self {
            page,
            scene,
            videos,
            clock_ms: 0.0,
        })
    }

    pub fn page(&self) -> &HeadlessPage {
        &self.page
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Videos in script order
    pub fn videos(&self) -> &[HeadlessVideo] {
        &self.videos
    }

    /// Play every step, collecting one output per event
    pub fn run(&mut self, steps: &[ReplayStep]) -> Vec<FrameOutput> {
        let mut outputs = Vec::new();
        for step in steps {
            self.step_into(step, &mut outputs);
        }
        outputs
    }

    /// Play one step. `Frames` yields one output per frame.
    pub fn step(&mut self, step: &ReplayStep) -> Vec<FrameOutput> {
        let mut outputs = Vec::new();
        self.step_into(step, &mut outputs);
        outputs
    }

    fn step_into(&mut self, step: &ReplayStep, outputs: &mut Vec<FrameOutput>) {
        match *step {
            ReplayStep::Scroll { y } => {
                self.page.scroll_to(y);
                let event = Event::scroll(self.page.scroll_y(), self.timestamp());
                outputs.push(self.dispatch(&event));
            }
            ReplayStep::Frame { dt } => outputs.push(self.frame(dt)),
            ReplayStep::Frames { count, dt } => {
                for _ in 0..count {
                    outputs.push(self.frame(dt));
                }
            }
            ReplayStep::PointerMove { target, x, y } => {
                let event = Event::pointer_move(ElementId::new(target), x, y, self.timestamp());
                outputs.push(self.dispatch(&event));
            }
            ReplayStep::PointerEnter { target, x, y } => {
                let event = Event::pointer_enter(ElementId::new(target), x, y, self.timestamp());
                outputs.push(self.dispatch(&event));
            }
            ReplayStep::PointerLeave { target } => {
                let event = Event::pointer_leave(ElementId::new(target), self.timestamp());
                outputs.push(self.dispatch(&event));
            }
            ReplayStep::Resize { width, height } => {
                self.page.resize(Size::new(width, height));
                let event = Event::resize(width, height, self.timestamp());
                outputs.push(self.dispatch(&event));
            }
            ReplayStep::Mount { target } => {
                let id = ElementId::new(target);
                if !self.page.mount(id) {
                    tracing::warn!(target, "mount of element without layout");
                }
                let event = Event::mount(id, self.timestamp());
                outputs.push(self.dispatch(&event));
            }
            ReplayStep::Unmount { target } => {
                let id = ElementId::new(target);
                self.page.unmount(id);
                let event = Event::unmount(id, self.timestamp());
                outputs.push(self.dispatch(&event));
            }
        }
    }

    fn frame(&mut self, dt: f32) -> FrameOutput {
        self.clock_ms += f64::from(dt.max(0.0)) * 1000.0;
        let event = Event::frame(dt, self.timestamp());
        self.dispatch(&event)
    }

    fn dispatch(&mut self, event: &Event) -> FrameOutput {
        let output = self.scene.handle_event(event, &self.page);
        for pin in &output.pins {
            if let Some(trigger) = pin.trigger {
                let trigger = ElementId::new(trigger);
                self.page.set_translate_y(trigger, pin.translate_y);
                self.page.set_spacer(trigger, pin.spacer);
            }
        }
        output
    }

    fn timestamp(&self) -> u64 {
        self.clock_ms.round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "elements": [
            { "id": 1, "top": 0, "height": 800 },
            { "id": 2, "top": 1000, "width": 600, "height": 400 },
            { "id": 3, "top": 2000, "height": 800 },
            { "id": 4, "top": 2100, "height": 600, "parent": 3 }
        ],
        "reveals": [2, 4],
        "pin": { "trigger": 3, "kill_reveal": 4 },
        "tilts": [2],
        "glows": [2],
        "media": [{ "container": 1, "count": 2 }],
        "steps": [
            { "type": "scroll", "y": 400 },
            { "type": "frames", "count": 3, "dt": 0.016 },
            { "type": "pointer_enter", "target": 2, "x": 100, "y": 700 },
            { "type": "pointer_leave", "target": 2 }
        ]
    }"#;

    #[test]
    fn test_parse_script() {
        let script = ReplayScript::from_json(SCRIPT).unwrap();
        assert_eq!(script.elements.len(), 4);
        assert_eq!(script.elements[1].width, 600.0);
        assert_eq!(script.elements[0].width, 1280.0);
        assert!(script.elements[3].mounted);
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[1],
            ReplayStep::Frames {
                count: 3,
                dt: 0.016
            }
        );
    }

    #[test]
    fn test_run_yields_output_per_event() {
        let script = ReplayScript::from_json(SCRIPT).unwrap();
        let mut session = ReplaySession::new(&SceneConfig::default(), &script).unwrap();
        let outputs = session.run(&script.steps);
        assert_eq!(outputs.len(), 6);
        assert_eq!(outputs[3].timestamp, 48);
        assert_eq!(session.videos().len(), 2);
    }

    #[test]
    fn test_pin_translation_applied_to_page() {
        let script = ReplayScript::from_json(SCRIPT).unwrap();
        let mut session = ReplaySession::new(&SceneConfig::default(), &script).unwrap();
        session.run(&[ReplayStep::Scroll { y: 2400.0 }, ReplayStep::Frames { count: 120, dt: 0.016 }]);
        assert_eq!(session.page().translate_y(ElementId::new(3)), 400.0);
    }

    #[test]
    fn test_pin_spacer_clears_following_content() {
        use vista_core::GeometrySampler;

        let script = ReplayScript::from_json(
            r#"{
                "elements": [
                    { "id": 3, "top": 2000, "height": 800 },
                    { "id": 5, "top": 2800, "height": 600 }
                ],
                "pin": { "trigger": 3 },
                "steps": [{ "type": "scroll", "y": 2400 }]
            }"#,
        )
        .unwrap();
        let mut session = ReplaySession::new(&SceneConfig::default(), &script).unwrap();
        let outputs = session.run(&script.steps);
        assert_eq!(outputs[0].pins[0].spacer, 800.0);

        let trigger = session.page().sample(ElementId::new(3)).unwrap();
        let next = session.page().sample(ElementId::new(5)).unwrap();
        assert_eq!((trigger.top, trigger.bottom), (0.0, 800.0));
        assert!(next.top >= trigger.bottom);
    }

    #[test]
    fn test_unknown_element_is_rejected() {
        let script = ReplayScript {
            elements: vec![],
            reveals: vec![9],
            ..Default::default()
        };
        assert!(ReplaySession::new(&SceneConfig::default(), &script).is_err());
    }

    #[test]
    fn test_kill_reveal_must_be_a_reveal() {
        let mut script = ReplayScript::from_json(SCRIPT).unwrap();
        script.reveals = vec![2];
        assert!(ReplaySession::new(&SceneConfig::default(), &script).is_err());
    }
}
