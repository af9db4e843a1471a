//! Vista App
//!
//! Wires the component crates into one page:
//!
//! - [`SceneConfig`]: `vista.toml` configuration with defaults for every component
//! - [`Scene`]: owns reveals, pinned regions, tilt and glow hosts and media containers,
//!   routes events to them and reports a [`FrameOutput`] per event
//! - [`HeadlessPage`]: a static document layout answering geometry queries without a
//!   browser, used by tests and replay
//! - [`ReplaySession`]: plays a JSON [`ReplayScript`] against a headless page
//!
//! # Example
//!
//! ```rust
//! use vista_app::{HeadlessPage, LayoutBox, Scene, SceneConfig};
//! use vista_core::{ElementId, Event, Size};
//!
//! let config = SceneConfig::default();
//! let mut scene = Scene::new(&config).unwrap();
//! let mut page = HeadlessPage::new(Size::new(1280.0, 800.0));
//!
//! let card = ElementId::new(1);
//! page.insert(card, LayoutBox::new(0.0, 1200.0, 600.0, 400.0));
//! scene.mount(card);
//! scene.add_reveal(card).unwrap();
//!
//! page.scroll_to(800.0);
//! let output = scene.handle_event(&Event::scroll(800.0, 0), &page);
//! assert_eq!(output.reveal(card).unwrap().phase, "entering");
//! ```

pub mod config;
pub mod headless;
pub mod replay;
pub mod scene;

pub use config::{ConfigError, SceneConfig, CONFIG_FILE};
pub use headless::{HeadlessPage, HeadlessVideo, LayoutBox};
pub use replay::{ElementSpec, MediaSpec, PinSpec, ReplayScript, ReplaySession, ReplayStep};
pub use scene::{
    FrameOutput, GlowFrame, GlowHandle, PinFrame, PinHandle, RevealFrame, Scene, TiltFrame,
    TiltHandle,
};
