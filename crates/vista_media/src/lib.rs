//! Vista Media Orchestration
//!
//! - **Visibility** ([`ViewportMediaController`]): pauses background media whose container
//!   has scrolled well out of view and resumes it when the container returns
//! - **Shared state** ([`MediaState`]): the session-wide current video source, playback
//!   time and audio flag, readable and writable from any component

pub mod store;
pub mod visibility;

pub use store::{MediaSnapshot, MediaState, PlaybackClock, SubscriberId};
pub use visibility::{
    ContainerHandle, MediaCommand, MediaCommandRecord, MediaElement, Visibility,
    ViewportMediaController,
};
