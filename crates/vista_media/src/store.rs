//! Shared media state
//!
//! The session-wide record of which video is selected, where its playback was left and
//! whether audio is enabled. Every write is visible to the next read (last write wins),
//! and subscribers are notified after each write.
//!
//! Two ways in:
//!
//! - inject a [`MediaState`] handle (cheap to clone, `Send + Sync`)
//! - use the process-wide instance through [`MediaState::init`] / [`MediaState::get`]
//!
//! ```rust
//! use vista_media::MediaState;
//!
//! let state = MediaState::new();
//! assert_eq!(state.source(), "videos/hero-1.mp4");
//!
//! state.set_source("videos/hero-2.mp4");
//! assert_eq!(state.source(), "videos/hero-2.mp4");
//! ```

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};

pub const DEFAULT_SOURCE: &str = "videos/hero-1.mp4";

/// Global instance
static MEDIA_STATE: OnceLock<MediaState> = OnceLock::new();

new_key_type! {
    /// Handle to a change subscription
    pub struct SubscriberId;
}

/// Playback clock of the primary medium
pub trait PlaybackClock: Send + Sync {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;
}

impl<F: Fn() -> f64 + Send + Sync> PlaybackClock for F {
    fn current_time(&self) -> f64 {
        self()
    }
}

/// Point-in-time copy of the shared state
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MediaSnapshot {
    pub source: String,
    /// Seconds
    pub time: f64,
    pub audio_enabled: bool,
}

impl Default for MediaSnapshot {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            time: 0.0,
            audio_enabled: false,
        }
    }
}

type Subscriber = Arc<dyn Fn(&MediaSnapshot) + Send + Sync>;

#[derive(Default)]
struct Inner {
    snapshot: MediaSnapshot,
    primary_clock: Option<Arc<dyn PlaybackClock>>,
    subscribers: SlotMap<SubscriberId, Subscriber>,
}

/// Shared handle to the media state
#[derive(Clone, Default)]
pub struct MediaState {
    inner: Arc<RwLock<Inner>>,
}

impl std::fmt::Debug for MediaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaState")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl MediaState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `state` as the process-wide instance
    ///
    /// Returns false, leaving the existing instance in place, if one is already
    /// installed (including one created lazily by [`MediaState::get`]).
    pub fn init(state: MediaState) -> bool {
        let installed = MEDIA_STATE.set(state).is_ok();
        if !installed {
            tracing::warn!("MediaState::init() called after the global state was created");
        }
        installed
    }

    /// The process-wide instance, created with defaults on first use
    pub fn get() -> &'static MediaState {
        MEDIA_STATE.get_or_init(MediaState::new)
    }

    /// The process-wide instance, if one exists
    pub fn try_get() -> Option<&'static MediaState> {
        MEDIA_STATE.get()
    }

    pub fn source(&self) -> String {
        self.inner.read().snapshot.source.clone()
    }

    pub fn set_source(&self, source: impl Into<String>) {
        let source = source.into();
        tracing::debug!(%source, "media source");
        self.write(|s| s.source = source);
    }

    /// Stored playback time in seconds
    pub fn time(&self) -> f64 {
        self.inner.read().snapshot.time
    }

    /// Store a playback time. Negative and non-finite times are stored as 0.
    pub fn set_time(&self, time: f64) {
        let time = if time.is_finite() && time > 0.0 {
            time
        } else {
            if time != 0.0 {
                tracing::warn!(time, "invalid media time, storing 0");
            }
            0.0
        };
        self.write(|s| s.time = time);
    }

    pub fn is_audio_enabled(&self) -> bool {
        self.inner.read().snapshot.audio_enabled
    }

    pub fn set_audio_enabled(&self, enabled: bool) {
        self.write(|s| s.audio_enabled = enabled);
    }

    pub fn snapshot(&self) -> MediaSnapshot {
        self.inner.read().snapshot.clone()
    }

    /// Register (or clear) the clock of the primary medium
    pub fn set_primary_clock(&self, clock: Option<Arc<dyn PlaybackClock>>) {
        self.inner.write().primary_clock = clock;
    }

    /// Playback position of the primary medium, or 0 if none is registered
    pub fn live_time(&self) -> f64 {
        let clock = self.inner.read().primary_clock.clone();
        clock.map(|c| c.current_time()).unwrap_or(0.0)
    }

    /// Call `callback` after every write with the new state
    pub fn subscribe(&self, callback: impl Fn(&MediaSnapshot) + Send + Sync + 'static) -> SubscriberId {
        self.inner.write().subscribers.insert(Arc::new(callback))
    }

    /// Returns false if already unsubscribed
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.inner.write().subscribers.remove(id).is_some()
    }

    fn write(&self, update: impl FnOnce(&mut MediaSnapshot)) {
        let (snapshot, subscribers) = {
            let mut inner = self.inner.write();
            update(&mut inner.snapshot);
            let subscribers: Vec<Subscriber> = inner.subscribers.values().cloned().collect();
            (inner.snapshot.clone(), subscribers)
        };
        // Lock released: subscribers may read or write the state
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}
