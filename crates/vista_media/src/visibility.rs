//! Visibility-driven media playback
//!
//! Each container (a section hosting one or more looping background videos) is
//! classified on every sample:
//!
//! ```text
//! offscreen = rect.bottom < -padding || rect.top > viewport_height + padding
//! ```
//!
//! Media in an offscreen container are paused; media in an onscreen container are resumed.
//! Commands are only issued when a medium's playback state disagrees with its container's
//! classification, so repeated samples with unchanged geometry issue nothing.
//!
//! A rejected play request (autoplay policy, decode failure) is logged and not retried
//! until the container has gone offscreen and come back.

use serde::{Serialize, Serializer};
use slotmap::{new_key_type, SlotMap};
use vista_core::{ElementId, ElementRect, ElementRef, GeometrySampler, Result};

/// Margin beyond the viewport before a container counts as offscreen
pub const DEFAULT_PADDING: f32 = 100.0;

new_key_type! {
    /// Handle to an attached media container
    pub struct ContainerHandle;
}

/// A playable medium owned by the host
pub trait MediaElement {
    fn is_paused(&self) -> bool;

    /// Request playback. May be refused by the host.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;
}

/// Container classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Onscreen,
    Offscreen,
}

impl Visibility {
    pub fn classify(rect: &ElementRect, viewport_height: f32, padding: f32) -> Self {
        if rect.bottom < -padding || rect.top > viewport_height + padding {
            Visibility::Offscreen
        } else {
            Visibility::Onscreen
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCommand {
    Play,
    Pause,
}

/// A command issued during a sample
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MediaCommandRecord {
    pub container: ContainerHandle,
    #[serde(serialize_with = "serialize_element")]
    pub element: ElementId,
    /// Index of the medium within its container
    pub medium: usize,
    pub command: MediaCommand,
    /// False when the host refused the command
    pub accepted: bool,
}

fn serialize_element<S: Serializer>(
    element: &ElementId,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(element.to_raw())
}

struct MediaSlot {
    medium: Box<dyn MediaElement>,
    play_rejected: bool,
}

struct Container {
    element: ElementRef,
    media: Vec<MediaSlot>,
    visibility: Option<Visibility>,
}

/// Pauses and resumes media by container visibility
pub struct ViewportMediaController {
    containers: SlotMap<ContainerHandle, Container>,
    padding: f32,
}

impl Default for ViewportMediaController {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING)
    }
}

impl ViewportMediaController {
    pub fn new(padding: f32) -> Self {
        Self {
            containers: SlotMap::with_key(),
            padding: padding.max(0.0),
        }
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn attach(&mut self, element: ElementRef) -> ContainerHandle {
        self.containers.insert(Container {
            element,
            media: Vec::new(),
            visibility: None,
        })
    }

    /// Add a medium to a container. Returns its index, or `None` for a stale handle.
    pub fn add_media(
        &mut self,
        handle: ContainerHandle,
        medium: Box<dyn MediaElement>,
    ) -> Option<usize> {
        let container = self.containers.get_mut(handle)?;
        container.media.push(MediaSlot {
            medium,
            play_rejected: false,
        });
        Some(container.media.len() - 1)
    }

    /// Detach a container and drop its media. Returns false if already detached.
    pub fn detach(&mut self, handle: ContainerHandle) -> bool {
        self.containers.remove(handle).is_some()
    }

    /// Last classification of a container, if it has been sampled while mounted
    pub fn visibility(&self, handle: ContainerHandle) -> Option<Visibility> {
        self.containers.get(handle)?.visibility
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Classify every container against current geometry and reconcile playback.
    ///
    /// `viewport_height` comes from the caller's scroll snapshot for this turn, so media
    /// agree with every other component sampled in the same turn.
    pub fn sample<G: GeometrySampler + ?Sized>(
        &mut self,
        viewport_height: f32,
        sampler: &G,
    ) -> Vec<MediaCommandRecord> {
        let mut records = Vec::new();

        for (handle, container) in self.containers.iter_mut() {
            let Some(element) = container.element.get() else {
                tracing::trace!(?handle, "media container not mounted, skipping");
                continue;
            };
            let Some(rect) = sampler.sample(element) else {
                tracing::trace!(?handle, "media container has no geometry, skipping");
                continue;
            };

            let visibility = Visibility::classify(&rect, viewport_height, self.padding);
            if container.visibility != Some(visibility) {
                tracing::debug!(?handle, ?visibility, "media container visibility");
            }
            container.visibility = Some(visibility);

            for (index, slot) in container.media.iter_mut().enumerate() {
                let command = match visibility {
                    Visibility::Offscreen => {
                        slot.play_rejected = false;
                        if slot.medium.is_paused() {
                            continue;
                        }
                        MediaCommand::Pause
                    }
                    Visibility::Onscreen => {
                        if !slot.medium.is_paused() || slot.play_rejected {
                            continue;
                        }
                        MediaCommand::Play
                    }
                };

                let result = match command {
                    MediaCommand::Play => slot.medium.play(),
                    MediaCommand::Pause => slot.medium.pause(),
                };
                let accepted = match result {
                    Ok(()) => true,
                    Err(err) => {
                        tracing::warn!(?handle, medium = index, ?command, %err, "media command rejected");
                        if command == MediaCommand::Play {
                            slot.play_rejected = true;
                        }
                        false
                    }
                };

                records.push(MediaCommandRecord {
                    container: handle,
                    element,
                    medium: index,
                    command,
                    accepted,
                });
            }
        }

        records
    }
}
