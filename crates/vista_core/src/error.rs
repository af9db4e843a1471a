//! Error taxonomy shared by all Vista crates

use crate::element::ElementId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VistaError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VistaError {
    /// A referenced element is not mounted (or was removed)
    #[error("element {0:?} is not mounted")]
    MissingElement(ElementId),

    /// Region start does not precede its end
    #[error("malformed region: start {start} must precede end {end}")]
    MalformedRegion { start: f32, end: f32 },

    /// A configuration value is out of range
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A play/pause request was refused (autoplay policy and similar)
    #[error("media command rejected: {0}")]
    MediaCommandRejected(String),
}

impl VistaError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Configuration errors surface at initialization; everything else is per-event
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            VistaError::MalformedRegion { .. } | VistaError::InvalidConfig { .. }
        )
    }
}
