//! Scene configuration file handling (vista.toml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use vista_animation::{Easing, VisualState};
use vista_core::{Color, Size, VistaError};
use vista_interact::{GlowStyle, TiltConfig};
use vista_scroll::{
    Anchor, AnimationRegion, DistanceUnit, ExitEdge, MaskStart, RegionEnd, RevealConfig,
    TogglePolicy,
};

pub const CONFIG_FILE: &str = "vista.toml";

/// Errors turning a parsed file into runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown easing {0:?}")]
    UnknownEasing(String),

    #[error("invalid color {0:?}, expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error(transparent)]
    Invalid(#[from] VistaError),
}

/// Top-level configuration (vista.toml)
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SceneConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub reveal: RevealSettings,
    #[serde(default)]
    pub pin: PinSettings,
    #[serde(default)]
    pub tilt: TiltSettings,
    #[serde(default)]
    pub glow: GlowSettings,
    #[serde(default)]
    pub media: MediaSettings,
    #[serde(default)]
    pub clock: ClockSettings,
}

/// Initial viewport of headless sessions
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: f32,
    #[serde(default = "default_viewport_height")]
    pub height: f32,
}

fn default_viewport_width() -> f32 {
    1280.0
}

fn default_viewport_height() -> f32 {
    800.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct VisualSettings {
    pub opacity: f32,
    pub scale: f32,
    pub translate_y: f32,
}

impl From<VisualSettings> for VisualState {
    fn from(v: VisualSettings) -> Self {
        VisualState::new(v.opacity, v.scale, v.translate_y)
    }
}

impl From<VisualState> for VisualSettings {
    fn from(v: VisualState) -> Self {
        Self {
            opacity: v.opacity,
            scale: v.scale,
            translate_y: v.translate_y,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToggleSetting {
    #[default]
    PlayReverse,
    PlayOnce,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExitEdgeSetting {
    #[default]
    EndLine,
    StartLine,
}

/// Reveal defaults
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RevealSettings {
    #[serde(default = "default_enter_threshold")]
    pub enter_threshold: f32,
    #[serde(default = "default_exit_threshold")]
    pub exit_threshold: f32,
    /// Seconds
    #[serde(default = "default_reveal_duration")]
    pub duration: f32,
    #[serde(default = "default_reveal_easing")]
    pub easing: String,
    #[serde(default)]
    pub toggle: ToggleSetting,
    #[serde(default)]
    pub exit_edge: ExitEdgeSetting,
    #[serde(default = "default_reveal_initial")]
    pub initial: VisualSettings,
    #[serde(default = "default_reveal_final")]
    pub final_state: VisualSettings,
}

fn default_enter_threshold() -> f32 {
    vista_scroll::reveal::DEFAULT_ENTER_THRESHOLD
}

fn default_exit_threshold() -> f32 {
    vista_scroll::reveal::DEFAULT_EXIT_THRESHOLD
}

fn default_reveal_duration() -> f32 {
    vista_scroll::reveal::DEFAULT_DURATION
}

fn default_reveal_easing() -> String {
    "power3.out".to_string()
}

fn default_reveal_initial() -> VisualSettings {
    vista_animation::AnimationPreset::RISE_IN_FROM.into()
}

fn default_reveal_final() -> VisualSettings {
    VisualState::IDENTITY.into()
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            enter_threshold: default_enter_threshold(),
            exit_threshold: default_exit_threshold(),
            duration: default_reveal_duration(),
            easing: default_reveal_easing(),
            toggle: ToggleSetting::default(),
            exit_edge: ExitEdgeSetting::default(),
            initial: default_reveal_initial(),
            final_state: default_reveal_final(),
        }
    }
}

impl RevealSettings {
    pub fn to_config(&self) -> Result<RevealConfig, ConfigError> {
        let config = RevealConfig {
            initial: self.initial.into(),
            final_state: self.final_state.into(),
            enter_threshold: self.enter_threshold,
            exit_threshold: self.exit_threshold,
            duration: self.duration,
            easing: parse_easing(&self.easing)?,
            toggle_policy: match self.toggle {
                ToggleSetting::PlayReverse => TogglePolicy::PlayReverse,
                ToggleSetting::PlayOnce => TogglePolicy::PlayOnce,
            },
            exit_edge: match self.exit_edge {
                ExitEdgeSetting::EndLine => ExitEdge::EndLine,
                ExitEdgeSetting::StartLine => ExitEdge::StartLine,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnitSetting {
    #[default]
    Pixels,
    ViewportPercent,
}

/// Pinned expansion region
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PinSettings {
    /// Trigger anchor, fraction of trigger height
    #[serde(default = "default_half")]
    pub start_element: f32,
    /// Viewport line, fraction of viewport height
    #[serde(default = "default_half")]
    pub start_viewport: f32,
    /// Trailing distance past the start
    #[serde(default = "default_pin_distance")]
    pub distance: f32,
    #[serde(default)]
    pub unit: DistanceUnitSetting,
    /// Smoothing time constant in seconds
    #[serde(default = "default_scrub")]
    pub scrub: f32,
    #[serde(default = "default_true")]
    pub pin: bool,
    #[serde(default = "default_true")]
    pub pin_spacing: bool,
    /// Starting mask width, fraction of viewport width
    #[serde(default = "default_mask_width")]
    pub mask_width: f32,
    /// Starting mask height, fraction of viewport height
    #[serde(default = "default_mask_height")]
    pub mask_height: f32,
    /// Starting mask corner radius in pixels
    #[serde(default = "default_mask_radius")]
    pub mask_radius: f32,
    #[serde(default = "default_pin_easing")]
    pub easing: String,
}

fn default_half() -> f32 {
    0.5
}

fn default_pin_distance() -> f32 {
    800.0
}

fn default_scrub() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_mask_width() -> f32 {
    MaskStart::default().width
}

fn default_mask_height() -> f32 {
    MaskStart::default().height
}

fn default_mask_radius() -> f32 {
    MaskStart::default().corner_radius
}

fn default_pin_easing() -> String {
    "linear".to_string()
}

impl Default for PinSettings {
    fn default() -> Self {
        Self {
            start_element: default_half(),
            start_viewport: default_half(),
            distance: default_pin_distance(),
            unit: DistanceUnitSetting::default(),
            scrub: default_scrub(),
            pin: true,
            pin_spacing: true,
            mask_width: default_mask_width(),
            mask_height: default_mask_height(),
            mask_radius: default_mask_radius(),
            easing: default_pin_easing(),
        }
    }
}

impl PinSettings {
    /// Region bound to `trigger`, validated
    pub fn to_region(&self, trigger: vista_core::ElementRef) -> Result<AnimationRegion, ConfigError> {
        let unit = match self.unit {
            DistanceUnitSetting::Pixels => DistanceUnit::Pixels,
            DistanceUnitSetting::ViewportPercent => DistanceUnit::ViewportPercent,
        };
        let mut region = AnimationRegion::new(
            trigger,
            Anchor::new(self.start_element, self.start_viewport),
            RegionEnd::Trailing {
                distance: self.distance,
                unit,
            },
        )
        .scrub(self.scrub);
        if self.pin {
            region = region.pinned(self.pin_spacing);
        }
        region.validate()?;
        Ok(region)
    }

    pub fn mask_start(&self) -> MaskStart {
        MaskStart {
            width: self.mask_width,
            height: self.mask_height,
            corner_radius: self.mask_radius,
        }
    }

    pub fn easing(&self) -> Result<Easing, ConfigError> {
        parse_easing(&self.easing)
    }
}

/// Pointer tilt
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TiltSettings {
    #[serde(default = "default_max_rotate")]
    pub max_rotate_x: f32,
    #[serde(default = "default_max_rotate")]
    pub max_rotate_y: f32,
    #[serde(default = "default_perspective")]
    pub perspective: f32,
    #[serde(default = "default_tilt_scale")]
    pub scale: f32,
    #[serde(default = "default_tilt_transition")]
    pub transition_ms: u32,
}

fn default_max_rotate() -> f32 {
    vista_interact::tilt::DEFAULT_MAX_ROTATE
}

fn default_perspective() -> f32 {
    vista_interact::tilt::DEFAULT_PERSPECTIVE
}

fn default_tilt_scale() -> f32 {
    vista_interact::tilt::DEFAULT_TILT_SCALE
}

fn default_tilt_transition() -> u32 {
    vista_interact::tilt::DEFAULT_TRANSITION_MS
}

impl Default for TiltSettings {
    fn default() -> Self {
        Self {
            max_rotate_x: default_max_rotate(),
            max_rotate_y: default_max_rotate(),
            perspective: default_perspective(),
            scale: default_tilt_scale(),
            transition_ms: default_tilt_transition(),
        }
    }
}

impl TiltSettings {
    pub fn to_config(&self) -> TiltConfig {
        TiltConfig {
            max_rotate_x: self.max_rotate_x,
            max_rotate_y: self.max_rotate_y,
            perspective: self.perspective,
            scale: self.scale,
            transition_ms: self.transition_ms,
        }
    }
}

/// Hover glow
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GlowSettings {
    #[serde(default = "default_glow_radius")]
    pub radius: f32,
    #[serde(default = "default_glow_inner")]
    pub inner: String,
    #[serde(default = "default_glow_outer")]
    pub outer: String,
    #[serde(default = "default_glow_transition")]
    pub transition_ms: u32,
}

fn default_glow_radius() -> f32 {
    vista_interact::glow::DEFAULT_GLOW_RADIUS
}

fn default_glow_inner() -> String {
    Color::from_hex_rgba(vista_interact::glow::DEFAULT_GLOW_INNER).to_css_hex()
}

fn default_glow_outer() -> String {
    Color::from_hex_rgba(vista_interact::glow::DEFAULT_GLOW_OUTER).to_css_hex()
}

fn default_glow_transition() -> u32 {
    vista_interact::glow::DEFAULT_GLOW_TRANSITION_MS
}

impl Default for GlowSettings {
    fn default() -> Self {
        Self {
            radius: default_glow_radius(),
            inner: default_glow_inner(),
            outer: default_glow_outer(),
            transition_ms: default_glow_transition(),
        }
    }
}

impl GlowSettings {
    pub fn to_style(&self) -> Result<GlowStyle, ConfigError> {
        Ok(GlowStyle {
            radius: self.radius,
            inner: parse_color(&self.inner)?,
            outer: parse_color(&self.outer)?,
            transition_ms: self.transition_ms,
        })
    }
}

/// Media playback
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MediaSettings {
    /// Margin beyond the viewport before a container counts as offscreen
    #[serde(default = "default_media_padding")]
    pub padding: f32,
    #[serde(default = "default_media_source")]
    pub source: String,
}

fn default_media_padding() -> f32 {
    vista_media::visibility::DEFAULT_PADDING
}

fn default_media_source() -> String {
    vista_media::store::DEFAULT_SOURCE.to_string()
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            padding: default_media_padding(),
            source: default_media_source(),
        }
    }
}

/// Frame timing
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClockSettings {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// Longest frame delta in seconds
    #[serde(default = "default_max_dt")]
    pub max_dt: f32,
}

fn default_target_fps() -> u32 {
    120
}

fn default_max_dt() -> f32 {
    vista_animation::clock::DEFAULT_MAX_DT
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            max_dt: default_max_dt(),
        }
    }
}

impl SceneConfig {
    /// Load configuration from a directory (looks for vista.toml) or a file path
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `vista init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Check every section converts to a valid runtime configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.size().is_empty() {
            return Err(VistaError::invalid("viewport", "width and height must be > 0").into());
        }
        self.reveal.to_config()?;
        self.pin.to_region(vista_core::ElementRef::new())?;
        self.pin.easing()?;
        let mask = self.pin.mask_start();
        if !(mask.width >= 0.0 && mask.height >= 0.0 && mask.corner_radius >= 0.0) {
            return Err(VistaError::invalid("pin.mask", "mask dimensions must be >= 0").into());
        }
        self.glow.to_style()?;
        if !(self.media.padding.is_finite() && self.media.padding >= 0.0) {
            return Err(VistaError::invalid("media.padding", "must be a finite value >= 0").into());
        }
        if self.clock.target_fps == 0 {
            return Err(VistaError::invalid("clock.target_fps", "must be > 0").into());
        }
        Ok(())
    }
}

fn parse_easing(name: &str) -> Result<Easing, ConfigError> {
    Easing::from_name(name).ok_or_else(|| ConfigError::UnknownEasing(name.to_string()))
}

/// Parse `#rrggbb` or `#rrggbbaa`
pub fn parse_color(value: &str) -> Result<Color, ConfigError> {
    let invalid = || ConfigError::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    let bits = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    match hex.len() {
        6 => Ok(Color::from_hex(bits)),
        8 => Ok(Color::from_hex_rgba(bits)),
        _ => Err(invalid()),
    }
}
