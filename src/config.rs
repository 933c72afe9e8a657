//! Configuration module
//!
//! All fixed sizes and tolerances of the pipeline live in one immutable
//! [`PipelineConfig`] passed explicitly into each stage. Values come from
//! built-in defaults, an optional TOML config file, and CLI overrides, in
//! that order of precedence (CLI wins).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mask::MaskOptions;
use crate::normalize::NormalizeOptions;
use crate::repair::RepairOptions;

// ============================================================
// Constants
// ============================================================

/// Target card width in pixels before edge cropping
const DEFAULT_CARD_WIDTH: u32 = 745;

/// Target card height in pixels before edge cropping
const DEFAULT_CARD_HEIGHT: u32 = 1040;

/// Pixels cropped from each side after resizing
const DEFAULT_EDGE_CROP: u32 = 2;

/// Mask erosion iterations isolating corner defects
const DEFAULT_CORNER_EROSION: u8 = 10;

/// Per-channel background color tolerance
const DEFAULT_COLOR_TOLERANCE: u8 = 15;

/// Corner alpha below this selects the alpha mask strategy
const DEFAULT_ALPHA_THRESHOLD: u8 = 10;

/// Base bleed margin; the effective length adds the edge crop back
const DEFAULT_BLEED_MARGIN: u32 = 36;

/// JPEG encoder quality for .jpg/.jpeg outputs
const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Config file name searched in the working directory
const LOCAL_CONFIG_FILE: &str = "cardbleed.toml";

// ============================================================
// Types
// ============================================================

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// File-level configuration; every field is optional so a config file can
/// set just the values it cares about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub card_width: Option<u32>,
    pub card_height: Option<u32>,
    pub edge_crop: Option<u32>,
    pub corner_erosion: Option<u8>,
    pub color_tolerance: Option<u8>,
    pub alpha_threshold: Option<u8>,
    pub bleed_margin: Option<u32>,
    pub jpeg_quality: Option<u8>,
    pub threads: Option<usize>,
}

impl Config {
    /// Load configuration from the default locations: `./cardbleed.toml`,
    /// then the user config directory. Missing files yield the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_path(local);
        }

        if let Some(user) = Self::user_config_path() {
            if user.exists() {
                return Self::load_from_path(&user);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Path of the per-user config file, if a config directory exists
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cardbleed").join("config.toml"))
    }

    /// Merge file values with CLI overrides; CLI takes precedence, defaults
    /// fill the rest
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            card_width: cli
                .card_width
                .or(self.card_width)
                .unwrap_or(defaults.card_width),
            card_height: cli
                .card_height
                .or(self.card_height)
                .unwrap_or(defaults.card_height),
            edge_crop: cli.edge_crop.or(self.edge_crop).unwrap_or(defaults.edge_crop),
            corner_erosion: cli
                .corner_erosion
                .or(self.corner_erosion)
                .unwrap_or(defaults.corner_erosion),
            color_tolerance: cli
                .color_tolerance
                .or(self.color_tolerance)
                .unwrap_or(defaults.color_tolerance),
            alpha_threshold: cli
                .alpha_threshold
                .or(self.alpha_threshold)
                .unwrap_or(defaults.alpha_threshold),
            bleed_margin: cli
                .bleed_margin
                .or(self.bleed_margin)
                .unwrap_or(defaults.bleed_margin),
            jpeg_quality: cli
                .jpeg_quality
                .or(self.jpeg_quality)
                .unwrap_or(defaults.jpeg_quality),
            threads: cli.threads.or(self.threads),
        }
    }
}

/// Values set explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub card_width: Option<u32>,
    pub card_height: Option<u32>,
    pub edge_crop: Option<u32>,
    pub corner_erosion: Option<u8>,
    pub color_tolerance: Option<u8>,
    pub alpha_threshold: Option<u8>,
    pub bleed_margin: Option<u32>,
    pub jpeg_quality: Option<u8>,
    pub threads: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolved, immutable pipeline configuration consumed by every stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Target card width before edge cropping
    pub card_width: u32,

    /// Target card height before edge cropping
    pub card_height: u32,

    /// Pixels cropped from each side after resizing
    pub edge_crop: u32,

    /// Mask erosion iterations isolating corner defects
    pub corner_erosion: u8,

    /// Per-channel background color tolerance
    pub color_tolerance: u8,

    /// Corner alpha below this selects the alpha mask strategy
    pub alpha_threshold: u8,

    /// Base bleed margin in pixels
    pub bleed_margin: u32,

    /// JPEG encoder quality for .jpg/.jpeg outputs
    pub jpeg_quality: u8,

    /// Worker pool size; `None` uses all available cores
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            card_width: DEFAULT_CARD_WIDTH,
            card_height: DEFAULT_CARD_HEIGHT,
            edge_crop: DEFAULT_EDGE_CROP,
            corner_erosion: DEFAULT_CORNER_EROSION,
            color_tolerance: DEFAULT_COLOR_TOLERANCE,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            bleed_margin: DEFAULT_BLEED_MARGIN,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            threads: None,
        }
    }
}

impl PipelineConfig {
    /// Effective bleed length: the base margin plus compensation for the
    /// pixels removed by the edge crop
    pub fn bleed_length(&self) -> u32 {
        self.bleed_margin + self.edge_crop
    }

    /// Options for the dimension normalization stage
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            target_width: self.card_width,
            target_height: self.card_height,
            edge_crop: self.edge_crop,
        }
    }

    /// Options for the mask construction stage
    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            alpha_threshold: self.alpha_threshold,
            color_tolerance: self.color_tolerance,
        }
    }

    /// Options for the corner repair stage
    pub fn repair_options(&self) -> RepairOptions {
        RepairOptions {
            erosion_radius: self.corner_erosion,
        }
    }
}

// ============================================================
// Tests
// ============================================================
