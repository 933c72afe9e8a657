//! Dimension Normalization module
//!
//! Brings every card scan to a fixed working size and removes the outermost
//! pixels, where resampling ringing and print-registration artifacts live.
//!
//! # Algorithm
//!
//! 1. Resample to the target card dimensions when the input differs.
//!    Shrinking uses an area-averaging class filter, enlarging uses Lanczos;
//!    the choice is made per image by comparing source width to target width.
//! 2. Crop `edge_crop` pixels from every side of the resized image.

use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

// ============================================================
// Types
// ============================================================

/// Normalization error types
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("image has zero-sized dimensions ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("edge crop of {edge_crop}px consumes the whole {width}x{height} image")]
    DimensionMismatch {
        width: u32,
        height: u32,
        edge_crop: u32,
    },
}

pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Options for dimension normalization
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    /// Target width before edge cropping
    pub target_width: u32,

    /// Target height before edge cropping
    pub target_height: u32,

    /// Pixels cropped from each side after resizing
    pub edge_crop: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            target_width: 745,
            target_height: 1040,
            edge_crop: 2,
        }
    }
}

impl NormalizeOptions {
    /// Final dimensions produced by [`DimensionNormalizer::normalize`]
    pub fn output_size(&self) -> (u32, u32) {
        (
            self.target_width.saturating_sub(2 * self.edge_crop),
            self.target_height.saturating_sub(2 * self.edge_crop),
        )
    }
}

// ============================================================
// Dimension Normalizer
// ============================================================

/// Resizes card scans to the working size and trims the edge margin
pub struct DimensionNormalizer;

impl DimensionNormalizer {
    /// Normalize an image to `(target - 2*edge_crop)` per axis.
    ///
    /// The resampling filter is chosen per image: shrinking favors the
    /// area-averaging behavior of a triangle filter scaled to the ratio,
    /// enlarging uses Lanczos3.
    pub fn normalize(image: &RgbaImage, options: &NormalizeOptions) -> Result<RgbaImage> {
        let (width, height) = image.dimensions();

        if width == 0 || height == 0 {
            return Err(NormalizeError::EmptyImage { width, height });
        }

        let (out_width, out_height) = options.output_size();
        if out_width == 0 || out_height == 0 {
            return Err(NormalizeError::DimensionMismatch {
                width: options.target_width,
                height: options.target_height,
                edge_crop: options.edge_crop,
            });
        }

        let resized = if (width, height) != (options.target_width, options.target_height) {
            let filter = if width > options.target_width {
                FilterType::Triangle
            } else {
                FilterType::Lanczos3
            };
            image::imageops::resize(image, options.target_width, options.target_height, filter)
        } else {
            image.clone()
        };

        let cropped = image::imageops::crop_imm(
            &resized,
            options.edge_crop,
            options.edge_crop,
            out_width,
            out_height,
        )
        .to_image();

        Ok(cropped)
    }
}

// ============================================================
// Tests
// ============================================================
