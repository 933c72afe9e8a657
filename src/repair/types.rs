//! Common types for the repair module

use thiserror::Error;

/// Repair error types
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("erosion left no source pixels to repair from")]
    EmptySourceSet,

    #[error("mask dimensions {mask_width}x{mask_height} do not match image {image_width}x{image_height}")]
    MaskSizeMismatch {
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },
}

pub type Result<T> = std::result::Result<T, RepairError>;
