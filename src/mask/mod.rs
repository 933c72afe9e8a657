//! Card Mask module
//!
//! Classifies every pixel of a normalized card scan as card content or
//! background/corner artifact, producing the binary mask consumed by the
//! corner repair stage.
//!
//! # Features
//!
//! - Alpha-channel classification for renders with transparent corners
//! - Corner-seeded flood fill for opaque scans on a solid background
//! - Strategy dispatch decided once per image from the top-left corner pixel

mod builder;

pub use builder::{MaskBuilder, MaskOptions, MaskStrategy};

/// Mask value for card content
pub const FOREGROUND: u8 = 255;

/// Mask value for background / corner artifacts
pub const BACKGROUND: u8 = 0;
