//! Background mask construction
//!
//! Builds the FOREGROUND/BACKGROUND mask for one normalized card image.
//!
//! # Algorithm
//!
//! 1. Pick a strategy from the top-left corner pixel, once per image:
//!    transparent corner ⇒ classify by alpha; otherwise sample the corner
//!    color as the background reference.
//! 2. Alpha strategy: any pixel with alpha > 0 is card content.
//! 3. Corner-flood strategy: mark background-candidate pixels within the
//!    color tolerance of the reference, then grow a 4-connected region from
//!    each image corner whose pixel is itself a candidate. Only pixels
//!    reached by a corner-seeded fill become BACKGROUND, so same-colored
//!    artwork in the card interior is never stripped.

use std::collections::VecDeque;

use image::{GrayImage, Luma, RgbaImage};

use super::{BACKGROUND, FOREGROUND};

// ============================================================
// Constants
// ============================================================

/// Corner alpha below this selects the alpha strategy
const DEFAULT_ALPHA_THRESHOLD: u8 = 10;

/// Per-channel tolerance when matching the background reference color
const DEFAULT_COLOR_TOLERANCE: u8 = 15;

// ============================================================
// Types
// ============================================================

/// Options for mask construction
#[derive(Debug, Clone, Copy)]
pub struct MaskOptions {
    /// Corner alpha below this value selects [`MaskStrategy::AlphaChannel`]
    pub alpha_threshold: u8,

    /// Per-channel tolerance around the background reference color
    pub color_tolerance: u8,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            color_tolerance: DEFAULT_COLOR_TOLERANCE,
        }
    }
}

/// Classification strategy, decided once per image at builder entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskStrategy {
    /// Classify by the alpha channel: alpha > 0 is card content
    AlphaChannel,

    /// Flood-fill background-candidate pixels from the image corners,
    /// matching against the sampled reference color
    CornerFlood { reference: [u8; 3] },
}

impl MaskStrategy {
    /// Select the strategy for an image.
    ///
    /// `has_alpha` reflects the channel count of the decoded source, not the
    /// RGBA working buffer: a widened RGB image never takes the alpha path.
    pub fn select(image: &RgbaImage, has_alpha: bool, options: &MaskOptions) -> Self {
        let corner = image.get_pixel(0, 0);
        if has_alpha && corner.0[3] < options.alpha_threshold {
            MaskStrategy::AlphaChannel
        } else {
            MaskStrategy::CornerFlood {
                reference: [corner.0[0], corner.0[1], corner.0[2]],
            }
        }
    }
}

// ============================================================
// Mask Builder
// ============================================================

/// Builds the binary card mask for one image
pub struct MaskBuilder;

impl MaskBuilder {
    /// Build a FOREGROUND/BACKGROUND mask with the same dimensions as `image`.
    ///
    /// Pure function of the image and options; the input is never mutated.
    pub fn build(image: &RgbaImage, has_alpha: bool, options: &MaskOptions) -> GrayImage {
        match MaskStrategy::select(image, has_alpha, options) {
            MaskStrategy::AlphaChannel => Self::build_from_alpha(image),
            MaskStrategy::CornerFlood { reference } => {
                Self::build_from_corner_flood(image, reference, options.color_tolerance)
            }
        }
    }

    /// Alpha strategy: alpha > 0 is card content
    fn build_from_alpha(image: &RgbaImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut mask = GrayImage::new(width, height);

        for (x, y, pixel) in image.enumerate_pixels() {
            let value = if pixel.0[3] > 0 { FOREGROUND } else { BACKGROUND };
            mask.put_pixel(x, y, Luma([value]));
        }

        mask
    }

    /// Corner-flood strategy: grow confirmed background from candidate corners
    fn build_from_corner_flood(
        image: &RgbaImage,
        reference: [u8; 3],
        tolerance: u8,
    ) -> GrayImage {
        let (width, height) = image.dimensions();

        let candidate: Vec<bool> = image
            .pixels()
            .map(|p| Self::matches_reference(&p.0, reference, tolerance))
            .collect();

        let mut confirmed = vec![false; (width * height) as usize];

        let corners = [
            (0, 0),
            (width - 1, 0),
            (0, height - 1),
            (width - 1, height - 1),
        ];
        for (cx, cy) in corners {
            let idx = (cy * width + cx) as usize;
            // Corners whose pixel is not a candidate seed no fill at all
            if candidate[idx] && !confirmed[idx] {
                Self::flood_fill(&candidate, &mut confirmed, cx, cy, width, height);
            }
        }

        let mut mask = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let value = if confirmed[(y * width + x) as usize] {
                    BACKGROUND
                } else {
                    FOREGROUND
                };
                mask.put_pixel(x, y, Luma([value]));
            }
        }

        mask
    }

    /// Check whether every color channel lies within the tolerance band
    fn matches_reference(pixel: &[u8; 4], reference: [u8; 3], tolerance: u8) -> bool {
        pixel
            .iter()
            .take(3)
            .zip(reference.iter())
            .all(|(&c, &r)| c.abs_diff(r) <= tolerance)
    }

    /// Grow a 4-connected candidate region from a seed, marking `confirmed`.
    ///
    /// Explicit work queue; recursion depth would otherwise be unbounded on
    /// large solid backgrounds.
    fn flood_fill(
        candidate: &[bool],
        confirmed: &mut [bool],
        seed_x: u32,
        seed_y: u32,
        width: u32,
        height: u32,
    ) {
        let mut queue = VecDeque::new();
        queue.push_back((seed_x, seed_y));
        confirmed[(seed_y * width + seed_x) as usize] = true;

        let neighbors: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in &neighbors {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;

                if nx >= 0 && nx < width as i64 && ny >= 0 && ny < height as i64 {
                    let idx = (ny as u32 * width + nx as u32) as usize;
                    if candidate[idx] && !confirmed[idx] {
                        confirmed[idx] = true;
                        queue.push_back((nx as u32, ny as u32));
                    }
                }
            }
        }
    }
}

// ============================================================
// Tests
// ============================================================
