//! Corner hole filling
//!
//! Erodes the card mask so that cut-line and transparent-corner defects fall
//! into a background "hole" band, then rewrites every hole pixel from the
//! nearest pixel on the eroded foreground contour.
//!
//! # Algorithm
//!
//! 1. Erode the mask (3x3 structuring element, `erosion_radius` iterations,
//!    computed as one L-inf erosion of that radius).
//! 2. Hole set H: every eroded-BACKGROUND coordinate.
//! 3. Source set S: the outer contour of the eroded FOREGROUND, pixels just
//!    inside the true card edge and guaranteed free of corner artifacts.
//! 4. Index S in a k-d tree, batch-query all of H, copy each matched source
//!    pixel (all channels, alpha included) over its hole pixel.
//!
//! S and H are disjoint by construction, so in-place writes never feed a
//! rewritten pixel back into a later lookup.

use image::{GrayImage, RgbaImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use tracing::debug;

use super::spatial::NearestNeighborIndex;
use super::types::{RepairError, Result};
use crate::mask::BACKGROUND;

// ============================================================
// Constants
// ============================================================

/// Default erosion radius, deep enough to swallow cut-line corner defects
const DEFAULT_EROSION_RADIUS: u8 = 10;

// ============================================================
// Types
// ============================================================

/// Options for corner hole filling
#[derive(Debug, Clone, Copy)]
pub struct RepairOptions {
    /// Mask erosion radius in pixels (iterations of a 3x3 erosion)
    pub erosion_radius: u8,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            erosion_radius: DEFAULT_EROSION_RADIUS,
        }
    }
}

/// One hole pixel and the source pixel chosen to rewrite it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleAssignment {
    pub hole: (u32, u32),
    pub source: (u32, u32),
}

/// The full set of rewrites for one image
#[derive(Debug, Clone, Default)]
pub struct RepairPlan {
    /// Hole-to-source assignments; empty when the mask has no holes
    pub assignments: Vec<HoleAssignment>,

    /// Number of contour pixels the sources were drawn from
    pub source_count: usize,
}

impl RepairPlan {
    /// Whether the image needs no repair at all
    pub fn is_clean(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Summary of an applied repair
#[derive(Debug, Clone, Copy)]
pub struct RepairReport {
    /// Pixels rewritten
    pub hole_pixels: usize,

    /// Contour pixels available as sources
    pub source_pixels: usize,
}

// ============================================================
// Hole Filler
// ============================================================

/// Repairs corner/background defects from nearest edge content
pub struct HoleFiller;

impl HoleFiller {
    /// Compute the hole-to-source assignments for a mask without touching
    /// any image.
    ///
    /// Distance ties between equidistant sources are broken by k-d tree
    /// traversal order; everything else is deterministic.
    pub fn plan(mask: &GrayImage, options: &RepairOptions) -> Result<RepairPlan> {
        let eroded = morphology::erode(mask, Norm::LInf, options.erosion_radius);

        let holes: Vec<(u32, u32)> = eroded
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] == BACKGROUND)
            .map(|(x, y, _)| (x, y))
            .collect();

        if holes.is_empty() {
            return Ok(RepairPlan::default());
        }

        let sources = Self::contour_sources(&eroded);
        debug!(
            holes = holes.len(),
            sources = sources.len(),
            "planned corner repair"
        );

        let index =
            NearestNeighborIndex::build(sources).ok_or(RepairError::EmptySourceSet)?;
        let source_count = index.len();

        let matched = index.nearest_batch(&holes);
        let assignments = holes
            .into_iter()
            .zip(matched)
            .map(|(hole, source)| HoleAssignment { hole, source })
            .collect();

        Ok(RepairPlan {
            assignments,
            source_count,
        })
    }

    /// Repair an image in place using its mask.
    ///
    /// Only hole pixels are mutated; a clean mask leaves the image untouched.
    pub fn repair_in_place(
        image: &mut RgbaImage,
        mask: &GrayImage,
        options: &RepairOptions,
    ) -> Result<RepairReport> {
        let (image_width, image_height) = image.dimensions();
        let (mask_width, mask_height) = mask.dimensions();
        if (image_width, image_height) != (mask_width, mask_height) {
            return Err(RepairError::MaskSizeMismatch {
                image_width,
                image_height,
                mask_width,
                mask_height,
            });
        }

        let plan = Self::plan(mask, options)?;

        for HoleAssignment { hole, source } in &plan.assignments {
            let pixel = *image.get_pixel(source.0, source.1);
            image.put_pixel(hole.0, hole.1, pixel);
        }

        Ok(RepairReport {
            hole_pixels: plan.assignments.len(),
            source_pixels: plan.source_count,
        })
    }

    /// Outer-contour pixels of the eroded foreground
    fn contour_sources(eroded: &GrayImage) -> Vec<(u32, u32)> {
        find_contours::<u32>(eroded)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer)
            .flat_map(|c| c.points.into_iter().map(|p| (p.x, p.y)))
            .collect()
    }
}

// ============================================================
// Tests
// ============================================================
