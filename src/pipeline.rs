//! Card processing pipeline
//!
//! Runs the four per-image stages in order — normalize, mask, repair,
//! bleed — and orchestrates batches over a rayon worker pool. Every image
//! is a self-contained computation on an exclusively-owned buffer; nothing
//! is shared between images and no ordering between them is guaranteed.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::bleed::BleedSynthesizer;
use crate::config::PipelineConfig;
use crate::mask::MaskBuilder;
use crate::normalize::{DimensionNormalizer, NormalizeError};
use crate::progress::BatchSummary;
use crate::repair::{HoleFiller, RepairError, RepairReport};

/// File extensions the batch orchestrator picks up
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// ============================================================
// Types
// ============================================================

/// Pipeline error types
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported pixel format with {channels} channels (need 3 or 4)")]
    UnsupportedFormat { channels: u8 },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Repair(#[from] RepairError),

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// A fully processed card, ready for encoding
#[derive(Debug)]
pub struct ProcessedCard {
    /// Repaired and bled image
    pub image: RgbaImage,

    /// Whether the source carried an alpha channel (drives output encoding)
    pub has_alpha: bool,

    /// What the repair stage did
    pub repair: RepairReport,
}

/// Callbacks fired as the batch progresses.
///
/// Invoked from worker threads; implementations must be thread-safe.
pub trait ProgressCallback: Sync {
    fn on_image_start(&self, _path: &Path) {}
    fn on_image_complete(&self, _path: &Path) {}
    fn on_image_skipped(&self, _path: &Path) {}
    fn on_image_failed(&self, _path: &Path, _error: &PipelineError) {}
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {}

enum Outcome {
    Succeeded,
    Skipped,
    Failed,
}

// ============================================================
// Pipeline
// ============================================================

/// The per-image pipeline plus batch orchestration
pub struct CardPipeline {
    config: PipelineConfig,
}

impl CardPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run normalize → mask → repair → bleed on one decoded image.
    ///
    /// The input is consumed conceptually: the working buffer is owned by
    /// this call from decode to return.
    pub fn process_image(&self, image: &DynamicImage) -> Result<ProcessedCard> {
        let color = image.color();
        let channels = color.channel_count();
        if channels != 3 && channels != 4 {
            return Err(PipelineError::UnsupportedFormat { channels });
        }
        let has_alpha = color.has_alpha();

        // RGB sources are widened to RGBA for a single working format and
        // narrowed back when encoding
        let rgba = image.to_rgba8();

        let mut normalized =
            DimensionNormalizer::normalize(&rgba, &self.config.normalize_options())?;

        let mask = MaskBuilder::build(&normalized, has_alpha, &self.config.mask_options());

        let repair =
            HoleFiller::repair_in_place(&mut normalized, &mask, &self.config.repair_options())?;
        debug!(
            holes = repair.hole_pixels,
            sources = repair.source_pixels,
            "repaired corners"
        );

        let bled = BleedSynthesizer::apply(&normalized, self.config.bleed_length());

        Ok(ProcessedCard {
            image: bled,
            has_alpha,
            repair,
        })
    }

    /// Process one file from disk and write the result under its base name
    /// in `output_dir`
    pub fn process_file(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        let decoded = image::open(input)?;
        let card = self.process_image(&decoded)?;

        let output = self.output_path(input, output_dir);
        self.save(&card, &output)?;
        Ok(output)
    }

    /// Output location for an input file: original base name, flat directory
    pub fn output_path(&self, input: &Path, output_dir: &Path) -> PathBuf {
        match input.file_name() {
            Some(name) => output_dir.join(name),
            None => output_dir.join("card.png"),
        }
    }

    /// Encode a processed card. JPEG outputs are flattened to RGB at the
    /// configured quality; PNG keeps alpha when the source had it.
    fn save(&self, card: &ProcessedCard, output: &Path) -> Result<()> {
        let is_jpeg = output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
            .unwrap_or(false);

        if is_jpeg {
            let rgb = DynamicImage::ImageRgba8(card.image.clone()).to_rgb8();
            let writer = BufWriter::new(File::create(output)?);
            let encoder = JpegEncoder::new_with_quality(writer, self.config.jpeg_quality);
            rgb.write_with_encoder(encoder)?;
        } else if card.has_alpha {
            card.image.save(output)?;
        } else {
            DynamicImage::ImageRgba8(card.image.clone())
                .to_rgb8()
                .save(output)?;
        }

        Ok(())
    }

    /// Process a batch of files in parallel.
    ///
    /// Per-image failures are logged with the offending path and skipped;
    /// the rest of the batch continues. There is no retry: failures here are
    /// deterministic properties of the input, not transient conditions.
    pub fn process_batch<P: ProgressCallback>(
        &self,
        files: &[PathBuf],
        output_dir: &Path,
        skip_existing: bool,
        progress: &P,
    ) -> BatchSummary {
        let run = || self.run_batch(files, output_dir, skip_existing, progress);

        let outcomes = match self.config.threads {
            Some(threads) => {
                match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => pool.install(run),
                    Err(e) => {
                        warn!(error = %e, "failed to build worker pool, using default");
                        run()
                    }
                }
            }
            None => run(),
        };

        let mut summary = BatchSummary::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Succeeded => summary.succeeded += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }
        summary
    }

    fn run_batch<P: ProgressCallback>(
        &self,
        files: &[PathBuf],
        output_dir: &Path,
        skip_existing: bool,
        progress: &P,
    ) -> Vec<Outcome> {
        files
            .par_iter()
            .map(|input| {
                if skip_existing && self.output_path(input, output_dir).exists() {
                    progress.on_image_skipped(input);
                    return Outcome::Skipped;
                }

                progress.on_image_start(input);
                match self.process_file(input, output_dir) {
                    Ok(_) => {
                        progress.on_image_complete(input);
                        Outcome::Succeeded
                    }
                    Err(e) => {
                        warn!(path = %input.display(), error = %e, "skipping image");
                        progress.on_image_failed(input, &e);
                        Outcome::Failed
                    }
                }
            })
            .collect()
    }
}

/// Recursively collect card image files under `root`.
///
/// Accepts a single file as well; results are sorted for stable reporting.
pub fn collect_card_images(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    collect_into(root, &mut images)?;
    images.sort();
    Ok(images)
}

fn collect_into(path: &Path, images: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            collect_into(&entry?.path(), images)?;
        }
    } else if has_image_extension(path) {
        images.push(path.to_path_buf());
    }
    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            card_width: 80,
            card_height: 100,
            edge_crop: 2,
            corner_erosion: 6,
            bleed_margin: 10,
            ..Default::default()
        }
    }

    fn card_with_transparent_corners(width: u32, height: u32, corner: u32) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(width, height, Rgba([180, 180, 180, 255]));
        let corners = [
            (0, 0),
            (width - corner, 0),
            (0, height - corner),
            (width - corner, height - corner),
        ];
        for (cx, cy) in corners {
            for y in cy..cy + corner {
                for x in cx..cx + corner {
                    image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                }
            }
        }
        image
    }

    #[test]
    fn test_process_image_dimensions() {
        let config = small_config();
        let pipeline = CardPipeline::new(config.clone());
        let input = DynamicImage::ImageRgba8(card_with_transparent_corners(80, 100, 4));

        let card = pipeline.process_image(&input).unwrap();
        // (80 - 2*2 + 2*12, 100 - 2*2 + 2*12)
        let expected_width = config.card_width - 2 * config.edge_crop + 2 * config.bleed_length();
        let expected_height = config.card_height - 2 * config.edge_crop + 2 * config.bleed_length();
        assert_eq!(card.image.dimensions(), (expected_width, expected_height));
        assert!(card.has_alpha);
    }

    #[test]
    fn test_process_image_repairs_transparency() {
        let pipeline = CardPipeline::new(small_config());
        let input = DynamicImage::ImageRgba8(card_with_transparent_corners(80, 100, 4));

        let card = pipeline.process_image(&input).unwrap();
        assert!(card.repair.hole_pixels > 0);
        assert!(card.image.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_process_image_rgb_source() {
        let pipeline = CardPipeline::new(small_config());
        let rgb = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            80,
            100,
            image::Rgb([120, 130, 140]),
        ));

        let card = pipeline.process_image(&rgb).unwrap();
        assert!(!card.has_alpha);
    }

    #[test]
    fn test_unsupported_format() {
        let pipeline = CardPipeline::new(small_config());
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(80, 100, image::Luma([7])));

        let result = pipeline.process_image(&gray);
        assert!(matches!(
            result,
            Err(PipelineError::UnsupportedFormat { channels: 1 })
        ));
    }

    #[test]
    fn test_output_path_uses_base_name() {
        let pipeline = CardPipeline::new(small_config());
        let output = pipeline.output_path(
            Path::new("/deep/nested/dir/card_001.png"),
            Path::new("/out"),
        );
        assert_eq!(output, Path::new("/out/card_001.png"));
    }

    #[test]
    fn test_collect_card_images_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        std::fs::write(dir.path().join("one.png"), b"x").unwrap();
        std::fs::write(nested.join("two.JPG"), b"x").unwrap();
        std::fs::write(nested.join("three.jpeg"), b"x").unwrap();
        std::fs::write(nested.join("notes.txt"), b"x").unwrap();

        let images = collect_card_images(dir.path()).unwrap();
        assert_eq!(images.len(), 3);
        assert!(images.iter().all(|p| has_image_extension(p)));
    }

    #[test]
    fn test_collect_accepts_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("card.png");
        std::fs::write(&file, b"x").unwrap();

        let images = collect_card_images(&file).unwrap();
        assert_eq!(images, vec![file]);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();

        // One valid image, one corrupt file
        let good = dir.path().join("good.png");
        card_with_transparent_corners(80, 100, 4).save(&good).unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"not a png").unwrap();

        let pipeline = CardPipeline::new(small_config());
        let summary = pipeline.process_batch(
            &[good.clone(), bad],
            &out,
            false,
            &NoProgress,
        );

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert!(out.join("good.png").exists());
    }

    #[test]
    fn test_batch_skip_existing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();

        let input = dir.path().join("card.png");
        card_with_transparent_corners(80, 100, 4).save(&input).unwrap();
        std::fs::write(out.join("card.png"), b"existing").unwrap();

        let pipeline = CardPipeline::new(small_config());
        let summary = pipeline.process_batch(&[input], &out, true, &NoProgress);

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.succeeded, 0);
        // The placeholder was not overwritten
        assert_eq!(std::fs::read(out.join("card.png")).unwrap(), b"existing");
    }
}
