//! cardbleed - print preparation for trading card scans
//!
//! Normalizes card dimensions, repairs corner and background artifacts left
//! by cutting or transparent corners, and adds a mirrored bleed margin so
//! printers can trim without exposing white edges.
//!
//! # Pipeline
//!
//! Each image flows strictly forward through four owned stages:
//!
//! ```text
//! raw image -> normalized image -> mask -> repaired image -> bled image
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use cardbleed::{CardPipeline, PipelineConfig};
//!
//! let pipeline = CardPipeline::new(PipelineConfig::default());
//! let image = image::open("card.png").unwrap();
//! let card = pipeline.process_image(&image).unwrap();
//! card.image.save("card_with_bleed.png").unwrap();
//! ```

pub mod bleed;
pub mod cli;
pub mod config;
pub mod mask;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod repair;

// Re-export public API
pub use bleed::BleedSynthesizer;
pub use cli::{exit_codes, Cli, Commands, ConvertArgs};
pub use config::{CliOverrides, Config, ConfigError, PipelineConfig};
pub use mask::{MaskBuilder, MaskOptions, MaskStrategy, BACKGROUND, FOREGROUND};
pub use normalize::{DimensionNormalizer, NormalizeError, NormalizeOptions};
pub use pipeline::{
    collect_card_images, CardPipeline, NoProgress, PipelineError, ProcessedCard,
    ProgressCallback, IMAGE_EXTENSIONS,
};
pub use progress::{BatchSummary, ProcessingStage};
pub use repair::{
    HoleAssignment, HoleFiller, NearestNeighborIndex, RepairError, RepairOptions, RepairPlan,
    RepairReport,
};
