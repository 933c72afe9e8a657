//! Command-line interface definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CliOverrides;

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INPUT_NOT_FOUND: i32 = 2;
}

/// Prepare trading-card scans for print: normalize, repair corners, add bleed
#[derive(Debug, Parser)]
#[command(name = "cardbleed", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert card images under a directory (or a single file)
    Convert(ConvertArgs),

    /// Show version, platform and configuration information
    Info,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input file or directory (searched recursively for .png/.jpg/.jpeg)
    pub input: PathBuf,

    /// Output directory; results keep their original base names
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Explicit config file (default: ./cardbleed.toml, then user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target card width in pixels
    #[arg(long)]
    pub card_width: Option<u32>,

    /// Target card height in pixels
    #[arg(long)]
    pub card_height: Option<u32>,

    /// Pixels cropped from each side after resizing
    #[arg(long)]
    pub edge_crop: Option<u32>,

    /// Mask erosion iterations isolating corner defects
    #[arg(long)]
    pub corner_erosion: Option<u8>,

    /// Per-channel background color tolerance
    #[arg(long)]
    pub color_tolerance: Option<u8>,

    /// Corner alpha below this selects the alpha mask strategy
    #[arg(long)]
    pub alpha_threshold: Option<u8>,

    /// Base bleed margin in pixels (edge crop is added back on top)
    #[arg(long)]
    pub bleed_margin: Option<u32>,

    /// JPEG encoder quality for .jpg/.jpeg outputs
    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// Worker pool size (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Skip inputs whose output file already exists
    #[arg(long)]
    pub skip_existing: bool,

    /// Reprocess even when the output file already exists
    #[arg(long)]
    pub force: bool,

    /// Print the execution plan without processing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the progress bar and summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl ConvertArgs {
    /// Config overrides carried by explicitly-set flags
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            card_width: self.card_width,
            card_height: self.card_height,
            edge_crop: self.edge_crop,
            corner_erosion: self.corner_erosion,
            color_tolerance: self.color_tolerance,
            alpha_threshold: self.alpha_threshold,
            bleed_margin: self.bleed_margin,
            jpeg_quality: self.jpeg_quality,
            threads: self.threads,
        }
    }

    /// Effective skip-existing behavior; `--force` always wins
    pub fn effective_skip_existing(&self) -> bool {
        self.skip_existing && !self.force
    }
}
