//! cardbleed - print preparation for trading card scans
//!
//! CLI entry point

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::filter::LevelFilter;

use cardbleed::{
    collect_card_images, exit_codes, CardPipeline, Cli, Commands, Config, ConvertArgs,
    PipelineConfig, PipelineError, ProgressCallback,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert(args) => run_convert(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

// ============ Progress Callback Implementation ============

/// Batch progress rendered as an indicatif bar
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(total: usize, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        };
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for BarProgress {
    fn on_image_start(&self, path: &Path) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            self.bar.set_message(name.to_string());
        }
    }

    fn on_image_complete(&self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_image_skipped(&self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_image_failed(&self, _path: &Path, _error: &PipelineError) {
        self.bar.inc(1);
    }
}

// ============ Convert Command ============

fn run_convert(args: &ConvertArgs) -> anyhow::Result<i32> {
    init_logging(args.verbose, args.quiet);
    let start_time = Instant::now();

    if !args.input.exists() {
        eprintln!("Error: input path does not exist: {}", args.input.display());
        return Ok(exit_codes::INPUT_NOT_FOUND);
    }

    let images = collect_card_images(&args.input)
        .with_context(|| format!("failed to scan {}", args.input.display()))?;
    if images.is_empty() {
        eprintln!("Error: no card images found under {}", args.input.display());
        return Ok(exit_codes::INPUT_NOT_FOUND);
    }

    let file_config = match &args.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: failed to load config file: {}", e);
            Config::default()
        }),
    };
    let config = file_config.merge_with_cli(&args.overrides());
    let pipeline = CardPipeline::new(config);

    if args.dry_run {
        print_execution_plan(args, &images, pipeline.config());
        return Ok(exit_codes::SUCCESS);
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let progress = BarProgress::new(images.len(), args.quiet);
    let summary = pipeline.process_batch(
        &images,
        &args.output,
        args.effective_skip_existing(),
        &progress,
    );
    progress.finish();

    if !args.quiet {
        summary.print();
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    Ok(if summary.is_clean() {
        exit_codes::SUCCESS
    } else {
        exit_codes::GENERAL_ERROR
    })
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the execution plan for dry-run mode
fn print_execution_plan(args: &ConvertArgs, images: &[std::path::PathBuf], config: &PipelineConfig) {
    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Input:  {}", args.input.display());
    println!("Output: {}", args.output.display());
    println!("Images to process: {}", images.len());
    println!();
    println!("Pipeline Configuration:");
    println!(
        "  1. Normalize to {}x{}, crop {}px per edge",
        config.card_width, config.card_height, config.edge_crop
    );
    println!(
        "  2. Mask background (alpha threshold {}, color tolerance {})",
        config.alpha_threshold, config.color_tolerance
    );
    println!("  3. Repair corners (erosion {} iterations)", config.corner_erosion);
    println!(
        "  4. Bleed edges ({}px = {} margin + {} crop compensation)",
        config.bleed_length(),
        config.bleed_margin,
        config.edge_crop
    );
    println!();
    println!("Processing Options:");
    println!("  Threads: {}", config.threads.unwrap_or_else(num_cpus::get));
    println!(
        "  Skip existing: {}",
        if args.effective_skip_existing() { "YES" } else { "NO" }
    );
    println!("  JPEG quality: {}", config.jpeg_quality);
    println!();
    println!("Files:");
    for (i, file) in images.iter().enumerate() {
        println!("  {}. {}", i + 1, file.display());
    }
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<i32> {
    println!("cardbleed v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    println!();
    println!("Config File Locations:");
    println!("  Local: ./cardbleed.toml");
    if let Some(user) = Config::user_config_path() {
        println!("  User:  {}", user.display());
    }

    println!();
    println!("Defaults:");
    let defaults = PipelineConfig::default();
    println!("  Card size:      {}x{}", defaults.card_width, defaults.card_height);
    println!("  Edge crop:      {}px", defaults.edge_crop);
    println!("  Corner erosion: {} iterations", defaults.corner_erosion);
    println!("  Bleed length:   {}px", defaults.bleed_length());

    Ok(exit_codes::SUCCESS)
}
