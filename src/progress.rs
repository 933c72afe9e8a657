//! Progress reporting for batch processing.
//!
//! Stages of the per-image pipeline plus the batch summary printed after a
//! run. Rendering a live bar is the binary's concern; the library only
//! reports events through [`crate::pipeline::ProgressCallback`].

use std::fmt;

/// Per-image processing stages, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    /// Resizing and edge-cropping
    #[default]
    Normalizing,
    /// Building the card mask
    Masking,
    /// Filling corner holes
    Repairing,
    /// Adding the mirrored bleed margin
    Bleeding,
    /// Encoding the output file
    Writing,
    /// Done
    Completed,
}

impl ProcessingStage {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Normalizing => "Normalizing",
            ProcessingStage::Masking => "Masking",
            ProcessingStage::Repairing => "Repairing",
            ProcessingStage::Bleeding => "Bleeding",
            ProcessingStage::Writing => "Writing",
            ProcessingStage::Completed => "Completed",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Images processed and written
    pub succeeded: usize,

    /// Images skipped because the output already existed
    pub skipped: usize,

    /// Images that failed and were left unwritten
    pub failed: usize,
}

impl BatchSummary {
    /// Total number of images the batch looked at
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// Whether every non-skipped image processed cleanly
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Print the end-of-run summary block
    pub fn print(&self) {
        println!();
        println!("{}", "=".repeat(60));
        println!("Processing Summary");
        println!("{}", "=".repeat(60));
        println!("  Total images: {}", self.total());
        println!("  Succeeded:    {}", self.succeeded);
        println!("  Skipped:      {}", self.skipped);
        println!("  Failed:       {}", self.failed);
        println!("{}", "=".repeat(60));
    }
}
