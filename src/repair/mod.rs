//! Corner Repair module
//!
//! Rewrites defective corner/background pixels of a card scan from the
//! nearest clean edge content.
//!
//! # Features
//!
//! - Mask erosion to isolate corner defects
//! - Exact nearest-neighbor source lookup via a k-d tree
//! - Analysis ([`HoleFiller::plan`]) separated from mutation
//!   ([`HoleFiller::repair_in_place`])

mod filler;
mod spatial;
mod types;

pub use filler::{HoleAssignment, HoleFiller, RepairOptions, RepairPlan, RepairReport};
pub use spatial::NearestNeighborIndex;
pub use types::{RepairError, Result};
