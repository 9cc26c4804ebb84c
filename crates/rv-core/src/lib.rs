//! # rv-core
//!
//! Histogram arithmetic for release-validation comparisons: the [`Hist1D`]
//! model, bin-by-bin ratios with propagated uncertainty, and Clopper-Pearson
//! efficiencies.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod efficiency;
pub mod error;
pub mod hist;
pub mod ratio;

pub use efficiency::{DEFAULT_CONFIDENCE_LEVEL, Efficiency, efficiency, efficiency_hist};
pub use error::{Error, Result};
pub use hist::Hist1D;
pub use ratio::ratio;

/// Crate version, recorded in serialized artifacts.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
