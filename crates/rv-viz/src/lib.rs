//! # rv-viz
//!
//! Plot-ready artifacts for release-validation comparisons.
//!
//! Artifacts are numbers-first: they hold exactly what a renderer draws
//! (series, error bars, ratio curves) and serialize to flat JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Overlay + ratio comparison of several releases.
pub mod comparison;

pub use comparison::{
    ComparisonArtifact, ComparisonMeta, MainSeries, PlotOptions, RatioPanel, RatioSeries, YScale,
};
