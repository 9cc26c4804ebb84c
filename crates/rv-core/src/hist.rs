//! One-dimensional binned histogram with per-bin variances.

use serde::Serialize;

use crate::error::{Error, Result};

/// A 1D histogram: edges, values and variances, without under/overflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hist1D {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Bin edges (`n_bins + 1`, increasing).
    pub edges: Vec<f64>,
    /// Bin values (`n_bins`).
    pub values: Vec<f64>,
    /// Bin variances (`n_bins`).
    pub variances: Vec<f64>,
}

impl Hist1D {
    /// Build a histogram, checking that the three arrays agree in length.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        edges: Vec<f64>,
        values: Vec<f64>,
        variances: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if edges.len() != values.len() + 1 {
            return Err(Error::Validation(format!(
                "{name}: {} edges for {} bins",
                edges.len(),
                values.len()
            )));
        }
        if variances.len() != values.len() {
            return Err(Error::Validation(format!(
                "{name}: {} variances for {} bins",
                variances.len(),
                values.len()
            )));
        }
        if edges.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::Validation(format!("{name}: bin edges must be non-decreasing")));
        }
        Ok(Self { name, title: title.into(), edges, values, variances })
    }

    /// Unweighted counts: variances equal the values.
    pub fn from_counts(name: impl Into<String>, edges: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        let variances = values.clone();
        Self::new(name, "", edges, values, variances)
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.values.len()
    }

    /// Sum of all bin values.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Whether every bin value sums to zero; such histograms are not plotted.
    pub fn is_empty_sum(&self) -> bool {
        self.sum() == 0.0
    }

    /// Per-bin standard deviations.
    pub fn errors(&self) -> Vec<f64> {
        self.variances.iter().map(|v| v.max(0.0).sqrt()).collect()
    }

    /// Bin centres.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Half bin widths.
    pub fn half_widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[1] - w[0])).collect()
    }

    /// `(first edge, last edge)`, or `None` for a histogram without bins.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        match (self.edges.first(), self.edges.last()) {
            (Some(&lo), Some(&hi)) if self.n_bins() > 0 => Some((lo, hi)),
            _ => None,
        }
    }

    /// Ensure `other` has the same number of bins.
    pub fn check_compatible(&self, other: &Hist1D) -> Result<()> {
        if self.n_bins() != other.n_bins() {
            return Err(Error::BinningMismatch { left: self.n_bins(), right: other.n_bins() });
        }
        Ok(())
    }
}
