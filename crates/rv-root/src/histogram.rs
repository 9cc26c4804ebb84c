//! 1D histogram returned by [`RootFile::get_histogram`](crate::RootFile::get_histogram).

/// A TH1 read from a ROOT file, without under/overflow bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Bin edges (`n_bins + 1`), uniform or variable.
    pub bin_edges: Vec<f64>,
    /// Bin contents (`n_bins`).
    pub bin_content: Vec<f64>,
    /// Per-bin sum of squared weights, when the object stored `fSumw2`.
    pub sumw2: Option<Vec<f64>>,
    /// `fEntries` as recorded by ROOT.
    pub entries: f64,
}

impl Histogram {
    /// Number of in-range bins.
    pub fn n_bins(&self) -> usize {
        self.bin_content.len()
    }

    /// Per-bin variances: `fSumw2` if stored, otherwise the contents.
    pub fn variances(&self) -> Vec<f64> {
        match &self.sumw2 {
            Some(sw2) => sw2.clone(),
            None => self.bin_content.clone(),
        }
    }
}
