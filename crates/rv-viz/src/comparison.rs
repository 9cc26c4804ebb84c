use std::time::{SystemTime, UNIX_EPOCH};

use rv_core::{Error, Hist1D, Result};
use serde::Serialize;

/// Default y range of the ratio panel.
pub const DEFAULT_RATIO_Y_RANGE: (f64, f64) = (0.5, 1.5);

const SCHEMA_VERSION: &str = "relval_comparison_v0";

/// Scale of the primary y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YScale {
    /// Linear axis.
    #[default]
    Linear,
    /// Logarithmic axis.
    Log,
}

/// Axis labels, limits and styling switches for one comparison plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotOptions {
    /// File stem of the plot.
    pub name: String,
    /// Title drawn at the top right (usually the object collection).
    pub title: Option<String>,
    /// x-axis label.
    pub x_label: String,
    /// y-axis label.
    pub y_label: String,
    /// Explicit x limits.
    pub x_lim: Option<(f64, f64)>,
    /// Explicit y limits of the primary panel.
    pub y_lim: Option<(f64, f64)>,
    /// y range of the ratio panel.
    pub ratio_y_range: (f64, f64),
    /// Primary y scale.
    pub y_scale: YScale,
    /// Draw smaller, rotated x tick labels on the ratio panel.
    pub rotate_ticks: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: None,
            x_label: String::new(),
            y_label: String::new(),
            x_lim: None,
            y_lim: None,
            ratio_y_range: DEFAULT_RATIO_Y_RANGE,
            y_scale: YScale::Linear,
            rotate_ticks: false,
        }
    }
}

impl PlotOptions {
    /// Options for a plot named `name` with the given axis labels.
    pub fn new(name: impl Into<String>, y_label: impl Into<String>, x_label: impl Into<String>) -> Self {
        Self { name: name.into(), y_label: y_label.into(), x_label: x_label.into(), ..Default::default() }
    }
}

/// Provenance stamped into every artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMeta {
    /// Producing tool, `"relval"`.
    pub tool: String,
    /// Crate version of the producer.
    pub tool_version: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_unix_ms: u128,
}

/// One release drawn on the primary panel as a step outline.
#[derive(Debug, Clone, Serialize)]
pub struct MainSeries {
    /// Legend label.
    pub label: String,
    /// `n + 1` bin edges.
    pub bin_edges: Vec<f64>,
    /// Bin contents.
    pub y: Vec<f64>,
    /// Per-bin errors, `sqrt(sumw2)`.
    pub yerr: Vec<f64>,
}

/// One release divided by the reference, drawn as error-bar markers.
#[derive(Debug, Clone, Serialize)]
pub struct RatioSeries {
    /// `"<label>/<reference label>"`
    pub label: String,
    /// Bin centres.
    pub x: Vec<f64>,
    /// Bin half-widths.
    pub xerr: Vec<f64>,
    /// Ratio values; 0 where the reference bin is empty.
    pub y: Vec<f64>,
    /// Propagated ratio errors.
    pub yerr: Vec<f64>,
}

/// Lower panel: every non-reference release over the reference.
#[derive(Debug, Clone, Serialize)]
pub struct RatioPanel {
    /// Label of the denominator release.
    pub reference: String,
    /// y limits of the panel.
    pub y_range: (f64, f64),
    /// Reference line drawn at this value across the x range.
    pub reference_line: f64,
    /// One curve per non-reference release, in input order.
    pub series: Vec<RatioSeries>,
}

/// Everything needed to draw one main + ratio comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonArtifact {
    /// Artifact schema identifier.
    pub schema_version: String,
    /// Who wrote the artifact, and when.
    pub meta: ComparisonMeta,
    /// Labels and styling the plot was built with.
    pub options: PlotOptions,
    /// `(first edge, last edge)` over all series.
    pub x_range: (f64, f64),
    /// One step outline per input histogram.
    pub series: Vec<MainSeries>,
    /// Present when more than one histogram is compared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<RatioPanel>,
}

impl ComparisonArtifact {
    /// Build the artifact for `hists`, labelled pairwise by `labels`.
    ///
    /// Returns `Ok(None)` when every histogram sums to zero: there is
    /// nothing to draw. The ratio panel exists only for more than one
    /// histogram; each non-reference histogram is divided by the first.
    pub fn build(hists: &[Hist1D], labels: &[String], options: &PlotOptions) -> Result<Option<Self>> {
        if hists.is_empty() {
            return Err(Error::Validation(format!("{}: no histograms to compare", options.name)));
        }
        if hists.len() != labels.len() {
            return Err(Error::Validation(format!(
                "{}: {} histograms but {} labels",
                options.name,
                hists.len(),
                labels.len()
            )));
        }
        if hists.iter().all(Hist1D::is_empty_sum) {
            return Ok(None);
        }

        let series = hists
            .iter()
            .zip(labels)
            .map(|(h, label)| MainSeries {
                label: label.clone(),
                bin_edges: h.edges.clone(),
                y: h.values.clone(),
                yerr: h.errors(),
            })
            .collect();

        let ratio = if hists.len() > 1 { Some(ratio_panel(hists, labels, options)?) } else { None };

        let x_range = hists.iter().filter_map(Hist1D::x_range).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), (a, b)| (lo.min(a), hi.max(b)),
        );
        if !(x_range.0.is_finite() && x_range.1.is_finite()) {
            return Err(Error::Validation(format!("{}: histograms have no bins", options.name)));
        }

        Ok(Some(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            meta: ComparisonMeta {
                tool: "relval".to_string(),
                tool_version: rv_core::VERSION.to_string(),
                created_unix_ms: now_unix_ms(),
            },
            options: options.clone(),
            x_range,
            series,
            ratio,
        }))
    }

    /// Number of ratio curves (0 without a ratio panel).
    pub fn n_ratio_curves(&self) -> usize {
        self.ratio.as_ref().map_or(0, |r| r.series.len())
    }
}

fn ratio_panel(hists: &[Hist1D], labels: &[String], options: &PlotOptions) -> Result<RatioPanel> {
    let (reference, ref_label) = (&hists[0], &labels[0]);
    let series = hists[1..]
        .iter()
        .zip(&labels[1..])
        .map(|(h, label)| -> Result<RatioSeries> {
            let r = rv_core::ratio(h, reference)?;
            Ok(RatioSeries {
                label: format!("{label}/{ref_label}"),
                x: r.centers(),
                xerr: r.half_widths(),
                yerr: r.errors(),
                y: r.values,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RatioPanel {
        reference: ref_label.clone(),
        y_range: options.ratio_y_range,
        reference_line: 1.0,
        series,
    })
}

fn now_unix_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hist(values: Vec<f64>) -> Hist1D {
        let edges = (0..=values.len()).map(|i| i as f64 * 2.0).collect();
        Hist1D::from_counts("h", edges, values).unwrap()
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("File_{i}")).collect()
    }

    #[test]
    fn all_empty_inputs_build_nothing() {
        let hists = vec![hist(vec![0.0, 0.0]), hist(vec![0.0, 0.0])];
        let art = ComparisonArtifact::build(&hists, &labels(2), &PlotOptions::default()).unwrap();
        assert!(art.is_none());
    }

    #[test]
    fn single_histogram_has_no_ratio_panel() {
        let art = ComparisonArtifact::build(&[hist(vec![1.0, 2.0])], &labels(1), &PlotOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(art.series.len(), 1);
        assert!(art.ratio.is_none());
        assert_eq!(art.n_ratio_curves(), 0);
        assert_eq!(art.x_range, (0.0, 4.0));
    }

    #[test]
    fn three_releases_give_two_ratio_curves() {
        let hists = vec![hist(vec![4.0, 8.0]), hist(vec![2.0, 8.0]), hist(vec![0.0, 0.0])];
        let art = ComparisonArtifact::build(&hists, &labels(3), &PlotOptions::default()).unwrap().unwrap();

        assert_eq!(art.series.len(), 3);
        let ratio = art.ratio.as_ref().unwrap();
        assert_eq!(art.n_ratio_curves(), 2);
        assert_eq!(ratio.reference, "File_0");
        assert_eq!(ratio.y_range, (0.5, 1.5));
        assert_eq!(ratio.series[0].label, "File_1/File_0");
        assert_eq!(ratio.series[1].label, "File_2/File_0");
        assert_relative_eq!(ratio.series[0].y[0], 0.5);
        assert_relative_eq!(ratio.series[0].y[1], 1.0);
        assert_eq!(ratio.series[1].y, vec![0.0, 0.0]);
        assert_eq!(ratio.series[0].x, vec![1.0, 3.0]);
        assert_eq!(ratio.series[0].xerr, vec![1.0, 1.0]);
    }

    #[test]
    fn main_series_errors_are_root_variances() {
        let art = ComparisonArtifact::build(&[hist(vec![9.0, 16.0])], &labels(1), &PlotOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(art.series[0].yerr, vec![3.0, 4.0]);
    }

    #[test]
    fn label_count_must_match() {
        let hists = vec![hist(vec![1.0]), hist(vec![1.0])];
        assert!(ComparisonArtifact::build(&hists, &labels(1), &PlotOptions::default()).is_err());
        assert!(ComparisonArtifact::build(&[], &[], &PlotOptions::default()).is_err());
    }

    #[test]
    fn incompatible_binning_fails_ratio() {
        let hists = vec![hist(vec![1.0, 2.0]), hist(vec![1.0])];
        assert!(ComparisonArtifact::build(&hists, &labels(2), &PlotOptions::default()).is_err());
    }
}
