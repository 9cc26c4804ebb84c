//! Runs suites: reads the histograms of every release and writes one
//! comparison per histogram name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rv_core::Hist1D;
use rv_viz::{ComparisonArtifact, PlotOptions};
use rv_viz_render::config::VizConfig;

use crate::inputs::Release;
use crate::suites::Suite;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub skipped: usize,
}

pub struct Plotter {
    out_dir: PathBuf,
    config: VizConfig,
    summary: Summary,
}

impl Plotter {
    /// Plotter writing under `<base>/Plots_<tag>/`, created if absent.
    pub fn new(base: &Path, tag: &str, config: VizConfig) -> Result<Self> {
        let out_dir = base.join(format!("Plots_{tag}"));
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;
        Ok(Self { out_dir, config, summary: Summary::default() })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Compare `hists` (one per release, reference first) and write the plot
    /// in every configured format, under `subdir` if given.
    ///
    /// Returns `false` without writing anything when every histogram is empty.
    pub fn plot(&mut self, hists: &[Hist1D], labels: &[String], options: &PlotOptions, subdir: Option<&str>) -> Result<bool> {
        let Some(artifact) = ComparisonArtifact::build(hists, labels, options)
            .with_context(|| format!("comparing {}", options.name))?
        else {
            tracing::info!(plot = %options.name, "all histograms empty, skipping");
            self.summary.skipped += 1;
            return Ok(false);
        };

        let dir = match subdir {
            Some(sub) => self.out_dir.join(sub),
            None => self.out_dir.clone(),
        };
        for &format in &self.config.output.formats {
            let path = dir.join(format!("{}.{}", options.name, format.extension()));
            rv_viz_render::render_to_file(&artifact, format, &path, &self.config)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        self.summary.written += 1;
        Ok(true)
    }

    /// Read and plot everything `suite` names, for all `releases`.
    pub fn run_suite(&mut self, suite: &Suite, releases: &[Release]) -> Result<()> {
        tracing::info!(suite = suite.name, plots = suite.n_plots(), "running suite");
        let labels: Vec<String> = releases.iter().map(|r| r.label.clone()).collect();
        let ratio_y_range = self.ratio_y_range();

        let bases = releases.iter().map(|r| r.directory(suite.base)).collect::<Result<Vec<_>>>()?;
        for &name in &suite.top_level {
            let hists = releases
                .iter()
                .zip(&bases)
                .map(|(r, dir)| r.histogram(dir, suite.base, name))
                .collect::<Result<Vec<_>>>()?;
            let options = PlotOptions { rotate_ticks: true, ratio_y_range, ..PlotOptions::new(name, "", "") };
            self.plot(&hists, &labels, &options, None)?;
        }

        for coll in &suite.collections {
            tracing::info!(collection = coll.alias, dir = coll.dir, "plotting collection");
            let sub = self.out_dir.join(coll.dir);
            std::fs::create_dir_all(&sub).with_context(|| format!("creating {}", sub.display()))?;

            let dir_path = format!("{}/{}", suite.base, coll.dir);
            let dirs = releases.iter().map(|r| r.directory(&dir_path)).collect::<Result<Vec<_>>>()?;
            for plot in &coll.plots {
                let hists = releases
                    .iter()
                    .zip(&dirs)
                    .map(|(r, dir)| r.histogram(dir, &dir_path, &plot.name))
                    .collect::<Result<Vec<_>>>()?;
                let options = PlotOptions {
                    title: Some(coll.dir.to_string()),
                    ratio_y_range,
                    ..PlotOptions::new(plot.name.as_str(), plot.y_label, plot.x_label)
                };
                self.plot(&hists, &labels, &options, Some(coll.dir))?;
            }
        }
        Ok(())
    }

    fn ratio_y_range(&self) -> (f64, f64) {
        let [lo, hi] = self.config.comparison.ratio_y_range;
        (lo, hi)
    }
}
