//! Input releases: DQM files paired with legend labels.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use rv_core::Hist1D;
use rv_root::{Directory, Histogram, RootFile};

/// One input file and the label it is shown under.
#[derive(Debug)]
pub struct Release {
    pub label: String,
    pub file: RootFile,
}

impl Release {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Resolve `path` inside this release's file.
    pub fn directory(&self, path: &str) -> Result<Directory> {
        self.file
            .get_directory(path)
            .with_context(|| format!("{}: directory {path:?}", self.path().display()))
    }

    /// Read histogram `name` from `dir` (which lives at `dir_path`).
    pub fn histogram(&self, dir: &Directory, dir_path: &str, name: &str) -> Result<Hist1D> {
        let h = self
            .file
            .get_histogram_in(dir, name)
            .with_context(|| format!("{}: histogram {dir_path}/{name}", self.path().display()))?;
        to_hist1d(h).with_context(|| format!("{}: histogram {dir_path}/{name}", self.path().display()))
    }
}

/// Labels for `n_files` inputs: the given ones, or `File_<index>`.
pub fn resolve_labels(n_files: usize, labels: Option<Vec<String>>) -> Result<Vec<String>> {
    ensure!(n_files > 0, "no input files given");
    let labels = match labels {
        Some(labels) => labels.into_iter().map(|l| l.trim().to_string()).collect(),
        None => (0..n_files).map(|i| format!("File_{i}")).collect::<Vec<_>>(),
    };
    ensure!(
        labels.len() == n_files,
        "number of files ({n_files}) and labels ({}) must match",
        labels.len()
    );
    ensure!(labels.iter().all(|l| !l.is_empty()), "labels must not be empty");
    let mut seen = HashSet::new();
    for label in &labels {
        ensure!(seen.insert(label.as_str()), "duplicate label {label:?}");
    }
    Ok(labels)
}

/// Open every file, in order, under its label.
pub fn open_releases(files: &[PathBuf], labels: Vec<String>) -> Result<Vec<Release>> {
    files
        .iter()
        .zip(labels)
        .map(|(path, label)| {
            let file = RootFile::open(path).with_context(|| format!("opening {}", path.display()))?;
            tracing::info!(label = %label, path = %path.display(), "opened release");
            Ok(Release { label, file })
        })
        .collect()
}

/// Histogram as read from ROOT, with variances defaulting to the contents.
pub fn to_hist1d(h: Histogram) -> Result<Hist1D> {
    let variances = h.variances();
    Ok(Hist1D::new(h.name, h.title, h.bin_edges, h.bin_content, variances)?)
}
