mod inputs;
mod plotter;
mod suites;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rv_viz_render::config::{VizConfig, resolve_config};

use crate::plotter::Plotter;
use crate::suites::SuiteChoice;

#[derive(Parser)]
#[command(name = "relval")]
#[command(about = "relval - Release-validation comparison plots from DQM ROOT files")]
#[command(version)]
struct Cli {
    /// Comma-separated list of paths to the ROOT files; the first is the reference
    #[arg(long, required = true, value_delimiter = ',')]
    files: Vec<PathBuf>,

    /// Comma-separated list of legend labels (default: File_<index>)
    #[arg(long, value_delimiter = ',')]
    labels: Option<Vec<String>>,

    /// Tag identifying the plots; output goes to Plots_<tag>/
    #[arg(long)]
    tag: String,

    /// Directory in which Plots_<tag>/ is created (default: current directory)
    #[arg(long)]
    odir: Option<PathBuf>,

    /// Which DQM layouts to compare
    #[arg(long, value_enum, default_value = "all")]
    suite: SuiteChoice,

    /// YAML styling/output configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let config = load_config(cli.config.as_deref())?;
    let labels = inputs::resolve_labels(cli.files.len(), cli.labels)?;
    let releases = inputs::open_releases(&cli.files, labels)?;

    let base = match cli.odir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolving current directory")?,
    };
    let mut plotter = Plotter::new(&base, &cli.tag, config)?;

    for suite in cli.suite.suites() {
        plotter.run_suite(&suite, &releases)?;
    }

    let summary = plotter.summary();
    tracing::info!(
        written = summary.written,
        skipped = summary.skipped,
        out_dir = %plotter.out_dir().display(),
        "done"
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<VizConfig> {
    let yaml = path
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("reading config {}", p.display())))
        .transpose()?;
    Ok(resolve_config(yaml.as_deref())?)
}
