//! Rendering of [`rv_viz::ComparisonArtifact`]s.
//!
//! Plots are laid out on an SVG [`canvas::Canvas`] in points, then written as
//! SVG, rasterised to PNG (`png` feature) or converted to PDF (`pdf` feature).
//! Styling comes from a [`config::VizConfig`], usually resolved from YAML on
//! top of a built-in theme.

pub mod canvas;
pub mod color;
pub mod config;
pub mod font;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::Path;

use config::VizConfig;
use output::OutputFormat;
use rv_viz::ComparisonArtifact;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("config error: {0}")]
    Config(String),
    #[error("font error: {0}")]
    Font(String),
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("output format {0} is not enabled in this build")]
    UnsupportedFormat(OutputFormat),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render a comparison to an SVG document, inlining the font faces when
/// `output.svg_embed_fonts` is set.
pub fn render_svg(artifact: &ComparisonArtifact, config: &VizConfig) -> Result<String> {
    let mut canvas = plots::comparison::render(artifact, config)?;
    canvas.embed_fonts(config.output.svg_embed_fonts);
    Ok(canvas.finish_svg())
}

/// SVG handed to the rasteriser, which loads the faces itself.
#[cfg(any(feature = "png", feature = "pdf"))]
fn render_svg_for_conversion(artifact: &ComparisonArtifact, config: &VizConfig) -> Result<String> {
    Ok(plots::comparison::render(artifact, config)?.finish_svg())
}

/// Render a comparison to bytes in `format`.
///
/// [`OutputFormat::Json`] serializes the artifact itself.
pub fn render_to_bytes(artifact: &ComparisonArtifact, format: OutputFormat, config: &VizConfig) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(artifact)?),
        OutputFormat::Svg => Ok(render_svg(artifact, config)?.into_bytes()),
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            output::png::svg_to_png(&render_svg_for_conversion(artifact, config)?, config.output.dpi)
        }
        #[cfg(feature = "pdf")]
        OutputFormat::Pdf => output::pdf::svg_to_pdf(&render_svg_for_conversion(artifact, config)?),
        #[allow(unreachable_patterns)]
        other => Err(RenderError::UnsupportedFormat(other)),
    }
}

/// Render a comparison to `path` in `format`.
pub fn render_to_file(
    artifact: &ComparisonArtifact,
    format: OutputFormat,
    path: &Path,
    config: &VizConfig,
) -> Result<()> {
    match format {
        OutputFormat::Svg => output::svg::save_svg(&render_svg(artifact, config)?, path)?,
        _ => std::fs::write(path, render_to_bytes(artifact, format, config)?)?,
    }
    tracing::debug!(path = %path.display(), "wrote plot");
    Ok(())
}
