use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::color::Color;
use crate::output::OutputFormat;
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub experiment: ExperimentConfig,
    pub palette: String,
    pub output: OutputConfig,
    pub comparison: ComparisonConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Cms.base_config()
    }
}

impl VizConfig {
    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
    }
}

/// Figure size in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 1440.0,  // 20" * 72
            height: 1152.0, // 16" * 72
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Legend text.
    pub size: f64,
    /// Axis titles.
    pub label_size: f64,
    pub tick_size: f64,
    /// Experiment label; the plot title is drawn at 0.8 of this.
    pub header_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 22.0, label_size: 28.0, tick_size: 22.0, header_size: 40.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
    pub line_width: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 14.0,
            minor_tick_length: 7.0,
            line_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: false, color: Color::hex("#b0b0b0"), alpha: 0.6 }
    }
}

/// Experiment label drawn above the primary panel; empty `name` disables it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub name: String,
    pub status: String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self { name: "CMS".into(), status: "Preliminary".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Every plot is written once per format.
    pub formats: Vec<OutputFormat>,
    pub dpi: u32,
    /// Inline the font faces into SVG files.
    pub svg_embed_fonts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { formats: vec![OutputFormat::Png, OutputFormat::Pdf], dpi: 100, svg_embed_fonts: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub ratio_y_range: [f64; 2],
    /// Width of the step outlines.
    pub line_width: f64,
    /// Ratio marker diameter.
    pub marker_size: f64,
    /// Share of the panel height given to the ratio panel.
    pub ratio_fraction: f64,
    /// Vertical gap between the panels.
    pub panel_gap: f64,
    /// Tick label size on plots with rotated x ticks.
    pub rotated_tick_size: f64,
    /// Counter-clockwise rotation of those labels, in degrees.
    pub tick_rotation: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            ratio_y_range: [0.5, 1.5],
            line_width: 4.0,
            marker_size: 20.0,
            ratio_fraction: 0.25,
            panel_gap: 20.0,
            rotated_tick_size: 16.0,
            tick_rotation: 15.0,
        }
    }
}

/// Resolve a VizConfig from an optional YAML string.
///
/// The document's `theme` key selects the base configuration; every other key
/// present overrides the matching field of that base, section by section.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let Some(yaml) = user_yaml else {
        return Ok(VizConfig::default());
    };
    let overlay: Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    let theme = overlay.get("theme").and_then(Value::as_str).unwrap_or("cms");

    let mut merged = serde_yaml_ng::to_value(BuiltinTheme::parse(theme).base_config())
        .map_err(|e| crate::RenderError::Config(e.to_string()))?;
    merge(&mut merged, overlay);
    let config: VizConfig =
        serde_yaml_ng::from_value(merged).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn validate(config: &VizConfig) -> crate::Result<()> {
    let bad = |msg: String| Err(crate::RenderError::Config(msg));
    if !(config.figure.width > 0.0 && config.figure.height > 0.0) {
        return bad(format!("figure size must be positive, got {}x{}", config.figure.width, config.figure.height));
    }
    let [lo, hi] = config.comparison.ratio_y_range;
    if !(lo < hi) {
        return bad(format!("comparison.ratio_y_range must be increasing, got [{lo}, {hi}]"));
    }
    if !(0.0..1.0).contains(&config.comparison.ratio_fraction) {
        return bad(format!(
            "comparison.ratio_fraction must be in [0, 1), got {}",
            config.comparison.ratio_fraction
        ));
    }
    if config.output.dpi == 0 {
        return bad("output.dpi must be positive".into());
    }
    Ok(())
}
