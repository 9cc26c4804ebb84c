use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Cms,
    Minimal,
}

impl BuiltinTheme {
    /// Unknown names fall back to [`BuiltinTheme::Cms`].
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "cms" => Self::Cms,
            other => {
                tracing::warn!(theme = other, "unknown theme, using cms");
                Self::Cms
            }
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Cms => cms(),
            Self::Minimal => minimal(),
        }
    }
}

fn cms() -> VizConfig {
    VizConfig {
        theme: "cms".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        experiment: ExperimentConfig::default(),
        palette: "tab10".into(),
        output: OutputConfig::default(),
        comparison: ComparisonConfig::default(),
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 720.0, height: 576.0 },
        font: FontConfig { size: 11.0, label_size: 14.0, tick_size: 11.0, header_size: 20.0 },
        axes: AxesConfig {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 6.0,
            minor_tick_length: 3.0,
            line_width: 1.0,
        },
        experiment: ExperimentConfig { name: String::new(), status: String::new() },
        palette: "cms_petroff10".into(),
        comparison: ComparisonConfig {
            line_width: 2.0,
            marker_size: 8.0,
            panel_gap: 10.0,
            rotated_tick_size: 8.0,
            ..ComparisonConfig::default()
        },
        ..cms()
    }
}
