use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Space around the panels of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Area left over inside `canvas` once `margins` are taken.
    pub fn inside(canvas: &Canvas, margins: &Margins) -> Self {
        let width = canvas.width - margins.left - margins.right;
        let height = canvas.height - margins.top - margins.bottom;
        Self { left: margins.left, top: margins.top, width: width.max(50.0), height: height.max(50.0) }
    }
}

impl Margins {
    /// Margins fitting the y tick labels and axis titles, plus header room.
    ///
    /// `x_tick_size` is the size of the bottom tick labels, which may differ
    /// from the configured one when the labels are rotated.
    pub fn auto(canvas: &Canvas, y_axis: &Axis, x_label: &str, x_tick_size: f64, config: &VizConfig) -> Self {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };
        let pad = config.font.tick_size;
        let outward = if config.axes.tick_direction == "in" { 0.0 } else { config.axes.tick_length };

        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        let mut left = pad + outward + max_tick_w + 8.0;
        if !y_axis.label.is_empty() {
            left += config.font.label_size * 1.3;
        }

        let mut bottom = pad + outward + x_tick_size * 1.6;
        if !x_label.is_empty() {
            bottom += config.font.label_size * 1.3;
        }

        let top = if config.experiment.name.is_empty() {
            config.font.header_size * 0.8 + pad
        } else {
            config.font.header_size + pad
        };

        Self { left, top, right: pad * 1.5, bottom }
    }
}
