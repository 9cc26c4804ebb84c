use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// How the bottom tick labels are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XTickLabels {
    Normal,
    /// Drawn at `size`, rotated counter-clockwise by `angle` degrees.
    Rotated { size: f64, angle: f64 },
}

impl XTickLabels {
    pub fn size(&self, config: &VizConfig) -> f64 {
        match self {
            Self::Normal => config.font.tick_size,
            Self::Rotated { size, .. } => *size,
        }
    }
}

/// Draw a box frame with ticks, optional grid, tick labels and axis titles.
///
/// The x title sits at the right end below the axis and the y title at the
/// top, rotated, left of the tick labels.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    x_labels: XTickLabels,
    config: &VizConfig,
) {
    let frame_color = Color::rgb(0, 0, 0);
    let width = config.axes.line_width;
    let tick_style_line = LineStyle::solid(frame_color, width * 0.8);
    let minor_tick_style = LineStyle::solid(frame_color, width * 0.6);

    let inward = config.axes.tick_direction == "in";
    let dir = if inward { -1.0 } else { 1.0 };
    let outward = if inward { 0.0 } else { config.axes.tick_length };
    let tl = config.axes.tick_length;
    let mtl = config.axes.minor_tick_length;

    draw_frame(canvas, area, width);

    let grid_style = LineStyle {
        color: config.grid.color.with_alpha(config.grid.alpha),
        width: width * 0.5,
        dash: Some("3 3".into()),
    };

    // --- X axis ---
    let x_tick_size = x_labels.size(config);
    let x_tick_style = TextStyle {
        size: x_tick_size,
        color: frame_color,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        if !x_axis.contains(val) {
            continue;
        }
        let px = x_axis.data_to_pixel(val, area.left, area.right());

        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), &grid_style);
        }
        canvas.line(px, area.bottom(), px, area.bottom() + dir * tl, &tick_style_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - dir * tl, &tick_style_line);
        }

        if let Some(label) = x_axis.tick_labels.get(i) {
            let label_y = area.bottom() + outward + x_tick_size * 0.4;
            match x_labels {
                XTickLabels::Normal => canvas.text(px, label_y, label, &x_tick_style),
                XTickLabels::Rotated { angle, .. } => {
                    canvas.text_rotated(px, label_y, label, &x_tick_style, -angle)
                }
            }
        }
    }
    for &val in &x_axis.minor_ticks {
        if !x_axis.contains(val) {
            continue;
        }
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        canvas.line(px, area.bottom(), px, area.bottom() + dir * mtl, &minor_tick_style);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - dir * mtl, &minor_tick_style);
        }
    }

    // --- Y axis ---
    let y_tick_style = TextStyle {
        size: config.font.tick_size,
        color: frame_color,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        if !y_axis.contains(val) {
            continue;
        }
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);

        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, &grid_style);
        }
        canvas.line(area.left, py, area.left - dir * tl, py, &tick_style_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() + dir * tl, py, &tick_style_line);
        }

        if let Some(label) = y_axis.tick_labels.get(i) {
            canvas.text(area.left - outward - 8.0, py, label, &y_tick_style);
        }
    }
    for &val in &y_axis.minor_ticks {
        if !y_axis.contains(val) {
            continue;
        }
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        canvas.line(area.left, py, area.left - dir * mtl, py, &minor_tick_style);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() + dir * mtl, py, &minor_tick_style);
        }
    }

    // --- Axis titles ---
    let label_style = TextStyle {
        size: config.font.label_size,
        color: frame_color,
        anchor: TextAnchor::End,
        ..Default::default()
    };

    if !x_axis.label.is_empty() {
        let tick_extent = if x_axis.tick_labels.is_empty() { 0.0 } else { x_tick_size * 1.6 };
        let label_y = area.bottom() + outward + tick_extent + config.font.label_size;
        canvas.text(area.right(), label_y, &x_axis.label, &label_style);
    }

    if !y_axis.label.is_empty() {
        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &y_tick_style).width)
            .fold(0.0_f64, f64::max);
        let label_x = area.left - outward - max_tick_w - 8.0 - config.font.label_size * 0.3;
        canvas.text_rotated(label_x, area.top, &y_axis.label, &label_style, -90.0);
    }
}

/// Draw the panel frame only.
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea, width: f64) {
    let style = LineStyle::solid(Color::rgb(0, 0, 0), width);
    canvas.line(area.left, area.top, area.right(), area.top, &style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &style);
}
