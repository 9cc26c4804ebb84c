use rv_viz::{ComparisonArtifact, MainSeries, RatioPanel, YScale};

use crate::canvas::Canvas;
use crate::color::{Color, cycle};
use crate::config::VizConfig;
use crate::header::draw_experiment_header;
use crate::layout::axes::Axis;
use crate::layout::legend::{self, LegendEntry};
use crate::layout::margins::{Margins, PlotArea};
use crate::layout::multi_panel::MainRatioLayout;
use crate::plots::axes_draw::{XTickLabels, draw_axes};
use crate::primitives::*;

/// Fraction of the primary panel kept free above the data for the legend.
const LEGEND_HEADROOM: f64 = 0.3;

/// Render a comparison as a primary panel of step outlines and, when the
/// artifact carries one, a ratio panel below it sharing the x axis.
///
/// Tick rotation applies to the ratio panel only; a lone primary panel keeps
/// upright ticks.
pub fn render(art: &ComparisonArtifact, config: &VizConfig) -> crate::Result<Canvas> {
    let opts = &art.options;
    let cmp = &config.comparison;
    let palette = config.palette_colors();
    let mut canvas = Canvas::new(config.figure.width, config.figure.height)?;

    let (x_min, x_max) = opts.x_lim.unwrap_or(art.x_range);
    let x_labels = if opts.rotate_ticks && art.ratio.is_some() {
        XTickLabels::Rotated { size: cmp.rotated_tick_size, angle: cmp.tick_rotation }
    } else {
        XTickLabels::Normal
    };
    let x_axis = Axis::bounded(x_min, x_max, 7).with_label(opts.x_label.as_str());
    let y_main = main_y_axis(art).with_label(opts.y_label.as_str());
    let y_ratio = art
        .ratio
        .as_ref()
        .map(|r| Axis::bounded(r.y_range.0, r.y_range.1, 5).with_label("Ratio"));

    let mut margins = Margins::auto(&canvas, &y_main, &opts.x_label, x_labels.size(config), config);
    if let Some(y_ratio) = &y_ratio {
        let ratio_margins = Margins::auto(&canvas, y_ratio, &opts.x_label, x_labels.size(config), config);
        margins.left = margins.left.max(ratio_margins.left);
    }
    let area = PlotArea::inside(&canvas, &margins);

    let (main, ratio) = match &y_ratio {
        Some(_) => {
            let layout = MainRatioLayout::split(&area, cmp.panel_gap, cmp.ratio_fraction);
            (layout.main, Some(layout.ratio))
        }
        None => (area, None),
    };

    draw_experiment_header(&mut canvas, &main, opts.title.as_deref(), config);

    // --- Primary panel ---
    if ratio.is_some() {
        let shared = Axis::bounded(x_min, x_max, 7).without_tick_labels();
        draw_axes(&mut canvas, &main, &shared, &y_main, XTickLabels::Normal, config);
    } else {
        draw_axes(&mut canvas, &main, &x_axis, &y_main, x_labels, config);
    }

    canvas.push_clip(main.left, main.top, main.width, main.height);
    for (i, series) in art.series.iter().enumerate() {
        draw_step_series(&mut canvas, &main, &x_axis, &y_main, series, cycle(&palette, i), config);
    }
    canvas.pop_clip();

    let entries: Vec<LegendEntry> = art
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| LegendEntry {
            label: s.label.clone(),
            line: LineStyle::solid(cycle(&palette, i), cmp.line_width),
        })
        .collect();
    legend::draw_legend(&mut canvas, &main, &entries, config.font.size);

    // --- Ratio panel ---
    if let (Some(panel), Some(area), Some(y_ratio)) = (&art.ratio, ratio, &y_ratio) {
        draw_axes(&mut canvas, &area, &x_axis, y_ratio, x_labels, config);
        canvas.push_clip(area.left, area.top, area.width, area.height);
        draw_ratio_panel(&mut canvas, &area, &x_axis, y_ratio, panel, art.x_range, &palette, config);
        canvas.pop_clip();
    }

    Ok(canvas)
}

/// Primary y axis: explicit limits if given, otherwise fitted to the data
/// with room left for the legend.
fn main_y_axis(art: &ComparisonArtifact) -> Axis {
    let opts = &art.options;
    let points = || {
        art.series
            .iter()
            .flat_map(|s| s.y.iter().zip(&s.yerr))
            .filter(|(y, e)| y.is_finite() && e.is_finite())
    };

    match opts.y_scale {
        YScale::Linear => {
            if let Some((lo, hi)) = opts.y_lim {
                return Axis::bounded(lo, hi, 6);
            }
            let lo = points().map(|(y, e)| y - e).fold(0.0_f64, f64::min);
            let hi = points().map(|(y, e)| y + e).fold(0.0_f64, f64::max);
            Axis::auto_linear(lo, lo + (hi - lo) / (1.0 - LEGEND_HEADROOM), 6)
        }
        YScale::Log => {
            if let Some((lo, hi)) = opts.y_lim
                && lo > 0.0
                && hi > lo
            {
                return Axis::bounded_log(lo, hi);
            }
            let lo = points().map(|(y, _)| *y).filter(|y| *y > 0.0).fold(f64::INFINITY, f64::min);
            let hi = points().map(|(y, e)| y + e).filter(|y| *y > 0.0).fold(0.0_f64, f64::max);
            if lo.is_finite() && hi > 0.0 {
                // Headroom on a log axis is multiplicative.
                let decades = (hi / lo).log10().max(1.0);
                Axis::auto_log(lo, hi * 10f64.powf(decades * LEGEND_HEADROOM / (1.0 - LEGEND_HEADROOM)))
            } else {
                Axis::auto_log(0.1, 10.0)
            }
        }
    }
}

/// Data value as drawn: non-finite values read as 0 and, on a log axis,
/// non-positive values sit on the axis floor.
fn drawn_value(v: f64, axis: &Axis) -> f64 {
    let v = if v.is_finite() { v } else { 0.0 };
    if axis.log && v <= axis.min { axis.min } else { v }
}

fn draw_step_series(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    series: &MainSeries,
    color: Color,
    config: &VizConfig,
) {
    let edges = &series.bin_edges;
    if edges.len() < 2 || series.y.len() + 1 != edges.len() {
        tracing::warn!(label = %series.label, "series with inconsistent binning not drawn");
        return;
    }
    let px = |x: f64| x_axis.data_to_pixel(x, area.left, area.right());
    let py = |y: f64| y_axis.data_to_pixel(drawn_value(y, y_axis), area.bottom(), area.top);
    let base = if y_axis.log { y_axis.min } else { 0.0_f64.clamp(y_axis.min, y_axis.max) };

    let mut points = Vec::with_capacity(2 * series.y.len() + 2);
    points.push((px(edges[0]), py(base)));
    for (i, &y) in series.y.iter().enumerate() {
        points.push((px(edges[i]), py(y)));
        points.push((px(edges[i + 1]), py(y)));
    }
    points.push((px(edges[edges.len() - 1]), py(base)));
    canvas.polyline(&points, &LineStyle::solid(color, config.comparison.line_width));

    let err_style = LineStyle::solid(color, config.comparison.line_width * 0.5);
    for (i, (&y, &err)) in series.y.iter().zip(&series.yerr).enumerate() {
        if !(err > 0.0 && y.is_finite()) {
            continue;
        }
        let x = px(0.5 * (edges[i] + edges[i + 1]));
        canvas.error_bar(x, py(y - err), py(y + err), 0.0, &err_style);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_ratio_panel(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    panel: &RatioPanel,
    x_range: (f64, f64),
    palette: &[Color],
    config: &VizConfig,
) {
    let px = |x: f64| x_axis.data_to_pixel(x, area.left, area.right());
    let py = |y: f64| y_axis.data_to_pixel(y, area.bottom(), area.top);

    let ref_y = py(panel.reference_line);
    canvas.line(px(x_range.0), ref_y, px(x_range.1), ref_y, &LineStyle::dashed(Color::rgb(128, 128, 128), 2.0));

    let cmp = &config.comparison;
    for (j, series) in panel.series.iter().enumerate() {
        // Same colour as the numerator's outline on the primary panel.
        let color = cycle(palette, j + 1);
        let err_style = LineStyle::solid(color, cmp.line_width * 0.5);
        let marker = MarkerStyle { size: cmp.marker_size / 2.0, color };

        let points = series.x.iter().zip(&series.xerr).zip(series.y.iter().zip(&series.yerr));
        for ((&x, &xerr), (&y, &yerr)) in points {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            if xerr > 0.0 {
                canvas.error_bar_h(px(x - xerr), px(x + xerr), py(y), 0.0, &err_style);
            }
            if yerr > 0.0 {
                canvas.error_bar(px(x), py(y - yerr), py(y + yerr), 0.0, &err_style);
            }
            canvas.marker(px(x), py(y), &marker);
        }
    }
}
