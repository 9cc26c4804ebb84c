use crate::canvas::Canvas;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// One legend row: a line swatch followed by its label.
pub struct LegendEntry {
    pub label: String,
    pub line: LineStyle,
}

/// Draw a frameless legend in the top-right corner of `area`.
pub fn draw_legend(canvas: &mut Canvas, area: &PlotArea, entries: &[LegendEntry], font_size: f64) {
    if entries.is_empty() {
        return;
    }

    let row_height = font_size * 1.5;
    let swatch_w = font_size * 2.0;
    let gap = font_size * 0.8;
    let padding = font_size * 0.8;

    let text_style = TextStyle { size: font_size, baseline: TextBaseline::Central, ..Default::default() };

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &text_style).width)
        .fold(0.0_f64, f64::max);

    let lx = area.right() - padding - swatch_w - gap - max_w;
    let ly = area.top + padding;

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + (i as f64 + 0.5) * row_height;
        canvas.line(lx, ey, lx + swatch_w, ey, &entry.line);
        canvas.text(lx + swatch_w + gap, ey, &entry.label, &text_style);
    }
}

/// Height taken by a legend of `n` rows, padding included.
pub fn legend_height(n: usize, font_size: f64) -> f64 {
    if n == 0 { 0.0 } else { font_size * (1.6 + 1.5 * n as f64) }
}
