use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw the experiment label (**CMS** *Preliminary*) above the top-left of
/// `area` and `title`, if any, right-aligned above its top-right corner.
pub fn draw_experiment_header(canvas: &mut Canvas, area: &PlotArea, title: Option<&str>, config: &VizConfig) {
    let header_size = config.font.header_size;
    let y = area.top - header_size * 0.3;

    if !config.experiment.name.is_empty() {
        let bold_style = TextStyle { size: header_size, weight: FontWeight::Bold, ..Default::default() };
        canvas.text(area.left, y, &config.experiment.name, &bold_style);

        if !config.experiment.status.is_empty() {
            let name_w = canvas.measure_text(&config.experiment.name, &bold_style).width;
            let italic_style =
                TextStyle { size: header_size * 0.85, style: FontStyle::Italic, ..Default::default() };
            canvas.text(area.left + name_w + header_size * 0.25, y, &config.experiment.status, &italic_style);
        }
    }

    if let Some(title) = title.filter(|t| !t.is_empty()) {
        let title_style = TextStyle { size: header_size * 0.8, anchor: TextAnchor::End, ..Default::default() };
        canvas.text(area.right(), y, title, &title_style);
    }
}
