use crate::layout::margins::PlotArea;

/// Main + ratio panels sharing an x axis, stacked vertically.
#[derive(Debug, Clone)]
pub struct MainRatioLayout {
    pub main: PlotArea,
    pub ratio: PlotArea,
}

impl MainRatioLayout {
    /// Split `area` so the ratio panel gets `ratio_frac` of the height left
    /// after the `gap`.
    pub fn split(area: &PlotArea, gap: f64, ratio_frac: f64) -> Self {
        let panels_h = (area.height - gap).max(0.0);
        let ratio_h = panels_h * ratio_frac;
        let main_h = panels_h - ratio_h;

        Self {
            main: PlotArea::manual(area.left, area.top, area.width, main_h),
            ratio: PlotArea::manual(area.left, area.top + main_h + gap, area.width, ratio_h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn three_to_one_split() {
        let area = PlotArea::manual(100.0, 50.0, 800.0, 820.0);
        let l = MainRatioLayout::split(&area, 20.0, 0.25);
        assert_relative_eq!(l.main.height, 600.0);
        assert_relative_eq!(l.ratio.height, 200.0);
        assert_relative_eq!(l.ratio.top, l.main.bottom() + 20.0);
        assert_relative_eq!(l.ratio.bottom(), area.bottom());
        assert_eq!(l.main.left, l.ratio.left);
        assert_eq!(l.main.width, l.ratio.width);
    }
}
