use std::fmt::Write as FmtWrite;

use crate::color::Color;
use crate::font::{FONT_FAMILY, FontHandle, svg_font_style};
use crate::primitives::*;
use crate::text::{SCRIPT_SCALE, Shift, TextMetrics, measure_styled, spans};

/// An SVG element stored for deferred rendering.
#[derive(Debug, Clone)]
enum SvgElement {
    Line { x1: f64, y1: f64, x2: f64, y2: f64, style: LineStyle },
    Polyline { points: Vec<(f64, f64)>, style: LineStyle },
    Text { x: f64, y: f64, content: String, style: TextStyle, rotate: Option<f64> },
    Circle { cx: f64, cy: f64, r: f64, fill: Color },
}

/// Immediate-mode SVG canvas. Coordinates in points (1pt = 1/72").
///
/// Elements drawn between [`Canvas::push_clip`] and [`Canvas::pop_clip`] are
/// clipped to the pushed rectangle.
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<(Option<usize>, SvgElement)>,
    clips: Vec<(f64, f64, f64, f64)>,
    clip_stack: Vec<usize>,
    fonts: FontHandle,
    embed_fonts: bool,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> crate::Result<Self> {
        Ok(Self {
            width,
            height,
            elements: Vec::new(),
            clips: Vec::new(),
            clip_stack: Vec::new(),
            fonts: FontHandle::embedded()?,
            embed_fonts: false,
        })
    }

    /// Inline the font faces into the SVG so it renders the same anywhere.
    pub fn embed_fonts(&mut self, on: bool) {
        self.embed_fonts = on;
    }

    // --- Drawing primitives ---

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.push(SvgElement::Line { x1, y1, x2, y2, style: style.clone() });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        self.push(SvgElement::Polyline { points: points.to_vec(), style: style.clone() });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: None,
        });
    }

    /// Text rotated by `angle` degrees (clockwise, SVG convention) about its anchor.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: Some(angle),
        });
    }

    /// Error bar: vertical line + optional horizontal caps.
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, cap_width: f64, style: &LineStyle) {
        self.line(x, y_lo, x, y_hi, style);
        if cap_width > 0.0 {
            let half = cap_width / 2.0;
            self.line(x - half, y_lo, x + half, y_lo, style);
            self.line(x - half, y_hi, x + half, y_hi, style);
        }
    }

    /// Horizontal error bar.
    pub fn error_bar_h(&mut self, x_lo: f64, x_hi: f64, y: f64, cap_height: f64, style: &LineStyle) {
        self.line(x_lo, y, x_hi, y, style);
        if cap_height > 0.0 {
            let half = cap_height / 2.0;
            self.line(x_lo, y - half, x_lo, y + half, style);
            self.line(x_hi, y - half, x_hi, y + half, style);
        }
    }

    pub fn marker(&mut self, x: f64, y: f64, marker: &MarkerStyle) {
        self.push(SvgElement::Circle { cx: x, cy: y, r: marker.size, fill: marker.color });
    }

    // --- Clip paths ---

    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let idx = self.clips.len();
        self.clips.push((x, y, w, h));
        self.clip_stack.push(idx);
        clip_id(idx)
    }

    pub fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    // --- Text measurement ---

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_styled(&self.fonts, content, style)
    }

    // --- SVG output ---

    fn push(&mut self, elem: SvgElement) {
        self.elements.push((self.clip_stack.last().copied(), elem));
    }

    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(32 * 1024);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        if self.embed_fonts {
            out.push_str(&svg_font_style());
        }

        if !self.clips.is_empty() {
            out.push_str("<defs>\n");
            for (i, (x, y, w, h)) in self.clips.iter().enumerate() {
                let _ = writeln!(
                    out,
                    r#"<clipPath id="{}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#,
                    clip_id(i)
                );
            }
            out.push_str("</defs>\n");
        }

        let _ = writeln!(out, r#"<rect width="{}" height="{}" fill="white" />"#, self.width, self.height);

        // Consecutive elements sharing a clip go into one group.
        let mut open: Option<usize> = None;
        for (clip, elem) in &self.elements {
            if *clip != open {
                if open.is_some() {
                    out.push_str("</g>\n");
                }
                if let Some(idx) = clip {
                    let _ = writeln!(out, r#"<g clip-path="url(#{})">"#, clip_id(*idx));
                }
                open = *clip;
            }
            render_element(&mut out, elem);
        }
        if open.is_some() {
            out.push_str("</g>\n");
        }

        out.push_str("</svg>\n");
        out
    }
}

fn clip_id(idx: usize) -> String {
    format!("clip{idx}")
}

fn render_element(out: &mut String, elem: &SvgElement) {
    match elem {
        SvgElement::Line { x1, y1, x2, y2, style } => {
            let _ = write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#);
            write_line_attrs(out, style);
            out.push_str(" />\n");
        }
        SvgElement::Polyline { points, style } => {
            out.push_str(r#"<polyline points=""#);
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{x:.2},{y:.2}");
            }
            out.push_str(r#"" fill="none" stroke-linejoin="miter""#);
            write_line_attrs(out, style);
            out.push_str(" />\n");
        }
        SvgElement::Text { x, y, content, style, rotate } => {
            let _ = write!(out, r#"<text x="{x:.2}" y="{y:.2}""#);
            let _ = write!(out, r#" font-family="{FONT_FAMILY}" font-size="{:.1}""#, style.size);
            let _ = write!(out, r#" fill="{}""#, style.color.to_svg_fill());
            let _ = write!(out, r#" text-anchor="{}""#, style.anchor.as_str());
            let _ = write!(out, r#" dominant-baseline="{}""#, style.baseline.as_str());
            if style.weight == FontWeight::Bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if style.style == FontStyle::Italic {
                out.push_str(r#" font-style="italic""#);
            }
            if let Some(angle) = rotate {
                let _ = write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#);
            }
            out.push('>');
            for span in spans(content) {
                let shift = match span.shift {
                    Shift::None => None,
                    Shift::Sub => Some("sub"),
                    Shift::Super => Some("super"),
                };
                match shift {
                    None => escape_into(out, &span.text),
                    Some(shift) => {
                        let _ = write!(
                            out,
                            r#"<tspan baseline-shift="{shift}" font-size="{:.1}">"#,
                            style.size * SCRIPT_SCALE
                        );
                        escape_into(out, &span.text);
                        out.push_str("</tspan>");
                    }
                }
            }
            out.push_str("</text>\n");
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            let _ = writeln!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{}" />"#, fill.to_svg_fill());
        }
    }
}

fn escape_into(out: &mut String, content: &str) {
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_line_attrs(out: &mut String, style: &LineStyle) {
    let _ = write!(out, r#" stroke="{}" stroke-width="{:.2}""#, style.color.to_svg_fill(), style.width);
    if let Some(dash) = &style.dash {
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_canvas() {
        let svg = Canvas::new(100.0, 50.0).unwrap().finish_svg();
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("height=\"50\""));
        assert!(!svg.contains("<defs>"));
        assert!(!svg.contains("<style>"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn markers_are_filled_circles() {
        let mut c = Canvas::new(200.0, 100.0).unwrap();
        c.marker(10.0, 20.0, &MarkerStyle { size: 3.0, color: Color::hex("#ff0000") });
        let svg = c.finish_svg();
        assert!(svg.contains(r##"<circle cx="10.00" cy="20.00" r="3.00" fill="#ff0000" />"##));
    }

    #[test]
    fn embedded_fonts_precede_content() {
        let mut c = Canvas::new(200.0, 100.0).unwrap();
        c.text(10.0, 20.0, "CMS", &TextStyle::default());
        c.embed_fonts(true);
        let svg = c.finish_svg();
        let style_at = svg.find("<style>").unwrap();
        assert!(style_at < svg.find("<text").unwrap());
        assert_eq!(svg.matches("@font-face").count(), 3);
    }

    #[test]
    fn text_is_escaped_and_scripted() {
        let mut c = Canvas::new(200.0, 100.0).unwrap();
        c.text(10.0, 20.0, "p_{T} <&>", &TextStyle { size: 20.0, ..Default::default() });
        let svg = c.finish_svg();
        assert!(svg.contains(r#"p<tspan baseline-shift="sub" font-size="14.0">T</tspan> &lt;&amp;&gt;"#));
        assert!(svg.contains(FONT_FAMILY));
    }

    #[test]
    fn clipped_elements_are_grouped() {
        let mut c = Canvas::new(200.0, 100.0).unwrap();
        c.line(0.0, 0.0, 1.0, 1.0, &LineStyle::default());
        let id = c.push_clip(10.0, 10.0, 50.0, 50.0);
        c.line(0.0, 0.0, 2.0, 2.0, &LineStyle::default());
        c.marker(5.0, 5.0, &MarkerStyle { size: 1.0, color: Color::rgb(0, 0, 0) });
        c.pop_clip();
        c.line(0.0, 0.0, 3.0, 3.0, &LineStyle::default());
        let svg = c.finish_svg();

        assert_eq!(id, "clip0");
        assert!(svg.contains(r#"<clipPath id="clip0">"#));
        assert_eq!(svg.matches(r#"clip-path="url(#clip0)""#).count(), 1);
        let group = svg.split(r#"<g clip-path="url(#clip0)">"#).nth(1).unwrap();
        let inside = group.split("</g>").next().unwrap();
        assert!(inside.contains(r#"x2="2.00""#));
        assert!(inside.contains("<circle"));
        assert!(!inside.contains(r#"x2="3.00""#));
    }
}
