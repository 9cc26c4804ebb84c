//! Text runs and glyph-based text metrics.
//!
//! Labels may carry TeX-like scripts, `p_{T}` or `10^{3}`, which are drawn as
//! shifted `<tspan>`s. Widths are summed from the advances and kerning of the
//! embedded faces, scaled so that `size` is the em size, as SVG `font-size` is.

use ab_glyph::{Font, FontRef};

use crate::font::FontHandle;
use crate::primitives::TextStyle;

/// Size of sub- and superscripts relative to the base size.
pub const SCRIPT_SCALE: f64 = 0.7;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    None,
    Sub,
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub shift: Shift,
}

/// Split `s` into plain, `_{sub}` and `^{super}` runs.
///
/// A marker without a closing brace is kept as literal text.
pub fn spans(s: &str) -> Vec<Span> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut i = 0;
    while i < s.len() {
        let rest = &s[i..];
        let shift = if rest.starts_with("_{") {
            Some(Shift::Sub)
        } else if rest.starts_with("^{") {
            Some(Shift::Super)
        } else {
            None
        };
        if let Some(shift) = shift
            && let Some(close) = rest[2..].find('}')
        {
            if !plain.is_empty() {
                out.push(Span { text: std::mem::take(&mut plain), shift: Shift::None });
            }
            out.push(Span { text: rest[2..2 + close].to_string(), shift });
            i += close + 3;
            continue;
        }
        let Some(ch) = rest.chars().next() else { break };
        plain.push(ch);
        i += ch.len_utf8();
    }
    if !plain.is_empty() {
        out.push(Span { text: plain, shift: Shift::None });
    }
    out
}

/// Measure a plain run in points, `size_pt` being the em size.
pub fn measure_text(font: &FontRef<'_>, text: &str, size_pt: f64) -> TextMetrics {
    let per_unit = size_pt / f64::from(font.units_per_em().unwrap_or(font.height_unscaled()));

    let mut width = 0.0_f32;
    let mut prev = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = prev {
            width += font.kern_unscaled(prev, id);
        }
        width += font.h_advance_unscaled(id);
        prev = Some(id);
    }

    let ascent = f64::from(font.ascent_unscaled()) * per_unit;
    let descent = f64::from(font.descent_unscaled()) * per_unit;
    TextMetrics { width: f64::from(width) * per_unit, height: ascent - descent, ascent }
}

/// Measure `text` with script markup, in the face selected by `style`.
pub fn measure_styled(fonts: &FontHandle, text: &str, style: &TextStyle) -> TextMetrics {
    let font = fonts.select(style.weight, style.style);
    let base = measure_text(font, "", style.size);
    let width = spans(text)
        .iter()
        .map(|span| {
            let size = if span.shift == Shift::None { style.size } else { style.size * SCRIPT_SCALE };
            measure_text(font, &span.text, size).width
        })
        .sum();
    TextMetrics { width, ..base }
}
