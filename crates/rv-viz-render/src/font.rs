use ab_glyph::FontRef;
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::RenderError;
use crate::primitives::{FontStyle, FontWeight};

/// Family written into every `<text>` element; it names the embedded faces.
pub const FONT_FAMILY: &str = "DejaVu Sans";

static DEJAVU_REGULAR: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");
static DEJAVU_BOLD: &[u8] = include_bytes!("../fonts/DejaVuSans-Bold.ttf");
static DEJAVU_OBLIQUE: &[u8] = include_bytes!("../fonts/DejaVuSans-Oblique.ttf");

/// The embedded faces, used both to measure text and to rasterise it.
pub struct FontHandle {
    pub regular: FontRef<'static>,
    pub bold: FontRef<'static>,
    pub italic: FontRef<'static>,
}

impl FontHandle {
    pub fn embedded() -> crate::Result<Self> {
        let parse = |bytes: &'static [u8]| FontRef::try_from_slice(bytes).map_err(|e| RenderError::Font(e.to_string()));
        Ok(Self { regular: parse(DEJAVU_REGULAR)?, bold: parse(DEJAVU_BOLD)?, italic: parse(DEJAVU_OBLIQUE)? })
    }

    /// Bold wins over italic; there is no bold-oblique face.
    pub fn select(&self, weight: FontWeight, style: FontStyle) -> &FontRef<'static> {
        match (weight, style) {
            (FontWeight::Bold, _) => &self.bold,
            (_, FontStyle::Italic) => &self.italic,
            _ => &self.regular,
        }
    }

    pub fn face_bytes() -> [&'static [u8]; 3] {
        [DEJAVU_REGULAR, DEJAVU_BOLD, DEJAVU_OBLIQUE]
    }
}

/// `<style>` block declaring the embedded faces, for self-contained SVG files.
pub fn svg_font_style() -> String {
    let faces = [(DEJAVU_REGULAR, 400, "normal"), (DEJAVU_BOLD, 700, "normal"), (DEJAVU_OBLIQUE, 400, "italic")];
    let mut out = String::from("<style>\n");
    for (bytes, weight, style) in faces {
        out.push_str(&format!(
            "@font-face {{ font-family: '{FONT_FAMILY}'; font-weight: {weight}; font-style: {style}; \
             src: url('data:font/ttf;base64,{}') format('truetype'); }}\n",
            STANDARD.encode(bytes)
        ));
    }
    out.push_str("</style>\n");
    out
}

/// `usvg` options that resolve text to the embedded faces only.
#[cfg(any(feature = "png", feature = "pdf"))]
pub(crate) fn usvg_options() -> usvg::Options<'static> {
    let mut opt = usvg::Options::default();
    opt.font_family = FONT_FAMILY.to_string();
    let fontdb = opt.fontdb_mut();
    for bytes in FontHandle::face_bytes() {
        fontdb.load_font_data(bytes.to_vec());
    }
    opt
}
