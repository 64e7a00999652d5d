//! Render-sink adapters for the graft engine: SVG sheets at physical scale,
//! PNG encoding, and the session file format.

pub mod error;
pub mod session;
pub mod svg;

use png::{BitDepth, ColorType, Encoder};

pub use error::{Result, TemplateError};
pub use session::{FenestrationInput, GraftInput, Session, SessionFile};
pub use svg::{Sheet, SheetOptions, cylinder_svg, template_svg};

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> std::result::Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}

// Format millimeters:
// - Near-integers (1e-6) as integers
// - Else up to 3 decimals, trim trailing zeros
pub fn fmt_mm(v: f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v)
    } else {
        format!("{:.3}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Suggested download name, e.g. `graft_template_28mm_120mm.pdf`.
pub fn default_file_name(diameter_mm: f64, length_mm: f64, ext: &str) -> String {
    format!(
        "graft_template_{}mm_{}mm.{}",
        fmt_mm(diameter_mm),
        fmt_mm(length_mm),
        ext
    )
}

pub(crate) fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
