use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use template_core::{Sheet, encode_rgba_to_png_bytes};
use tracing::{debug, info};

/// CSS pixel density usvg assumes when resolving `mm` lengths.
const SVG_DPI: f32 = 96.0;
const MM_PER_INCH: f32 = 25.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Svg,
    Png,
    Pdf,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("svg") => Ok(Self::Svg),
            Some("png") => Ok(Self::Png),
            Some("pdf") => Ok(Self::Pdf),
            Some(other) => bail!("unsupported output format `.{other}` (use .svg, .png or .pdf)"),
            None => bail!("output path {} has no extension", path.display()),
        }
    }
}

pub fn write_sheet(sheet: &Sheet, path: &Path, px_per_mm: f64) -> Result<()> {
    let format = Format::from_path(path)?;
    let bytes = match format {
        Format::Svg => sheet.svg.clone().into_bytes(),
        Format::Png => render_png(sheet, px_per_mm)?,
        Format::Pdf => render_pdf(sheet)?,
    };
    fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    info!(
        path = %path.display(),
        ?format,
        width_mm = sheet.width_mm,
        height_mm = sheet.height_mm,
        bytes = bytes.len(),
        "sheet exported"
    );
    Ok(())
}

/// Parse `svg` with the given usvg crate path. svg2pdf pins its own usvg,
/// so the PDF path parses through `svg2pdf::usvg` to get a matching tree.
macro_rules! parse_tree {
    ($usvg:ident, $svg:expr) => {{
        let mut fontdb = $usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        if fontdb.is_empty() {
            debug!("no system fonts found; labels will not be drawn");
        }
        let opt = $usvg::Options {
            dpi: SVG_DPI,
            fontdb: Arc::new(fontdb),
            ..Default::default()
        };
        $usvg::Tree::from_str($svg, &opt).map_err(|e| anyhow!("SVG parse error: {e:?}"))
    }};
}

/// Device pixels per SVG user pixel for a requested `px_per_mm`.
fn raster_scale(px_per_mm: f64) -> f32 {
    px_per_mm as f32 * MM_PER_INCH / SVG_DPI
}

fn render_png(sheet: &Sheet, px_per_mm: f64) -> Result<Vec<u8>> {
    if !(px_per_mm.is_finite() && px_per_mm > 0.0) {
        bail!("px_per_mm must be positive, got {px_per_mm}");
    }
    let tree = parse_tree!(usvg, &sheet.svg)?;
    let scale = raster_scale(px_per_mm);
    let size = tree.size();
    let w_px = (size.width() * scale).ceil() as u32;
    let h_px = (size.height() * scale).ceil() as u32;
    debug!(w_px, h_px, scale, "rasterising sheet");

    let mut pixmap = tiny_skia::Pixmap::new(w_px, h_px)
        .ok_or_else(|| anyhow!("pixmap alloc failed for {w_px}x{h_px}"))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pm);
    Ok(encode_rgba_to_png_bytes(
        pixmap.width(),
        pixmap.height(),
        pixmap.data(),
    )?)
}

fn render_pdf(sheet: &Sheet) -> Result<Vec<u8>> {
    use svg2pdf::usvg as pdf_usvg;

    let tree = parse_tree!(pdf_usvg, &sheet.svg)?;
    // Page size must come out in the sheet's millimetres, so map user
    // pixels back at the same density they were resolved with.
    let mut page = svg2pdf::PageOptions::default();
    page.dpi = SVG_DPI;
    svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), page)
        .map_err(|e| anyhow!("PDF conversion failed: {e}"))
}
