//! SVG sheets in millimetre user units.
//!
//! The root element carries `width`/`height` in `mm` and a `viewBox` of the
//! same numbers, so one user unit is one millimetre on paper. Converters
//! that honour physical units (browsers printing at 100 %, `svg2pdf`) then
//! reproduce the graft at true size.

use graft_core::{GraftSpec, ProjectionConvention, RenderedMarker, TemplateGeometry, ViewAxis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::{fmt_mm, svg_escape};

const GRID_COLOR: &str = "#1f5fbf";
const MARKER_COLOR: &str = "#d62728";
const BODY_COLOR: &str = "#add8e6";
/// Room left of the template for length tick labels.
const GUTTER_MM: f64 = 12.0;
/// Room above the drawing for the title and clock labels.
const HEADER_MM: f64 = 14.0;
/// Room below the drawing for the scale bar and caption.
const FOOTER_MM: f64 = 12.0;
/// Rough allowance for a marker label to the right of its circle.
const LABEL_ROOM_MM: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    pub margin_mm: f64,
    pub length_tick_mm: f64,
    /// Length of the printed calibration bar; 0 disables it.
    pub scale_bar_mm: f64,
    pub show_title: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            margin_mm: 10.0,
            length_tick_mm: 10.0,
            scale_bar_mm: 10.0,
            show_title: true,
        }
    }
}

/// A finished SVG document and its physical page size.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    pub svg: String,
    pub width_mm: f64,
    pub height_mm: f64,
}

fn n(v: f64) -> String {
    format!("{:.3}", v)
}

fn open_svg(s: &mut String, w: f64, h: f64) {
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}mm\" height=\"{}mm\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\">\n",
        n(w),
        n(h),
        n(w),
        n(h)
    ));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
}

fn text(s: &mut String, x: f64, y: f64, size: f64, anchor: &str, body: &str) {
    s.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{}\" fill=\"#333\">{}</text>\n",
        n(x),
        n(y),
        n(size),
        anchor,
        svg_escape(body)
    ));
}

fn marker(s: &mut String, m: &RenderedMarker, y: f64, faded: bool) {
    let (x, r) = (m.x_mm, m.radius_mm);
    if !m.on_template {
        s.push_str(&format!(
            "<circle class=\"marker off-template\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"0.3\" stroke-dasharray=\"1 0.6\"/>\n",
            n(x),
            n(y),
            n(r),
            MARKER_COLOR
        ));
        text(s, x + r + 1.0, y + 1.0, 2.5, "start", &format!("{} (off-template)", m.label));
        return;
    }
    let (fill_opacity, class) = if faded {
        ("0.25", "marker occluded")
    } else {
        ("0.7", "marker")
    };
    s.push_str(&format!(
        "<circle class=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"#000\" stroke-width=\"0.2\"/>\n",
        class,
        n(x),
        n(y),
        n(r),
        MARKER_COLOR,
        fill_opacity
    ));
    // Centre cross for the cutting guide.
    s.push_str(&format!(
        "<path d=\"M {} {} L {} {} M {} {} L {} {}\" stroke=\"#000\" stroke-width=\"0.15\"/>\n",
        n(x - 1.0),
        n(y),
        n(x + 1.0),
        n(y),
        n(x),
        n(y - 1.0),
        n(x),
        n(y + 1.0)
    ));
    text(s, x + r + 1.0, y + 1.0, 3.0, "start", &m.label);
}

/// Unwrapped template at 1:1.
///
/// `markers` must come from `ViewKind::FlatTemplate` with the geometry's
/// convention. Off-template markers widen the sheet so they stay visible.
pub fn template_svg(
    graft: &GraftSpec,
    geometry: &TemplateGeometry,
    markers: &[RenderedMarker],
    opts: &SheetOptions,
) -> Result<Sheet> {
    let w = geometry.width_mm();
    let l = geometry.length_mm();
    let lo = markers
        .iter()
        .map(|m| m.x_mm - m.radius_mm)
        .fold(0.0_f64, f64::min);
    let hi = markers
        .iter()
        .map(|m| m.x_mm + m.radius_mm + LABEL_ROOM_MM)
        .fold(w, f64::max);
    let ox = opts.margin_mm + GUTTER_MM - lo;
    let oy = opts.margin_mm + HEADER_MM;
    let page_w = ox + hi + opts.margin_mm;
    let page_h = oy + l + FOOTER_MM + opts.margin_mm;

    let mut s = String::new();
    open_svg(&mut s, page_w, page_h);
    if opts.show_title {
        text(
            &mut s,
            opts.margin_mm,
            opts.margin_mm + 4.0,
            4.0,
            "start",
            &format!(
                "Graft Template - {}mm x {}mm",
                fmt_mm(graft.diameter_mm()),
                fmt_mm(graft.length_mm())
            ),
        );
        text(
            &mut s,
            opts.margin_mm,
            opts.margin_mm + 8.0,
            2.5,
            "start",
            "Print at 100% (actual size). Align 12 o'clock with the anterior line.",
        );
    }
    s.push_str(&format!(
        "<g transform=\"translate({} {})\">\n",
        n(ox),
        n(oy)
    ));
    s.push_str(&format!(
        "<rect class=\"template\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#000\" stroke-width=\"0.4\"/>\n",
        n(w),
        n(l)
    ));

    for g in geometry.gridlines() {
        s.push_str(&format!(
            "<path class=\"gridline\" d=\"M {} 0 L {} {}\" stroke=\"{}\" stroke-width=\"{}\" stroke-dasharray=\"2 1.5\"/>\n",
            n(g.x_mm),
            n(g.x_mm),
            n(l),
            GRID_COLOR,
            if g.major { "0.35" } else { "0.2" }
        ));
        if g.major {
            text(&mut s, g.x_mm, -2.0, 3.0, "middle", &g.clock.to_string());
        } else {
            text(&mut s, g.x_mm, -2.0, 2.2, "middle", &g.clock.hour().to_string());
        }
    }

    for t in geometry.length_ticks(opts.length_tick_mm)? {
        s.push_str(&format!(
            "<path d=\"M -2 {} L 0 {}\" stroke=\"#000\" stroke-width=\"0.2\"/>\n",
            n(t.y_mm),
            n(t.y_mm)
        ));
        text(&mut s, -3.0, t.y_mm + 0.8, 2.2, "end", &fmt_mm(t.axial_mm));
    }
    s.push_str(&format!(
        "<text transform=\"translate(-10 {}) rotate(-90)\" font-size=\"2.5\" text-anchor=\"middle\" fill=\"#333\">Length (mm)</text>\n",
        n(l / 2.0)
    ));
    text(&mut s, w / 2.0, l + 9.0, 2.5, "middle", "Circumference (mm)");

    for m in markers {
        marker(&mut s, m, m.y_mm, false);
    }

    if opts.scale_bar_mm > 0.0 {
        let y = l + 5.0;
        let bar = opts.scale_bar_mm;
        s.push_str(&format!(
            "<path class=\"scale-bar\" d=\"M 0 {} L 0 {} L {} {} L {} {}\" fill=\"none\" stroke=\"#000\" stroke-width=\"0.3\"/>\n",
            n(y - 1.0),
            n(y),
            n(bar),
            n(y),
            n(bar),
            n(y - 1.0)
        ));
        text(&mut s, bar + 1.5, y + 0.8, 2.5, "start", &format!("{} mm", fmt_mm(bar)));
    }

    s.push_str("</g>\n</svg>\n");
    debug!(page_w, page_h, markers = markers.len(), "template sheet built");
    Ok(Sheet {
        svg: s,
        width_mm: page_w,
        height_mm: page_h,
    })
}

/// Front view of the graft as a cylinder with elliptical ends.
///
/// `markers` must come from `ViewKind::CylindricalView` in paint order;
/// occluded ones are drawn faded underneath the body.
pub fn cylinder_svg(
    graft: &GraftSpec,
    markers: &[RenderedMarker],
    convention: &ProjectionConvention,
    opts: &SheetOptions,
) -> Sheet {
    let d = graft.diameter_mm();
    let l = graft.length_mm();
    let rx = d / 2.0;
    let ry = d * 0.1875;
    let side_room = 6.0;
    let ox = opts.margin_mm + side_room;
    let oy = opts.margin_mm + HEADER_MM + ry;
    let page_w = ox + d + side_room + LABEL_ROOM_MM + opts.margin_mm;
    let page_h = oy + l + ry + opts.margin_mm + 4.0;
    let doc_y = |y: f64| match convention.view_axis {
        ViewAxis::ScreenDown => y,
        ViewAxis::CartesianUp => l - y,
    };

    let mut s = String::new();
    open_svg(&mut s, page_w, page_h);
    if opts.show_title {
        text(
            &mut s,
            opts.margin_mm,
            opts.margin_mm + 4.0,
            4.0,
            "start",
            &format!("Graft: {}mm x {}mm", fmt_mm(d), fmt_mm(l)),
        );
    }
    s.push_str(&format!(
        "<g transform=\"translate({} {})\">\n",
        n(ox),
        n(oy)
    ));

    for m in markers.iter().filter(|m| m.occluded) {
        marker(&mut s, m, doc_y(m.y_mm), true);
    }

    // Body, distal cap, proximal cap.
    s.push_str(&format!(
        "<rect class=\"body\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\" fill-opacity=\"0.3\" stroke=\"none\"/>\n",
        n(d),
        n(l),
        BODY_COLOR
    ));
    s.push_str(&format!(
        "<path d=\"M 0 {} A {} {} 0 0 0 {} {}\" fill=\"none\" stroke=\"#000\" stroke-width=\"0.4\"/>\n",
        n(l),
        n(rx),
        n(ry),
        n(d),
        n(l)
    ));
    s.push_str(&format!(
        "<path d=\"M 0 {} A {} {} 0 0 1 {} {}\" fill=\"none\" stroke=\"#000\" stroke-width=\"0.25\" stroke-dasharray=\"1 1\"/>\n",
        n(l),
        n(rx),
        n(ry),
        n(d),
        n(l)
    ));
    s.push_str(&format!(
        "<path d=\"M 0 0 L 0 {} M {} 0 L {} {}\" stroke=\"#000\" stroke-width=\"0.4\"/>\n",
        n(l),
        n(d),
        n(d),
        n(l)
    ));
    s.push_str(&format!(
        "<ellipse class=\"proximal\" cx=\"{}\" cy=\"0\" rx=\"{}\" ry=\"{}\" fill=\"{}\" fill-opacity=\"0.3\" stroke=\"#000\" stroke-width=\"0.4\"/>\n",
        n(rx),
        n(rx),
        n(ry),
        BODY_COLOR
    ));

    for m in markers.iter().filter(|m| !m.occluded) {
        marker(&mut s, m, doc_y(m.y_mm), false);
    }

    text(&mut s, rx, ry + 3.5, 3.0, "middle", "12");
    text(&mut s, rx, -ry - 1.2, 3.0, "middle", "6");
    text(&mut s, d + 1.5, 1.0, 3.0, "start", "3");
    text(&mut s, -1.5, 1.0, 3.0, "end", "9");

    s.push_str("</g>\n</svg>\n");
    Sheet {
        svg: s,
        width_mm: page_w,
        height_mm: page_h,
    }
}
