//! Placement of fenestrations in the two rendered views.
//!
//! Both views work in millimetres with a y-down document frame whose
//! origin is the top-left corner of the drawing:
//!
//! * the cylindrical view is the graft seen from the front, so its frame is
//!   `[0, diameter] x [0, length]`;
//! * the flat template is the unwrapped surface, `[0, width] x [0, length]`
//!   where `width` is the circumference (or half of it for a half wrap).

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::clock::{ClockPosition, UnwrapConvention};
use crate::error::Result;
use crate::graft::GraftSpec;
use crate::registry::{Fenestration, FenestrationId, Registry};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    CylindricalView,
    #[default]
    FlatTemplate,
}

/// Which template edge the proximal end (axial 0) lies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalOrigin {
    #[default]
    Top,
    Bottom,
}

/// Vertical axis direction of the cylindrical view's output frame. The
/// proximal end is drawn at the top of the image either way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAxis {
    /// y grows downwards; the proximal end is at y = 0.
    #[default]
    ScreenDown,
    /// y grows upwards; the proximal end is at y = length.
    CartesianUp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateralMapping {
    /// Equal spacing per hour between the centre line and the silhouettes.
    #[default]
    PiecewiseLinear,
    /// True orthographic projection, `sin(angle)`.
    Orthographic,
}

/// Treatment of clocks outside a half-wrap template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffTemplatePolicy {
    /// Draw past the template edge with `on_template = false`.
    #[default]
    Flag,
    /// Leave the marker out.
    Suppress,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConvention {
    pub unwrap: UnwrapConvention,
    pub template_origin: VerticalOrigin,
    pub view_axis: ViewAxis,
    pub lateral: LateralMapping,
    pub off_template: OffTemplatePolicy,
}

impl ProjectionConvention {
    /// Template y of an axial position (y-down from the top edge).
    pub fn template_y(&self, axial_position_mm: f64, length_mm: f64) -> f64 {
        match self.template_origin {
            VerticalOrigin::Top => axial_position_mm,
            VerticalOrigin::Bottom => length_mm - axial_position_mm,
        }
    }

    /// Inverse of `template_y`.
    pub fn template_axial(&self, y_mm: f64, length_mm: f64) -> f64 {
        self.template_y(y_mm, length_mm)
    }

    pub fn view_y(&self, axial_position_mm: f64, length_mm: f64) -> f64 {
        match self.view_axis {
            ViewAxis::ScreenDown => axial_position_mm,
            ViewAxis::CartesianUp => length_mm - axial_position_mm,
        }
    }
}

/// A fenestration placed in a view, ready for a render sink.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedMarker {
    pub id: FenestrationId,
    pub label: String,
    pub x_mm: f64,
    pub y_mm: f64,
    pub radius_mm: f64,
    /// Behind the cylinder body; draw faded and before the outline.
    pub occluded: bool,
    /// False for half-wrap markers drawn beyond the template edge.
    pub on_template: bool,
}

/// Horizontal offset in `[-1, 1]` across the visible width: -1 at the
/// 9 o'clock silhouette, 0 on the 12/6 centre line, 1 at 3 o'clock.
pub fn lateral_offset(clock: ClockPosition, mapping: LateralMapping) -> f64 {
    let h = f64::from(clock.hours_from(ClockPosition::TWELVE));
    match mapping {
        LateralMapping::PiecewiseLinear => {
            if h <= 3.0 {
                h / 3.0
            } else if h <= 9.0 {
                (6.0 - h) / 3.0
            } else {
                (h - 12.0) / 3.0
            }
        }
        LateralMapping::Orthographic => (h * 30.0).to_radians().sin(),
    }
}

/// Place one fenestration. `Ok(None)` only when the convention suppresses
/// off-template markers and this one is off the template.
pub fn project(
    fenestration: &Fenestration,
    graft: &GraftSpec,
    view: ViewKind,
    convention: &ProjectionConvention,
) -> Result<Option<RenderedMarker>> {
    let axial = graft.check_axial(fenestration.axial_position_mm)?;
    let length = graft.length_mm();
    let mut marker = RenderedMarker {
        id: fenestration.id,
        label: fenestration.vessel.to_string(),
        x_mm: 0.0,
        y_mm: 0.0,
        radius_mm: fenestration.diameter_mm / 2.0,
        occluded: false,
        on_template: true,
    };
    match view {
        ViewKind::CylindricalView => {
            let half = graft.diameter_mm() / 2.0;
            marker.x_mm = half * (1.0 + lateral_offset(fenestration.clock, convention.lateral));
            marker.y_mm = convention.view_y(axial, length);
            marker.occluded = fenestration.clock.is_posterior();
        }
        ViewKind::FlatTemplate => {
            let placement = convention.unwrap.placement(fenestration.clock);
            if !placement.on_template && convention.off_template == OffTemplatePolicy::Suppress {
                debug!(vessel = %fenestration.vessel, "suppressed off-template marker");
                return Ok(None);
            }
            let width = graft.circumference_mm() * convention.unwrap.span_fraction();
            marker.x_mm = placement.fraction * width;
            marker.y_mm = convention.template_y(axial, length);
            marker.on_template = placement.on_template;
        }
    }
    Ok(Some(marker))
}

/// Project the whole registry in paint order: occluded markers first, each
/// group in display order.
#[instrument(skip(registry, graft, convention), fields(count = registry.len()))]
pub fn project_all(
    registry: &Registry,
    graft: &GraftSpec,
    view: ViewKind,
    convention: &ProjectionConvention,
) -> Result<Vec<RenderedMarker>> {
    let mut markers = Vec::with_capacity(registry.len());
    for f in registry.display_order() {
        if let Some(m) = project(f, graft, view, convention)? {
            markers.push(m);
        }
    }
    markers.sort_by_key(|m| !m.occluded);
    Ok(markers)
}
