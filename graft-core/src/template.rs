use serde::Serialize;

use crate::clock::ClockPosition;
use crate::error::{GraftError, Result};
use crate::graft::GraftSpec;
use crate::projection::ProjectionConvention;

/// Vertical clock line on the flat template.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Gridline {
    pub clock: ClockPosition,
    pub x_mm: f64,
    /// 12, 3, 6 and 9 o'clock.
    pub major: bool,
}

/// Horizontal tick along the template's length axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LengthTick {
    pub y_mm: f64,
    /// Distance from the proximal end the tick stands for.
    pub axial_mm: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

/// Physical layout of the unwrapped template. All values are millimetres
/// and share one scale, so the printed sheet is exact at 100 %.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateGeometry {
    circumference_mm: f64,
    width_mm: f64,
    length_mm: f64,
    convention: ProjectionConvention,
}

impl TemplateGeometry {
    pub fn new(graft: &GraftSpec, convention: &ProjectionConvention) -> Self {
        let circumference_mm = graft.circumference_mm();
        Self {
            circumference_mm,
            width_mm: circumference_mm * convention.unwrap.span_fraction(),
            length_mm: graft.length_mm(),
            convention: *convention,
        }
    }

    pub fn circumference_mm(&self) -> f64 {
        self.circumference_mm
    }

    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    pub fn length_mm(&self) -> f64 {
        self.length_mm
    }

    pub fn convention(&self) -> &ProjectionConvention {
        &self.convention
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x_min: 0.0,
            y_min: 0.0,
            x_max: self.width_mm,
            y_max: self.length_mm,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width_mm / self.length_mm
    }

    /// Clock lines from the left edge to the right edge.
    pub fn gridlines(&self) -> Vec<Gridline> {
        self.convention
            .unwrap
            .traversal()
            .into_iter()
            .map(|(clock, fraction)| Gridline {
                clock,
                x_mm: fraction * self.width_mm,
                major: clock.hour() % 3 == 0,
            })
            .collect()
    }

    /// Ticks every `step_mm` from the proximal end, placed per the
    /// template's vertical origin.
    pub fn length_ticks(&self, step_mm: f64) -> Result<Vec<LengthTick>> {
        if !(step_mm.is_finite() && step_mm > 0.0) {
            return Err(GraftError::InvalidRange {
                field: "length_tick_mm",
                value: step_mm,
                min: f64::MIN_POSITIVE,
                max: self.length_mm,
            });
        }
        let count = (self.length_mm / step_mm + 1e-9).floor() as usize;
        Ok((0..=count)
            .map(|i| {
                let axial_mm = i as f64 * step_mm;
                LengthTick {
                    y_mm: self.convention.template_y(axial_mm, self.length_mm),
                    axial_mm,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::UnwrapConvention;
    use crate::graft::Limits;
    use crate::projection::VerticalOrigin;
    use approx::assert_abs_diff_eq;

    fn graft(d: f64) -> GraftSpec {
        GraftSpec::new(d, 120.0, 6.0, &Limits::default()).unwrap()
    }

    #[test]
    fn full_wrap_rectangle_is_circumference_by_length() {
        let t = TemplateGeometry::new(&graft(28.0), &ProjectionConvention::default());
        let b = t.bounds();
        assert_abs_diff_eq!(b.width(), std::f64::consts::PI * 28.0);
        assert_abs_diff_eq!(b.height(), 120.0);
        assert_abs_diff_eq!(t.aspect_ratio(), b.width() / b.height());
    }

    #[test]
    fn full_wrap_gridlines_cover_both_edges() {
        let t = TemplateGeometry::new(&graft(28.0), &ProjectionConvention::default());
        let lines = t.gridlines();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0].clock, ClockPosition::SIX);
        assert_abs_diff_eq!(lines[0].x_mm, 0.0);
        assert_eq!(lines[12].clock, ClockPosition::SIX);
        assert_abs_diff_eq!(lines[12].x_mm, t.width_mm());
        assert_eq!(lines.iter().filter(|l| l.major).count(), 5);
        assert!(lines.windows(2).all(|w| w[0].x_mm < w[1].x_mm));
    }

    #[test]
    fn half_wrap_spans_anterior_arc() {
        let conv = ProjectionConvention {
            unwrap: UnwrapConvention::HalfWrap,
            ..Default::default()
        };
        let t = TemplateGeometry::new(&graft(24.0), &conv);
        assert_abs_diff_eq!(t.width_mm(), t.circumference_mm() / 2.0);
        let hours: Vec<u8> = t.gridlines().iter().map(|l| l.clock.hour()).collect();
        assert_eq!(hours, [9, 10, 11, 12, 1, 2, 3]);
    }

    #[test]
    fn length_ticks_follow_vertical_origin() {
        let conv = ProjectionConvention {
            template_origin: VerticalOrigin::Bottom,
            ..Default::default()
        };
        let t = TemplateGeometry::new(&graft(28.0), &conv);
        let ticks = t.length_ticks(10.0).unwrap();
        assert_eq!(ticks.len(), 13);
        assert_abs_diff_eq!(ticks[0].y_mm, 120.0);
        assert_abs_diff_eq!(ticks[12].y_mm, 0.0);
        assert!(t.length_ticks(0.0).is_err());
    }
}
