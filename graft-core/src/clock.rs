//! Clock-face arithmetic.
//!
//! A clock position describes where a fenestration sits around the graft's
//! circumference, viewed from the proximal end: 12 is anterior, 6 is
//! posterior and the hours run clockwise. Two numeric frames are derived
//! from it here:
//!
//! * the angular frame used for the cross-section (`clock_to_angle_deg`),
//!   origin at 6 o'clock (0°), increasing counter-clockwise on the face so
//!   that 3 is 90°, 12 is 180° and 9 is 270°;
//! * the unwrapped frame used by the flat template (`UnwrapConvention`),
//!   a fraction of the template width.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GraftError, Result};

const HOURS: i64 = 12;
const DEG_PER_HOUR: f64 = 30.0;

/// Hour on the graft clock face, always in `1..=12`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ClockPosition(u8);

impl ClockPosition {
    pub const TWELVE: Self = Self(12);
    pub const SIX: Self = Self(6);
    pub const NINE: Self = Self(9);

    pub fn new(hour: i64) -> Result<Self> {
        if (1..=HOURS).contains(&hour) {
            Ok(Self(hour as u8))
        } else {
            Err(GraftError::InvalidClock { value: hour })
        }
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    /// All twelve positions, 1 through 12.
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (1..=HOURS as u8).map(Self)
    }

    /// Step clockwise by `hours`; negative values step counter-clockwise.
    pub fn offset(self, hours: i64) -> Self {
        let h = (i64::from(self.0) - 1 + hours).rem_euclid(HOURS) + 1;
        Self(h as u8)
    }

    /// Clockwise distance from `origin` to `self`, in `0..12` hours.
    pub fn hours_from(self, origin: Self) -> u8 {
        (i64::from(self.0) - i64::from(origin.0)).rem_euclid(HOURS) as u8
    }

    /// Positions on the back half-turn of the graft (4 through 8).
    pub fn is_posterior(self) -> bool {
        (4..=8).contains(&self.0)
    }

    pub fn region(self) -> Region {
        match self.0 {
            12 => Region::Anterior,
            1 | 2 => Region::AnteriorLeft,
            3 => Region::Left,
            4 | 5 => Region::PosteriorLeft,
            6 => Region::Posterior,
            7 | 8 => Region::PosteriorRight,
            9 => Region::Right,
            _ => Region::AnteriorRight,
        }
    }
}

impl TryFrom<i64> for ClockPosition {
    type Error = GraftError;

    fn try_from(hour: i64) -> Result<Self> {
        Self::new(hour)
    }
}

impl From<ClockPosition> for u8 {
    fn from(c: ClockPosition) -> u8 {
        c.0
    }
}

impl fmt::Display for ClockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} o'clock", self.0)
    }
}

/// Anatomical region named by a clock position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Anterior,
    AnteriorLeft,
    Left,
    PosteriorLeft,
    Posterior,
    PosteriorRight,
    Right,
    AnteriorRight,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Region::Anterior => "Anterior (front)",
            Region::AnteriorLeft => "Anterior-Left",
            Region::Left => "Left",
            Region::PosteriorLeft => "Posterior-Left",
            Region::Posterior => "Posterior (back)",
            Region::PosteriorRight => "Posterior-Right",
            Region::Right => "Right",
            Region::AnteriorRight => "Anterior-Right",
        };
        f.write_str(s)
    }
}

/// Cross-section angle of a clock position, in `[0, 360)`.
pub fn clock_to_angle_deg(clock: ClockPosition) -> f64 {
    (180.0 - (f64::from(clock.hour()) - 12.0) * DEG_PER_HOUR).rem_euclid(360.0)
}

/// Continuous clock value in `(0, 12]` for any finite angle.
pub fn angle_to_clock_hours(degrees: f64) -> f64 {
    let h = (12.0 - (degrees - 180.0) / DEG_PER_HOUR).rem_euclid(12.0);
    if h == 0.0 { 12.0 } else { h }
}

/// Nearest clock position for an angle in the cross-section frame.
pub fn angle_to_clock(degrees: f64) -> Result<ClockPosition> {
    if !degrees.is_finite() {
        return Err(GraftError::InvalidRange {
            field: "angle_deg",
            value: degrees,
            min: 0.0,
            max: 360.0,
        });
    }
    let h = angle_to_clock_hours(degrees).round() as i64;
    ClockPosition::new(if h == 0 { HOURS } else { h })
}

/// Full-wrap circumference fraction, starting at `reference` and running
/// clockwise. The reference itself is 0; the far edge (1.0) is the same
/// line and is only produced by `UnwrapConvention::traversal`.
pub fn unwrapped_fraction(clock: ClockPosition, reference: ClockPosition) -> f64 {
    f64::from(clock.hours_from(reference)) / HOURS as f64
}

/// How the graft surface is laid flat for the printed template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnwrapConvention {
    /// Whole circumference, cut along `reference`. Origin `reference`,
    /// increasing clockwise, both template edges are `reference`.
    FullWrap { reference: ClockPosition },
    /// Anterior half only: origin 9, increasing clockwise through 12 to 3.
    /// Clocks 4 through 8 are off-template.
    HalfWrap,
}

impl Default for UnwrapConvention {
    fn default() -> Self {
        UnwrapConvention::FullWrap {
            reference: ClockPosition::SIX,
        }
    }
}

/// Where a clock lands on the flat template, as a fraction of its width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnwrapPlacement {
    pub fraction: f64,
    /// False when the fraction lies outside `[0, 1]`.
    pub on_template: bool,
}

impl UnwrapConvention {
    pub fn origin_clock(&self) -> ClockPosition {
        match self {
            UnwrapConvention::FullWrap { reference } => *reference,
            UnwrapConvention::HalfWrap => ClockPosition::NINE,
        }
    }

    /// Share of the circumference covered by the template.
    pub fn span_fraction(&self) -> f64 {
        match self {
            UnwrapConvention::FullWrap { .. } => 1.0,
            UnwrapConvention::HalfWrap => 0.5,
        }
    }

    pub fn placement(&self, clock: ClockPosition) -> UnwrapPlacement {
        match self {
            UnwrapConvention::FullWrap { reference } => UnwrapPlacement {
                fraction: unwrapped_fraction(clock, *reference),
                on_template: true,
            },
            UnwrapConvention::HalfWrap => {
                let hours = clock.hours_from(ClockPosition::NINE);
                // Off-arc clocks continue past the nearer edge; 6 is equidistant
                // and goes right.
                let steps = match hours {
                    0..=9 => f64::from(hours),
                    _ => f64::from(hours) - HOURS as f64,
                };
                UnwrapPlacement {
                    fraction: steps / 6.0,
                    on_template: hours <= 6,
                }
            }
        }
    }

    /// Clocks in template order, left edge to right edge, with their
    /// fractions. A full wrap lists its reference twice (0.0 and 1.0).
    pub fn traversal(&self) -> Vec<(ClockPosition, f64)> {
        let origin = self.origin_clock();
        match self {
            UnwrapConvention::FullWrap { .. } => (0..=HOURS)
                .map(|i| (origin.offset(i), i as f64 / HOURS as f64))
                .collect(),
            UnwrapConvention::HalfWrap => (0..=6)
                .map(|i| (origin.offset(i), i as f64 / 6.0))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn c(h: i64) -> ClockPosition {
        ClockPosition::new(h).unwrap()
    }

    #[test]
    fn angle_frame_anchors() {
        assert_abs_diff_eq!(clock_to_angle_deg(c(12)), 180.0);
        assert_abs_diff_eq!(clock_to_angle_deg(c(3)), 90.0);
        assert_abs_diff_eq!(clock_to_angle_deg(c(6)), 0.0);
        assert_abs_diff_eq!(clock_to_angle_deg(c(9)), 270.0);
    }

    #[test]
    fn angle_round_trip_for_every_hour() {
        for clock in ClockPosition::all() {
            let deg = clock_to_angle_deg(clock);
            assert!((0.0..360.0).contains(&deg));
            assert_eq!(angle_to_clock(deg).unwrap(), clock);
        }
    }

    #[test]
    fn angle_to_clock_normalises_out_of_range_angles() {
        assert_eq!(angle_to_clock(540.0).unwrap(), c(12));
        assert_eq!(angle_to_clock(-90.0).unwrap(), c(9));
        assert_eq!(angle_to_clock(359.9).unwrap(), c(6));
        assert!(angle_to_clock(f64::NAN).is_err());
    }

    #[test]
    fn rejects_hours_outside_face() {
        assert_eq!(
            ClockPosition::new(0),
            Err(GraftError::InvalidClock { value: 0 })
        );
        assert!(ClockPosition::new(13).is_err());
        assert!(ClockPosition::new(-3).is_err());
    }

    #[test]
    fn offset_wraps_both_ways() {
        assert_eq!(c(11).offset(2), c(1));
        assert_eq!(c(1).offset(-2), c(11));
        assert_eq!(c(6).offset(12), c(6));
    }

    #[test]
    fn full_wrap_fractions() {
        let conv = UnwrapConvention::default();
        assert_abs_diff_eq!(conv.placement(c(6)).fraction, 0.0);
        assert_abs_diff_eq!(conv.placement(c(9)).fraction, 0.25);
        assert_abs_diff_eq!(conv.placement(c(12)).fraction, 0.5);
        assert_abs_diff_eq!(conv.placement(c(3)).fraction, 0.75);
        assert!(ClockPosition::all().all(|k| conv.placement(k).on_template));
    }

    #[test]
    fn full_wrap_traversal_ends_on_reference() {
        let t = UnwrapConvention::default().traversal();
        assert_eq!(t.len(), 13);
        assert_eq!(t.first().unwrap().0, c(6));
        assert_eq!(t.last().unwrap().0, c(6));
        assert_abs_diff_eq!(t.last().unwrap().1, 1.0);
    }

    #[test]
    fn half_wrap_flags_posterior_clocks() {
        let conv = UnwrapConvention::HalfWrap;
        assert_abs_diff_eq!(conv.placement(c(9)).fraction, 0.0);
        assert_abs_diff_eq!(conv.placement(c(12)).fraction, 0.5);
        assert_abs_diff_eq!(conv.placement(c(3)).fraction, 1.0);
        for h in 4..=8 {
            let p = conv.placement(c(h));
            assert!(!p.on_template, "{h} o'clock should be off-template");
            assert!(p.fraction > 1.0 || p.fraction < 0.0);
        }
        assert_abs_diff_eq!(conv.placement(c(4)).fraction, 7.0 / 6.0);
        assert_abs_diff_eq!(conv.placement(c(8)).fraction, -1.0 / 6.0);
    }

    #[test]
    fn regions_follow_reference_table() {
        assert_eq!(c(12).region(), Region::Anterior);
        assert_eq!(c(2).region(), Region::AnteriorLeft);
        assert_eq!(c(5).region(), Region::PosteriorLeft);
        assert_eq!(c(7).region(), Region::PosteriorRight);
        assert_eq!(c(10).region(), Region::AnteriorRight);
    }

    #[test]
    fn serde_checks_range() {
        let ok: ClockPosition = serde_json::from_str("3").unwrap();
        assert_eq!(ok, c(3));
        assert!(serde_json::from_str::<ClockPosition>("0").is_err());
        assert_eq!(serde_json::to_string(&c(11)).unwrap(), "11");
    }
}
