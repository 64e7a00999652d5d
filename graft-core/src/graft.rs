use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraftError, Result, check_range};

/// Closed interval in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeMm {
    pub min: f64,
    pub max: f64,
}

impl RangeMm {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub(crate) fn check(&self, field: &'static str, v: f64) -> Result<f64> {
        check_range(field, v, self.min, self.max)
    }
}

/// Bounds offered by the input controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Graft diameters available off the shelf (mm).
    pub diameters_mm: Vec<f64>,
    pub length_mm: RangeMm,
    pub fenestration_diameter_mm: RangeMm,
    /// Generic tags `F1..=F<n>` offered alongside the named vessels.
    pub numbered_tags: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            diameters_mm: vec![20.0, 24.0, 28.0, 32.0, 36.0],
            length_mm: RangeMm::new(80.0, 200.0),
            fenestration_diameter_mm: RangeMm::new(4.0, 12.0),
            numbered_tags: 4,
        }
    }
}

/// Dimensions of the graft being planned. Rebuilt whenever a control changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraftSpec {
    diameter_mm: f64,
    length_mm: f64,
    fenestration_diameter_mm: f64,
    fenestration_range: RangeMm,
}

impl GraftSpec {
    pub fn new(
        diameter_mm: f64,
        length_mm: f64,
        fenestration_diameter_mm: f64,
        limits: &Limits,
    ) -> Result<Self> {
        if !limits
            .diameters_mm
            .iter()
            .any(|d| (d - diameter_mm).abs() < 1e-9)
            || diameter_mm <= 0.0
        {
            debug!(diameter_mm, "rejected graft diameter");
            return Err(GraftError::UnsupportedDiameter {
                value: diameter_mm,
                allowed: limits.diameters_mm.clone(),
            });
        }
        let length_mm = limits.length_mm.check("length_mm", length_mm)?;
        if length_mm <= 0.0 {
            return Err(GraftError::InvalidRange {
                field: "length_mm",
                value: length_mm,
                min: f64::MIN_POSITIVE,
                max: limits.length_mm.max,
            });
        }
        let fenestration_diameter_mm = limits
            .fenestration_diameter_mm
            .check("fenestration_diameter_mm", fenestration_diameter_mm)?;
        Ok(Self {
            diameter_mm,
            length_mm,
            fenestration_diameter_mm,
            fenestration_range: limits.fenestration_diameter_mm,
        })
    }

    pub fn diameter_mm(&self) -> f64 {
        self.diameter_mm
    }

    pub fn length_mm(&self) -> f64 {
        self.length_mm
    }

    /// Size given to fenestrations that do not state their own.
    pub fn fenestration_diameter_mm(&self) -> f64 {
        self.fenestration_diameter_mm
    }

    pub fn fenestration_range(&self) -> RangeMm {
        self.fenestration_range
    }

    pub fn circumference_mm(&self) -> f64 {
        PI * self.diameter_mm
    }

    pub(crate) fn check_axial(&self, axial_position_mm: f64) -> Result<f64> {
        check_range("axial_position_mm", axial_position_mm, 0.0, self.length_mm)
    }
}
