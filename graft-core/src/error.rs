use thiserror::Error;

use crate::registry::FenestrationId;
use crate::vessel::VesselTag;

/// Validation failures raised by the engine.
///
/// All of them are local: the engine state is untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraftError {
    #[error("clock position {value} is outside 1..=12")]
    InvalidClock { value: i64 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("graft diameter {value} mm is not one of {allowed:?}")]
    UnsupportedDiameter { value: f64, allowed: Vec<f64> },

    #[error("vessel {vessel} already has a fenestration")]
    DuplicateNamedVessel { vessel: VesselTag },

    #[error("unknown vessel tag {tag:?}")]
    UnknownVessel { tag: String },

    #[error("no fenestration with id {id}")]
    NotFound { id: FenestrationId },
}

pub type Result<T> = std::result::Result<T, GraftError>;

/// Check that `value` lies in the closed interval `[min, max]`.
pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(GraftError::InvalidRange {
            field,
            value,
            min,
            max,
        })
    }
}
