use std::fs;
use std::path::Path;

use graft_core::{ClockPosition, GraftSpec, Limits, ProjectionConvention, Registry, VesselTag};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TemplateError};

/// Size used when neither the fenestration nor the graft states one.
pub const DEFAULT_FENESTRATION_DIAMETER_MM: f64 = 6.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraftInput {
    pub diameter_mm: f64,
    pub length_mm: f64,
    #[serde(default)]
    pub fenestration_diameter_mm: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FenestrationInput {
    pub vessel: VesselTag,
    pub axial_position_mm: f64,
    pub clock: ClockPosition,
    /// Falls back to the graft's fenestration size.
    #[serde(default)]
    pub diameter_mm: Option<f64>,
}

/// On-disk form of an editing session.
///
/// ```json
/// {
///   "graft": { "diameter_mm": 28, "length_mm": 120, "fenestration_diameter_mm": 6 },
///   "fenestrations": [
///     { "vessel": "SMA", "axial_position_mm": 40, "clock": 12 }
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    pub graft: GraftInput,
    #[serde(default)]
    pub convention: Option<ProjectionConvention>,
    #[serde(default)]
    pub fenestrations: Vec<FenestrationInput>,
}

/// A loaded session: validated graft, populated registry, and the
/// convention the file asked for (if any).
#[derive(Clone, Debug)]
pub struct Session {
    pub graft: GraftSpec,
    pub registry: Registry,
    pub convention: Option<ProjectionConvention>,
}

impl SessionFile {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let txt = fs::read_to_string(path)?;
        Self::from_json_str(&txt)
    }

    /// Validate every entry against `limits`. The first failing entry is
    /// reported with its index in the file.
    pub fn into_session(self, limits: Limits) -> Result<Session> {
        let default_size = self
            .graft
            .fenestration_diameter_mm
            .unwrap_or(DEFAULT_FENESTRATION_DIAMETER_MM);
        let graft = GraftSpec::new(
            self.graft.diameter_mm,
            self.graft.length_mm,
            default_size,
            &limits,
        )?;
        let mut registry = Registry::new(limits);
        for (index, f) in self.fenestrations.into_iter().enumerate() {
            let size = f.diameter_mm.unwrap_or(graft.fenestration_diameter_mm());
            registry
                .add(&graft, f.vessel, f.axial_position_mm, f.clock, size)
                .map_err(|source| TemplateError::Fenestration { index, source })?;
        }
        debug!(count = registry.len(), "session loaded");
        Ok(Session {
            graft,
            registry,
            convention: self.convention,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_core::{GraftError, NamedVessel};

    const SAMPLE: &str = r#"{
        "graft": { "diameter_mm": 28, "length_mm": 120, "fenestration_diameter_mm": 8 },
        "fenestrations": [
            { "vessel": "SMA", "axial_position_mm": 40, "clock": 12, "diameter_mm": 6 },
            { "vessel": "F1", "axial_position_mm": 70, "clock": 3 }
        ]
    }"#;

    #[test]
    fn applies_size_default_at_load() {
        let s = SessionFile::from_json_str(SAMPLE)
            .unwrap()
            .into_session(Limits::default())
            .unwrap();
        let sizes: Vec<f64> = s.registry.iter().map(|f| f.diameter_mm).collect();
        assert_eq!(sizes, [6.0, 8.0]);
        assert!(s.registry.contains_vessel(NamedVessel::Sma.into()));
        assert_eq!(s.convention, None);
    }

    #[test]
    fn reports_failing_entry_index() {
        let txt = SAMPLE.replace(r#""vessel": "F1""#, r#""vessel": "SMA""#);
        let err = SessionFile::from_json_str(&txt)
            .unwrap()
            .into_session(Limits::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Fenestration {
                index: 1,
                source: GraftError::DuplicateNamedVessel { .. }
            }
        ));
    }

    #[test]
    fn rejects_bad_clock_in_file() {
        let txt = SAMPLE.replace(r#""clock": 3"#, r#""clock": 13"#);
        assert!(matches!(
            SessionFile::from_json_str(&txt),
            Err(TemplateError::Json(_))
        ));
    }
}
