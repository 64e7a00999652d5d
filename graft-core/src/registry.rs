use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::clock::ClockPosition;
use crate::error::{GraftError, Result};
use crate::graft::{GraftSpec, Limits};
use crate::vessel::{NamedVessel, VesselTag};

/// Identity of a registry entry. Two entries with identical content still
/// have distinct ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FenestrationId(Uuid);

impl FenestrationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FenestrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A hole to be cut in the graft fabric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fenestration {
    pub id: FenestrationId,
    pub vessel: VesselTag,
    /// Distance from the proximal end.
    pub axial_position_mm: f64,
    pub clock: ClockPosition,
    pub diameter_mm: f64,
}

impl fmt::Display for Fenestration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Position: {:.1}mm from top, Clock: {}, Size: {}mm",
            self.vessel, self.axial_position_mm, self.clock, self.diameter_mm
        )
    }
}

/// The fenestrations of one editing session, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: Vec<Fenestration>,
    limits: Limits,
}

impl Registry {
    pub fn new(limits: Limits) -> Self {
        Self {
            entries: Vec::new(),
            limits,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Append a fenestration. Nothing is stored unless every check passes.
    #[instrument(skip(self, graft))]
    pub fn add(
        &mut self,
        graft: &GraftSpec,
        vessel: VesselTag,
        axial_position_mm: f64,
        clock: ClockPosition,
        diameter_mm: f64,
    ) -> Result<FenestrationId> {
        let axial_position_mm = graft.check_axial(axial_position_mm).inspect_err(|e| {
            debug!(error = %e, "rejected fenestration");
        })?;
        let diameter_mm = graft
            .fenestration_range()
            .check("diameter_mm", diameter_mm)
            .inspect_err(|e| debug!(error = %e, "rejected fenestration"))?;
        if vessel.is_named() && self.contains_vessel(vessel) {
            debug!("named vessel already placed");
            return Err(GraftError::DuplicateNamedVessel { vessel });
        }
        let id = FenestrationId::new();
        self.entries.push(Fenestration {
            id,
            vessel,
            axial_position_mm,
            clock,
            diameter_mm,
        });
        debug!(%id, count = self.entries.len(), "fenestration added");
        Ok(id)
    }

    /// Remove an entry by identity and return it.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: FenestrationId) -> Result<Fenestration> {
        let pos = self
            .entries
            .iter()
            .position(|f| f.id == id)
            .ok_or(GraftError::NotFound { id })?;
        Ok(self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        debug!(count = self.entries.len(), "clearing fenestrations");
        self.entries.clear();
    }

    pub fn get(&self, id: FenestrationId) -> Option<&Fenestration> {
        self.entries.iter().find(|f| f.id == id)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Fenestration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_vessel(&self, vessel: VesselTag) -> bool {
        self.entries.iter().any(|f| f.vessel == vessel)
    }

    /// Tags that `add` accepts without a duplicate error: the configured
    /// numbered tags, then every named vessel not yet placed.
    pub fn available_vessels(&self) -> Vec<VesselTag> {
        (1..=self.limits.numbered_tags)
            .map(VesselTag::Numbered)
            .chain(
                NamedVessel::ALL
                    .into_iter()
                    .map(VesselTag::Named)
                    .filter(|v| !self.contains_vessel(*v)),
            )
            .collect()
    }

    /// Entries from proximal to distal; ties keep insertion order.
    ///
    /// The returned iterator can be cloned to walk the order again.
    pub fn display_order(&self) -> impl Iterator<Item = &Fenestration> + Clone + '_ {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| {
            self.entries[a]
                .axial_position_mm
                .total_cmp(&self.entries[b].axial_position_mm)
        });
        order.into_iter().map(move |i| &self.entries[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graft::RangeMm;

    fn graft() -> GraftSpec {
        GraftSpec::new(28.0, 120.0, 6.0, &Limits::default()).unwrap()
    }

    fn clock(h: i64) -> ClockPosition {
        ClockPosition::new(h).unwrap()
    }

    #[test]
    fn named_vessels_are_unique() {
        let g = graft();
        let mut reg = Registry::default();
        reg.add(&g, NamedVessel::Sma.into(), 40.0, clock(12), 6.0).unwrap();
        let err = reg
            .add(&g, NamedVessel::Sma.into(), 60.0, clock(1), 6.0)
            .unwrap_err();
        assert_eq!(
            err,
            GraftError::DuplicateNamedVessel {
                vessel: NamedVessel::Sma.into()
            }
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn numbered_tags_repeat_freely() {
        let g = graft();
        let mut reg = Registry::default();
        let a = reg.add(&g, VesselTag::Numbered(1), 30.0, clock(3), 6.0).unwrap();
        let b = reg.add(&g, VesselTag::Numbered(1), 30.0, clock(3), 6.0).unwrap();
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn rejects_position_beyond_graft() {
        let g = graft();
        let mut reg = Registry::default();
        let err = reg
            .add(&g, VesselTag::Numbered(1), 121.0, clock(3), 6.0)
            .unwrap_err();
        assert!(matches!(
            err,
            GraftError::InvalidRange {
                field: "axial_position_mm",
                ..
            }
        ));
        assert!(reg.add(&g, VesselTag::Numbered(1), -0.5, clock(3), 6.0).is_err());
        assert!(reg.add(&g, VesselTag::Numbered(1), 50.0, clock(3), 2.0).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn size_bounds_follow_the_graft() {
        let limits = Limits {
            fenestration_diameter_mm: RangeMm::new(2.0, 20.0),
            ..Limits::default()
        };
        let g = GraftSpec::new(28.0, 120.0, 15.0, &limits).unwrap();
        let mut reg = Registry::default();
        let size = g.fenestration_diameter_mm();
        let id = reg.add(&g, VesselTag::Numbered(1), 50.0, clock(3), size).unwrap();
        assert_eq!(reg.get(id).unwrap().diameter_mm, 15.0);
        let err = reg.add(&g, VesselTag::Numbered(2), 50.0, clock(3), 21.0).unwrap_err();
        assert_eq!(
            err,
            GraftError::InvalidRange {
                field: "diameter_mm",
                value: 21.0,
                min: 2.0,
                max: 20.0
            }
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_by_identity() {
        let g = graft();
        let mut reg = Registry::default();
        let a = reg.add(&g, VesselTag::Numbered(1), 10.0, clock(3), 6.0).unwrap();
        let b = reg.add(&g, VesselTag::Numbered(1), 10.0, clock(3), 6.0).unwrap();
        let removed = reg.remove(a).unwrap();
        assert_eq!(removed.id, a);
        assert!(reg.get(b).is_some());
        assert_eq!(reg.remove(a), Err(GraftError::NotFound { id: a }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn available_vessels_hide_placed_names() {
        let g = graft();
        let mut reg = Registry::default();
        assert_eq!(reg.available_vessels().len(), 8);
        reg.add(&g, NamedVessel::Celiac.into(), 20.0, clock(12), 8.0).unwrap();
        let avail = reg.available_vessels();
        assert!(!avail.contains(&NamedVessel::Celiac.into()));
        assert!(avail.contains(&NamedVessel::Sma.into()));
        assert!(avail.contains(&VesselTag::Numbered(4)));
        reg.clear();
        assert!(reg.available_vessels().contains(&NamedVessel::Celiac.into()));
    }

    #[test]
    fn display_order_sorts_without_touching_storage() {
        let g = graft();
        let mut reg = Registry::default();
        let late = reg.add(&g, VesselTag::Numbered(1), 90.0, clock(3), 6.0).unwrap();
        let tie_a = reg.add(&g, VesselTag::Numbered(2), 40.0, clock(3), 6.0).unwrap();
        let tie_b = reg.add(&g, VesselTag::Numbered(3), 40.0, clock(9), 6.0).unwrap();
        let order = reg.display_order();
        let ids: Vec<_> = order.clone().map(|f| f.id).collect();
        assert_eq!(ids, vec![tie_a, tie_b, late]);
        assert_eq!(order.count(), 3);
        assert_eq!(reg.iter().next().unwrap().id, late);
    }

    #[test]
    fn describes_entry_like_the_list_row() {
        let g = graft();
        let mut reg = Registry::default();
        let id = reg.add(&g, NamedVessel::Sma.into(), 40.0, clock(12), 6.0).unwrap();
        assert_eq!(
            reg.get(id).unwrap().to_string(),
            "SMA: Position: 40.0mm from top, Clock: 12 o'clock, Size: 6mm"
        );
    }
}
