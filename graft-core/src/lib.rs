//! Clock-position geometry for fenestrated graft planning.
//!
//! The crate maps fenestrations, given by axial position and clock
//! orientation, onto a front view of the graft cylinder and onto the flat
//! unwrapped template that is printed at 1:1 and wrapped around the graft.

pub mod clock;
pub mod error;
pub mod graft;
pub mod projection;
pub mod registry;
pub mod template;
pub mod vessel;

pub use clock::{ClockPosition, Region, UnwrapConvention, UnwrapPlacement};
pub use error::{GraftError, Result};
pub use graft::{GraftSpec, Limits, RangeMm};
pub use projection::{
    LateralMapping, OffTemplatePolicy, ProjectionConvention, RenderedMarker, VerticalOrigin,
    ViewAxis, ViewKind, project, project_all,
};
pub use registry::{Fenestration, FenestrationId, Registry};
pub use template::{Bounds, Gridline, LengthTick, TemplateGeometry};
pub use vessel::{NamedVessel, VesselTag};
