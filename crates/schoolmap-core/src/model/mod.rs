// ── Domain model ──
//
// Canonical types consumed by the coordinator, the visibility filter and
// every front end. Wire records from `schoolmap-api` are converted into
// these in `convert`.

pub mod coordinate;
pub mod ids;
pub mod itinerary;
pub mod mode;
pub mod region;
pub mod school;

pub use coordinate::Coordinate;
pub use ids::{RegionId, SchoolId};
pub use itinerary::{Itinerary, ManeuverType, RouteStep};
pub use mode::{ModeState, RouteOrigin};
pub use region::{Boundary, CategoryCounts, Region, RegionStats, Ring};
pub use school::{Accreditation, EducationLevel, School};
