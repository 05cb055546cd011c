//! Map state coordination for the school map, between `schoolmap-api` and
//! front ends (CLI or any UI).
//!
//! This crate owns the rules of the map view and the async work behind it:
//!
//! - **[`MapSession`]**: facade for one map view. Loads schools into the
//!   [`SchoolStore`], opens routing sessions, runs geolocation tracking and
//!   vends the current markers and camera placement.
//!
//! - **[`ModeCoordinator`]**: the single owner of [`ModeState`] (selection,
//!   category and region filters, route endpoints, active itinerary,
//!   device position). Every transition is atomic and publishes one
//!   change notification through a [`StateStream`].
//!
//! - **[`RoutingSessionManager`]**: keeps one route request in flight
//!   against a [`DirectionsEngine`] and makes superseded results inert.
//!
//! - **[`GeolocationTracker`]**: one position watch at a time over a
//!   [`PositionSource`], with a quick fix and a fallback source.
//!
//! - **Visibility, search and camera** ([`compute_visible`],
//!   [`search_schools`], [`camera_view`]): pure functions of the mode state
//!   and the store.

pub mod camera;
pub mod command;
pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod routing;
pub mod search;
pub mod session;
pub mod store;
pub mod stream;
pub mod visibility;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use camera::{CameraView, camera_view};
pub use command::{Command, CommandResult};
pub use config::{CameraSettings, GeolocationSettings, MapConfig};
pub use coordinator::{ModeCoordinator, RouteRequest};
pub use error::{CoreError, PositionError};
pub use geolocation::{
    DevicePosition, FixedPositionSource, GeolocationTracker, NoDeviceSource, PositionOptions,
    PositionSource, SavedLocationSource, TrackerHandle,
};
pub use routing::{DirectionsEngine, RouteOutcome, RoutingSessionManager, SessionToken};
pub use search::search_schools;
pub use session::{LoadState, MapSession};
pub use store::SchoolStore;
pub use stream::{StateStream, StateWatchStream};
pub use visibility::{MarkerVariant, VisibleMarker, compute_visible};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Accreditation, Boundary, CategoryCounts, Coordinate, EducationLevel, Itinerary, ManeuverType,
    ModeState, Region, RegionId, RegionStats, RouteOrigin, RouteStep, School, SchoolId,
};
