// ── Mode state ──
//
// Working memory of the map view: what is focused, filtered and routed.
// Only the coordinator mutates it.

use serde::Serialize;
use std::sync::Arc;

use super::coordinate::Coordinate;
use super::ids::{RegionId, SchoolId};
use super::itinerary::Itinerary;
use super::school::EducationLevel;

/// Where a route starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RouteOrigin {
    /// The device's current position.
    DeviceLocation,
    School(SchoolId),
}

impl RouteOrigin {
    pub fn school(&self) -> Option<&SchoolId> {
        match self {
            Self::School(id) => Some(id),
            Self::DeviceLocation => None,
        }
    }
}

impl From<SchoolId> for RouteOrigin {
    fn from(id: SchoolId) -> Self {
        Self::School(id)
    }
}

/// Snapshot of the map view's mode.
///
/// `active_route` is only ever `Some` while both endpoints are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModeState {
    pub selected: Option<SchoolId>,
    pub category_filter: Option<EducationLevel>,
    pub region_filter: Option<RegionId>,
    pub route_origin: Option<RouteOrigin>,
    pub route_destination: Option<SchoolId>,
    pub active_route: Option<Arc<Itinerary>>,
    pub device_position: Option<Coordinate>,
    /// Last routing failure for the current endpoints.
    pub route_error: Option<String>,
    /// Last geolocation failure.
    pub location_error: Option<String>,

    /// Bumped whenever the route endpoints change or are cleared.
    #[serde(skip)]
    pub(crate) route_epoch: u64,
}

impl ModeState {
    /// Both route endpoints are set.
    pub fn is_routing(&self) -> bool {
        self.route_origin.is_some() && self.route_destination.is_some()
    }

    pub fn route_epoch(&self) -> u64 {
        self.route_epoch
    }

    /// Whether `id` is one of the route endpoints.
    pub fn is_route_endpoint(&self, id: &SchoolId) -> bool {
        self.route_destination.as_ref() == Some(id)
            || self
                .route_origin
                .as_ref()
                .and_then(RouteOrigin::school)
                .is_some_and(|o| o == id)
    }
}
