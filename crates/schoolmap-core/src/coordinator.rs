// ── Mode coordinator ──
//
// Single owner of `ModeState`. Every transition is one
// `send_if_modified` call, so transitions are atomic, apply in call order
// and publish at most one change notification each.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{
    Coordinate, EducationLevel, Itinerary, ModeState, RegionId, RouteOrigin, SchoolId,
};
use crate::store::SchoolStore;
use crate::stream::StateStream;

/// Resolved waypoints for a routing session, tagged with the route epoch
/// they were produced under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub epoch: u64,
    pub origin: Coordinate,
    pub destination: Coordinate,
}

/// Holds the mode state and enforces its transition rules.
pub struct ModeCoordinator {
    state: watch::Sender<ModeState>,
    store: Arc<SchoolStore>,
}

impl ModeCoordinator {
    pub fn new(store: Arc<SchoolStore>) -> Self {
        let (state, _) = watch::channel(ModeState::default());
        Self { state, store }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ModeState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<ModeState> {
        StateStream::new(self.state.subscribe())
    }

    // ── Focus & filters ──────────────────────────────────────────────

    /// Focus a single school. Unknown ids are ignored and return `false`.
    pub fn select_entity(&self, id: &SchoolId) -> bool {
        if !self.store.contains(id) {
            debug!(school = %id, "select ignored: not in store");
            return false;
        }
        self.state.send_if_modified(|s| {
            if s.selected.as_ref() == Some(id) {
                return false;
            }
            s.selected = Some(id.clone());
            true
        });
        true
    }

    pub fn clear_selection(&self) {
        self.state.send_if_modified(|s| s.selected.take().is_some());
    }

    pub fn set_category_filter(&self, filter: Option<EducationLevel>) {
        self.state.send_if_modified(|s| {
            if s.category_filter == filter {
                return false;
            }
            s.category_filter = filter;
            true
        });
    }

    pub fn set_region_filter(&self, filter: Option<RegionId>) {
        self.state.send_if_modified(|s| {
            if s.region_filter == filter {
                return false;
            }
            s.region_filter = filter;
            true
        });
    }

    // ── Device position ──────────────────────────────────────────────

    /// Record a new device position. An active route is left as is even
    /// when it starts at the device.
    pub fn set_device_position(&self, position: Coordinate) {
        self.state.send_if_modified(|s| {
            if s.device_position == Some(position) && s.location_error.is_none() {
                return false;
            }
            s.device_position = Some(position);
            s.location_error = None;
            true
        });
    }

    pub fn record_location_error(&self, message: String) {
        self.state.send_if_modified(|s| {
            if s.location_error.as_deref() == Some(message.as_str()) {
                return false;
            }
            s.location_error = Some(message);
            true
        });
    }

    // ── Routing ──────────────────────────────────────────────────────

    /// Set both route endpoints.
    ///
    /// Fails with [`CoreError::LocationUnavailable`] and leaves the state
    /// untouched when the origin is the device and no position is known.
    /// Otherwise the previous itinerary and route error are cleared and the
    /// route epoch advances. Returns the resolved waypoints, or `None` when
    /// an endpoint names a school that is not in the store.
    pub fn create_route(
        &self,
        origin: RouteOrigin,
        destination: SchoolId,
    ) -> Result<Option<RouteRequest>, CoreError> {
        let mut outcome = Err(CoreError::LocationUnavailable);
        self.state.send_if_modified(|s| {
            let origin_point = match origin {
                RouteOrigin::DeviceLocation => match s.device_position {
                    Some(p) => Some(p),
                    None => return false,
                },
                RouteOrigin::School(ref id) => self.store.position_of(id),
            };
            let destination_point = self.store.position_of(&destination);

            s.route_epoch += 1;
            s.route_origin = Some(origin.clone());
            s.route_destination = Some(destination.clone());
            s.active_route = None;
            s.route_error = None;

            outcome = Ok(match (origin_point, destination_point) {
                (Some(origin), Some(destination)) => Some(RouteRequest {
                    epoch: s.route_epoch,
                    origin,
                    destination,
                }),
                _ => {
                    debug!(epoch = s.route_epoch, "route endpoint not in store; no session");
                    None
                }
            });
            true
        });
        outcome
    }

    /// Drop both endpoints, the itinerary and any route error.
    pub fn clear_route(&self) {
        self.state.send_if_modified(|s| {
            if s.route_origin.is_none()
                && s.route_destination.is_none()
                && s.active_route.is_none()
                && s.route_error.is_none()
            {
                return false;
            }
            s.route_epoch += 1;
            s.route_origin = None;
            s.route_destination = None;
            s.active_route = None;
            s.route_error = None;
            true
        });
    }

    /// Install an itinerary computed for `epoch`. Returns `false` (and
    /// changes nothing) if the endpoints have changed since.
    pub fn apply_route(&self, epoch: u64, itinerary: Itinerary) -> bool {
        self.state.send_if_modified(|s| {
            if s.route_epoch != epoch || !s.is_routing() {
                debug!(epoch, current = s.route_epoch, "dropping stale itinerary");
                return false;
            }
            s.active_route = Some(Arc::new(itinerary));
            s.route_error = None;
            true
        })
    }

    /// Record a routing failure for `epoch`. Endpoints are kept so the
    /// user can retry or pick another destination.
    pub fn record_route_failure(&self, epoch: u64, error: &CoreError) -> bool {
        self.state.send_if_modified(|s| {
            if s.route_epoch != epoch || !s.is_routing() {
                debug!(epoch, current = s.route_epoch, "dropping stale route failure");
                return false;
            }
            s.active_route = None;
            s.route_error = Some(error.to_string());
            true
        })
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Return every field to its default. The route epoch still advances
    /// so late results for the old endpoints are rejected.
    pub fn reset(&self) {
        self.state.send_if_modified(|s| {
            let epoch = s.route_epoch + 1;
            let changed = *s
                != ModeState {
                    route_epoch: s.route_epoch,
                    ..ModeState::default()
                };
            *s = ModeState {
                route_epoch: epoch,
                ..ModeState::default()
            };
            changed
        });
    }
}
