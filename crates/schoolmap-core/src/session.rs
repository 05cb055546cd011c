// ── Map session ──
//
// Everything one map view needs for its lifetime: the school store, the
// mode coordinator, the routing session manager, the geolocation tracker
// and the API client. Built when the view mounts and shut down when it
// unmounts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

use schoolmap_api::{ApiClient, OsrmClient, TransportConfig};

use crate::camera::{CameraView, camera_view};
use crate::command::{Command, CommandResult};
use crate::config::MapConfig;
use crate::convert::{regions_from_records, schools_from_records};
use crate::coordinator::ModeCoordinator;
use crate::error::{CoreError, PositionError};
use crate::geolocation::{
    DevicePosition, GeolocationTracker, PositionSource, SavedLocationSource, TrackerHandle,
};
use crate::model::{
    Coordinate, EducationLevel, ModeState, Region, RegionId, RegionStats, RouteOrigin, School,
    SchoolId,
};
use crate::routing::{DirectionsEngine, RoutingSessionManager, SessionToken};
use crate::store::SchoolStore;
use crate::stream::StateStream;
use crate::visibility::{VisibleMarker, compute_visible};

// ── LoadState ────────────────────────────────────────────────────

/// Progress of the initial `/schools` fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Ready,
    Failed(String),
}

// ── MapSession ───────────────────────────────────────────────────

/// Entry point for front ends.
///
/// Cheaply cloneable; clones share the same session.
#[derive(Clone)]
pub struct MapSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: MapConfig,
    api: ApiClient,
    store: Arc<SchoolStore>,
    coordinator: Arc<ModeCoordinator>,
    routing: RoutingSessionManager,
    tracker: GeolocationTracker,
    load_state: watch::Sender<LoadState>,
    /// Serialises `load()` so concurrent callers share one fetch.
    load_lock: tokio::sync::Mutex<()>,
    /// Keeps coordinator epochs and routing sessions opened in the same
    /// order.
    route_lock: Mutex<()>,
    regions: OnceCell<Arc<Vec<Region>>>,
    region_stats: OnceCell<Arc<Vec<RegionStats>>>,
    accredited: OnceCell<Arc<Vec<School>>>,
    tracking: Mutex<Option<TrackerHandle>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MapSession {
    /// Assemble a session from already-built collaborators. Nothing is
    /// fetched until [`load()`](Self::load).
    pub fn new(
        config: MapConfig,
        api: ApiClient,
        engine: Arc<dyn DirectionsEngine>,
        position_source: Arc<dyn PositionSource>,
    ) -> Self {
        let store = Arc::new(SchoolStore::new());
        let coordinator = Arc::new(ModeCoordinator::new(Arc::clone(&store)));
        let mut tracker = GeolocationTracker::new(position_source, config.geolocation);
        if config.geolocation.use_saved_fallback {
            tracker = tracker.with_fallback(Arc::new(SavedLocationSource::new(api.clone())));
        }
        let (load_state, _) = watch::channel(LoadState::NotLoaded);

        Self {
            inner: Arc::new(SessionInner {
                config,
                api,
                store,
                coordinator,
                routing: RoutingSessionManager::new(engine),
                tracker,
                load_state,
                load_lock: tokio::sync::Mutex::new(()),
                route_lock: Mutex::new(()),
                regions: OnceCell::new(),
                region_stats: OnceCell::new(),
                accredited: OnceCell::new(),
                tracking: Mutex::new(None),
            }),
        }
    }

    /// Build the HTTP clients described by `config` and assemble a
    /// session around them, routing through OSRM.
    pub fn from_config(
        config: MapConfig,
        position_source: Arc<dyn PositionSource>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        let api = ApiClient::new(
            config.api_url.clone(),
            config.user_id.as_deref(),
            &transport,
        )?;
        let engine = OsrmClient::new(
            config.directions_url.clone(),
            config.directions_profile.clone(),
            &transport,
        )?;
        Ok(Self::new(config, api, Arc::new(engine), position_source))
    }

    pub fn config(&self) -> &MapConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<SchoolStore> {
        &self.inner.store
    }

    pub fn coordinator(&self) -> &Arc<ModeCoordinator> {
        &self.inner.coordinator
    }

    // ── Data ─────────────────────────────────────────────────────

    /// Fetch `/schools` into the store. Once it has succeeded, further
    /// calls return the loaded count without refetching; after a failure
    /// the next call retries.
    ///
    /// A failure is also published as [`LoadState::Failed`]; the session
    /// stays usable with an empty store.
    pub async fn load(&self) -> Result<usize, CoreError> {
        let _guard = self.inner.load_lock.lock().await;
        let ready = matches!(*self.inner.load_state.borrow(), LoadState::Ready);
        if ready {
            return Ok(self.inner.store.len());
        }

        self.inner.load_state.send_replace(LoadState::Loading);
        match self.inner.api.list_schools().await {
            Ok(records) => {
                let count = self.inner.store.load(schools_from_records(records));
                info!(count, "schools loaded");
                self.inner.load_state.send_replace(LoadState::Ready);
                Ok(count)
            }
            Err(e) => {
                let err = CoreError::upstream("schools", e);
                warn!(error = %err, "school load failed");
                self.inner
                    .load_state
                    .send_replace(LoadState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.inner.load_state.borrow().clone()
    }

    pub fn subscribe_load_state(&self) -> StateStream<LoadState> {
        StateStream::new(self.inner.load_state.subscribe())
    }

    /// Region boundaries, fetched on first use.
    pub async fn regions(&self) -> Result<Arc<Vec<Region>>, CoreError> {
        self.inner
            .regions
            .get_or_try_init(|| async {
                let records = self
                    .inner
                    .api
                    .list_regions()
                    .await
                    .map_err(|e| CoreError::upstream("regions", e))?;
                let regions = regions_from_records(records);
                debug!(count = regions.len(), "regions loaded");
                Ok(Arc::new(regions))
            })
            .await
            .cloned()
    }

    /// Per-region school counts, fetched on first use.
    pub async fn region_stats(&self) -> Result<Arc<Vec<RegionStats>>, CoreError> {
        self.inner
            .region_stats
            .get_or_try_init(|| async {
                let records = self
                    .inner
                    .api
                    .list_region_stats()
                    .await
                    .map_err(|e| CoreError::upstream("region stats", e))?;
                Ok(Arc::new(records.into_iter().map(RegionStats::from).collect()))
            })
            .await
            .cloned()
    }

    /// Grade-A schools, fetched on first use. Independent of the store.
    pub async fn accredited_schools(&self) -> Result<Arc<Vec<School>>, CoreError> {
        self.inner
            .accredited
            .get_or_try_init(|| async {
                let records = self
                    .inner
                    .api
                    .list_accredited_schools()
                    .await
                    .map_err(|e| CoreError::upstream("accredited schools", e))?;
                Ok(Arc::new(schools_from_records(records)))
            })
            .await
            .cloned()
    }

    // ── Focus & filters ──────────────────────────────────────────

    pub fn select_entity(&self, id: &SchoolId) -> bool {
        self.inner.coordinator.select_entity(id)
    }

    pub fn clear_selection(&self) {
        self.inner.coordinator.clear_selection();
    }

    pub fn set_category_filter(&self, filter: Option<EducationLevel>) {
        self.inner.coordinator.set_category_filter(filter);
    }

    pub fn set_region_filter(&self, filter: Option<RegionId>) {
        self.inner.coordinator.set_region_filter(filter);
    }

    pub fn set_device_position(&self, position: Coordinate) {
        self.inner.coordinator.set_device_position(position);
    }

    // ── Search ───────────────────────────────────────────────────

    /// Loaded schools whose name or address contains `query`, ignoring
    /// case, within the active region and category filters. Pick a result
    /// with [`MapSession::select_entity`].
    pub fn search(&self, query: &str) -> Vec<Arc<School>> {
        let found = self.inner.store.search(query, &self.state());
        debug!(query, hits = found.len(), "school search");
        found
    }

    /// Leave the result picked from a search. Drops the selection, so the
    /// camera goes back to the default view unless a route or the device
    /// holds it.
    pub fn clear_search(&self) {
        self.clear_selection();
    }

    // ── Routing ──────────────────────────────────────────────────

    /// Set the route endpoints and open a routing session for them.
    ///
    /// The itinerary (or `route_error`) lands in the mode state when the
    /// engine answers, unless the endpoints changed in the meantime.
    /// Returns `Ok(None)` when an endpoint is not a known school: the
    /// endpoints are recorded but no session is opened.
    pub fn create_route(
        &self,
        origin: RouteOrigin,
        destination: SchoolId,
    ) -> Result<Option<SessionToken>, CoreError> {
        let _order = lock(&self.inner.route_lock);
        let Some(request) = self.inner.coordinator.create_route(origin, destination)? else {
            self.inner.routing.close_route();
            return Ok(None);
        };

        let coordinator = Arc::clone(&self.inner.coordinator);
        let epoch = request.epoch;
        let token = self
            .inner
            .routing
            .open_route(request.origin, request.destination, move |outcome| {
                match outcome {
                    Ok(itinerary) => coordinator.apply_route(epoch, itinerary),
                    Err(e) => coordinator.record_route_failure(epoch, &e),
                };
            });
        Ok(Some(token))
    }

    /// Drop the route and close its session. Safe to call when idle.
    pub fn clear_route(&self) {
        let _order = lock(&self.inner.route_lock);
        self.inner.coordinator.clear_route();
        self.inner.routing.close_route();
    }

    /// Apply a [`Command`].
    pub fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        debug!(?command, "executing command");
        match command {
            Command::SelectEntity(id) => Ok(CommandResult::Selected(self.select_entity(&id))),
            Command::ClearSelection => {
                self.clear_selection();
                Ok(CommandResult::Ok)
            }
            Command::SetCategoryFilter(filter) => {
                self.set_category_filter(filter);
                Ok(CommandResult::Ok)
            }
            Command::SetRegionFilter(filter) => {
                self.set_region_filter(filter);
                Ok(CommandResult::Ok)
            }
            Command::CreateRoute {
                origin,
                destination,
            } => self
                .create_route(origin, destination)
                .map(CommandResult::RouteOpened),
            Command::ClearRoute => {
                self.clear_route();
                Ok(CommandResult::Ok)
            }
            Command::SetDevicePosition(position) => {
                self.set_device_position(position);
                Ok(CommandResult::Ok)
            }
            Command::Reset => {
                self.reset();
                Ok(CommandResult::Ok)
            }
        }
    }

    /// Close the route and return the mode state to its defaults.
    /// Tracking keeps running.
    pub fn reset(&self) {
        let _order = lock(&self.inner.route_lock);
        self.inner.routing.close_route();
        self.inner.coordinator.reset();
    }

    // ── Geolocation ──────────────────────────────────────────────

    /// Start feeding device positions into the mode state, replacing any
    /// tracking already running.
    pub fn start_tracking(&self) -> TrackerHandle {
        let coordinator = Arc::clone(&self.inner.coordinator);
        let persist = self
            .inner
            .config
            .geolocation
            .persist_location
            .then(|| self.inner.api.clone());
        let persisted = AtomicBool::new(false);

        let on_update = move |position: DevicePosition| {
            coordinator.set_device_position(position.coordinate);
            if let Some(api) = persist
                .as_ref()
                .filter(|_| !persisted.swap(true, Ordering::Relaxed))
            {
                spawn_save_location(api.clone(), position.coordinate);
            }
        };
        let errors = Arc::clone(&self.inner.coordinator);
        let on_error = move |e: PositionError| errors.record_location_error(e.to_string());

        let handle = self.inner.tracker.start(on_update, on_error);
        *lock(&self.inner.tracking) = Some(handle);
        handle
    }

    pub fn stop_tracking(&self) {
        if let Some(handle) = lock(&self.inner.tracking).take() {
            self.inner.tracker.stop(handle);
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.inner.tracker.is_active()
    }

    // ── Views ────────────────────────────────────────────────────

    pub fn state(&self) -> ModeState {
        self.inner.coordinator.state()
    }

    pub fn subscribe(&self) -> StateStream<ModeState> {
        self.inner.coordinator.subscribe()
    }

    /// Markers to draw for the current state.
    pub fn visible(&self) -> Vec<VisibleMarker> {
        compute_visible(&self.inner.store.all(), &self.state())
    }

    pub fn camera(&self) -> CameraView {
        camera_view(&self.state(), &self.inner.store, &self.inner.config.camera)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Close the route, stop tracking and reset the mode state.
    pub fn shutdown(&self) {
        self.stop_tracking();
        self.inner.tracker.stop_all();
        self.reset();
        info!("map session shut down");
    }
}

/// Persist a fix in the background. Failures are only logged.
fn spawn_save_location(api: ApiClient, position: Coordinate) {
    tokio::spawn(async move {
        match api.save_user_location(position.lat, position.lng).await {
            Ok(_) => debug!(%position, "location saved"),
            Err(e) => warn!(error = %e, "failed to save location"),
        }
    });
}
