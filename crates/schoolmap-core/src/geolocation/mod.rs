// ── Geolocation tracker ──
//
// Keeps at most one position watch alive per tracker. Each `start()` runs a
// quick low-accuracy fix alongside a continuous high-accuracy watch, and
// falls back to a secondary source when the quick fix fails.

mod source;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::GeolocationSettings;
use crate::error::PositionError;

pub use source::{
    DevicePosition, FixedPositionSource, NoDeviceSource, PositionOptions, PositionSource,
    PositionUpdate, PositionWatch, SavedLocationSource, WatchId,
};

/// Identifies one `start()` call. Stale handles are ignored by `stop()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackerHandle(u64);

impl fmt::Display for TrackerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tracker-{}", self.0)
    }
}

struct ActiveWatch {
    handle: TrackerHandle,
    watch_id: WatchId,
    cancel: CancellationToken,
    /// Flipped to `false` on stop. Delivery holds this lock, so once the
    /// flip completes no callback from this watch can run.
    live: Arc<Mutex<bool>>,
}

#[derive(Default)]
struct TrackerState {
    last_handle: u64,
    active: Option<ActiveWatch>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` only while the watch is live.
fn deliver(live: &Mutex<bool>, f: impl FnOnce()) -> bool {
    let guard = lock(live);
    if !*guard {
        return false;
    }
    f();
    true
}

pub struct GeolocationTracker {
    source: Arc<dyn PositionSource>,
    fallback: Option<Arc<dyn PositionSource>>,
    settings: GeolocationSettings,
    state: Mutex<TrackerState>,
}

impl GeolocationTracker {
    pub fn new(source: Arc<dyn PositionSource>, settings: GeolocationSettings) -> Self {
        Self {
            source,
            fallback: None,
            settings,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// Consulted once per `start()` when the quick fix fails.
    pub fn with_fallback(mut self, fallback: Arc<dyn PositionSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Begin tracking, replacing any watch this tracker already runs.
    ///
    /// `on_update` receives the quick fix and every watch update.
    /// `on_error` fires at most once, when neither the quick fix nor the
    /// fallback produced a position. Callbacks run on runtime workers and
    /// must not call back into this tracker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<U, E>(&self, on_update: U, on_error: E) -> TrackerHandle
    where
        U: Fn(DevicePosition) + Send + Sync + 'static,
        E: FnOnce(PositionError) + Send + 'static,
    {
        let mut state = lock(&self.state);
        if let Some(prev) = state.active.take() {
            debug!(handle = %prev.handle, "replacing position watch");
            self.teardown(prev);
        }

        state.last_handle += 1;
        let handle = TrackerHandle(state.last_handle);
        let watch = self
            .source
            .watch_position(PositionOptions::watch(&self.settings));
        let watch_id = watch.id;
        let cancel = CancellationToken::new();
        let live = Arc::new(Mutex::new(true));
        let on_update = Arc::new(on_update);

        self.spawn_fast_fix(
            handle,
            cancel.clone(),
            Arc::clone(&live),
            Arc::clone(&on_update),
            on_error,
        );
        spawn_watch(watch, cancel.clone(), Arc::clone(&live), on_update);

        state.active = Some(ActiveWatch {
            handle,
            watch_id,
            cancel,
            live,
        });
        info!(%handle, watch = %watch_id, "position tracking started");
        handle
    }

    /// Stop the watch started under `handle`. Stale or repeated handles
    /// are ignored. No callback from that watch runs after this returns.
    pub fn stop(&self, handle: TrackerHandle) {
        let mut state = lock(&self.state);
        match state.active.take() {
            Some(active) if active.handle == handle => {
                self.teardown(active);
                info!(%handle, "position tracking stopped");
            }
            other => {
                debug!(%handle, "stop ignored: handle not active");
                state.active = other;
            }
        }
    }

    /// Stop whatever watch is running.
    pub fn stop_all(&self) {
        if let Some(active) = lock(&self.state).active.take() {
            let handle = active.handle;
            self.teardown(active);
            info!(%handle, "position tracking stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).active.is_some()
    }

    fn teardown(&self, active: ActiveWatch) {
        *lock(&active.live) = false;
        active.cancel.cancel();
        self.source.clear_watch(active.watch_id);
    }

    fn spawn_fast_fix<U, E>(
        &self,
        handle: TrackerHandle,
        cancel: CancellationToken,
        live: Arc<Mutex<bool>>,
        on_update: Arc<U>,
        on_error: E,
    ) where
        U: Fn(DevicePosition) + Send + Sync + 'static,
        E: FnOnce(PositionError) + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let fallback = self.fallback.clone();
        let options = PositionOptions::fast_fix(&self.settings);

        tokio::spawn(async move {
            let fix = tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                fix = fast_fix(source.as_ref(), fallback.as_deref(), options) => fix,
            };
            match fix {
                Ok(position) => {
                    debug!(%handle, position = %position.coordinate, "quick fix");
                    deliver(&live, || on_update(position));
                }
                Err(e) => {
                    warn!(%handle, error = %e, "no position available");
                    deliver(&live, || on_error(e));
                }
            }
        });
    }
}

impl Drop for GeolocationTracker {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// One request against `source`, bounded by the options' timeout, then
/// one best-effort request against `fallback`. The original error is
/// returned when both fail.
async fn fast_fix(
    source: &dyn PositionSource,
    fallback: Option<&dyn PositionSource>,
    options: PositionOptions,
) -> PositionUpdate {
    let first = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, source.current_position(options))
            .await
            .unwrap_or(Err(PositionError::Timeout)),
        None => source.current_position(options).await,
    };
    let err = match first {
        Ok(position) => return Ok(position),
        Err(e) => e,
    };

    let Some(fallback) = fallback else {
        return Err(err);
    };
    debug!(error = %err, "quick fix failed, trying fallback source");
    match fallback.current_position(options).await {
        Ok(position) => {
            info!("using fallback position");
            Ok(position)
        }
        Err(fallback_err) => {
            debug!(error = %fallback_err, "fallback source failed");
            Err(err)
        }
    }
}

fn spawn_watch<U>(
    watch: PositionWatch,
    cancel: CancellationToken,
    live: Arc<Mutex<bool>>,
    on_update: Arc<U>,
) where
    U: Fn(DevicePosition) + Send + Sync + 'static,
{
    let PositionWatch { id, mut updates } = watch;
    tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                next = updates.recv() => next,
            };
            match next {
                Some(Ok(position)) => {
                    if !deliver(&live, || on_update(position)) {
                        break;
                    }
                }
                Some(Err(e)) => warn!(watch = %id, error = %e, "position watch error"),
                None => {
                    debug!(watch = %id, "position watch ended");
                    break;
                }
            }
        }
    });
}
