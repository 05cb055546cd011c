// ── Position sources ──
//
// The platform adapter boundary for geolocation. A source answers one-shot
// position requests and runs continuous watches identified by `WatchId`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use schoolmap_api::ApiClient;

use crate::config::GeolocationSettings;
use crate::error::PositionError;
use crate::model::Coordinate;

const WATCH_BUFFER: usize = 16;

/// Request options, modelled on what platform location services accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Oldest cached fix the source may answer with.
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// Low accuracy, short timeout, cached fixes welcome.
    pub fn fast_fix(settings: &GeolocationSettings) -> Self {
        Self {
            high_accuracy: false,
            timeout: Some(settings.fast_fix_timeout),
            maximum_age: settings.fast_fix_max_age,
        }
    }

    /// High accuracy with no timeout.
    pub fn watch(settings: &GeolocationSettings) -> Self {
        Self {
            high_accuracy: true,
            timeout: None,
            maximum_age: settings.watch_max_age,
        }
    }
}

/// One position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePosition {
    pub coordinate: Coordinate,
    /// Accuracy radius in metres, when the source reports one.
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl DevicePosition {
    pub fn now(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            accuracy: None,
            timestamp: Utc::now(),
        }
    }
}

/// Identifies a running watch on its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

impl WatchId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch-{}", self.0)
    }
}

pub type PositionUpdate = Result<DevicePosition, PositionError>;

/// A running watch. The source closes `updates` when it stops producing.
#[derive(Debug)]
pub struct PositionWatch {
    pub id: WatchId,
    pub updates: mpsc::Receiver<PositionUpdate>,
}

/// A platform location service.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// A single position request honouring `options`.
    async fn current_position(&self, options: PositionOptions) -> PositionUpdate;

    /// Register a continuous watch.
    fn watch_position(&self, options: PositionOptions) -> PositionWatch;

    /// Unregister a watch. Unknown ids are ignored.
    fn clear_watch(&self, id: WatchId);
}

// ── Saved location ─────────────────────────────────────────────────

/// Answers with the position last saved through `POST /user-location`.
///
/// Watches end immediately: a saved record never moves.
pub struct SavedLocationSource {
    api: ApiClient,
    next_watch: AtomicU64,
}

impl SavedLocationSource {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            next_watch: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl PositionSource for SavedLocationSource {
    async fn current_position(&self, _options: PositionOptions) -> PositionUpdate {
        let record = match self.api.get_user_location().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("no saved location");
                return Err(PositionError::Unavailable);
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch saved location");
                return Err(PositionError::Unavailable);
            }
        };
        let timestamp = record.recorded_at().unwrap_or_else(Utc::now);
        let coordinate = Coordinate::try_from(record).map_err(|e| {
            warn!(error = %e, "saved location is invalid");
            PositionError::Unavailable
        })?;
        Ok(DevicePosition {
            coordinate,
            accuracy: None,
            timestamp,
        })
    }

    fn watch_position(&self, _options: PositionOptions) -> PositionWatch {
        let (_, updates) = mpsc::channel(1);
        PositionWatch {
            id: WatchId(self.next_watch.fetch_add(1, Ordering::Relaxed)),
            updates,
        }
    }

    fn clear_watch(&self, _id: WatchId) {}
}

// ── Fixed position ─────────────────────────────────────────────────

/// Always reports the same position. Used when the caller supplies its
/// location explicitly.
pub struct FixedPositionSource {
    position: Coordinate,
    next_watch: AtomicU64,
}

impl FixedPositionSource {
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            next_watch: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn current_position(&self, _options: PositionOptions) -> PositionUpdate {
        Ok(DevicePosition::now(self.position))
    }

    fn watch_position(&self, _options: PositionOptions) -> PositionWatch {
        let (tx, updates) = mpsc::channel(WATCH_BUFFER);
        // Capacity is non-zero and the receiver is alive, so this cannot fail.
        let _ = tx.try_send(Ok(DevicePosition::now(self.position)));
        PositionWatch {
            id: WatchId(self.next_watch.fetch_add(1, Ordering::Relaxed)),
            updates,
        }
    }

    fn clear_watch(&self, _id: WatchId) {}
}

// ── No device ──────────────────────────────────────────────────────

/// A host without location hardware. Every request fails with
/// [`PositionError::Unavailable`], leaving the tracker to its fallback.
#[derive(Debug, Default)]
pub struct NoDeviceSource {
    next_watch: AtomicU64,
}

#[async_trait]
impl PositionSource for NoDeviceSource {
    async fn current_position(&self, _options: PositionOptions) -> PositionUpdate {
        Err(PositionError::Unavailable)
    }

    fn watch_position(&self, _options: PositionOptions) -> PositionWatch {
        let (_, updates) = mpsc::channel(1);
        PositionWatch {
            id: WatchId(self.next_watch.fetch_add(1, Ordering::Relaxed) + 1),
            updates,
        }
    }

    fn clear_watch(&self, _id: WatchId) {}
}
