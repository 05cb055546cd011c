// ── Runtime session configuration ──
//
// Describes which services a map session talks to and how its camera and
// geolocation behave. Never touches disk: `schoolmap-config` (or any other
// front end) builds a `MapConfig` and hands it in.

use std::time::Duration;

use url::Url;

use crate::model::Coordinate;

/// Default map centre (Medan city centre).
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 3.5952,
    lng: 98.6722,
};
pub const DEFAULT_ZOOM: u8 = 13;
pub const FOCUS_ZOOM: u8 = 16;

/// Configuration for one map session.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Base URL of the school map API (e.g. `http://localhost:5000/api`).
    pub api_url: Url,
    /// Base URL of the OSRM directions service.
    pub directions_url: Url,
    /// OSRM routing profile.
    pub directions_profile: String,
    /// Request timeout for both services.
    pub timeout: Duration,
    /// Identity sent as `x-user-id` on user-location requests.
    pub user_id: Option<String>,
    pub camera: CameraSettings,
    pub geolocation: GeolocationSettings,
}

impl MapConfig {
    pub fn new(api_url: Url, directions_url: Url) -> Self {
        Self {
            api_url,
            directions_url,
            directions_profile: schoolmap_api::osrm::DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(30),
            user_id: None,
            camera: CameraSettings::default(),
            geolocation: GeolocationSettings::default(),
        }
    }
}

/// Where the camera rests when nothing is focused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub default_center: Coordinate,
    pub default_zoom: u8,
    /// Zoom used when centring on a school or the device.
    pub focus_zoom: u8,
    /// Centre on the device position when nothing else is focused.
    pub follow_device: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            focus_zoom: FOCUS_ZOOM,
            follow_device: false,
        }
    }
}

/// Tuning for the fast fix and the continuous watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationSettings {
    pub fast_fix_timeout: Duration,
    pub fast_fix_max_age: Duration,
    pub watch_max_age: Duration,
    /// Save the first fix of each tracking run via `POST /user-location`.
    pub persist_location: bool,
    /// Fall back to the saved `/user-location` record when the fast fix
    /// fails.
    pub use_saved_fallback: bool,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            fast_fix_timeout: Duration::from_secs(5),
            fast_fix_max_age: Duration::from_secs(30),
            watch_max_age: Duration::from_secs(60),
            persist_location: false,
            use_saved_fallback: true,
        }
    }
}
