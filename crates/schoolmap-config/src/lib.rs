//! Shared configuration for schoolmap tools.
//!
//! A TOML file layered over built-in defaults and `SCHOOLMAP_` environment
//! variables, validated and translated into `schoolmap_core::MapConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use schoolmap_core::{CameraSettings, Coordinate, GeolocationSettings, MapConfig};

pub const ENV_PREFIX: &str = "SCHOOLMAP_";
const MAX_ZOOM: u8 = 22;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// School map API base URL, including the `/api` prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// OSRM service base URL.
    #[serde(default = "default_directions_url")]
    pub directions_url: String,

    #[serde(default = "default_profile")]
    pub directions_profile: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Identity sent as `x-user-id` when saving or reading the user location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default)]
    pub map: MapSection,

    #[serde(default)]
    pub geolocation: GeolocationSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            directions_url: default_directions_url(),
            directions_profile: default_profile(),
            timeout_secs: default_timeout(),
            user_id: None,
            map: MapSection::default(),
            geolocation: GeolocationSection::default(),
        }
    }
}

/// `[map]`: camera placement.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MapSection {
    /// `[lat, lng]`.
    #[serde(default = "default_center")]
    pub default_center: [f64; 2],
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
    #[serde(default = "focus_zoom")]
    pub focus_zoom: u8,
    #[serde(default)]
    pub follow_device: bool,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            default_zoom: default_zoom(),
            focus_zoom: focus_zoom(),
            follow_device: false,
        }
    }
}

/// `[geolocation]`: quick fix and watch tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeolocationSection {
    #[serde(default = "fast_fix_timeout_ms")]
    pub fast_fix_timeout_ms: u64,
    #[serde(default = "fast_fix_max_age_secs")]
    pub fast_fix_max_age_secs: u64,
    #[serde(default = "watch_max_age_secs")]
    pub watch_max_age_secs: u64,
    #[serde(default)]
    pub persist_location: bool,
    #[serde(default = "enabled")]
    pub use_saved_fallback: bool,
}

impl Default for GeolocationSection {
    fn default() -> Self {
        Self {
            fast_fix_timeout_ms: fast_fix_timeout_ms(),
            fast_fix_max_age_secs: fast_fix_max_age_secs(),
            watch_max_age_secs: watch_max_age_secs(),
            persist_location: false,
            use_saved_fallback: true,
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:3000/api".into()
}
fn default_directions_url() -> String {
    "https://router.project-osrm.org".into()
}
fn default_profile() -> String {
    "driving".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_center() -> [f64; 2] {
    [3.5952, 98.6722]
}
fn default_zoom() -> u8 {
    13
}
fn focus_zoom() -> u8 {
    16
}
fn fast_fix_timeout_ms() -> u64 {
    5_000
}
fn fast_fix_max_age_secs() -> u64 {
    30
}
fn watch_max_age_secs() -> u64 {
    60
}
fn enabled() -> bool {
    true
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "petasekolah", "schoolmap").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("schoolmap");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `SCHOOLMAP_*` variables.
///
/// Nested keys use a double underscore: `SCHOOLMAP_MAP__FOLLOW_DEVICE`.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the config from `path`, or from [`config_path()`] when `None`.
/// A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let default_path;
    let path = match path {
        Some(p) => p,
        None => {
            default_path = config_path();
            &default_path
        }
    };
    Ok(figment(path).extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent
/// directories as needed.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw
        .parse()
        .map_err(|e| invalid(field, format!("invalid URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(field, format!("expected http or https, got {raw:?}")));
    }
    Ok(url)
}

fn check_zoom(field: &str, zoom: u8) -> Result<u8, ConfigError> {
    if zoom > MAX_ZOOM {
        return Err(invalid(field, format!("zoom must be at most {MAX_ZOOM}, got {zoom}")));
    }
    Ok(zoom)
}

impl Config {
    /// Validate and build the runtime configuration for a map session.
    pub fn to_map_config(&self) -> Result<MapConfig, ConfigError> {
        let api_url = parse_url("api_url", &self.api_url)?;
        let directions_url = parse_url("directions_url", &self.directions_url)?;

        if self.directions_profile.trim().is_empty() {
            return Err(invalid("directions_profile", "must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than zero"));
        }

        let [lat, lng] = self.map.default_center;
        let default_center = Coordinate::new(lat, lng)
            .map_err(|e| invalid("map.default_center", e.to_string()))?;
        let camera = CameraSettings {
            default_center,
            default_zoom: check_zoom("map.default_zoom", self.map.default_zoom)?,
            focus_zoom: check_zoom("map.focus_zoom", self.map.focus_zoom)?,
            follow_device: self.map.follow_device,
        };

        let geo = &self.geolocation;
        if geo.fast_fix_timeout_ms == 0 {
            return Err(invalid(
                "geolocation.fast_fix_timeout_ms",
                "must be greater than zero",
            ));
        }
        let geolocation = GeolocationSettings {
            fast_fix_timeout: Duration::from_millis(geo.fast_fix_timeout_ms),
            fast_fix_max_age: Duration::from_secs(geo.fast_fix_max_age_secs),
            watch_max_age: Duration::from_secs(geo.watch_max_age_secs),
            persist_location: geo.persist_location,
            use_saved_fallback: geo.use_saved_fallback,
        };

        let mut config = MapConfig::new(api_url, directions_url);
        config.directions_profile = self.directions_profile.trim().to_owned();
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.user_id = self
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned);
        config.camera = camera;
        config.geolocation = geolocation;
        Ok(config)
    }
}
