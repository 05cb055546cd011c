// ── Core error types ──
//
// User-facing errors from schoolmap-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<schoolmap_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Why a position request failed. Mirrors the three failure codes a
/// platform location service reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    Unavailable,

    #[error("timed out waiting for a position fix")]
    Timeout,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Routing ──────────────────────────────────────────────────────
    #[error("Device location is not available")]
    LocationUnavailable,

    #[error("No route found between the selected points")]
    RouteNotFound,

    #[error("Routing engine error: {message}")]
    RoutingEngine { message: String },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("School not found: {identifier}")]
    EntityNotFound { identifier: String },

    #[error("Failed to fetch {resource}: {message}")]
    UpstreamFetch { resource: String, message: String },

    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    // ── Geolocation ──────────────────────────────────────────────────
    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap an API error as a failed fetch of a named resource, keeping
    /// the routing-specific variants intact.
    pub fn upstream(resource: &str, err: schoolmap_api::Error) -> Self {
        match Self::from(err) {
            Self::UpstreamFetch { message, .. } => Self::UpstreamFetch {
                resource: resource.to_owned(),
                message,
            },
            other => other,
        }
    }

    /// Returns `true` for failures a routing session reports back as
    /// `route_error` rather than propagating.
    pub fn is_route_failure(&self) -> bool {
        matches!(self, Self::RouteNotFound | Self::RoutingEngine { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<schoolmap_api::Error> for CoreError {
    fn from(err: schoolmap_api::Error) -> Self {
        match err {
            schoolmap_api::Error::NoRoute { .. } => CoreError::RouteNotFound,
            schoolmap_api::Error::Directions { code, message } => CoreError::RoutingEngine {
                message: if message.is_empty() {
                    code
                } else {
                    format!("{code}: {message}")
                },
            },
            schoolmap_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            schoolmap_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidData { message }
            }
            schoolmap_api::Error::InvalidData(message) => CoreError::InvalidData { message },
            schoolmap_api::Error::Transport(ref e) => CoreError::UpstreamFetch {
                resource: e
                    .url()
                    .map_or_else(|| "remote resource".into(), |u| u.path().to_owned()),
                message: e.to_string(),
            },
            schoolmap_api::Error::Timeout { timeout_secs } => CoreError::UpstreamFetch {
                resource: "remote resource".into(),
                message: format!("timed out after {timeout_secs}s"),
            },
            schoolmap_api::Error::Api { status, message } => CoreError::UpstreamFetch {
                resource: "remote resource".into(),
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_route_maps_to_route_not_found() {
        let err = CoreError::from(schoolmap_api::Error::NoRoute {
            message: "Impossible route".into(),
        });
        assert!(matches!(err, CoreError::RouteNotFound));
        assert!(err.is_route_failure());
    }

    #[test]
    fn upstream_names_the_resource() {
        let err = CoreError::upstream(
            "schools",
            schoolmap_api::Error::Api {
                status: 500,
                message: "Failed to fetch sekolah data".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Failed to fetch schools: HTTP 500: Failed to fetch sekolah data"
        );
    }

    #[test]
    fn upstream_keeps_routing_variants() {
        let err = CoreError::upstream(
            "route",
            schoolmap_api::Error::Directions {
                code: "InvalidQuery".into(),
                message: String::new(),
            },
        );
        assert!(matches!(err, CoreError::RoutingEngine { ref message } if message == "InvalidQuery"));
    }
}
