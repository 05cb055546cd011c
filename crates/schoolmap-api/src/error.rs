use thiserror::Error;

/// Top-level error type for the `schoolmap-api` crate.
///
/// Covers every failure mode across both HTTP surfaces: the school map
/// API (schools, regions, statistics, user location) and the OSRM
/// directions service. `schoolmap-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── School map API ──────────────────────────────────────────────
    /// Non-success HTTP status from the school map API. The message is
    /// taken from the `{error, details}` body when one is present.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Directions ──────────────────────────────────────────────────
    /// The directions service answered but found no route between the
    /// submitted waypoints.
    #[error("No route found: {message}")]
    NoRoute { message: String },

    /// The directions service rejected the request (OSRM `code` other
    /// than `Ok` / `NoRoute`).
    #[error("Directions service error ({code}): {message}")]
    Directions { code: String, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A response parsed but violated the expected schema (bad
    /// coordinates, unclosed polygon rings, ...).
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status code, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_only_for_404() {
        let nf = Error::Api {
            status: 404,
            message: "missing".into(),
        };
        let other = Error::Api {
            status: 400,
            message: "bad".into(),
        };
        assert!(nf.is_not_found());
        assert!(!other.is_not_found());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.is_transient());
        assert!(!Error::InvalidData("x".into()).is_transient());
    }
}
