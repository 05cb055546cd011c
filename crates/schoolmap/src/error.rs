//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use schoolmap_config::ConfigError;
use schoolmap_core::{CoreError, PositionError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const LOCATION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Upstream ─────────────────────────────────────────────────────
    #[error("Failed to fetch {resource}: {message}")]
    #[diagnostic(
        code(schoolmap::upstream),
        help(
            "Check that the school map API is reachable.\n\
             Set it with --api-url or api_url in the config file."
        )
    )]
    Upstream { resource: String, message: String },

    #[error("Received invalid data: {message}")]
    #[diagnostic(code(schoolmap::invalid_data))]
    InvalidData { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(schoolmap::not_found),
        help("Run: schoolmap {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Routing ──────────────────────────────────────────────────────
    #[error("No route found between the selected points")]
    #[diagnostic(
        code(schoolmap::no_route),
        help("The directions service could not connect the two points by road.")
    )]
    NoRoute,

    #[error("Routing failed: {message}")]
    #[diagnostic(
        code(schoolmap::routing),
        help("Check the directions service with --directions-url.")
    )]
    Routing { message: String },

    #[error("Current location is not available: {reason}")]
    #[diagnostic(
        code(schoolmap::location),
        help(
            "Pass a start point with --at LAT,LNG or --from SCHOOL_ID,\n\
             or save a location for your user_id first."
        )
    )]
    LocationUnavailable { reason: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Timed out after {seconds}s waiting for {waiting_for}")]
    #[diagnostic(
        code(schoolmap::timeout),
        help("Increase the timeout with --timeout or timeout_secs in the config file.")
    )]
    Timeout { seconds: u64, waiting_for: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(schoolmap::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(schoolmap::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(schoolmap::config))]
    Config(ConfigError),

    #[error("Internal error: {0}")]
    #[diagnostic(code(schoolmap::internal))]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Upstream { .. } | Self::Routing { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::NoRoute => exit_code::NOT_FOUND,
            Self::LocationUnavailable { .. } => exit_code::LOCATION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LocationUnavailable => Self::LocationUnavailable {
                reason: "no device position known".into(),
            },
            CoreError::Position(e) => Self::from(e),
            CoreError::RouteNotFound => Self::NoRoute,
            CoreError::RoutingEngine { message } => Self::Routing { message },
            CoreError::EntityNotFound { identifier } => Self::NotFound {
                resource_type: "school".into(),
                identifier,
                list_command: "schools list".into(),
            },
            CoreError::UpstreamFetch { resource, message } => {
                Self::Upstream { resource, message }
            }
            CoreError::InvalidData { message } => Self::InvalidData { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<PositionError> for CliError {
    fn from(err: PositionError) -> Self {
        Self::LocationUnavailable {
            reason: err.to_string(),
        }
    }
}
