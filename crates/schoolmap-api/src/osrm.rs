// OSRM directions client
//
// Point-to-point routing against an OSRM v5 HTTP server (the public demo
// server by default). The raw response shapes are kept strict: only the
// fields the map needs are modelled, and an unknown `code` is an error
// rather than an empty route list.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::client::preview;
use crate::error::Error;
use crate::transport::TransportConfig;

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_PROFILE: &str = "driving";

/// A waypoint submitted to the directions service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

// ── Response shapes ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

/// One route alternative. The first entry is the engine's primary route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsrmRoute {
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub legs: Vec<OsrmLeg>,
}

/// The part of a route between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsrmLeg {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub steps: Vec<OsrmStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsrmStep {
    pub distance: f64,
    pub duration: f64,
    /// Road name; empty for unnamed ways.
    #[serde(default)]
    pub name: String,
    pub maneuver: OsrmManeuver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsrmManeuver {
    /// `depart`, `turn`, `roundabout`, `arrive`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// `left`, `slight right`, `uturn`, ...
    #[serde(default)]
    pub modifier: Option<String>,
    /// Exit number for roundabouts.
    #[serde(default)]
    pub exit: Option<u32>,
    #[serde(default)]
    pub bearing_after: Option<f64>,
}

// ── Client ──────────────────────────────────────────────────────────

/// HTTP client for the OSRM `route` service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: Url,
    profile: String,
}

impl OsrmClient {
    pub fn new(
        base_url: Url,
        profile: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            profile: profile.into(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, profile: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            profile: profile.into(),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Build `{base}/route/v1/{profile}/{lng,lat;...}` with step output and
    /// alternatives enabled.
    pub(crate) fn route_url(&self, waypoints: &[Waypoint]) -> Result<Url, Error> {
        let coords = waypoints
            .iter()
            .map(|w| format!("{},{}", w.lng, w.lat))
            .collect::<Vec<_>>()
            .join(";");
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/route/v1/{}/{coords}", self.profile))?;
        url.query_pairs_mut()
            .append_pair("overview", "false")
            .append_pair("alternatives", "true")
            .append_pair("steps", "true");
        Ok(url)
    }

    /// Compute routes through the given waypoints (at least two).
    ///
    /// Returns every alternative the server produced, primary first.
    pub async fn route(&self, waypoints: &[Waypoint]) -> Result<Vec<OsrmRoute>, Error> {
        if waypoints.len() < 2 {
            return Err(Error::InvalidData(format!(
                "a route needs at least two waypoints, got {}",
                waypoints.len()
            )));
        }

        let url = self.route_url(waypoints)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        // OSRM reports routing failures as 400 with a JSON `code`, so the
        // body is parsed before the status is considered.
        let parsed = match serde_json::from_str::<OsrmResponse>(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(Error::Api {
                    status: status.as_u16(),
                    message: preview(&body).to_owned(),
                });
            }
            Err(e) => {
                return Err(Error::Deserialization {
                    message: format!("{e} (body preview: {:?})", preview(&body)),
                    body,
                });
            }
        };

        match parsed.code.as_str() {
            "Ok" if parsed.routes.is_empty() => Err(Error::NoRoute {
                message: "directions service returned no routes".into(),
            }),
            "Ok" => {
                debug!(alternatives = parsed.routes.len(), "routes found");
                Ok(parsed.routes)
            }
            "NoRoute" | "NoSegment" => Err(Error::NoRoute {
                message: parsed
                    .message
                    .unwrap_or_else(|| "no route between waypoints".into()),
            }),
            other => Err(Error::Directions {
                code: other.to_owned(),
                message: parsed.message.unwrap_or_default(),
            }),
        }
    }
}
