// schoolmap-api: Async Rust client for the school map HTTP API and OSRM

pub mod client;
pub mod error;
mod location;
pub mod models;
pub mod osrm;
mod regions;
mod schools;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{
    Geometry, LocationRecord, Position, RegionRecord, RegionStatsRecord, SchoolRecord,
};
pub use osrm::{OsrmClient, OsrmLeg, OsrmManeuver, OsrmRoute, OsrmStep, Waypoint};
pub use transport::TransportConfig;
