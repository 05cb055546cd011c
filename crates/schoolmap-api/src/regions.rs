// Region (kelurahan) endpoints
//
// Boundaries and per-region school counts are loaded lazily by the map
// when the overlay or the statistics panel is first opened.

use tracing::debug;

use crate::client::{ApiClient, empty_on_not_found};
use crate::error::Error;
use crate::models::{RegionRecord, RegionStatsRecord};

impl ApiClient {
    /// List every region with its GeoJSON boundary.
    ///
    /// `GET /regions`
    pub async fn list_regions(&self) -> Result<Vec<RegionRecord>, Error> {
        let regions = empty_on_not_found("regions", self.get("regions").await)?;
        debug!(count = regions.len(), "fetched regions");
        Ok(regions)
    }

    /// Per-region school totals broken down by education level.
    ///
    /// `GET /regions/stats`
    pub async fn list_region_stats(&self) -> Result<Vec<RegionStatsRecord>, Error> {
        empty_on_not_found("regions/stats", self.get("regions/stats").await)
    }
}
