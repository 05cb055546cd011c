// School endpoints
//
// `GET /schools` returns every school in the district; the accredited
// listing backs the landing page's featured section.

use tracing::debug;

use crate::client::{ApiClient, empty_on_not_found};
use crate::error::Error;
use crate::models::SchoolRecord;

impl ApiClient {
    /// List every school.
    ///
    /// `GET /schools`
    pub async fn list_schools(&self) -> Result<Vec<SchoolRecord>, Error> {
        let schools: Vec<SchoolRecord> = self.get("schools").await?;
        debug!(count = schools.len(), "fetched schools");
        Ok(schools)
    }

    /// List grade-A accredited schools, ordered by level then name.
    ///
    /// `GET /schools/accredited` -- a 404 means none are accredited.
    pub async fn list_accredited_schools(&self) -> Result<Vec<SchoolRecord>, Error> {
        empty_on_not_found("schools/accredited", self.get("schools/accredited").await)
    }
}
