// User location endpoints
//
// A single position per caller identity (`x-user-id`). This is a
// convenience cache only: the map uses it as a last-resort position
// source when the device cannot produce a fix.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LocationRecord, SaveLocationRequest, SaveLocationResponse};

impl ApiClient {
    /// Save the caller's position.
    ///
    /// `POST /user-location`
    pub async fn save_user_location(&self, lat: f64, lng: f64) -> Result<LocationRecord, Error> {
        let resp: SaveLocationResponse = self
            .post("user-location", &SaveLocationRequest { lat, lng })
            .await?;
        Ok(resp.data)
    }

    /// Fetch the caller's saved position, if any.
    ///
    /// `GET /user-location` -- a 404 means nothing has been saved yet.
    pub async fn get_user_location(&self) -> Result<Option<LocationRecord>, Error> {
        match self.get::<LocationRecord>("user-location").await {
            Ok(loc) => Ok(Some(loc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
