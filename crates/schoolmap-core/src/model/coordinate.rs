// ── Geographic coordinate ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use schoolmap_api::Waypoint;

use crate::error::CoreError;

/// A WGS84 position in decimal degrees.
///
/// Values built through [`Coordinate::new`] or parsing are always finite
/// and in range; the public fields exist for pattern matching and
/// literal construction in tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let coord = Self { lat, lng };
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(CoreError::InvalidData {
                message: format!("coordinate out of range: ({lat}, {lng})"),
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Parses `"lat,lng"`.
impl FromStr for Coordinate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidData {
            message: format!("expected \"lat,lng\", got {s:?}"),
        };
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| invalid())?;
        Self::new(lat, lng)
    }
}

impl From<Coordinate> for Waypoint {
    fn from(c: Coordinate) -> Self {
        Waypoint {
            lat: c.lat,
            lng: c.lng,
        }
    }
}
