// ── API-to-domain type conversions ──
//
// Bridges raw `schoolmap_api` records into canonical `schoolmap_core::model`
// types. Conversions that can fail (coordinates, polygon rings) are
// `TryFrom`; batch helpers drop invalid rows with a warning instead of
// failing the whole load.

use tracing::warn;

use schoolmap_api::models::{
    Geometry, LocationRecord, Position, RegionRecord, RegionStatsRecord, SchoolRecord,
};
use schoolmap_api::osrm::OsrmRoute;

use crate::error::CoreError;
use crate::model::{
    Accreditation, Boundary, CategoryCounts, Coordinate, EducationLevel, Itinerary, Region,
    RegionId, RegionStats, Ring, School, SchoolId,
};
use crate::routing::osrm::steps_from_leg;

// ── Helpers ────────────────────────────────────────────────────────

fn invalid(message: String) -> CoreError {
    CoreError::InvalidData { message }
}

/// Trim and drop empty strings.
fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// GeoJSON positions are `[lng, lat, ...]`.
fn position_to_coordinate(pos: &Position) -> Result<Coordinate, CoreError> {
    match pos.as_slice() {
        [lng, lat, ..] => Coordinate::new(*lat, *lng),
        _ => Err(invalid(format!(
            "GeoJSON position needs at least two values, got {}",
            pos.len()
        ))),
    }
}

fn convert_ring(raw: &[Position]) -> Result<Ring, CoreError> {
    if raw.len() < 4 {
        return Err(invalid(format!(
            "polygon ring needs at least 4 positions, got {}",
            raw.len()
        )));
    }
    let ring = raw
        .iter()
        .map(position_to_coordinate)
        .collect::<Result<Ring, _>>()?;
    if ring.first() != ring.last() {
        return Err(invalid("polygon ring is not closed".into()));
    }
    Ok(ring)
}

fn convert_polygon(raw: &[Vec<Position>]) -> Result<Vec<Ring>, CoreError> {
    if raw.is_empty() {
        return Err(invalid("polygon has no rings".into()));
    }
    raw.iter().map(|r| convert_ring(r)).collect()
}

/// Convert a batch, logging and skipping rows that fail validation.
fn convert_batch<R, T>(kind: &str, records: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = CoreError>,
{
    let total = records.len();
    let converted: Vec<T> = records
        .into_iter()
        .filter_map(|rec| match T::try_from(rec) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, "skipping invalid {kind} record");
                None
            }
        })
        .collect();
    if converted.len() < total {
        warn!(
            kept = converted.len(),
            skipped = total - converted.len(),
            "{kind} batch contained invalid records"
        );
    }
    converted
}

// ── School ─────────────────────────────────────────────────────────

impl TryFrom<SchoolRecord> for School {
    type Error = CoreError;

    fn try_from(r: SchoolRecord) -> Result<Self, Self::Error> {
        let id = r.identifier().map(SchoolId::new);
        let name = non_empty(r.name).unwrap_or_default();
        let Some(id) = id else {
            return Err(invalid(format!("school {name:?} has no identifier")));
        };
        let (Some(lat), Some(lng)) = (r.lat, r.lng) else {
            return Err(invalid(format!("school {id} ({name}) has no position")));
        };
        let position =
            Coordinate::new(lat, lng).map_err(|e| invalid(format!("school {id} ({name}): {e}")))?;

        Ok(School {
            id,
            name,
            npsn: non_empty(r.npsn),
            address: non_empty(r.address),
            status: non_empty(r.status),
            level: r
                .education_level
                .as_deref()
                .map_or_else(|| EducationLevel::Other(String::new()), EducationLevel::parse),
            accreditation: r
                .accreditation
                .as_deref()
                .map_or(Accreditation::Unrated, Accreditation::parse),
            teacher_count: r.teacher_count,
            student_count: r.student_count,
            position,
            region_id: r.region_id.map(RegionId::from),
            region_name: non_empty(r.region_name),
        })
    }
}

pub(crate) fn schools_from_records(records: Vec<SchoolRecord>) -> Vec<School> {
    convert_batch("school", records)
}

// ── Region ─────────────────────────────────────────────────────────

impl TryFrom<&Geometry> for Boundary {
    type Error = CoreError;

    fn try_from(g: &Geometry) -> Result<Self, Self::Error> {
        match g {
            Geometry::Polygon { coordinates } => Ok(Boundary::Polygon(convert_polygon(coordinates)?)),
            Geometry::Unsupported => Err(invalid("geometry is not a Polygon or MultiPolygon".into())),
            Geometry::MultiPolygon { coordinates } => {
                if coordinates.is_empty() {
                    return Err(invalid("multipolygon has no polygons".into()));
                }
                coordinates
                    .iter()
                    .map(|p| convert_polygon(p))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Boundary::MultiPolygon)
            }
        }
    }
}

impl TryFrom<RegionRecord> for Region {
    type Error = CoreError;

    fn try_from(r: RegionRecord) -> Result<Self, Self::Error> {
        let boundary = r
            .geometry
            .as_ref()
            .ok_or_else(|| invalid("missing geometry".into()))
            .and_then(Boundary::try_from)
            .map_err(|e| invalid(format!("region {} ({}): {e}", r.id, r.name)))?;
        Ok(Region {
            id: RegionId::new(r.id),
            name: r.name,
            district: non_empty(r.district),
            province: non_empty(r.province),
            postal_code: non_empty(r.postal_code),
            area: r.area.filter(|a| a.is_finite()),
            boundary,
        })
    }
}

pub(crate) fn regions_from_records(records: Vec<RegionRecord>) -> Vec<Region> {
    convert_batch("region", records)
}

impl From<RegionStatsRecord> for RegionStats {
    fn from(r: RegionStatsRecord) -> Self {
        RegionStats {
            id: RegionId::new(r.id),
            name: r.name,
            district: non_empty(r.district),
            total_schools: r.total_schools,
            by_category: CategoryCounts {
                primary: r.sd_count,
                lower_secondary: r.smp_count,
                upper_secondary: r.sma_count,
            },
        }
    }
}

// ── Location ───────────────────────────────────────────────────────

impl TryFrom<LocationRecord> for Coordinate {
    type Error = CoreError;

    fn try_from(r: LocationRecord) -> Result<Self, Self::Error> {
        Coordinate::new(r.lat, r.lng)
    }
}

// ── Route ──────────────────────────────────────────────────────────

impl From<&OsrmRoute> for Itinerary {
    fn from(route: &OsrmRoute) -> Self {
        let last = route.legs.len().saturating_sub(1);
        let steps = route
            .legs
            .iter()
            .enumerate()
            .flat_map(|(i, leg)| steps_from_leg(leg, i == last))
            .collect();
        Itinerary::new(route.distance, route.duration, steps)
    }
}
