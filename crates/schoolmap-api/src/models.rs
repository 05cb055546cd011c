// Wire types for the school map HTTP API.
//
// Field names follow the database columns the API exposes (Indonesian),
// renamed to English on the Rust side. These types are deliberately
// permissive about number/string encodings; semantic validation happens
// when `schoolmap-core` converts them into domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Schools ─────────────────────────────────────────────────────────

/// One row of `GET /schools` or `GET /schools/accredited`.
///
/// Every field tolerates `null` so that one broken row cannot fail the
/// whole batch; rows without an identifier or a position are dropped
/// during conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    /// Legacy numeric primary key.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    /// Stable identifier used by newer deployments.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub uuid: Option<String>,
    #[serde(rename = "nama", default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub npsn: Option<String>,
    #[serde(rename = "alamat", default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "bentuk_pendidikan", default)]
    pub education_level: Option<String>,
    #[serde(rename = "akreditasi", default)]
    pub accreditation: Option<String>,
    #[serde(rename = "jumlah_guru", default, deserialize_with = "opt_count")]
    pub teacher_count: Option<u32>,
    #[serde(rename = "jumlah_murid", default, deserialize_with = "opt_count")]
    pub student_count: Option<u32>,
    /// `ST_Y(geom)`; null when the row has no geometry.
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(rename = "kelurahan_id", default)]
    pub region_id: Option<i64>,
    #[serde(rename = "kelurahan_nama", default)]
    pub region_name: Option<String>,
}

impl SchoolRecord {
    /// The school's identifier, preferring `uuid` over the numeric `id`.
    /// Blank values count as absent.
    pub fn identifier(&self) -> Option<&str> {
        [self.uuid.as_deref(), self.id.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

// ── Regions ─────────────────────────────────────────────────────────

/// A GeoJSON position: `[lng, lat]` with an optional altitude.
pub type Position = Vec<f64>;

/// GeoJSON geometry as produced by PostGIS `ST_AsGeoJSON` for the
/// kelurahan boundaries. Only areal geometries are usable; any other type
/// decodes as `Unsupported` and is rejected during conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

/// One row of `GET /regions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: i64,
    #[serde(rename = "kelurahan")]
    pub name: String,
    #[serde(rename = "kecamatan", default)]
    pub district: Option<String>,
    #[serde(rename = "provinsi", default)]
    pub province: Option<String>,
    #[serde(rename = "kode_pos", default, deserialize_with = "opt_string_or_number")]
    pub postal_code: Option<String>,
    #[serde(rename = "luas", default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// One row of `GET /regions/stats`.
///
/// PostgreSQL `COUNT(...)` is a bigint, which node-pg serialises as a
/// string, so every count accepts either encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStatsRecord {
    pub id: i64,
    #[serde(rename = "kelurahan")]
    pub name: String,
    #[serde(rename = "kecamatan", default)]
    pub district: Option<String>,
    #[serde(deserialize_with = "count")]
    pub total_schools: u32,
    #[serde(default, deserialize_with = "count")]
    pub sd_count: u32,
    #[serde(default, deserialize_with = "count")]
    pub smp_count: u32,
    #[serde(default, deserialize_with = "count")]
    pub sma_count: u32,
}

// ── User location ───────────────────────────────────────────────────

/// A saved user position. `timestamp` is milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub timestamp: i64,
}

impl LocationRecord {
    /// When the position was recorded, if the timestamp is in range.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Body for `POST /user-location`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct SaveLocationRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Response for `POST /user-location`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SaveLocationResponse {
    pub data: LocationRecord,
}

/// Error body returned with non-2xx statuses: `{error, details}` or
/// `{message}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        let head = self.error.or(self.message)?;
        Some(match self.details {
            Some(details) => format!("{head}: {details}"),
            None => head,
        })
    }
}

// ── Lenient number/string helpers ───────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(d)?.map(StringOrNumber::into_string))
}

fn parse_count<E: serde::de::Error>(raw: StringOrNumber) -> Result<u32, E> {
    match raw {
        StringOrNumber::Int(n) => u32::try_from(n).map_err(E::custom),
        StringOrNumber::Text(s) => s.trim().parse::<u32>().map_err(E::custom),
        StringOrNumber::Float(f) => Err(E::custom(format!("expected an integer count, got {f}"))),
    }
}

fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    parse_count(StringOrNumber::deserialize(d)?)
}

fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Option::<StringOrNumber>::deserialize(d)?
        .map(parse_count)
        .transpose()
}
