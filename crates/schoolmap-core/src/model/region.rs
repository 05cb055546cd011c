// ── Region (kelurahan) domain types ──

use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;
use super::ids::RegionId;
use super::school::EducationLevel;

/// A closed linear ring. The first and last coordinates are equal and
/// the ring has at least four positions.
pub type Ring = Vec<Coordinate>;

/// Areal boundary of a region. Each polygon is an outer ring followed
/// by any holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "polygons")]
pub enum Boundary {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Boundary {
    /// Every polygon of the boundary, regardless of geometry kind.
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Self::Polygon(rings) => vec![rings.as_slice()],
            Self::MultiPolygon(polys) => polys.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Centre of the bounding box of all outer rings. Used to frame a
    /// region on the map.
    pub fn bbox_center(&self) -> Option<Coordinate> {
        let mut outer = self
            .polygons()
            .into_iter()
            .filter_map(|p| p.first())
            .flatten()
            .peekable();
        let first = **outer.peek()?;
        let (mut min, mut max) = (first, first);
        for c in outer {
            min.lat = min.lat.min(c.lat);
            min.lng = min.lng.min(c.lng);
            max.lat = max.lat.max(c.lat);
            max.lng = max.lng.max(c.lng);
        }
        Some(Coordinate {
            lat: f64::midpoint(min.lat, max.lat),
            lng: f64::midpoint(min.lng, max.lng),
        })
    }
}

/// One kelurahan with its boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    /// Parent kecamatan.
    pub district: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    /// Area in km².
    pub area: Option<f64>,
    pub boundary: Boundary,
}

/// School counts for the three known education levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub primary: u32,
    pub lower_secondary: u32,
    pub upper_secondary: u32,
}

impl CategoryCounts {
    pub fn get(&self, level: &EducationLevel) -> Option<u32> {
        match level {
            EducationLevel::Primary => Some(self.primary),
            EducationLevel::LowerSecondary => Some(self.lower_secondary),
            EducationLevel::UpperSecondary => Some(self.upper_secondary),
            EducationLevel::Other(_) => None,
        }
    }

    /// Sum of the three counts, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.primary
            .saturating_add(self.lower_secondary)
            .saturating_add(self.upper_secondary)
    }
}

/// Aggregate statistics for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub id: RegionId,
    pub name: String,
    pub district: Option<String>,
    pub total_schools: u32,
    pub by_category: CategoryCounts,
}

impl RegionStats {
    /// Schools counted in the total but outside SD / SMP / SMA.
    pub fn other_schools(&self) -> u32 {
        self.total_schools.saturating_sub(self.by_category.total())
    }
}
