// Shared fixtures for unit tests.

use std::sync::Arc;

use crate::model::{Accreditation, Coordinate, EducationLevel, RegionId, School, SchoolId};
use crate::store::SchoolStore;

pub(crate) fn school_at(id: &str, level: &str, region: i64, lat: f64, lng: f64) -> School {
    School {
        id: SchoolId::from(id),
        name: format!("Sekolah {id}"),
        npsn: None,
        address: None,
        status: None,
        level: EducationLevel::parse(level),
        accreditation: Accreditation::Unrated,
        teacher_count: None,
        student_count: None,
        position: Coordinate { lat, lng },
        region_id: Some(RegionId::new(region)),
        region_name: None,
    }
}

pub(crate) fn school(id: &str, level: &str, region: i64) -> Arc<School> {
    Arc::new(school_at(id, level, region, 3.59, 98.67))
}

/// s1 SD r1, s2 SMP r1, s3 SD r2 at distinct positions.
pub(crate) fn store() -> Arc<SchoolStore> {
    Arc::new(SchoolStore::from_schools(vec![
        school_at("s1", "SD", 1, 3.5911, 98.6601),
        school_at("s2", "SMP", 1, 3.5802, 98.6712),
        school_at("s3", "SD", 2, 3.6010, 98.6850),
    ]))
}
