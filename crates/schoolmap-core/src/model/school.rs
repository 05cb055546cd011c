// ── School domain types ──

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

use super::coordinate::Coordinate;
use super::ids::{RegionId, SchoolId};

/// Education level (`bentuk_pendidikan`).
///
/// Only the exact codes SD / SMP / SMA map to the known levels. Anything
/// else (`SDLB`, `SMK`, ...) is kept verbatim in `Other`, so it never
/// passes a category filter; see [`EducationLevel::marker_level`] for how
/// it is styled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EducationLevel {
    /// Sekolah Dasar.
    Primary,
    /// Sekolah Menengah Pertama.
    LowerSecondary,
    /// Sekolah Menengah Atas.
    UpperSecondary,
    Other(String),
}

impl EducationLevel {
    /// Classify a raw `bentuk_pendidikan` value. Case and surrounding
    /// whitespace are ignored.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "SD" => Self::Primary,
            "SMP" => Self::LowerSecondary,
            "SMA" => Self::UpperSecondary,
            _ => Self::Other(raw.trim().to_owned()),
        }
    }

    /// The known level whose marker this school wears. Unlike
    /// [`EducationLevel::parse`] this matches by substring in the order
    /// SD, SMP, SMA, so an `SDLB` school styles as primary.
    pub fn marker_level(&self) -> Option<Self> {
        let Self::Other(raw) = self else {
            return Some(self.clone());
        };
        let upper = raw.to_uppercase();
        if upper.contains("SD") {
            Some(Self::Primary)
        } else if upper.contains("SMP") {
            Some(Self::LowerSecondary)
        } else if upper.contains("SMA") {
            Some(Self::UpperSecondary)
        } else {
            None
        }
    }

    /// Short code as shown in the UI and sent by the API.
    pub fn code(&self) -> &str {
        match self {
            Self::Primary => "SD",
            Self::LowerSecondary => "SMP",
            Self::UpperSecondary => "SMA",
            Self::Other(raw) => raw,
        }
    }

    /// The three levels the map has dedicated markers and statistics for.
    pub fn known() -> [Self; 3] {
        [Self::Primary, Self::LowerSecondary, Self::UpperSecondary]
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for EducationLevel {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<EducationLevel> for String {
    fn from(level: EducationLevel) -> Self {
        level.code().to_owned()
    }
}

/// BAN-S/M accreditation grade. Orders `A > B > C > Unrated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
pub enum Accreditation {
    #[strum(serialize = "-")]
    Unrated,
    C,
    B,
    A,
}

impl Accreditation {
    /// Anything other than a bare `A`/`B`/`C` grade (`"Belum Terakreditasi"`,
    /// `"TT"`, empty) is unrated.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "A" => Self::A,
            "B" => Self::B,
            "C" => Self::C,
            _ => Self::Unrated,
        }
    }
}

/// One educational institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    /// Nomor Pokok Sekolah Nasional.
    pub npsn: Option<String>,
    pub address: Option<String>,
    /// Legal status, e.g. `NEGERI` / `SWASTA`.
    pub status: Option<String>,
    pub level: EducationLevel,
    pub accreditation: Accreditation,
    pub teacher_count: Option<u32>,
    pub student_count: Option<u32>,
    pub position: Coordinate,
    pub region_id: Option<RegionId>,
    pub region_name: Option<String>,
}
