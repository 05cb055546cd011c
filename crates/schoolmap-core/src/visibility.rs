// ── Visibility filter ──
//
// Pure function from (schools, mode state) to the markers to draw.
// Inclusion and styling are decided separately: the variant never
// affects whether a school is shown.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{EducationLevel, ModeState, RouteOrigin, School};

/// How a visible school is styled. Listed in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum MarkerVariant {
    Selected,
    RouteOrigin,
    RouteDestination,
    /// One of the three known education levels.
    Category(EducationLevel),
    Default,
}

impl MarkerVariant {
    /// Marker asset colour.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Selected => "red",
            Self::RouteOrigin | Self::RouteDestination => "yellow",
            Self::Category(EducationLevel::Primary) => "blue",
            Self::Category(EducationLevel::LowerSecondary) => "green",
            Self::Category(EducationLevel::UpperSecondary) => "violet",
            Self::Category(EducationLevel::Other(_)) | Self::Default => "default",
        }
    }
}

/// A school that passed the filter, with its marker style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleMarker {
    pub school: Arc<School>,
    pub variant: MarkerVariant,
}

/// Compute the visible markers, preserving input order.
///
/// A selection that names a school not in `schools` yields an empty set.
pub fn compute_visible(schools: &[Arc<School>], state: &ModeState) -> Vec<VisibleMarker> {
    schools
        .iter()
        .filter(|s| is_visible(s, state))
        .map(|s| VisibleMarker {
            school: Arc::clone(s),
            variant: marker_variant(s, state),
        })
        .collect()
}

/// First matching rule wins: region, category, selection, route, all.
pub fn is_visible(school: &School, state: &ModeState) -> bool {
    if !passes_filters(school, state) {
        return false;
    }
    if let Some(ref selected) = state.selected {
        return school.id == *selected;
    }
    if state.is_routing() {
        return state.is_route_endpoint(&school.id);
    }
    true
}

/// Region and category filters only. A category filter compares the
/// level exactly: an `SDLB` school does not pass `SD`.
pub fn passes_filters(school: &School, state: &ModeState) -> bool {
    let region_ok = state
        .region_filter
        .is_none_or(|region| school.region_id == Some(region));
    let level_ok = state
        .category_filter
        .as_ref()
        .is_none_or(|level| school.level == *level);
    region_ok && level_ok
}

pub fn marker_variant(school: &School, state: &ModeState) -> MarkerVariant {
    if state.selected.as_ref() == Some(&school.id) {
        return MarkerVariant::Selected;
    }
    if matches!(state.route_origin, Some(RouteOrigin::School(ref id)) if *id == school.id) {
        return MarkerVariant::RouteOrigin;
    }
    if state.route_destination.as_ref() == Some(&school.id) {
        return MarkerVariant::RouteDestination;
    }
    school
        .level
        .marker_level()
        .map_or(MarkerVariant::Default, MarkerVariant::Category)
}
