// ── School search ──
//
// Free-text lookup over the loaded schools. Matches are case-insensitive
// substrings of the name or the address, restricted to schools that pass
// the active region and category filters. Selection and routing do not
// narrow the result set: search is how a user leaves a focused view.

use std::sync::Arc;

use crate::model::{ModeState, School};
use crate::visibility::passes_filters;

/// Whether `school` matches an already lowercased `needle`.
fn matches(school: &School, needle: &str) -> bool {
    school.name.to_lowercase().contains(needle)
        || school
            .address
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains(needle))
}

/// Schools matching `query`, in store order. An empty query matches
/// nothing.
pub fn search_schools(schools: &[Arc<School>], query: &str, state: &ModeState) -> Vec<Arc<School>> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    schools
        .iter()
        .filter(|s| passes_filters(s, state) && matches(s, &needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EducationLevel, RegionId, SchoolId};
    use crate::testing::school_at;

    fn fixture() -> Vec<Arc<School>> {
        let mut s1 = school_at("s1", "SD", 1, 3.5911, 98.6601);
        s1.name = "SD Negeri 060843".into();
        s1.address = Some("Jl. Gatot Subroto No. 1".into());
        let mut s2 = school_at("s2", "SMP", 1, 3.5802, 98.6712);
        s2.name = "SMP Swasta Methodist".into();
        s2.address = None;
        let mut s3 = school_at("s3", "SD", 2, 3.6010, 98.6850);
        s3.name = "SD Swasta Budi Murni".into();
        s3.address = Some("Jl. Gatot Subroto No. 250".into());
        vec![Arc::new(s1), Arc::new(s2), Arc::new(s3)]
    }

    fn ids(found: &[Arc<School>]) -> Vec<&str> {
        found.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn name_match_ignores_case() {
        let found = search_schools(&fixture(), "swasta", &ModeState::default());
        assert_eq!(ids(&found), ["s2", "s3"]);
    }

    #[test]
    fn address_matches_and_missing_address_does_not() {
        let found = search_schools(&fixture(), "GATOT subroto", &ModeState::default());
        assert_eq!(ids(&found), ["s1", "s3"]);
    }

    #[test]
    fn empty_query_finds_nothing() {
        assert!(search_schools(&fixture(), "", &ModeState::default()).is_empty());
    }

    #[test]
    fn filters_apply_but_selection_does_not() {
        let state = ModeState {
            category_filter: Some(EducationLevel::Primary),
            selected: Some(SchoolId::from("s2")),
            ..ModeState::default()
        };
        assert_eq!(ids(&search_schools(&fixture(), "swasta", &state)), ["s3"]);

        let state = ModeState {
            region_filter: Some(RegionId::new(1)),
            ..ModeState::default()
        };
        assert_eq!(ids(&search_schools(&fixture(), "jl.", &state)), ["s1"]);
    }
}
