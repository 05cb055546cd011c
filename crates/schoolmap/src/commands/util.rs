//! Shared helpers for command handlers.

use std::sync::Arc;

use schoolmap_core::{Coordinate, EducationLevel, MapSession, School, SchoolId};

use crate::error::CliError;

/// Load schools into the session, logging how many arrived.
pub async fn load_schools(session: &MapSession) -> Result<(), CliError> {
    let count = session.load().await?;
    tracing::debug!(count, "schools loaded");
    Ok(())
}

/// Look a school up in the loaded store.
pub fn find_school(session: &MapSession, id: &SchoolId) -> Result<Arc<School>, CliError> {
    session.store().get(id).ok_or_else(|| CliError::NotFound {
        resource_type: "school".into(),
        identifier: id.to_string(),
        list_command: "schools list".into(),
    })
}

/// Parse an education level flag. Only the three mapped levels filter.
pub fn parse_level(raw: &str) -> Result<EducationLevel, CliError> {
    match EducationLevel::parse(raw) {
        EducationLevel::Other(_) => Err(CliError::Validation {
            field: "level".into(),
            reason: format!("expected SD, SMP or SMA, got '{raw}'"),
        }),
        level => Ok(level),
    }
}

/// Parse `"lat,lng"`.
pub fn parse_coordinate(raw: &str) -> Result<Coordinate, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: "at".into(),
        reason,
    };
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| invalid(format!("expected LAT,LNG, got '{raw}'")))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| invalid(format!("'{}' is not a number: {e}", part.trim())))
    };
    Coordinate::new(parse(lat)?, parse(lng)?).map_err(|e| invalid(e.to_string()))
}

/// Keep the first `limit` items; zero keeps everything.
pub fn take<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    if limit > 0 {
        items.truncate(limit);
    }
    items
}

pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_parses_with_spaces() {
        let c = parse_coordinate(" 3.5952, 98.6722 ").unwrap();
        assert_eq!(c, Coordinate { lat: 3.5952, lng: 98.6722 });
    }

    #[test]
    fn coordinate_rejects_bad_input() {
        for raw in ["3.59", "north,98.6", "91,98.6"] {
            assert!(
                matches!(parse_coordinate(raw), Err(CliError::Validation { .. })),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn level_accepts_known_codes_only() {
        assert_eq!(parse_level("smp").unwrap(), EducationLevel::LowerSecondary);
        assert!(parse_level("SMK").is_err());
    }

    #[test]
    fn zero_limit_keeps_all() {
        assert_eq!(take(vec![1, 2, 3], 0), vec![1, 2, 3]);
        assert_eq!(take(vec![1, 2, 3], 2), vec![1, 2]);
    }
}
