// ── OSRM-backed directions engine ──
//
// Maps OSRM step maneuvers onto the itinerary vocabulary and renders
// English instruction text.

use async_trait::async_trait;
use tracing::debug;

use schoolmap_api::osrm::{OsrmClient, OsrmLeg, OsrmManeuver, OsrmStep};
use schoolmap_api::Waypoint;

use super::engine::DirectionsEngine;
use crate::error::CoreError;
use crate::model::{Coordinate, Itinerary, ManeuverType, RouteStep};

#[async_trait]
impl DirectionsEngine for OsrmClient {
    async fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Itinerary>, CoreError> {
        let waypoints = [Waypoint::from(origin), Waypoint::from(destination)];
        let routes = self.route(&waypoints).await?;
        debug!(profile = self.profile(), alternatives = routes.len(), "osrm routes");
        Ok(routes.iter().map(Itinerary::from).collect())
    }
}

/// Convert one leg's steps. `last_leg` decides whether its `arrive` step
/// is the destination or an intermediate waypoint.
pub(crate) fn steps_from_leg(leg: &OsrmLeg, last_leg: bool) -> Vec<RouteStep> {
    leg.steps
        .iter()
        .map(|step| RouteStep {
            text: instruction_text(step, last_leg),
            distance: step.distance,
            maneuver: maneuver_type(&step.maneuver, last_leg),
        })
        .collect()
}

pub(crate) fn maneuver_type(m: &OsrmManeuver, last_leg: bool) -> ManeuverType {
    match m.kind.as_str() {
        "depart" => ManeuverType::Head,
        "arrive" if last_leg => ManeuverType::DestinationReached,
        "arrive" => ManeuverType::WaypointReached,
        "roundabout" | "rotary" | "exit roundabout" | "exit rotary" => ManeuverType::Roundabout,
        _ => modifier_type(m.modifier.as_deref()),
    }
}

fn modifier_type(modifier: Option<&str>) -> ManeuverType {
    match modifier {
        Some("uturn") => ManeuverType::TurnAround,
        Some("sharp right") => ManeuverType::SharpRight,
        Some("right") => ManeuverType::Right,
        Some("slight right") => ManeuverType::SlightRight,
        Some("slight left") => ManeuverType::SlightLeft,
        Some("left") => ManeuverType::Left,
        Some("sharp left") => ManeuverType::SharpLeft,
        _ => ManeuverType::Straight,
    }
}

fn instruction_text(step: &OsrmStep, last_leg: bool) -> String {
    let m = &step.maneuver;
    let road = (!step.name.is_empty()).then_some(step.name.as_str());
    let onto = |base: String| match road {
        Some(name) => format!("{base} onto {name}"),
        None => base,
    };

    match maneuver_type(m, last_leg) {
        ManeuverType::Head => {
            let base = match m.bearing_after {
                Some(bearing) => format!("Head {}", compass(bearing)),
                None => "Head".to_owned(),
            };
            match road {
                Some(name) => format!("{base} on {name}"),
                None => base,
            }
        }
        ManeuverType::DestinationReached => "You have arrived at your destination".to_owned(),
        ManeuverType::WaypointReached => "You have reached a waypoint".to_owned(),
        ManeuverType::Roundabout if m.kind.starts_with("exit") => onto("Exit the roundabout".into()),
        ManeuverType::Roundabout => match m.exit {
            Some(n) => onto(format!("Take the {} exit in the roundabout", ordinal(n))),
            None => onto("Enter the roundabout".into()),
        },
        ManeuverType::TurnAround => onto("Make a U-turn".into()),
        other => onto(directional_text(&m.kind, other)),
    }
}

fn directional_text(kind: &str, maneuver: ManeuverType) -> String {
    let side = match maneuver {
        ManeuverType::SharpRight => "sharp right",
        ManeuverType::Right => "right",
        ManeuverType::SlightRight => "slight right",
        ManeuverType::SlightLeft => "slight left",
        ManeuverType::Left => "left",
        ManeuverType::SharpLeft => "sharp left",
        _ => "straight",
    };
    match (kind, maneuver) {
        ("fork", _) => format!("Keep {} at the fork", side.trim_start_matches("slight ")),
        ("merge", _) => format!("Merge {side}"),
        ("end of road", _) => format!("Turn {side} at the end of the road"),
        ("new name" | "continue", ManeuverType::Straight) => "Continue".to_owned(),
        (_, ManeuverType::Straight) => "Continue straight".to_owned(),
        (_, ManeuverType::SlightRight | ManeuverType::SlightLeft) => capitalize(side),
        _ => format!("Turn {side}"),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Eight-point compass name for a bearing in degrees.
fn compass(bearing: f64) -> &'static str {
    match bearing.rem_euclid(360.0) {
        b if b < 22.5 => "north",
        b if b < 67.5 => "northeast",
        b if b < 112.5 => "east",
        b if b < 157.5 => "southeast",
        b if b < 202.5 => "south",
        b if b < 247.5 => "southwest",
        b if b < 292.5 => "west",
        b if b < 337.5 => "northwest",
        _ => "north",
    }
}

fn ordinal(n: u32) -> String {
    const WORDS: [&str; 10] = [
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth",
    ];
    n.checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| WORDS.get(i))
        .map_or_else(|| format!("{n}th"), |w| (*w).to_owned())
}
