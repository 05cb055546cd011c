// ── Route itinerary ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Turn-by-turn maneuver vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ManeuverType {
    Head,
    Straight,
    SlightRight,
    Right,
    SharpRight,
    TurnAround,
    SharpLeft,
    Left,
    SlightLeft,
    Roundabout,
    WaypointReached,
    DestinationReached,
}

impl ManeuverType {
    /// Parse a maneuver tag. Unknown tags degrade to `Straight`.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(Self::Straight)
    }
}

/// One instruction of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub text: String,
    /// Metres.
    pub distance: f64,
    pub maneuver: ManeuverType,
}

impl RouteStep {
    /// `"850 m"` below a kilometre, `"1.2 km"` above.
    pub fn distance_label(&self) -> String {
        format_distance(self.distance)
    }
}

/// A computed route between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Total distance in metres.
    pub distance: f64,
    /// Total duration in seconds.
    pub duration: f64,
    pub steps: Vec<RouteStep>,
    /// `"{km} km, {min} min"`.
    pub summary: String,
}

impl Itinerary {
    pub fn new(distance: f64, duration: f64, steps: Vec<RouteStep>) -> Self {
        Self {
            distance,
            duration,
            steps,
            summary: summarize(distance, duration),
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        (self.duration / 60.0).round()
    }
}

fn summarize(distance: f64, duration: f64) -> String {
    format!("{:.1} km, {} min", distance / 1000.0, (duration / 60.0).round())
}

fn format_distance(metres: f64) -> String {
    if metres >= 1000.0 {
        format!("{:.1} km", metres / 1000.0)
    } else {
        format!("{} m", metres.round())
    }
}
