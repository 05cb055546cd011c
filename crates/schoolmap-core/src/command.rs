// ── Command API ──
//
// Every user intent against a map session as one enum, so front ends can
// queue, log or replay them. `MapSession::execute` dispatches each variant
// to the matching coordinator or routing operation.

use crate::model::{Coordinate, EducationLevel, RegionId, RouteOrigin, SchoolId};
use crate::routing::SessionToken;

/// A state transition requested by a front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Focus & filters ──────────────────────────────────────────────
    SelectEntity(SchoolId),
    ClearSelection,
    SetCategoryFilter(Option<EducationLevel>),
    SetRegionFilter(Option<RegionId>),

    // ── Routing ──────────────────────────────────────────────────────
    CreateRoute {
        origin: RouteOrigin,
        destination: SchoolId,
    },
    ClearRoute,

    // ── Device ───────────────────────────────────────────────────────
    SetDevicePosition(Coordinate),

    Reset,
}

/// What a command did, for callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Ok,
    /// Whether the school was found and focused.
    Selected(bool),
    /// The routing session opened, or `None` when an endpoint is not a
    /// known school.
    RouteOpened(Option<SessionToken>),
}
