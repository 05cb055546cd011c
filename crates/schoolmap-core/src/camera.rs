// ── Camera placement ──
//
// Derives where the map should look from the mode state. Pure: front ends
// call it on every state change and animate to the result.

use serde::Serialize;

use crate::config::CameraSettings;
use crate::model::{Coordinate, ModeState};
use crate::store::SchoolStore;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub center: Coordinate,
    pub zoom: u8,
}

/// Pick the camera target in priority order: the selected school, the
/// destination of an active route, the device (when following it), then
/// the configured default.
pub fn camera_view(
    state: &ModeState,
    store: &SchoolStore,
    settings: &CameraSettings,
) -> CameraView {
    let focused = state
        .selected
        .as_ref()
        .and_then(|id| store.position_of(id))
        .or_else(|| {
            state
                .active_route
                .as_ref()
                .and(state.route_destination.as_ref())
                .and_then(|id| store.position_of(id))
        })
        .or_else(|| state.device_position.filter(|_| settings.follow_device));

    match focused {
        Some(center) => CameraView {
            center,
            zoom: settings.focus_zoom,
        },
        None => CameraView {
            center: settings.default_center,
            zoom: settings.default_zoom,
        },
    }
}
