//! Route command: open a routing session and wait for its outcome.

use std::sync::Arc;
use std::time::Duration;

use schoolmap_core::{
    Coordinate, Itinerary, MapSession, ModeState, RouteOrigin, RouteStep, SchoolId,
};
use tabled::Tabled;

use crate::cli::{GlobalOpts, RouteArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Maneuver")]
    maneuver: String,
    #[tabled(rename = "Instruction")]
    text: String,
    #[tabled(rename = "Distance")]
    distance: String,
}

impl StepRow {
    fn new(index: usize, step: &RouteStep) -> Self {
        Self {
            index: index + 1,
            maneuver: step.maneuver.to_string(),
            text: step.text.clone(),
            distance: step.distance_label(),
        }
    }
}

fn detail(itinerary: &Itinerary, steps: bool) -> String {
    if !steps || itinerary.steps.is_empty() {
        return itinerary.summary.clone();
    }
    let rows: Vec<StepRow> = itinerary
        .steps
        .iter()
        .enumerate()
        .map(|(i, s)| StepRow::new(i, s))
        .collect();
    format!("{}\n{}", itinerary.summary, output::render_table(&rows))
}

pub async fn handle(
    session: &MapSession,
    args: RouteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::load_schools(session).await?;
    let limit = session.config().timeout;

    let destination = SchoolId::new(args.to);
    util::find_school(session, &destination)?;

    let origin = match args.from {
        Some(from) => {
            let id = SchoolId::new(from);
            util::find_school(session, &id)?;
            RouteOrigin::School(id)
        }
        None => {
            session.start_tracking();
            let position = wait_for(session, limit, "a position fix", device_fix).await?;
            tracing::info!(%position, "routing from device position");
            RouteOrigin::DeviceLocation
        }
    };

    if session.create_route(origin, destination)?.is_none() {
        return Err(CliError::Internal("route endpoints are not loaded".into()));
    }
    let itinerary = wait_for(session, limit, "a route", route_outcome).await?;

    let steps = !args.summary;
    let out = output::render_single(
        &global.output,
        itinerary.as_ref(),
        |it| detail(it, steps),
        |it| it.summary.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn device_fix(state: &ModeState) -> Option<Result<Coordinate, CliError>> {
    if let Some(position) = state.device_position {
        return Some(Ok(position));
    }
    state.location_error.as_ref().map(|reason| {
        Err(CliError::LocationUnavailable {
            reason: reason.clone(),
        })
    })
}

fn route_outcome(state: &ModeState) -> Option<Result<Arc<Itinerary>, CliError>> {
    if let Some(ref itinerary) = state.active_route {
        return Some(Ok(Arc::clone(itinerary)));
    }
    state.route_error.as_ref().map(|message| {
        Err(CliError::Routing {
            message: message.clone(),
        })
    })
}

/// Watch the mode state until `pick` yields an outcome or `limit` passes.
async fn wait_for<T>(
    session: &MapSession,
    limit: Duration,
    waiting_for: &str,
    pick: impl Fn(&ModeState) -> Option<Result<T, CliError>>,
) -> Result<T, CliError> {
    let mut updates = session.subscribe();
    let watch = async {
        if let Some(outcome) = pick(updates.current()) {
            return outcome;
        }
        while let Some(state) = updates.changed().await {
            if let Some(outcome) = pick(&state) {
                return outcome;
            }
        }
        Err(CliError::Internal("map session closed".into()))
    };
    tokio::time::timeout(limit, watch)
        .await
        .map_err(|_| CliError::Timeout {
            seconds: limit.as_secs(),
            waiting_for: waiting_for.into(),
        })?
}
