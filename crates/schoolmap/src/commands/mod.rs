//! Command dispatch: bridges CLI args -> map session operations -> output.

pub mod accredited;
pub mod config_cmd;
pub mod regions;
pub mod route;
pub mod schools;
pub mod stats;
pub mod util;

use std::sync::Arc;

use schoolmap_core::{FixedPositionSource, MapSession, NoDeviceSource, PositionSource};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &MapSession,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Schools(args) => schools::handle(session, args, global).await,
        Command::Accredited(args) => accredited::handle(session, &args, global).await,
        Command::Regions(args) => regions::handle(session, &args, global).await,
        Command::Stats(args) => stats::handle(session, &args, global).await,
        Command::Route(args) => route::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Where the session's device position comes from. A terminal has no
/// location hardware, so only `route --at` supplies one; otherwise the
/// tracker falls back to the saved location.
pub fn position_source(cmd: &Command) -> Result<Arc<dyn PositionSource>, CliError> {
    match cmd {
        Command::Route(args) => match args.at.as_deref() {
            Some(raw) => Ok(Arc::new(FixedPositionSource::new(
                util::parse_coordinate(raw)?,
            ))),
            None => Ok(Arc::new(NoDeviceSource::default())),
        },
        _ => Ok(Arc::new(NoDeviceSource::default())),
    }
}
