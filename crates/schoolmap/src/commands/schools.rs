//! School command handlers.

use std::sync::Arc;

use schoolmap_core::{Command, MapSession, RegionId, School, SchoolId, VisibleMarker};
use tabled::Tabled;

use crate::cli::{GlobalOpts, SchoolFilterArgs, SchoolsArgs, SchoolsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SchoolRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Grade")]
    accreditation: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Marker")]
    marker: String,
}

impl From<&VisibleMarker> for SchoolRow {
    fn from(m: &VisibleMarker) -> Self {
        let s = &m.school;
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            level: s.level.to_string(),
            accreditation: s.accreditation.to_string(),
            region: util::or_dash(s.region_name.as_deref()),
            marker: m.variant.icon().into(),
        }
    }
}

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&Arc<School>> for SearchRow {
    fn from(s: &Arc<School>) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            level: s.level.to_string(),
            address: util::or_dash(s.address.as_deref()),
        }
    }
}

fn detail(s: &School) -> String {
    output::detail_lines([
        ("ID", Some(s.id.to_string())),
        ("Name", Some(s.name.clone())),
        ("NPSN", s.npsn.clone()),
        ("Level", Some(s.level.to_string())),
        ("Status", s.status.clone()),
        ("Accreditation", Some(s.accreditation.to_string())),
        ("Address", s.address.clone()),
        ("Region", s.region_name.clone()),
        ("Teachers", s.teacher_count.map(|n| n.to_string())),
        ("Students", s.student_count.map(|n| n.to_string())),
        ("Position", Some(s.position.to_string())),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &MapSession,
    args: SchoolsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::load_schools(session).await?;

    match args.command {
        SchoolsCommand::List(filter) => list(session, &filter, global),
        SchoolsCommand::Search { query, filter } => search(session, &query, &filter, global),
        SchoolsCommand::Get { school } => {
            let id = SchoolId::new(school);
            let found = util::find_school(session, &id)?;
            let out = output::render_single(&global.output, &*found, detail, |s| {
                s.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn apply_filters(session: &MapSession, filter: &SchoolFilterArgs) -> Result<(), CliError> {
    let level = filter.level.as_deref().map(util::parse_level).transpose()?;
    session.execute(Command::SetCategoryFilter(level))?;
    session.execute(Command::SetRegionFilter(filter.region.map(RegionId::new)))?;
    Ok(())
}

/// The markers the map would draw under the requested filters.
fn list(
    session: &MapSession,
    filter: &SchoolFilterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    apply_filters(session, filter)?;

    let markers = util::take(session.visible(), filter.limit);
    let out = output::render_list(&global.output, &markers, |m| SchoolRow::from(m), |m| {
        m.school.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn search(
    session: &MapSession,
    query: &str,
    filter: &SchoolFilterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if query.trim().is_empty() {
        return Err(CliError::Validation {
            field: "query".into(),
            reason: "search text must not be empty".into(),
        });
    }
    apply_filters(session, filter)?;

    let found = util::take(session.search(query), filter.limit);
    let out = output::render_list(&global.output, &found, |s| SearchRow::from(s), |s| {
        s.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
