//! Per-region school statistics.

use schoolmap_core::{MapSession, RegionId, RegionStats};
use tabled::Tabled;

use crate::cli::{GlobalOpts, StatsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Region")]
    name: String,
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "SD")]
    primary: u32,
    #[tabled(rename = "SMP")]
    lower_secondary: u32,
    #[tabled(rename = "SMA")]
    upper_secondary: u32,
    #[tabled(rename = "Other")]
    other: u32,
    #[tabled(rename = "Total")]
    total: u32,
}

impl From<&RegionStats> for StatsRow {
    fn from(s: &RegionStats) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            district: util::or_dash(s.district.as_deref()),
            primary: s.by_category.primary,
            lower_secondary: s.by_category.lower_secondary,
            upper_secondary: s.by_category.upper_secondary,
            other: s.other_schools(),
            total: s.total_schools,
        }
    }
}

pub async fn handle(
    session: &MapSession,
    args: &StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let stats = session.region_stats().await?;

    let selected: Vec<&RegionStats> = match args.region.map(RegionId::new) {
        Some(id) => {
            let found = stats.iter().find(|s| s.id == id).ok_or_else(|| {
                CliError::NotFound {
                    resource_type: "region".into(),
                    identifier: id.to_string(),
                    list_command: "stats".into(),
                }
            })?;
            vec![found]
        }
        None => stats.iter().collect(),
    };

    let out = output::render_list(
        &global.output,
        &selected,
        |s| StatsRow::from(*s),
        |s| format!("{}\t{}", s.id, s.total_schools),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
