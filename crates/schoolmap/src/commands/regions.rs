//! Region command handlers.

use schoolmap_core::{MapSession, Region, RegionId};
use tabled::Tabled;

use crate::cli::{GlobalOpts, RegionsArgs, RegionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Postal")]
    postal_code: String,
    #[tabled(rename = "Polygons")]
    polygons: usize,
}

impl From<&Region> for RegionRow {
    fn from(r: &Region) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            district: util::or_dash(r.district.as_deref()),
            postal_code: util::or_dash(r.postal_code.as_deref()),
            polygons: r.boundary.polygons().len(),
        }
    }
}

fn detail(r: &Region) -> String {
    output::detail_lines([
        ("ID", Some(r.id.to_string())),
        ("Name", Some(r.name.clone())),
        ("District", r.district.clone()),
        ("Province", r.province.clone()),
        ("Postal code", r.postal_code.clone()),
        ("Area", r.area.map(|a| format!("{a:.2}"))),
        ("Polygons", Some(r.boundary.polygons().len().to_string())),
        ("Centre", r.boundary.bbox_center().map(|c| c.to_string())),
    ])
}

pub async fn handle(
    session: &MapSession,
    args: &RegionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let regions = session.regions().await?;

    let out = match &args.command {
        RegionsCommand::List => output::render_list(
            &global.output,
            regions.as_slice(),
            |r| RegionRow::from(r),
            |r| r.id.to_string(),
        )?,
        RegionsCommand::Get { region } => {
            let id = RegionId::new(*region);
            let found = regions
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "region".into(),
                    identifier: id.to_string(),
                    list_command: "regions list".into(),
                })?;
            output::render_single(&global.output, found, detail, |r| r.id.to_string())?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
