//! Accredited school listing.

use schoolmap_core::{Accreditation, MapSession, School};
use tabled::Tabled;

use crate::cli::{AccreditedArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AccreditedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Region")]
    region: String,
}

impl From<&School> for AccreditedRow {
    fn from(s: &School) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            level: s.level.to_string(),
            grade: s.accreditation.to_string(),
            region: util::or_dash(s.region_name.as_deref()),
        }
    }
}

fn parse_grade(raw: &str) -> Result<Accreditation, CliError> {
    match Accreditation::parse(raw) {
        Accreditation::Unrated => Err(CliError::Validation {
            field: "grade".into(),
            reason: format!("expected A, B or C, got '{raw}'"),
        }),
        grade => Ok(grade),
    }
}

pub async fn handle(
    session: &MapSession,
    args: &AccreditedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let grade = args.grade.as_deref().map(parse_grade).transpose()?;
    let schools = session.accredited_schools().await?;

    let selected: Vec<&School> = schools
        .iter()
        .filter(|s| grade.is_none_or(|g| s.accreditation == g))
        .collect();
    let selected = util::take(selected, args.limit);

    let out = output::render_list(
        &global.output,
        &selected,
        |s| AccreditedRow::from(*s),
        |s| s.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
