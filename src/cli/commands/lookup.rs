use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{option_lines, output_data};
use crate::cli::{OutputFormat, SourceArgs};

#[derive(Subcommand)]
pub enum LookupCommands {
    #[command(about = "Load all four documents and report dangling references")]
    Check,

    #[command(about = "Print the province list")]
    Provinces,
}

pub async fn handle(cmd: LookupCommands, source: &SourceArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let lookup = source.load().await?;

    match cmd {
        LookupCommands::Check => {
            let issues = lookup.consistency_issues();
            let data = json!({
                "provinces": lookup.all_provinces.len(),
                "districts": lookup.district_municipalities.len(),
                "municipalities": lookup.municipality_wards.len(),
                "issues": issues,
            });
            output_data(&output_format, &data, || {
                let mut lines = vec![format!(
                    "✓ {} provinces, {} districts, {} municipalities",
                    lookup.all_provinces.len(),
                    lookup.district_municipalities.len(),
                    lookup.municipality_wards.len()
                )];
                if issues.is_empty() {
                    lines.push("✓ No dangling references".to_string());
                }
                for issue in &issues {
                    lines.push(format!(
                        "! {} '{}' under '{}' has no entry in the next table",
                        issue.level, issue.name, issue.parent
                    ));
                }
                lines
            })
        }
        LookupCommands::Provinces => {
            output_data(&output_format, &lookup.all_provinces, || option_lines(&lookup.all_provinces, ""))
        }
    }
}
