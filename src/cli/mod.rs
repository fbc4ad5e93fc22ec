pub mod commands;
pub mod utils;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::address::{
    AddressSelection, DirLookupSource, GeographicLookup, HttpLookupSource, LookupSource,
};

#[derive(Parser)]
#[command(name = "homestay")]
#[command(about = "Homestay CLI - inspect address lookups and try cascading edits")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Load and inspect the address lookup")]
    Lookup {
        #[command(subcommand)]
        cmd: commands::lookup::LookupCommands,
    },

    #[command(about = "List the options offered at one level")]
    Options {
        #[arg(help = "province, district, municipality or ward")]
        level: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    #[command(about = "Apply one edit and print the consolidated patch")]
    Change {
        #[arg(help = "province, district, municipality or ward")]
        level: String,
        #[arg(help = "New value (empty string clears the level)")]
        value: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    #[command(about = "Show a ward label with Devanagari digits as ASCII")]
    Ward {
        #[arg(help = "Ward label as stored")]
        value: String,
    },
}

/// Where to load the lookup from; falls back to the server configuration
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(long, global = true, help = "Directory holding the four lookup documents")]
    pub dir: Option<String>,

    #[arg(long, global = true, conflicts_with = "dir", help = "Base URL serving the four lookup documents")]
    pub url: Option<String>,
}

impl SourceArgs {
    pub fn source(&self) -> anyhow::Result<Arc<dyn LookupSource>> {
        let config = crate::config::config();
        match (&self.url, &self.dir) {
            (Some(url), _) => {
                let timeout = Duration::from_secs(config.lookup.timeout_secs);
                Ok(Arc::new(HttpLookupSource::new(url, timeout)?))
            }
            (None, Some(dir)) => Ok(Arc::new(DirLookupSource::new(dir))),
            (None, None) => Ok(config.lookup_source()?),
        }
    }

    /// Load the lookup, failing the command if any document is unavailable
    pub async fn load(&self) -> anyhow::Result<GeographicLookup> {
        let source = self.source()?;
        let lookup = source.load().await?;
        tracing::debug!("Loaded lookup from {}", source.describe());
        Ok(lookup)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    #[arg(long, default_value = "")]
    pub province: String,
    #[arg(long, default_value = "")]
    pub district: String,
    #[arg(long, default_value = "")]
    pub municipality: String,
    #[arg(long, default_value = "")]
    pub ward: String,
}

impl From<SelectionArgs> for AddressSelection {
    fn from(args: SelectionArgs) -> Self {
        AddressSelection {
            province: args.province,
            district: args.district,
            municipality: args.municipality,
            ward: args.ward,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Lookup { cmd } => commands::lookup::handle(cmd, &cli.source, output_format).await,
        Commands::Options { level, selection } => {
            commands::address::options(&level, selection.into(), &cli.source, output_format).await
        }
        Commands::Change { level, value, selection } => {
            commands::address::change(&level, &value, selection.into(), &cli.source, output_format).await
        }
        Commands::Ward { value } => commands::address::ward(&value, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_change_with_selection_flags() {
        let cli = Cli::try_parse_from([
            "homestay", "--json", "--dir", "data", "change", "province", "Gandaki", "--province", "Bagmati",
            "--district", "Kathmandu",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.source.dir.as_deref(), Some("data"));
        match cli.command {
            Commands::Change { level, value, selection } => {
                assert_eq!(level, "province");
                assert_eq!(value, "Gandaki");
                let selection: AddressSelection = selection.into();
                assert_eq!(selection.district, "Kathmandu");
                assert_eq!(selection.ward, "");
            }
            _ => panic!("expected change command"),
        }
    }

    #[test]
    fn dir_and_url_conflict() {
        assert!(Cli::try_parse_from(["homestay", "--dir", "a", "--url", "http://b", "ward", "1"]).is_err());
    }
}
