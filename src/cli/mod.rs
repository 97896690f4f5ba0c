//! Command-line parsing for the zip-code rate loader.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! grouping/orchestration code.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_WORKERS;
use crate::domain::OperatingMode;
use crate::io::ingest::{DEFAULT_LOCATION_COLUMN, DEFAULT_RATE_COLUMN};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ziprates", version, about = "Create zip-code rate records from a rate sheet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Group the rate sheet and print the breakdown (no remote calls).
    Plan(InputArgs),
    /// Create one charge template + rate record per rate group.
    Create(CreateArgs),
    /// Write one CSV of zip codes per rate group.
    Split(SplitArgs),
    /// Create one zip-code group profile per rate group.
    ZipGroups(ZipGroupArgs),
}

/// Where the rate sheet is and which columns to read.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Rate sheet CSV.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: PathBuf,

    /// Column holding the zip code.
    #[arg(long, default_value = DEFAULT_LOCATION_COLUMN)]
    pub zip_column: String,

    /// Column holding the rate.
    #[arg(long, default_value = DEFAULT_RATE_COLUMN)]
    pub rate_column: String,
}

/// Connection and batch options shared by commands that call the service.
#[derive(Debug, Args, Clone)]
pub struct RemoteArgs {
    /// Rate service base URL (falls back to RATES_API_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token (falls back to RATES_API_TOKEN).
    #[arg(long)]
    pub token: Option<String>,

    /// Maximum number of groups processed concurrently.
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub workers: usize,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Debug, Args, Clone)]
pub struct CreateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Terminal id the records are scoped to.
    #[arg(long)]
    pub terminal_id: String,

    /// Terminal display name (also the record name prefix).
    #[arg(long)]
    pub terminal_name: String,

    /// Customer rates (standard) or driver load tariffs (driver).
    #[arg(long, value_enum, default_value_t = OperatingMode::Standard)]
    pub mode: OperatingMode,

    /// Load types the records apply to.
    #[arg(long, value_delimiter = ',', default_values_t = ["IMPORT".to_string(), "EXPORT".to_string(), "ROAD".to_string()])]
    pub load_types: Vec<String>,

    /// Effective start (RFC 3339). Defaults to 2025-06-24T05:00:00.000Z.
    #[arg(long)]
    pub effective_start: Option<DateTime<Utc>>,

    /// Effective end (RFC 3339). Defaults to 2032-03-02T04:59:59.999Z.
    #[arg(long)]
    pub effective_end: Option<DateTime<Utc>>,

    /// Rate record description.
    #[arg(long, default_value = "-")]
    pub description: String,

    /// Charge name on the template.
    #[arg(long, default_value = "Line Haul")]
    pub charge_name: String,

    /// Charge code on the template.
    #[arg(long, default_value = "Base Price")]
    pub charge_code: String,

    /// Charge description on the template.
    #[arg(long, default_value = "Line Haul")]
    pub charge_description: String,

    /// Charge profile group id to attach (repeatable).
    #[arg(long = "charge-profile-group", value_name = "ID")]
    pub charge_profile_groups: Vec<String>,

    /// Classification override `key=value` (repeatable), e.g. `hazmat=true`.
    ///
    /// Values are parsed as JSON when possible, otherwise taken as strings.
    #[arg(long = "classification", value_name = "KEY=VALUE")]
    pub classifications: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SplitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory for the per-rate CSV files.
    #[arg(long, value_name = "DIR", default_value = "output_csv_files")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ZipGroupArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_defaults() {
        let cli = Cli::try_parse_from([
            "ziprates",
            "create",
            "-f",
            "rates.csv",
            "--terminal-id",
            "T1",
            "--terminal-name",
            "Norfolk",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.mode, OperatingMode::Standard);
        assert_eq!(args.remote.workers, 10);
        assert!(!args.remote.yes);
        assert_eq!(args.load_types, vec!["IMPORT", "EXPORT", "ROAD"]);
        assert_eq!(args.input.zip_column, "ZIPCODE");
        assert_eq!(args.input.rate_column, "LINEHAUL");
        assert!(args.effective_start.is_none());
    }

    #[test]
    fn create_overrides() {
        let cli = Cli::try_parse_from([
            "ziprates",
            "create",
            "-f",
            "rates.csv",
            "--terminal-id",
            "T1",
            "--terminal-name",
            "Norfolk",
            "--mode",
            "driver",
            "-w",
            "4",
            "--yes",
            "--load-types",
            "IMPORT,EXPORT",
            "--classification",
            "hazmat=true",
            "--charge-profile-group",
            "g1",
            "--effective-start",
            "2026-01-01T00:00:00Z",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.mode, OperatingMode::Driver);
        assert_eq!(args.remote.workers, 4);
        assert!(args.remote.yes);
        assert_eq!(args.load_types, vec!["IMPORT", "EXPORT"]);
        assert_eq!(args.classifications, vec!["hazmat=true"]);
        assert_eq!(args.charge_profile_groups, vec!["g1"]);
        assert_eq!(
            args.effective_start.unwrap().to_rfc3339(),
            "2026-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn zero_workers_rejected() {
        let res = Cli::try_parse_from(["ziprates", "zip-groups", "-f", "rates.csv", "-w", "0"]);
        assert!(res.is_err());
    }
}
