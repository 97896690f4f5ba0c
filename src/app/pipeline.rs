//! Shared load/run steps used by the CLI handlers.
//!
//! read CSV -> group by rate -> (remote) batch -> outcomes
//!
//! Handlers in `app.rs` only deal with prompting and printing.

use std::io;
use std::path::Path;

use crate::cli::prompt::validate_csv_path;
use crate::client::{HttpTransport, RateClient};
use crate::config::ApiConfig;
use crate::domain::{OperatingMode, RateGroups, RecordDefaults, TaskOutcome, Terminal};
use crate::error::AppError;
use crate::io::ingest::{ColumnNames, read_rate_rows};

/// Read and group a rate sheet. Any ingest problem aborts before remote work.
pub fn load_groups(path: &Path, columns: &ColumnNames) -> Result<RateGroups, AppError> {
    let path = validate_csv_path(path)?;
    let rows = read_rate_rows(&path, columns)?;
    let groups = crate::grouping::group_by_rate(rows)?;

    tracing::info!(
        file = %path.display(),
        groups = groups.len(),
        locations = groups.total_locations(),
        "rate sheet grouped"
    );
    Ok(groups)
}

/// Everything `create` needs besides the groups themselves.
#[derive(Debug, Clone)]
pub struct CreateRun {
    pub api: ApiConfig,
    pub mode: OperatingMode,
    pub terminal: Terminal,
    pub defaults: RecordDefaults,
    pub workers: usize,
}

/// Create template + rate record for every group against the live service.
pub fn run_create(groups: &RateGroups, run: &CreateRun) -> Result<Vec<TaskOutcome>, AppError> {
    let client = RateClient::new(HttpTransport::new(run.api.clone())?, run.mode);
    crate::batch::create_rates(
        groups,
        &client,
        &run.terminal,
        &run.defaults,
        run.workers,
        Box::new(io::stdout()),
    )
}

/// Create one zip-code group profile per rate group against the live service.
pub fn run_zip_groups(groups: &RateGroups, api: ApiConfig, workers: usize) -> Result<Vec<TaskOutcome>, AppError> {
    // Zip-group profiles live under the customer side of the service.
    let client = RateClient::new(HttpTransport::new(api)?, OperatingMode::Standard);
    crate::batch::create_zip_groups(groups, &client, workers, Box::new(io::stdout()))
}
