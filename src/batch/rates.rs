//! Per-group tasks run by the batch orchestrator.

use std::io::Write;

use serde_json::Value;

use crate::client::{RateClient, Transport};
use crate::domain::{RateGroup, RateGroups, RecordDefaults, TaskOutcome, Terminal};
use crate::error::{AppError, TaskError};
use crate::records;

/// Template first, then the rate record that embeds it.
pub fn create_rate_for_group<T: Transport>(
    client: &RateClient<T>,
    terminal: &Terminal,
    defaults: &RecordDefaults,
    group: &RateGroup,
) -> Result<Value, TaskError> {
    tracing::info!(rate = %group.rate, locations = group.locations.len(), "creating rate");

    let template = records::build_charge_template(terminal, group.rate, defaults);
    let charge = client.create_charge_template(&template)?;
    tracing::debug!(name = %template.name, "charge template created");

    let record = records::build_rate_record(group, terminal, defaults, charge);
    let response = client.create_rate_record(&record)?;
    tracing::info!(name = %record.name, "rate record created");

    Ok(response)
}

/// `Zipcode Group {n}`, numbered by first appearance of the rate.
pub fn zip_group_name(group: &RateGroup) -> String {
    format!("Zipcode Group {}", group.index)
}

pub fn create_zip_group_for<T: Transport>(client: &RateClient<T>, group: &RateGroup) -> Result<Value, TaskError> {
    let name = zip_group_name(group);
    tracing::info!(%name, rate = %group.rate, zip_codes = group.locations.len(), "creating zip group");
    client.create_zip_group(&name, &group.locations)
}

/// Create one template + rate record per group.
pub fn create_rates<T: Transport>(
    groups: &RateGroups,
    client: &RateClient<T>,
    terminal: &Terminal,
    defaults: &RecordDefaults,
    workers: usize,
    sink: Box<dyn Write + Send>,
) -> Result<Vec<TaskOutcome>, AppError> {
    super::run_batch(groups, workers, sink, |group| {
        create_rate_for_group(client, terminal, defaults, group)
    })
}

/// Create one zip-code group profile per rate group.
pub fn create_zip_groups<T: Transport>(
    groups: &RateGroups,
    client: &RateClient<T>,
    workers: usize,
    sink: Box<dyn Write + Send>,
) -> Result<Vec<TaskOutcome>, AppError> {
    super::run_batch(groups, workers, sink, |group| create_zip_group_for(client, group))
}
