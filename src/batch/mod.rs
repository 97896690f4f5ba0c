//! Batch orchestrator.
//!
//! One task per rate group on a bounded `rayon` pool. Each task returns a
//! `Result`; the runner turns it (or a panic) into a `TaskOutcome`, so a
//! failing group never affects its siblings. Outcomes come back in completion
//! order once every task has finished.

use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::domain::{RateGroup, RateGroups, TaskOutcome};
use crate::error::{AppError, TaskError};
use crate::report::Progress;

pub mod rates;

pub use rates::*;

/// Run `task` once per group with at most `workers` tasks in flight.
///
/// One progress line per finished task goes to `sink`.
pub fn run_batch<F>(
    groups: &RateGroups,
    workers: usize,
    sink: Box<dyn Write + Send>,
    task: F,
) -> Result<Vec<TaskOutcome>, AppError>
where
    F: Fn(&RateGroup) -> Result<Value, TaskError> + Sync,
{
    if workers == 0 {
        return Err(AppError::new(2, "Worker count must be at least 1."));
    }
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("rate-worker-{i}"))
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to start worker pool: {e}")))?;

    tracing::info!(groups = groups.len(), workers, "starting batch");

    let progress = Progress::new(groups.len(), sink);

    let task = &task;
    let progress_ref = &progress;
    pool.scope(|scope| {
        for group in groups {
            scope.spawn(move |_| {
                let result = run_isolated(task, group);
                if let Err(e) = &result {
                    tracing::warn!(rate = %group.rate, locations = group.locations.len(), error = %e, "group failed");
                }
                progress_ref.record(TaskOutcome::new(group, result));
            });
        }
    });

    Ok(progress.into_outcomes())
}

fn run_isolated<F>(task: &F, group: &RateGroup) -> Result<Value, TaskError>
where
    F: Fn(&RateGroup) -> Result<Value, TaskError>,
{
    panic::catch_unwind(AssertUnwindSafe(|| task(group)))
        .unwrap_or_else(|payload| Err(TaskError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
