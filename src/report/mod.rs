//! Reporting: live progress while the batch runs, and the final tally.
//!
//! Status comes only from `TaskOutcome::result`; response bodies are never
//! inspected to decide success.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::domain::{Rate, TaskOutcome};

pub mod format;

pub use format::*;

/// Collects outcomes as tasks finish and prints one progress line per task.
///
/// The sink and the counters share one lock so lines from different workers
/// never interleave.
pub struct Progress {
    state: Mutex<ProgressState>,
}

struct ProgressState {
    total: usize,
    completed: usize,
    out: Box<dyn Write + Send>,
    outcomes: Vec<TaskOutcome>,
}

impl Progress {
    pub fn new(total: usize, out: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                total,
                completed: 0,
                out,
                outcomes: Vec::with_capacity(total),
            }),
        }
    }

    /// Record a finished task; outcomes keep completion order.
    pub fn record(&self, outcome: TaskOutcome) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.completed += 1;

        let line = format_progress_line(state.completed, state.total, &outcome);
        if let Err(e) = writeln!(state.out, "{line}").and_then(|()| state.out.flush()) {
            tracing::warn!(error = %e, "failed to write progress line");
        }

        state.outcomes.push(outcome);
    }

    pub fn completed(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).completed
    }

    pub fn into_outcomes(self) -> Vec<TaskOutcome> {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .outcomes
    }
}

/// One failed group, with enough detail to retry it by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureDetail {
    pub rate: Rate,
    pub location_count: usize,
    pub error: String,
}

/// Final tally of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
    /// Ordered by ascending rate.
    pub failures: Vec<FailureDetail>,
}

impl Summary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

pub fn summarize(outcomes: &[TaskOutcome]) -> Summary {
    let mut failures: Vec<FailureDetail> = outcomes
        .iter()
        .filter_map(|o| {
            o.error().map(|e| FailureDetail {
                rate: o.rate,
                location_count: o.location_count,
                error: e.to_string(),
            })
        })
        .collect();
    failures.sort_by(|a, b| a.rate.value().total_cmp(&b.rate.value()));

    let failed = failures.len();
    Summary {
        successful: outcomes.len() - failed,
        failed,
        total: outcomes.len(),
        failures,
    }
}
