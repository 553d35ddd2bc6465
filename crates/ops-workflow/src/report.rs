//! Reporting of usage errors, outcomes and batch summaries.

use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::error::UsageError;
use crate::outcome::InvocationOutcome;
use crate::scenario::TestScenario;

/// Receives everything the harness has to tell the operator.
///
/// Outcomes are delivered as they are produced, not at the end of the batch.
pub trait Reporter: Send + Sync {
    /// The arguments were rejected; nothing will be submitted.
    fn usage_error(&self, error: &UsageError);

    /// One request finished.
    fn outcome(&self, outcome: &InvocationOutcome);

    /// The batch finished.
    fn finished(&self, report: &BatchReport) {
        let _ = report;
    }
}

/// Summary of one executed batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Identifier used to correlate log lines of this batch.
    pub run_id: Uuid,
    /// Scenario that was run.
    pub scenario: TestScenario,
    /// Number of workplaces generated.
    pub workplaces: u32,
    /// Requests issued.
    pub issued: u64,
    /// Requests the engine accepted.
    pub succeeded: u64,
    /// Requests that failed.
    pub failed: u64,
    /// Outcomes of the failed requests, in completion order.
    pub failures: Vec<InvocationOutcome>,
}

impl BatchReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(run_id: Uuid, scenario: TestScenario, workplaces: u32) -> Self {
        Self {
            run_id,
            scenario,
            workplaces,
            issued: 0,
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    /// Counts an outcome.
    pub fn record(&mut self, outcome: InvocationOutcome) {
        self.issued += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failures.push(outcome);
        }
    }

    /// Returns true if every issued request succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// What a call to [`crate::BatchHarness::run`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    /// The arguments were rejected before anything was submitted.
    Rejected(UsageError),
    /// The batch ran to completion.
    Completed(BatchReport),
}

impl RunReport {
    /// The batch report, if the run got that far.
    #[must_use]
    pub const fn batch(&self) -> Option<&BatchReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Rejected(_) => None,
        }
    }

    /// The usage error, if the run was rejected.
    #[must_use]
    pub const fn usage_error(&self) -> Option<&UsageError> {
        match self {
            Self::Rejected(err) => Some(err),
            Self::Completed(_) => None,
        }
    }
}

/// Reporter that keeps everything in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    usage_errors: Mutex<Vec<UsageError>>,
    outcomes: Mutex<Vec<InvocationOutcome>>,
    finished: Mutex<Option<BatchReport>>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Usage errors reported so far.
    #[must_use]
    pub fn usage_errors(&self) -> Vec<UsageError> {
        self.usage_errors.lock().clone()
    }

    /// Outcomes reported so far, in delivery order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<InvocationOutcome> {
        self.outcomes.lock().clone()
    }

    /// Failed outcomes reported so far.
    #[must_use]
    pub fn failures(&self) -> Vec<InvocationOutcome> {
        self.outcomes
            .lock()
            .iter()
            .filter(|o| !o.is_success())
            .cloned()
            .collect()
    }

    /// The final batch report, once delivered.
    #[must_use]
    pub fn finished_report(&self) -> Option<BatchReport> {
        self.finished.lock().clone()
    }
}

impl Reporter for CollectingReporter {
    fn usage_error(&self, error: &UsageError) {
        self.usage_errors.lock().push(error.clone());
    }

    fn outcome(&self, outcome: &InvocationOutcome) {
        self.outcomes.lock().push(outcome.clone());
    }

    fn finished(&self, report: &BatchReport) {
        *self.finished.lock() = Some(report.clone());
    }
}
