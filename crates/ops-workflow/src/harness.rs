//! The batch invocation harness.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{HarnessConfig, SubmissionMode};
use crate::error::InvocationError;
use crate::outcome::{InvocationFailure, InvocationOutcome};
use crate::report::{BatchReport, Reporter, RunReport};
use crate::request::InvocationRequest;
use crate::scenario::BatchPlan;
use crate::service::WorkflowService;

/// Drives a test scenario against a [`WorkflowService`].
///
/// Every request in a plan is submitted and produces exactly one outcome,
/// whatever happens to the others.
pub struct BatchHarness {
    service: Arc<dyn WorkflowService>,
    config: HarnessConfig,
}

impl std::fmt::Debug for BatchHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchHarness")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BatchHarness {
    /// Creates a harness with the default (sequential) configuration.
    #[must_use]
    pub fn new(service: Arc<dyn WorkflowService>) -> Self {
        Self::with_config(service, HarnessConfig::default())
    }

    /// Creates a harness with a specific configuration.
    #[must_use]
    pub fn with_config(service: Arc<dyn WorkflowService>, config: HarnessConfig) -> Self {
        Self { service, config }
    }

    /// The harness configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Validates the arguments and, if they are usable, runs the batch.
    ///
    /// Never fails: a usage error is reported and returned as
    /// [`RunReport::Rejected`] with nothing submitted; invocation failures are
    /// reported one by one and summarised in the [`BatchReport`].
    pub async fn run(
        &self,
        test_name: Option<&str>,
        arg1: Option<&str>,
        reporter: &dyn Reporter,
    ) -> RunReport {
        match BatchPlan::parse(test_name, arg1) {
            Ok(plan) => RunReport::Completed(self.execute(plan, reporter).await),
            Err(err) => {
                warn!(error = %err, "rejected workflow test arguments");
                reporter.usage_error(&err);
                RunReport::Rejected(err)
            }
        }
    }

    /// Submits every request of an already validated plan.
    pub async fn execute(&self, plan: BatchPlan, reporter: &dyn Reporter) -> BatchReport {
        let run_id = Uuid::new_v4();
        let mut report = BatchReport::new(run_id, plan.scenario(), plan.workplaces());

        info!(
            %run_id,
            scenario = %plan.scenario(),
            workplaces = plan.workplaces(),
            requests = plan.total_requests(),
            mode = ?self.config.mode,
            "starting batch"
        );

        match self.config.mode {
            SubmissionMode::Sequential => {
                for request in plan.requests() {
                    let outcome = self.submit(request).await;
                    Self::record(&mut report, outcome, reporter);
                }
            }
            SubmissionMode::Concurrent { max_in_flight } => {
                let mut outcomes = futures::stream::iter(plan.requests())
                    .map(|request| {
                        spawn_submission(
                            Arc::clone(&self.service),
                            self.config.request_timeout,
                            request,
                        )
                    })
                    .buffer_unordered(max_in_flight.max(1));
                while let Some(outcome) = outcomes.next().await {
                    Self::record(&mut report, outcome, reporter);
                }
            }
        }

        info!(
            %run_id,
            issued = report.issued,
            succeeded = report.succeeded,
            failed = report.failed,
            "batch finished"
        );
        reporter.finished(&report);
        report
    }

    async fn submit(&self, request: InvocationRequest) -> InvocationOutcome {
        let result = submit_one(self.service.as_ref(), &request, self.config.request_timeout).await;
        InvocationOutcome::new(request, result)
    }

    fn record(report: &mut BatchReport, outcome: InvocationOutcome, reporter: &dyn Reporter) {
        if let Some(failure) = outcome.failure() {
            warn!(
                run_id = %report.run_id,
                sequence = outcome.request().sequence(),
                workplace = outcome.request().workplace(),
                workflow_id = outcome.request().workflow_id(),
                reason = %failure.reason,
                "workflow invocation failed"
            );
        }
        reporter.outcome(&outcome);
        report.record(outcome);
    }
}

/// Spawns the submission immediately so issuance follows plan order; the
/// returned future resolves once the task does.
fn spawn_submission(
    service: Arc<dyn WorkflowService>,
    timeout: Option<Duration>,
    request: InvocationRequest,
) -> impl Future<Output = InvocationOutcome> {
    let task_request = request.clone();
    let handle =
        tokio::spawn(async move { submit_one(service.as_ref(), &task_request, timeout).await });

    async move {
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => Err(InvocationFailure::aborted(&err, &request)),
        };
        InvocationOutcome::new(request, result)
    }
}

async fn submit_one(
    service: &dyn WorkflowService,
    request: &InvocationRequest,
    timeout: Option<Duration>,
) -> Result<(), InvocationFailure> {
    debug!(
        sequence = request.sequence(),
        workplace = request.workplace(),
        workflow_id = request.workflow_id(),
        "invoking workflow"
    );

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, service.invoke(request))
            .await
            .unwrap_or(Err(InvocationError::TimedOut(limit))),
        None => service.invoke(request).await,
    };
    result.map_err(|err| InvocationFailure::from_error(&err, request))
}
