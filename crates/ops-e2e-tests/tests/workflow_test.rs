//! End-to-end tests for workflow smoke test batches.
//!
//! These tests verify:
//! 1. Handshake and ping through the real client
//! 2. Issuance order and payload of a sequential batch
//! 3. Rejected invocations are reported and the batch continues
//! 4. Concurrent batches issue every request exactly once
//! 5. A request the gateway never answers times out on its own
//! 6. A reply arriving after its request timed out is not mistaken for
//!    the answer to a later request

mod helpers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use helpers::*;
use ops_cli::cli::{Format, WorkflowTestArgs};
use ops_cli::client::{ClientConfig, GatewayClient};
use ops_cli::commands::WorkflowTestCommand;
use ops_cli::output::OutputFormat;
use ops_cli::CliError;
use ops_workflow::{
    BatchHarness, CollectingReporter, HarnessConfig, RunReport, SubmissionMode, UsageError,
    WorkflowService,
};
use tokio::time::timeout;

async fn connect(gateway: &TestGateway) -> Arc<GatewayClient> {
    Arc::new(GatewayClient::connect(&gateway.ws_url()).await.unwrap())
}

fn args(test_name: &str, arg1: &str) -> WorkflowTestArgs {
    WorkflowTestArgs {
        test_name: Some(test_name.into()),
        arg1: Some(arg1.into()),
        concurrency: None,
    }
}

// ============================================================================
// Connection Tests
// ============================================================================

#[tokio::test]
async fn test_client_handshake_and_ping() {
    let gateway = TestGateway::start(GatewayScript::default()).await;
    let client = connect(&gateway).await;

    assert_eq!(client.server_version(), "fake-gateway");
    let rtt = timeout(TEST_TIMEOUT, client.ping()).await.unwrap().unwrap();
    assert!(rtt < TEST_TIMEOUT);

    gateway.shutdown();
}

// ============================================================================
// Batch Tests
// ============================================================================

#[tokio::test]
async fn test_sequential_batch_issues_in_order() {
    let gateway = TestGateway::start(GatewayScript::default()).await;
    let harness = BatchHarness::new(connect(&gateway).await);
    let reporter = CollectingReporter::new();

    let run = harness
        .run(Some("invoke-sample"), Some("1"), &reporter)
        .await;
    let report = run.batch().unwrap();

    assert_eq!(report.issued, 6);
    assert_eq!(report.succeeded, 6);

    let received: Vec<_> = gateway
        .invocations()
        .into_iter()
        .map(|d| (d.workplace, d.workflow_id))
        .collect();
    let expected: Vec<_> = ["test_name-0", "test_name-1"]
        .into_iter()
        .flat_map(|wp| {
            ["sample.workflow-0", "sample.workflow-1", "sample.workflow-2"]
                .into_iter()
                .map(move |wf| (wp.to_string(), wf.to_string()))
        })
        .collect();
    assert_eq!(received, expected);

    for description in gateway.invocations() {
        assert_eq!(description.data.get("count"), Some(&serde_json::json!(0)));
    }

    gateway.shutdown();
}

#[tokio::test]
async fn test_rejections_do_not_stop_the_batch() {
    let gateway = TestGateway::start(GatewayScript::rejecting([1, 4])).await;
    let harness = BatchHarness::new(connect(&gateway).await);
    let reporter = CollectingReporter::new();

    let run = harness
        .run(Some("invoke-sample"), Some("2"), &reporter)
        .await;
    let report = run.batch().unwrap();

    assert_eq!(gateway.invocations().len(), 9);
    assert_eq!(report.issued, 9);
    assert_eq!(report.failed, 2);

    let failed: Vec<_> = reporter
        .failures()
        .iter()
        .map(|o| o.request().sequence())
        .collect();
    assert_eq!(failed, [1, 4]);

    let failure = reporter.failures()[0].failure().cloned().unwrap();
    assert!(failure.reason.contains("code 500"));
    assert!(failure.reason.contains("test_name-0 is locked"));

    gateway.shutdown();
}

#[tokio::test]
async fn test_concurrent_batch_issues_everything_once() {
    let gateway = TestGateway::start(GatewayScript::default()).await;
    let config = HarnessConfig::new().with_mode(SubmissionMode::concurrent(4));
    let harness = BatchHarness::with_config(connect(&gateway).await, config);
    let reporter = CollectingReporter::new();

    let run = harness
        .run(Some("invoke-sample"), Some("3"), &reporter)
        .await;
    assert_eq!(run.batch().unwrap().succeeded, 12);

    let mut received: Vec<_> = gateway
        .invocations()
        .into_iter()
        .map(|d| format!("{}/{}", d.workplace, d.workflow_id))
        .collect();
    received.sort();
    received.dedup();
    assert_eq!(received.len(), 12);

    gateway.shutdown();
}

#[tokio::test]
async fn test_unanswered_request_times_out_alone() {
    let gateway = TestGateway::start(GatewayScript::hanging([1])).await;
    let config = ClientConfig::new().with_request_timeout(Duration::from_millis(300));
    let client = GatewayClient::connect_with_config(&gateway.ws_url(), config)
        .await
        .unwrap();
    let harness = BatchHarness::new(Arc::new(client));
    let reporter = CollectingReporter::new();

    let run = timeout(
        TEST_TIMEOUT,
        harness.run(Some("invoke-sample"), Some("0"), &reporter),
    )
    .await
    .unwrap();
    let report = run.batch().unwrap();

    assert_eq!(report.issued, 3);
    assert_eq!(report.failed, 1);
    let failure = reporter.failures()[0].failure().cloned().unwrap();
    assert!(failure.reason.contains("timed out"));

    gateway.shutdown();
}

async fn run_with_short_timeout(
    gateway: &TestGateway,
    arg1: &str,
) -> (RunReport, CollectingReporter) {
    let config = ClientConfig::new().with_request_timeout(Duration::from_millis(300));
    let client = GatewayClient::connect_with_config(&gateway.ws_url(), config)
        .await
        .unwrap();
    let harness = BatchHarness::new(Arc::new(client));
    let reporter = CollectingReporter::new();
    let run = timeout(
        TEST_TIMEOUT,
        harness.run(Some("invoke-sample"), Some(arg1), &reporter),
    )
    .await
    .unwrap();
    (run, reporter)
}

#[tokio::test]
async fn test_late_reply_fails_only_its_own_request() {
    let script = GatewayScript::answering_late([1], Duration::from_millis(600));
    let gateway = TestGateway::start(script).await;

    let (run, reporter) = run_with_short_timeout(&gateway, "2").await;
    let report = run.batch().unwrap();

    assert_eq!(gateway.invocations().len(), 9);
    assert_eq!(report.issued, 9);
    assert_eq!(report.succeeded, 8);
    assert_eq!(report.failed, 1);

    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].request().sequence(), 1);
    assert!(failures[0].failure().unwrap().reason.contains("timed out"));

    gateway.shutdown();
}

#[tokio::test]
async fn test_late_rejection_is_not_charged_to_a_later_request() {
    let script = GatewayScript {
        reject: [1].into(),
        late: HashMap::from([(1, Duration::from_millis(600))]),
        ..GatewayScript::default()
    };
    let gateway = TestGateway::start(script).await;

    let (run, reporter) = run_with_short_timeout(&gateway, "2").await;
    let report = run.batch().unwrap();

    assert_eq!(report.issued, 9);
    assert_eq!(report.failed, 1);
    let failed: Vec<_> = reporter
        .failures()
        .iter()
        .map(|o| o.request().sequence())
        .collect();
    assert_eq!(failed, [1]);

    gateway.shutdown();
}

#[tokio::test]
async fn test_usage_error_sends_nothing() {
    let gateway = TestGateway::start(GatewayScript::default()).await;
    let service: Arc<dyn WorkflowService> = connect(&gateway).await;
    let harness = BatchHarness::new(service);
    let reporter = CollectingReporter::new();

    let run = harness
        .run(Some("invoke-sample"), Some("-"), &reporter)
        .await;

    assert_eq!(
        run.usage_error(),
        Some(&UsageError::RepeatNotInteger("-".into()))
    );
    assert!(gateway.invocations().is_empty());

    gateway.shutdown();
}

// ============================================================================
// Command Tests
// ============================================================================

#[tokio::test]
async fn test_command_prints_json_summary() {
    let gateway = TestGateway::start(GatewayScript::default()).await;
    let command = WorkflowTestCommand::new(gateway.ws_url(), ClientConfig::new());
    let mut out = Vec::new();

    command
        .execute(
            &mut out,
            &OutputFormat::new(Format::Json),
            &args("invoke-sample", "0"),
        )
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["scenario"], "invoke-sample");
    assert_eq!(value["issued"], 3);
    assert_eq!(value["failed"], 0);

    gateway.shutdown();
}

#[tokio::test]
async fn test_command_fails_when_an_invocation_fails() {
    let gateway = TestGateway::start(GatewayScript::rejecting([0])).await;
    let command = WorkflowTestCommand::new(gateway.ws_url(), ClientConfig::new());
    let mut out = Vec::new();

    let err = command
        .execute(&mut out, &OutputFormat::default(), &args("invoke-sample", "0"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::InvocationsFailed {
            failed: 1,
            issued: 3
        }
    ));
    assert_eq!(gateway.invocations().len(), 3);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Failed:      1"));

    gateway.shutdown();
}
