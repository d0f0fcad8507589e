//! Full runs of the sweep pipeline against in-memory collaborators.

mod support;

use std::sync::Arc;

use sweep_core::{CoreError, Deployment, DeploymentId, SweepConfig, Target};
use sweep_prune::{run, Level, MemoryLogger, Phase, PruneError, RunRequest};
use sweep_vercel::{RetryPolicy, VercelError};

use support::{preview, FakeApi, StaticBranches};

fn request(dry_run: bool) -> RunRequest {
    RunRequest {
        config: SweepConfig {
            dry_run,
            ..SweepConfig::default()
        },
        retry: RetryPolicy::none(),
    }
}

fn example_deployments() -> Vec<Deployment> {
    vec![
        preview("d1", Some("feature-x")),
        preview("d2", Some("feature-y")),
        Deployment::new("d3", Target::Production, Some("feature-z"), "d3.vercel.app"),
        preview("d4", None),
    ]
}

#[tokio::test]
async fn end_to_end_deletes_only_the_orphan() {
    let api = Arc::new(FakeApi::with_deployments(example_deployments()));
    let branches = StaticBranches::new(&["main", "feature-x"]);
    let logger = MemoryLogger::new();

    let report = run(&request(false), &branches, api.clone(), &logger)
        .await
        .expect("run");

    assert_eq!(api.delete_calls(), vec![DeploymentId::from("d2")]);
    assert_eq!(report.scanned, 4);
    assert_eq!(report.orphans, 1);
    assert_eq!(report.orphan_ids, vec![DeploymentId::from("d2")]);
    assert_eq!(report.missing_branch, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);
    assert!(logger
        .messages(Level::Warning)
        .iter()
        .any(|l| l.contains("d4") && l.contains("no branch metadata")));
}

#[tokio::test]
async fn dry_run_reports_without_deleting() {
    let api = Arc::new(FakeApi::with_deployments(example_deployments()));
    let branches = StaticBranches::new(&["main", "feature-x"]);
    let logger = MemoryLogger::new();

    let report = run(&request(true), &branches, api.clone(), &logger)
        .await
        .expect("run");

    assert!(api.delete_calls().is_empty());
    assert!(report.dry_run);
    assert_eq!(report.orphans, 1);
    assert_eq!(report.succeeded, 0);
    assert!(logger.contains("DRY RUN: Would delete d2"));
    assert!(logger.contains("DRY RUN: no deployments were deleted"));
}

#[tokio::test]
async fn no_orphans_is_a_successful_run() {
    let api = Arc::new(FakeApi::with_deployments(vec![preview("d1", Some("feature-x"))]));
    let branches = StaticBranches::new(&["feature-x"]);
    let logger = MemoryLogger::new();

    let report = run(&request(false), &branches, api.clone(), &logger)
        .await
        .expect("run");

    assert_eq!(report.orphans, 0);
    assert!(api.delete_calls().is_empty());
    assert!(logger
        .messages(Level::Success)
        .contains(&"No orphaned deployments found".to_string()));
}

#[tokio::test]
async fn deletion_failures_are_reported_not_fatal() {
    let deployments = vec![
        preview("d1", Some("gone-1")),
        preview("d2", Some("gone-2")),
    ];
    let api = Arc::new(FakeApi::with_deployments(deployments).fail_on("d1"));
    let branches = StaticBranches::new(&["main"]);
    let logger = MemoryLogger::new();

    let report = run(&request(false), &branches, api.clone(), &logger)
        .await
        .expect("run completes despite a failed delete");

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].deployment_id, DeploymentId::from("d1"));
    assert!(logger.contains("  Failed: 1"));
}

#[tokio::test]
async fn fetch_failure_aborts_before_any_delete() {
    let api = Arc::new(FakeApi {
        list_status: Some(500),
        ..FakeApi::with_deployments(example_deployments())
    });
    let branches = StaticBranches::new(&["main"]);
    let logger = MemoryLogger::new();

    let err = run(&request(false), &branches, api.clone(), &logger)
        .await
        .expect_err("fetch fails");

    assert!(matches!(err, PruneError::Fetch(_)), "{err}");
    assert_eq!(err.phase(), Phase::Fetching);
    assert!(api.delete_calls().is_empty());
}

#[tokio::test]
async fn repeated_cursor_aborts_instead_of_pruning_a_partial_listing() {
    let api = Arc::new(FakeApi {
        stuck_cursor: Some(1_700_000_000_000),
        ..FakeApi::with_deployments(example_deployments())
    });
    let branches = StaticBranches::new(&["main"]);
    let logger = MemoryLogger::new();

    let err = run(&request(false), &branches, api.clone(), &logger)
        .await
        .expect_err("listing cannot complete");

    assert!(
        matches!(err, PruneError::Fetch(VercelError::Pagination { .. })),
        "{err}"
    );
    assert_eq!(api.list_count(), 2);
    assert!(api.delete_calls().is_empty());
}

#[tokio::test]
async fn git_validation_failure_happens_before_network() {
    let api = Arc::new(FakeApi::with_deployments(example_deployments()));
    let branches = StaticBranches {
        unavailable: true,
        ..StaticBranches::new(&[])
    };
    let logger = MemoryLogger::new();

    let err = run(&request(false), &branches, api.clone(), &logger)
        .await
        .expect_err("git unavailable");

    assert_eq!(err.phase(), Phase::Validating);
    assert_eq!(api.list_count(), 0, "no listing before validation passes");
}

#[tokio::test]
async fn invalid_config_is_rejected_up_front() {
    let api = Arc::new(FakeApi::default());
    let branches = StaticBranches::new(&[]);
    let logger = MemoryLogger::new();
    let mut req = request(false);
    req.config.batch_size = 0;

    let err = run(&req, &branches, api.clone(), &logger)
        .await
        .expect_err("invalid batch size");

    assert!(matches!(err, PruneError::Config(CoreError::InvalidBatchSize(0))));
    assert_eq!(api.list_count(), 0);
}
