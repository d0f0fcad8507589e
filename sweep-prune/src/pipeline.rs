//! Whole-run orchestration.
//!
//! ```text
//! Idle → Validating → Enumerating → Fetching → Detecting
//!      → DryRunReporting | Deleting → Reporting → Done
//! ```
//!
//! Validation, enumeration, and fetch failures return `Err` straight away;
//! no deployment is deleted unless the full listing was fetched.

use std::fmt;
use std::sync::Arc;

use sweep_core::{detect_orphans, RunReport, SweepConfig};
use sweep_git::BranchSource;
use sweep_vercel::{fetch_all, DeploymentApi, RetryPolicy};

use crate::error::PruneError;
use crate::executor::{self, DeletionOutcome, ExecutorOptions};
use crate::logger::Logger;

/// Run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Enumerating,
    Fetching,
    Detecting,
    DryRunReporting,
    Deleting,
    Reporting,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::Enumerating => "enumerating branches",
            Phase::Fetching => "fetching deployments",
            Phase::Detecting => "detecting orphans",
            Phase::DryRunReporting => "dry-run reporting",
            Phase::Deleting => "deleting",
            Phase::Reporting => "reporting",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Inputs to [`run`] beyond its collaborators.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub config: SweepConfig,
    pub retry: RetryPolicy,
}

struct Tracker {
    phase: Phase,
}

impl Tracker {
    fn enter(&mut self, next: Phase) {
        tracing::debug!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }
}

/// Run one sweep: list branches, fetch deployments, classify, then delete
/// or report.
pub async fn run(
    request: &RunRequest,
    branches: &dyn BranchSource,
    api: Arc<dyn DeploymentApi>,
    logger: &dyn Logger,
) -> Result<RunReport, PruneError> {
    let config = &request.config;
    let mut tracker = Tracker { phase: Phase::Idle };

    tracker.enter(Phase::Validating);
    config.validate()?;
    branches.validate().map_err(|source| PruneError::Git {
        phase: Phase::Validating,
        source,
    })?;

    tracker.enter(Phase::Enumerating);
    logger.info("Fetching git branches...");
    let branch_set = branches.list_branches().map_err(|source| PruneError::Git {
        phase: Phase::Enumerating,
        source,
    })?;
    logger.info(&format!("Found {} branches", branch_set.len()));

    tracker.enter(Phase::Fetching);
    logger.info("Fetching Vercel deployments...");
    let deployments = fetch_all(Arc::clone(&api), config.page_size, &request.retry)
        .await
        .map_err(PruneError::Fetch)?;
    logger.info(&format!("Found {} deployments", deployments.len()));

    tracker.enter(Phase::Detecting);
    let detection = detect_orphans(&deployments, &branch_set, &config.protected);
    for id in &detection.missing_branch {
        logger.warning(&format!(
            "Deployment {id} has no branch metadata; skipping"
        ));
    }

    let mut report = RunReport {
        dry_run: config.dry_run,
        scanned: deployments.len(),
        orphans: detection.orphans.len(),
        missing_branch: detection.missing_branch.len(),
        orphan_ids: detection.orphans.iter().map(|o| o.id().clone()).collect(),
        ..RunReport::default()
    };

    if detection.orphans.is_empty() {
        tracker.enter(Phase::Reporting);
        logger.success("No orphaned deployments found");
        tracker.enter(Phase::Done);
        return Ok(report);
    }

    logger.info(&format!(
        "Found {} orphaned deployments",
        detection.orphans.len()
    ));

    tracker.enter(if config.dry_run {
        Phase::DryRunReporting
    } else {
        Phase::Deleting
    });
    let outcome = executor::execute(
        api,
        &detection.orphans,
        &ExecutorOptions::from(config),
        logger,
    )
    .await;

    tracker.enter(Phase::Reporting);
    if let DeletionOutcome::Executed { failures, .. } = &outcome {
        report.failures = failures.clone();
    }
    report.succeeded = outcome.success_count();
    report.failed = outcome.error_count();
    summarize(&report, logger);

    tracker.enter(Phase::Done);
    Ok(report)
}

fn summarize(report: &RunReport, logger: &dyn Logger) {
    logger.info("Summary:");
    logger.info(&format!("  Deployments scanned: {}", report.scanned));
    logger.info(&format!("  Orphaned deployments: {}", report.orphans));
    if report.dry_run {
        logger.warning("DRY RUN: no deployments were deleted");
        return;
    }
    logger.success(&format!("  Deleted: {}", report.succeeded));
    if report.failed > 0 {
        logger.error(&format!("  Failed: {}", report.failed));
        for failure in &report.failures {
            logger.error(&format!("    {}: {}", failure.deployment_id, failure.message));
        }
    }
}
