//! Batched deletion of orphaned deployments.
//!
//! Deletes within a batch run concurrently and settle independently; batches
//! run strictly one after another with a pause in between.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use sweep_core::{DeletionFailure, DeploymentId, OrphanCandidate, SweepConfig};
use sweep_vercel::DeploymentApi;

use crate::logger::Logger;

/// Settings for one executor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    pub dry_run: bool,
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl From<&SweepConfig> for ExecutorOptions {
    fn from(config: &SweepConfig) -> Self {
        Self {
            dry_run: config.dry_run,
            batch_size: config.batch_size,
            batch_delay: config.batch_delay,
        }
    }
}

/// What the executor did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// Dry run: nothing was sent; `planned` lists what would have been.
    DryRun { planned: Vec<DeploymentId> },
    /// Deletes were issued. Both lists are sorted by deployment id.
    Executed {
        succeeded: Vec<DeploymentId>,
        failures: Vec<DeletionFailure>,
    },
}

impl DeletionOutcome {
    pub fn success_count(&self) -> usize {
        match self {
            DeletionOutcome::DryRun { .. } => 0,
            DeletionOutcome::Executed { succeeded, .. } => succeeded.len(),
        }
    }

    pub fn error_count(&self) -> usize {
        match self {
            DeletionOutcome::DryRun { .. } => 0,
            DeletionOutcome::Executed { failures, .. } => failures.len(),
        }
    }
}

/// Delete `orphans`, or describe the deletions when `options.dry_run` is set.
pub async fn execute(
    api: Arc<dyn DeploymentApi>,
    orphans: &[OrphanCandidate],
    options: &ExecutorOptions,
    logger: &dyn Logger,
) -> DeletionOutcome {
    if options.dry_run {
        return dry_run(orphans, logger);
    }

    let batch_size = options.batch_size.max(1);
    let total_batches = orphans.len().div_ceil(batch_size);
    let mut succeeded = Vec::new();
    let mut failures = Vec::new();

    for (index, batch) in orphans.chunks(batch_size).enumerate() {
        let number = index + 1;
        logger.info(&format!(
            "Processing batch {number}/{total_batches} ({} deployments)",
            batch.len()
        ));

        let (ok, failed) = delete_batch(&api, batch, logger).await;
        tracing::debug!(
            batch = number,
            succeeded = ok.len(),
            failed = failed.len(),
            "batch settled"
        );
        succeeded.extend(ok);
        failures.extend(failed);

        if number < total_batches && !options.batch_delay.is_zero() {
            tracing::debug!(
                delay_ms = options.batch_delay.as_millis() as u64,
                "pausing between batches"
            );
            tokio::time::sleep(options.batch_delay).await;
        }
    }

    succeeded.sort();
    failures.sort_by(|a, b| a.deployment_id.cmp(&b.deployment_id));
    DeletionOutcome::Executed {
        succeeded,
        failures,
    }
}

fn dry_run(orphans: &[OrphanCandidate], logger: &dyn Logger) -> DeletionOutcome {
    for orphan in orphans {
        logger.info(&format!(
            "DRY RUN: Would delete {} ({}, branch '{}')",
            orphan.deployment.id, orphan.deployment.url, orphan.branch
        ));
    }
    DeletionOutcome::DryRun {
        planned: orphans.iter().map(|o| o.id().clone()).collect(),
    }
}

/// Fire every delete in `batch`, then wait for all of them to settle.
async fn delete_batch(
    api: &Arc<dyn DeploymentApi>,
    batch: &[OrphanCandidate],
    logger: &dyn Logger,
) -> (Vec<DeploymentId>, Vec<DeletionFailure>) {
    let mut tasks = JoinSet::new();
    for orphan in batch {
        let api = Arc::clone(api);
        let id = orphan.id().clone();
        let url = orphan.deployment.url.clone();
        tasks.spawn_blocking(move || {
            let result = api.delete(&id);
            (id, url, result)
        });
    }

    let mut pending: Vec<DeploymentId> = batch.iter().map(|o| o.id().clone()).collect();
    let mut succeeded = Vec::new();
    let mut failures = Vec::new();
    let mut join_failure = None;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, url, Ok(()))) => {
                pending.retain(|p| p != &id);
                logger.success(&format!("Deleted {id} ({url})"));
                succeeded.push(id);
            }
            Ok((id, _, Err(err))) => {
                pending.retain(|p| p != &id);
                logger.error(&format!("Failed to delete {id}: {err}"));
                failures.push(DeletionFailure {
                    deployment_id: id,
                    message: err.to_string(),
                });
            }
            Err(err) => {
                tracing::error!(error = %err, "deletion task did not complete");
                join_failure = Some(err.to_string());
            }
        }
    }

    // A task that panicked never reported its id; whatever is left is it.
    let message = join_failure.unwrap_or_else(|| "deletion task did not complete".to_string());
    for id in pending {
        logger.error(&format!("Failed to delete {id}: {message}"));
        failures.push(DeletionFailure {
            deployment_id: id,
            message: message.clone(),
        });
    }

    (succeeded, failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let config = SweepConfig {
            dry_run: true,
            ..SweepConfig::default()
        };
        let options = ExecutorOptions::from(&config);
        assert!(options.dry_run);
        assert_eq!(options.batch_size, 10);
        assert_eq!(options.batch_delay, Duration::from_millis(1000));
    }

    #[test]
    fn dry_run_counts_are_zero() {
        let outcome = DeletionOutcome::DryRun {
            planned: vec![DeploymentId::from("d1")],
        };
        assert_eq!(outcome.success_count(), 0);
        assert_eq!(outcome.error_count(), 0);
    }
}
