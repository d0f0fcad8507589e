//! `vercel-sweep` — delete preview deployments whose branch is gone.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;

use sweep_core::config::{DEFAULT_BATCH_SIZE, DEFAULT_PAGE_SIZE};
use sweep_core::{ProtectedBranches, RunReport, SweepConfig};
use sweep_git::GitBranches;
use sweep_prune::{pipeline, Logger, RunRequest};
use sweep_vercel::{paths::DEFAULT_BASE_URL, ClientConfig, RetryPolicy, VercelClient};

use crate::console::ConsoleLogger;

/// Environment variable holding the API bearer token.
pub const TOKEN_ENV: &str = "VERCEL_BEARER_TOKEN";

/// Arguments for a sweep run.
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// List what would be deleted without deleting anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Repository whose branches are compared against deployments.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Vercel team to scope listing and deletion to.
    #[arg(long, value_name = "ID", env = "VERCEL_TEAM_ID")]
    pub team: Option<String>,

    /// Only consider deployments of this Vercel project.
    #[arg(long, value_name = "ID", env = "VERCEL_PROJECT_ID")]
    pub project: Option<String>,

    /// Extra branch whose deployments are never deleted (repeatable).
    /// `main` and `master` are always protected.
    #[arg(long = "protect", value_name = "BRANCH")]
    pub protect: Vec<String>,

    /// Deployments deleted concurrently per batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Pause between batches, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub batch_delay_ms: u64,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// API base URL.
    #[arg(long, value_name = "URL", env = "VERCEL_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,
}

impl SweepArgs {
    pub fn run(self) -> Result<()> {
        let logger = ConsoleLogger::new(self.json);

        let token = read_token()?;
        let config = self.sweep_config()?;
        config.validate().context("invalid arguments")?;

        if config.dry_run {
            logger.warning("Running in DRY RUN mode - no deployments will be deleted");
        }

        let client = VercelClient::new(ClientConfig {
            token,
            team_id: self.team.clone(),
            project_id: self.project.clone(),
            base_url: self.api_url.clone(),
        });
        let branches = GitBranches::new(&self.repo);
        let request = RunRequest {
            config,
            retry: RetryPolicy::default(),
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let report = runtime
            .block_on(pipeline::run(&request, &branches, Arc::new(client), &logger))
            .context("sweep aborted")?;

        if self.json {
            print_json(&report)?;
        }
        Ok(())
    }

    fn sweep_config(&self) -> Result<SweepConfig> {
        Ok(SweepConfig {
            dry_run: self.dry_run,
            batch_size: self.batch_size,
            batch_delay: Duration::from_millis(self.batch_delay_ms),
            page_size: DEFAULT_PAGE_SIZE,
            protected: ProtectedBranches::with_extra(self.protect.iter().cloned())
                .context("invalid --protect value")?,
        })
    }
}

/// Read the bearer token; a missing or blank value is fatal.
fn read_token() -> Result<String> {
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => bail!("{TOKEN_ENV} environment variable is required"),
    }
}

fn print_json(report: &RunReport) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(report).context("failed to serialize run report")?
    );
    Ok(())
}
