//! Error types for sweep-prune.

use thiserror::Error;

use sweep_core::CoreError;
use sweep_git::GitError;
use sweep_vercel::VercelError;

use crate::pipeline::Phase;

/// Fatal errors that abort a run before any deletion happens.
///
/// Per-deployment deletion failures are not errors at this level; they are
/// collected into the run report.
#[derive(Debug, Error)]
pub enum PruneError {
    /// Invalid batch/page settings or protected-branch list.
    #[error("invalid configuration")]
    Config(#[from] CoreError),

    /// Git missing, not a repository, or `git branch` failed.
    #[error("git check failed while {phase}")]
    Git {
        phase: Phase,
        #[source]
        source: GitError,
    },

    /// The deployment listing failed; nothing was classified.
    #[error("fetching deployments failed")]
    Fetch(#[source] VercelError),
}

impl PruneError {
    /// The phase the run was in when it failed.
    pub fn phase(&self) -> Phase {
        match self {
            PruneError::Config(_) => Phase::Validating,
            PruneError::Git { phase, .. } => *phase,
            PruneError::Fetch(_) => Phase::Fetching,
        }
    }
}
