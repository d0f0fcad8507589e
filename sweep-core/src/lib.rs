//! vercel-sweep core library — domain types, run configuration, and the
//! orphan detector.
//!
//! - [`types`] — deployments, branch sets, run report
//! - [`config`] — [`SweepConfig`] and the protected-branch list
//! - [`orphan`] — [`detect_orphans`], the pure classification step
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod error;
pub mod orphan;
pub mod types;

pub use config::{ProtectedBranches, SweepConfig};
pub use error::CoreError;
pub use orphan::{detect_orphans, Detection};
pub use types::{
    BranchSet, DeletionFailure, Deployment, DeploymentId, OrphanCandidate, RunReport, Target,
};
