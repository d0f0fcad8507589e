//! Orphan classification.
//!
//! Rule precedence, first match wins:
//! 1. production target → keep
//! 2. no branch metadata → keep, reported in [`Detection::missing_branch`]
//! 3. protected branch (`main`, `master`, …) → keep
//! 4. branch still exists locally or on a remote → keep
//! 5. otherwise → orphaned

use crate::config::ProtectedBranches;
use crate::types::{BranchSet, Deployment, DeploymentId, OrphanCandidate, Target};

/// Result of classifying a deployment listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    /// Orphaned deployments, sorted by deployment id.
    pub orphans: Vec<OrphanCandidate>,
    /// Non-production deployments skipped for lack of a branch reference,
    /// sorted by deployment id.
    pub missing_branch: Vec<DeploymentId>,
}

/// Why a deployment was kept or flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    Production,
    MissingBranch,
    Protected,
    BranchExists,
    Orphaned(&'a str),
}

/// Classify a single deployment.
pub fn classify<'a>(
    deployment: &'a Deployment,
    branches: &BranchSet,
    protected: &ProtectedBranches,
) -> Verdict<'a> {
    if deployment.target == Target::Production {
        return Verdict::Production;
    }
    let Some(branch) = deployment.branch_ref() else {
        return Verdict::MissingBranch;
    };
    if protected.contains(branch) {
        return Verdict::Protected;
    }
    if branches.contains(branch) {
        return Verdict::BranchExists;
    }
    Verdict::Orphaned(branch)
}

/// Classify every deployment against the current branch set.
///
/// Pure and deterministic: the output is sorted by deployment id, so the
/// order of `deployments` never affects the result.
pub fn detect_orphans(
    deployments: &[Deployment],
    branches: &BranchSet,
    protected: &ProtectedBranches,
) -> Detection {
    let mut detection = Detection::default();
    for deployment in deployments {
        match classify(deployment, branches, protected) {
            Verdict::Orphaned(branch) => detection.orphans.push(OrphanCandidate {
                deployment: deployment.clone(),
                branch: branch.to_string(),
            }),
            Verdict::MissingBranch => detection.missing_branch.push(deployment.id.clone()),
            Verdict::Production | Verdict::Protected | Verdict::BranchExists => {}
        }
    }
    detection.orphans.sort_by(|a, b| a.id().cmp(b.id()));
    detection.orphans.dedup_by(|a, b| a.id() == b.id());
    detection.missing_branch.sort();
    detection.missing_branch.dedup();
    detection
}
