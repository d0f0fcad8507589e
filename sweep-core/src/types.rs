//! Domain types for a sweep run.
//!
//! Deployments are owned by the hosting platform; this crate only models the
//! fields the reconciliation needs. Branch sets are rebuilt on every run.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed Vercel deployment identifier (`dpl_…`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeploymentId(pub String);

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DeploymentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeploymentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Deployment environment as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Production,
    #[default]
    Preview,
}

impl Target {
    /// Map the raw API value. Only an exact `"production"` is production;
    /// Vercel reports preview deployments with a `null` target.
    pub fn from_api(raw: Option<&str>) -> Self {
        match raw {
            Some("production") => Target::Production,
            _ => Target::Preview,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Production => write!(f, "production"),
            Target::Preview => write!(f, "preview"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A remote deployment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub target: Target,
    /// Source branch reference, when the platform recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Deployment {
    /// Minimal constructor; optional metadata defaults to `None`.
    pub fn new(
        id: impl Into<DeploymentId>,
        target: Target,
        branch: Option<&str>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target,
            branch: branch.map(str::to_owned),
            url: url.into(),
            name: None,
            created_at: None,
        }
    }

    /// The branch reference, treating an empty string as absent.
    pub fn branch_ref(&self) -> Option<&str> {
        self.branch.as_deref().filter(|b| !b.trim().is_empty())
    }
}

/// De-duplicated set of branch names that currently exist in the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSet(BTreeSet<String>);

impl BranchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a branch name. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for BranchSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for BranchSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// A deployment classified as orphaned, together with the branch it was
/// built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanCandidate {
    pub deployment: Deployment,
    pub branch: String,
}

impl OrphanCandidate {
    pub fn id(&self) -> &DeploymentId {
        &self.deployment.id
    }
}

/// One deletion that failed, keyed by deployment id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub deployment_id: DeploymentId,
    pub message: String,
}

/// Aggregate counts printed at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    /// Total deployments returned by the listing.
    pub scanned: usize,
    /// Number of orphan candidates found.
    pub orphans: usize,
    /// Deployments skipped because they carried no branch metadata.
    pub missing_branch: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub orphan_ids: Vec<DeploymentId>,
    pub failures: Vec<DeletionFailure>,
}
