//! Runtime settings for a sweep run.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::CoreError;

/// Branches whose deployments are never deleted, whatever the repository says.
pub const DEFAULT_PROTECTED: [&str; 2] = ["main", "master"];

/// Deployments deleted concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Pause between batches, to stay under the API rate limit.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(1000);

/// Records requested per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Upper bound the listing endpoint accepts for `limit`.
pub const MAX_PAGE_SIZE: usize = 100;

/// Protected branch names. Matching is case-sensitive and exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBranches(BTreeSet<String>);

impl ProtectedBranches {
    /// `main` and `master` plus any `extra` names.
    pub fn with_extra<I, S>(extra: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: BTreeSet<String> = DEFAULT_PROTECTED.iter().map(|s| s.to_string()).collect();
        for name in extra {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(CoreError::EmptyProtectedBranch);
            }
            set.insert(name);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.0.contains(branch)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ProtectedBranches {
    fn default() -> Self {
        Self(DEFAULT_PROTECTED.iter().map(|s| s.to_string()).collect())
    }
}

/// Validated settings shared by the fetcher, detector, and executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub dry_run: bool,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub page_size: usize,
    pub protected: ProtectedBranches,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            page_size: DEFAULT_PAGE_SIZE,
            protected: ProtectedBranches::default(),
        }
    }
}

impl SweepConfig {
    /// Check numeric bounds. Called once by the CLI before any I/O.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.batch_size == 0 {
            return Err(CoreError::InvalidBatchSize(self.batch_size));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(CoreError::InvalidPageSize {
                got: self.page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(())
    }
}
