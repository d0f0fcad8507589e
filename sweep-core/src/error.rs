//! Error types for sweep-core.

use thiserror::Error;

/// Errors raised while assembling a [`crate::SweepConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Batches must hold at least one deployment.
    #[error("batch size must be at least 1 (got {0})")]
    InvalidBatchSize(usize),

    /// The listing endpoint accepts 1..=100 records per page.
    #[error("page size must be between 1 and {max} (got {got})")]
    InvalidPageSize { got: usize, max: usize },

    /// A protected branch name was empty or whitespace.
    #[error("protected branch names must not be empty")]
    EmptyProtectedBranch,
}
