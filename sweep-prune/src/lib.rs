//! # sweep-prune
//!
//! Batched deletion and run orchestration.
//!
//! Call [`pipeline::run`] for a full sweep, or [`executor::execute`] to
//! delete an already classified list of orphans.

pub mod error;
pub mod executor;
pub mod logger;
pub mod pipeline;

pub use error::PruneError;
pub use executor::{execute, DeletionOutcome, ExecutorOptions};
pub use logger::{Level, Logger, MemoryLogger};
pub use pipeline::{run, Phase, RunRequest};
