//! Vercel REST client: typed wire records, cursor pagination, retries.

pub mod client;
mod error;
pub mod fetch;
pub mod paths;
pub mod wire;

pub use client::{ClientConfig, DeploymentApi, ListQuery, VercelClient};
pub use error::VercelError;
pub use fetch::{blocking, fetch_all, with_retry, RetryPolicy};
pub use wire::{DeploymentsResponse, Page, Pagination, WireDeployment};
