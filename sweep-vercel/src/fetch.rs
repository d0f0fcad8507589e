//! Cursor-paginated deployment listing.
//!
//! [`fetch_all`] returns every deployment or nothing: a failure on any page
//! aborts the whole listing, so callers never classify against a partial view.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sweep_core::Deployment;

use crate::client::{DeploymentApi, ListQuery};
use crate::error::VercelError;

/// Backoff schedule for idempotent GETs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure; doubled after each further failure.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
        }
    }
}

/// Run `op`, retrying only on [`VercelError::Network`].
///
/// Authentication and API errors are returned on the first occurrence.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, VercelError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VercelError>>,
{
    let mut backoff = policy.initial_backoff;
    let mut attempt = 1u32;
    loop {
        match op().await {
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                tracing::warn!(
                    request = label,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "network error, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Run a blocking API call on tokio's blocking pool.
pub async fn blocking<T, F>(f: F) -> Result<T, VercelError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, VercelError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| VercelError::Task(e.to_string()))?
}

/// Follow `pagination.next` until the listing is exhausted.
///
/// Records come back in API order (newest first). A cursor that was already
/// requested means the listing cannot be completed, so it is an error.
pub async fn fetch_all(
    api: Arc<dyn DeploymentApi>,
    page_size: usize,
    retry: &RetryPolicy,
) -> Result<Vec<Deployment>, VercelError> {
    let mut deployments = Vec::new();
    let mut seen = HashSet::new();
    let mut until = None;
    let mut page = 0usize;

    loop {
        page += 1;
        let query = ListQuery {
            limit: page_size,
            until,
        };
        let result = with_retry(retry, "list deployments", || {
            let api = Arc::clone(&api);
            blocking(move || api.list_page(query))
        })
        .await?;

        tracing::debug!(
            page,
            count = result.items.len(),
            next = ?result.next,
            "fetched deployment page"
        );
        deployments.extend(result.items);

        match result.next {
            Some(cursor) if seen.insert(cursor) => until = Some(cursor),
            Some(cursor) => {
                tracing::error!(cursor, page, "pagination cursor repeated");
                return Err(VercelError::Pagination { cursor });
            }
            None => break,
        }
    }

    Ok(deployments)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn retry_gives_up_after_three_network_failures() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();
        let result: Result<(), _> = with_retry(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(VercelError::Network("connection reset".into())) }
        })
        .await;

        assert!(matches!(result, Err(VercelError::Network(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 500 ms + 1000 ms of backoff between the three attempts.
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn retry_does_not_repeat_api_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(VercelError::Api {
                    status: 500,
                    body: "boom".into(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(VercelError::Api { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn retry_recovers_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::default(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(VercelError::Network("timeout".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.expect("second attempt succeeds"), 1);
    }
}
