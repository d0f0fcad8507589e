use thiserror::Error;

/// Error surface for the Vercel REST client and fetcher.
#[derive(Debug, Error)]
pub enum VercelError {
    /// 401/403: the bearer token is missing, expired, or lacks scope.
    #[error("authentication rejected by Vercel API (HTTP {status})")]
    Authentication { status: u16 },

    /// Any other non-2xx response.
    #[error("Vercel API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport failure (DNS, connect, TLS, timeout). Safe to retry for GETs.
    #[error("network error: {0}")]
    Network(String),

    /// The API handed back a cursor it had already returned; the listing
    /// cannot be walked to the end.
    #[error("pagination cursor {cursor} repeated; deployment listing is incomplete")]
    Pagination { cursor: i64 },

    #[error("failed to decode Vercel API response: {0}")]
    Decode(String),

    #[error("background request task failed: {0}")]
    Task(String),
}

impl VercelError {
    /// Only transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VercelError::Network(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            VercelError::Authentication { status } | VercelError::Api { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
