use std::fmt;

use sweep_core::{Deployment, DeploymentId};

use crate::error::VercelError;
use crate::paths::{delete_url, list_url, DEFAULT_BASE_URL, REQUEST_TIMEOUT, USER_AGENT};
use crate::wire::{DeploymentsResponse, Page};

/// Listing request parameters for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: usize,
    /// Cursor from the previous page's `pagination.next`.
    pub until: Option<i64>,
}

/// The two remote operations the sweep needs.
///
/// Implementations are blocking; async callers run them on the blocking pool.
pub trait DeploymentApi: Send + Sync {
    fn list_page(&self, query: ListQuery) -> Result<Page<Deployment>, VercelError>;
    fn delete(&self, id: &DeploymentId) -> Result<(), VercelError>;
}

/// Connection settings for [`VercelClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub token: String,
    pub team_id: Option<String>,
    pub project_id: Option<String>,
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            team_id: None,
            project_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("team_id", &self.team_id)
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Blocking Vercel REST client.
#[derive(Clone)]
pub struct VercelClient {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl fmt::Debug for VercelClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VercelClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VercelClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self { agent, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        let request = request.set("Authorization", &format!("Bearer {}", self.config.token));
        match self.config.team_id.as_deref() {
            Some(team) => request.query("teamId", team),
            None => request,
        }
    }
}

impl DeploymentApi for VercelClient {
    fn list_page(&self, query: ListQuery) -> Result<Page<Deployment>, VercelError> {
        let mut request = self
            .authorize(self.agent.get(&list_url(&self.config.base_url)))
            .query("limit", &query.limit.to_string());
        if let Some(until) = query.until {
            request = request.query("until", &until.to_string());
        }
        if let Some(project) = self.config.project_id.as_deref() {
            request = request.query("projectId", project);
        }

        let response = send(request.call())?;
        let body: DeploymentsResponse = response
            .into_json()
            .map_err(|e| VercelError::Decode(e.to_string()))?;
        Ok(Page::from(body))
    }

    fn delete(&self, id: &DeploymentId) -> Result<(), VercelError> {
        let request = self.authorize(
            self.agent
                .delete(&delete_url(&self.config.base_url, &id.0)),
        );
        send(request.call()).map(|_| ())
    }
}

/// Map ureq's outcome onto the sweep's error taxonomy.
fn send(result: Result<ureq::Response, ureq::Error>) -> Result<ureq::Response, VercelError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status @ (401 | 403), _)) => {
            Err(VercelError::Authentication { status })
        }
        Err(ureq::Error::Status(status, response)) => Err(VercelError::Api {
            status,
            body: response.into_string().unwrap_or_default(),
        }),
        Err(ureq::Error::Transport(transport)) => Err(VercelError::Network(transport.to_string())),
    }
}
