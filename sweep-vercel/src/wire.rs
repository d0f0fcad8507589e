//! JSON shapes returned by the Vercel REST API and their mapping into
//! [`sweep_core::Deployment`].
//!
//! Only the fields the sweep needs are declared; serde ignores the rest.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use sweep_core::{Deployment, DeploymentId, Target};

/// `meta` keys that carry the source branch, in lookup order.
pub const BRANCH_META_KEYS: [&str; 3] = ["githubCommitRef", "gitlabCommitRef", "bitbucketCommitRef"];

/// `GET /v6/deployments` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentsResponse {
    #[serde(default)]
    pub deployments: Vec<WireDeployment>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub count: Option<u64>,
    /// Cursor for the next page, passed back as `until`.
    #[serde(default)]
    pub next: Option<i64>,
    #[serde(default)]
    pub prev: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDeployment {
    pub uid: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    /// Creation time in Unix milliseconds.
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub meta: Option<HashMap<String, Value>>,
}

/// One page of results after mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<i64>,
}

impl WireDeployment {
    /// First non-empty branch reference found in `meta`.
    pub fn branch(&self) -> Option<String> {
        let meta = self.meta.as_ref()?;
        BRANCH_META_KEYS
            .iter()
            .filter_map(|key| meta.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_owned)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(DateTime::from_timestamp_millis)
    }
}

impl From<WireDeployment> for Deployment {
    fn from(wire: WireDeployment) -> Self {
        let branch = wire.branch();
        let created_at = wire.created_at();
        Deployment {
            id: DeploymentId(wire.uid),
            target: Target::from_api(wire.target.as_deref()),
            branch,
            url: wire.url.unwrap_or_default(),
            name: wire.name,
            created_at,
        }
    }
}

impl From<DeploymentsResponse> for Page<Deployment> {
    fn from(response: DeploymentsResponse) -> Self {
        Page {
            items: response.deployments.into_iter().map(Deployment::from).collect(),
            next: response.pagination.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_listing_page() {
        let body = r#"{
            "deployments": [
                {
                    "uid": "dpl_1",
                    "url": "app-git-feature-x.vercel.app",
                    "name": "app",
                    "target": null,
                    "created": 1700000000000,
                    "meta": { "githubCommitRef": "feature-x", "githubCommitSha": "abc" }
                },
                {
                    "uid": "dpl_2",
                    "url": "app.vercel.app",
                    "target": "production",
                    "meta": {}
                }
            ],
            "pagination": { "count": 2, "next": 1699999999000, "prev": null }
        }"#;
        let response: DeploymentsResponse = serde_json::from_str(body).expect("decode");
        let page = Page::<Deployment>::from(response);

        assert_eq!(page.next, Some(1_699_999_999_000));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id.0, "dpl_1");
        assert_eq!(page.items[0].target, Target::Preview);
        assert_eq!(page.items[0].branch.as_deref(), Some("feature-x"));
        assert!(page.items[0].created_at.is_some());
        assert_eq!(page.items[1].target, Target::Production);
        assert_eq!(page.items[1].branch, None);
    }

    #[test]
    fn branch_falls_back_to_other_git_providers() {
        let wire: WireDeployment = serde_json::from_str(
            r#"{"uid":"dpl_3","meta":{"githubCommitRef":"","gitlabCommitRef":"fix/login"}}"#,
        )
        .expect("decode");
        assert_eq!(wire.branch().as_deref(), Some("fix/login"));
    }

    #[test]
    fn missing_pagination_means_last_page() {
        let response: DeploymentsResponse =
            serde_json::from_str(r#"{"deployments":[]}"#).expect("decode");
        assert_eq!(Page::<Deployment>::from(response).next, None);
    }
}
