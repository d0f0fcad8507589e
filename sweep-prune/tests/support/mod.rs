//! Test doubles shared by the executor and pipeline tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use sweep_core::{BranchSet, Deployment, DeploymentId, OrphanCandidate, Target};
use sweep_git::{BranchSource, GitError};
use sweep_vercel::{DeploymentApi, ListQuery, Page, VercelError};

/// Single-page API that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub deployments: Vec<Deployment>,
    pub list_status: Option<u16>,
    /// Cursor handed back as `next` on every page.
    pub stuck_cursor: Option<i64>,
    pub failing: HashSet<String>,
    pub panicking: HashSet<String>,
    pub list_calls: Mutex<usize>,
    pub deleted: Mutex<Vec<DeploymentId>>,
}

impl FakeApi {
    pub fn with_deployments(deployments: Vec<Deployment>) -> Self {
        Self {
            deployments,
            ..Self::default()
        }
    }

    pub fn fail_on(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn panic_on(mut self, id: &str) -> Self {
        self.panicking.insert(id.to_string());
        self
    }

    pub fn delete_calls(&self) -> Vec<DeploymentId> {
        let mut calls = self.deleted.lock().expect("deleted lock").clone();
        calls.sort();
        calls
    }

    pub fn list_count(&self) -> usize {
        *self.list_calls.lock().expect("list lock")
    }
}

impl DeploymentApi for FakeApi {
    fn list_page(&self, _query: ListQuery) -> Result<Page<Deployment>, VercelError> {
        *self.list_calls.lock().expect("list lock") += 1;
        if let Some(status) = self.list_status {
            return Err(VercelError::Api {
                status,
                body: "listing unavailable".to_string(),
            });
        }
        Ok(Page {
            items: self.deployments.clone(),
            next: self.stuck_cursor,
        })
    }

    fn delete(&self, id: &DeploymentId) -> Result<(), VercelError> {
        self.deleted.lock().expect("deleted lock").push(id.clone());
        if self.panicking.contains(&id.0) {
            panic!("simulated crash deleting {id}");
        }
        if self.failing.contains(&id.0) {
            return Err(VercelError::Api {
                status: 500,
                body: format!("cannot delete {id}"),
            });
        }
        Ok(())
    }
}

/// Fixed branch set, optionally failing validation.
pub struct StaticBranches {
    pub branches: BranchSet,
    pub unavailable: bool,
}

impl StaticBranches {
    pub fn new(names: &[&str]) -> Self {
        Self {
            branches: names.iter().copied().collect(),
            unavailable: false,
        }
    }
}

impl BranchSource for StaticBranches {
    fn validate(&self) -> Result<(), GitError> {
        if self.unavailable {
            return Err(GitError::GitUnavailable {
                dir: "/nowhere".into(),
                reason: "not a git repository".to_string(),
            });
        }
        Ok(())
    }

    fn list_branches(&self) -> Result<BranchSet, GitError> {
        Ok(self.branches.clone())
    }
}

pub fn preview(id: &str, branch: Option<&str>) -> Deployment {
    Deployment::new(id, Target::Preview, branch, format!("{id}.vercel.app"))
}

pub fn orphans(count: usize) -> Vec<OrphanCandidate> {
    (1..=count)
        .map(|n| {
            let id = format!("d{n:02}");
            OrphanCandidate {
                deployment: preview(&id, Some("gone")),
                branch: "gone".to_string(),
            }
        })
        .collect()
}
