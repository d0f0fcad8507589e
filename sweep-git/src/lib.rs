//! Branch enumeration for `sweep-git`.
//!
//! `list_branches(dir)` returns the union of local branches and remote-tracking
//! branches (with the remote prefix stripped) for the repository at `dir`.
//! Everything here is read-only: the only commands run are `git rev-parse`
//! and `git branch`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use sweep_core::BranchSet;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Errors from branch enumeration.
#[derive(Debug, Error)]
pub enum GitError {
    /// `git` is not installed, or `dir` is not inside a repository.
    #[error("git unavailable in {dir}: {reason}")]
    GitUnavailable { dir: PathBuf, reason: String },

    /// A `git branch` invocation exited non-zero.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("I/O error running git")]
    Io(#[from] std::io::Error),
}

/// Anything that can report the branches that currently exist.
///
/// The pipeline takes this instead of a directory so runs can be driven by a
/// fixed set in tests.
pub trait BranchSource: Send + Sync {
    /// Check the source is usable before any network activity.
    fn validate(&self) -> Result<(), GitError> {
        Ok(())
    }

    fn list_branches(&self) -> Result<BranchSet, GitError>;
}

/// [`BranchSource`] backed by the `git` executable in a working directory.
#[derive(Debug, Clone)]
pub struct GitBranches {
    dir: PathBuf,
}

impl GitBranches {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BranchSource for GitBranches {
    fn validate(&self) -> Result<(), GitError> {
        ensure_repository(&self.dir).map(|_| ())
    }

    fn list_branches(&self) -> Result<BranchSet, GitError> {
        list_branches(&self.dir)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

const BRANCH_FORMAT: &str = "--format=%(refname:short)";

/// Confirm `git` runs and `dir` is inside a repository.
///
/// Returns the repository's git directory as printed by
/// `git rev-parse --git-dir`.
pub fn ensure_repository(dir: &Path) -> Result<PathBuf, GitError> {
    // A missing working directory also surfaces as `NotFound` from spawn.
    if !dir.is_dir() {
        return Err(GitError::GitUnavailable {
            dir: dir.to_path_buf(),
            reason: "directory does not exist".to_string(),
        });
    }

    let output = match git(dir, &["rev-parse", "--git-dir"]) {
        Ok(output) => output,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(GitError::GitUnavailable {
                dir: dir.to_path_buf(),
                reason: "git executable not found on PATH".to_string(),
            });
        }
        Err(err) => {
            return Err(GitError::GitUnavailable {
                dir: dir.to_path_buf(),
                reason: err.to_string(),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::GitUnavailable {
            dir: dir.to_path_buf(),
            reason: if stderr.is_empty() {
                "not a git repository".to_string()
            } else {
                stderr
            },
        });
    }

    let git_dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(dir.join(git_dir))
}

/// List local and remote branch names for the repository at `dir`.
pub fn list_branches(dir: &Path) -> Result<BranchSet, GitError> {
    ensure_repository(dir)?;

    let local = run_branch(dir, &["branch", BRANCH_FORMAT])?;
    let remote = run_branch(dir, &["branch", "-r", BRANCH_FORMAT])?;

    let mut set = parse_local_branches(&local);
    let local_count = set.len();
    set.extend(parse_remote_branches(&remote).iter().map(str::to_owned));

    tracing::debug!(
        dir = %dir.display(),
        local = local_count,
        total = set.len(),
        "enumerated git branches"
    );
    Ok(set)
}

/// Parse `git branch --format=%(refname:short)` output.
pub fn parse_local_branches(stdout: &str) -> BranchSet {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        // Detached HEAD shows up as "(HEAD detached at abc123)".
        .filter(|line| !line.starts_with('('))
        .filter(|line| *line != "HEAD")
        .collect()
}

/// Parse `git branch -r --format=%(refname:short)` output, stripping the
/// remote name from each entry.
///
/// `refs/remotes/origin/HEAD` prints as `origin/HEAD` on older git and as the
/// bare remote name `origin` on newer git; both are skipped.
pub fn parse_remote_branches(stdout: &str) -> BranchSet {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(" -> "))
        .filter_map(|line| line.split_once('/'))
        .map(|(_, branch)| branch)
        .filter(|branch| !branch.is_empty() && *branch != "HEAD")
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn git(dir: &Path, args: &[&str]) -> std::io::Result<Output> {
    Command::new("git").args(args).current_dir(dir).output()
}

fn run_branch(dir: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = git(dir, args)?;
    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
