// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! RepoQuery (read)     --> LocalRepo: gix for HEAD/config,
//!                                     git CLI for diff/ls-files/rev-list
//! RepoMutation (write) --> LocalRepo: git CLI (add/commit/pull/fetch/push)
//! ```
//!
//! Handlers only see the traits, so tests substitute an in-memory repository.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::cmd::{git_command, git_output, git_raw, split_nul};
use super::push::{PushInfo, parse_porcelain};
use crate::error::{GitError, GitResult, GixError};

/// One path reported by the index-vs-working-tree diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    /// Path relative to the working tree root.
    pub path: String,
    /// Removed from the working tree but still in the index.
    pub deleted: bool,
}

impl DiffEntry {
    pub fn modified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            deleted: false,
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            deleted: true,
        }
    }
}

// --- Query Trait (Read-only operations) ---

/// Read-only repository queries.
pub trait RepoQuery {
    /// Root of the working tree.
    fn workdir(&self) -> &Path;

    /// Short name of the checked-out branch (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be read.
    fn active_branch(&self) -> GitResult<Option<String>>;

    /// Upstream-tracking ref of `branch` (e.g. `origin/main`), None if unset.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` with git's message if an upstream is
    /// configured but cannot be resolved.
    fn upstream_branch(&self, branch: &str) -> GitResult<Option<String>>;

    /// Committer time of the HEAD commit, seconds since the epoch (UTC).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD is unborn or the commit cannot be decoded.
    fn head_commit_time(&self) -> GitResult<i64>;

    /// Fetch URL of the named remote.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RemoteNotFound` if the remote has no URL configured.
    fn remote_url(&self, remote: &str) -> GitResult<String>;

    /// Files whose working tree state differs from the index.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the diff fails.
    fn index_diff(&self) -> GitResult<Vec<DiffEntry>>;

    /// Files not tracked and not ignored.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if listing fails.
    fn untracked_files(&self) -> GitResult<Vec<String>>;

    /// Commit ids in a revision range such as `main..origin/main`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the range does not resolve.
    fn iter_commits(&self, range: &str) -> GitResult<Vec<String>>;
}

// --- Mutation Trait (Write operations) ---

/// Operations that modify the repository or talk to a remote.
pub trait RepoMutation {
    /// Stage exactly `files`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if any path cannot be added.
    fn stage(&self, files: &[String]) -> GitResult<()>;

    /// Commit the index with `message`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the commit fails (nothing staged, hooks, locks).
    fn commit(&self, message: &str) -> GitResult<()>;

    /// Pull the current branch from its upstream.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` on network failure or merge conflict.
    fn pull(&self) -> GitResult<()>;

    /// Fetch `remote`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` on network failure.
    fn fetch(&self, remote: &str) -> GitResult<()>;

    /// Push `branch` to `remote`, returning one result per ref.
    ///
    /// A rejected ref is reported through its [`PushInfo`] flags, not as an error.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git failed without reporting any ref.
    fn push(&self, remote: &str, branch: &str) -> GitResult<Vec<PushInfo>>;
}

/// Everything a request handler may ask of a repository.
pub trait GitRepository: RepoQuery + RepoMutation {}

impl<T: RepoQuery + RepoMutation> GitRepository for T {}

// --- LocalRepo Implementation ---

/// Repository on the local filesystem.
///
/// HEAD and configuration are read through gix; working tree inspection,
/// writes and network operations go through the git CLI.
pub struct LocalRepo {
    repo: gix::Repository,
    workdir: PathBuf,
}

impl LocalRepo {
    /// Open the repository whose working tree contains `path`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepoNotFound` if `path` is not inside a work tree.
    pub fn open(path: &Path) -> GitResult<Self> {
        let repo = gix::discover(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "repository discovery failed");
            GitError::RepoNotFound {
                path: path.display().to_string(),
            }
        })?;
        let workdir = repo
            .workdir()
            .ok_or(GitError::Gix(GixError::BareRepository))?
            .to_path_buf();
        Ok(Self { repo, workdir })
    }
}

impl RepoQuery for LocalRepo {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn active_branch(&self) -> GitResult<Option<String>> {
        let head = self
            .repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn upstream_branch(&self, branch: &str) -> GitResult<Option<String>> {
        let merge_key = format!("branch.{branch}.merge");
        if self.repo.config_snapshot().string(merge_key.as_str()).is_none() {
            return Ok(None);
        }

        // Configured but unresolvable (e.g. tracking ref never fetched) is an error.
        let spec = format!("{branch}@{{upstream}}");
        let name = git_command(
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", &spec],
            &self.workdir,
        )?;
        Ok((!name.is_empty()).then_some(name))
    }

    fn head_commit_time(&self) -> GitResult<i64> {
        let commit = self
            .repo
            .head_commit()
            .map_err(|e| GitError::Gix(GixError::HeadCommit(Box::new(e))))?;
        let time = commit
            .time()
            .map_err(|e| GitError::Gix(GixError::Commit(e)))?;
        Ok(time.seconds)
    }

    fn remote_url(&self, remote: &str) -> GitResult<String> {
        let key = format!("remote.{remote}.url");
        self.repo
            .config_snapshot()
            .string(key.as_str())
            .map(|url| url.to_string())
            .ok_or_else(|| GitError::RemoteNotFound {
                remote: remote.to_string(),
            })
    }

    fn index_diff(&self) -> GitResult<Vec<DiffEntry>> {
        let out = git_raw(
            &["diff", "--name-status", "--no-renames", "-z"],
            &self.workdir,
        )?;
        let fields = split_nul(&out);
        Ok(fields
            .chunks_exact(2)
            .map(|pair| DiffEntry {
                path: pair[1].to_string(),
                deleted: pair[0].starts_with('D'),
            })
            .collect())
    }

    fn untracked_files(&self) -> GitResult<Vec<String>> {
        let out = git_raw(
            &["ls-files", "--others", "--exclude-standard", "-z"],
            &self.workdir,
        )?;
        Ok(split_nul(&out).into_iter().map(str::to_string).collect())
    }

    fn iter_commits(&self, range: &str) -> GitResult<Vec<String>> {
        let out = git_command(&["rev-list", range, "--"], &self.workdir)?;
        Ok(out.lines().map(str::to_string).collect())
    }
}

impl RepoMutation for LocalRepo {
    fn stage(&self, files: &[String]) -> GitResult<()> {
        let mut args = vec!["add", "--"];
        args.extend(files.iter().map(String::as_str));
        git_command(&args, &self.workdir)?;
        Ok(())
    }

    fn commit(&self, message: &str) -> GitResult<()> {
        git_command(&["commit", "--quiet", "-m", message], &self.workdir)?;
        Ok(())
    }

    fn pull(&self) -> GitResult<()> {
        git_command(&["pull", "--quiet"], &self.workdir)?;
        Ok(())
    }

    fn fetch(&self, remote: &str) -> GitResult<()> {
        git_command(&["fetch", "--quiet", remote], &self.workdir)?;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> GitResult<Vec<PushInfo>> {
        let output = git_output(&["push", "--porcelain", remote, branch], &self.workdir)?;
        let results = parse_porcelain(&output.stdout);
        if results.is_empty() && !output.success {
            return Err(GitError::CommandFailed {
                command: format!("git push --porcelain {remote} {branch}"),
                message: output.failure_message(),
            });
        }
        Ok(results)
    }
}
