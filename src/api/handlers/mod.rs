// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The five `/git` request handlers.
//!
//! ```text
//! PUT /git/commit       CommitHandler      stage files, commit
//! PUT /git/pull         PullHandler        pull upstream
//! PUT /git/info         InfoHandler        status + remote-derived URLs
//! PUT /git/origin-info  OriginInfoHandler  fetch, count ahead/behind
//! PUT /git/push         PushHandler        push branch, inspect ref flags
//! ```
//!
//! Handlers are synchronous and receive an already-opened repository; the
//! router runs them on the blocking pool inside [`handle_exceptions`].
//!
//! [`handle_exceptions`]: super::wrap::handle_exceptions

use std::fmt;

use axum::body::Bytes;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::response::ApiResponse;
use crate::error::{GitError, GitResult, ServiceError, ServiceResult};
use crate::git::backend::GitRepository;
use crate::git::push::PushInfo;
use crate::git::url;

/// What a handler sees of the incoming request.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub method: String,
    pub uri: String,
    pub body: Bytes,
    /// Remote used for info, fetch and push.
    pub remote: String,
}

impl HandlerRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            body: Bytes::new(),
            remote: remote.into(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidInput` if the body is empty, not JSON, or
    /// lacks a required field.
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> ServiceResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

impl fmt::Display for HandlerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

/// A `/git` endpoint.
pub trait GitHandler: Default + Send + Sync + 'static {
    /// Name used in logs.
    const NAME: &'static str;

    /// Route below `/git`.
    const ROUTE: &'static str;

    /// Serve one request against `repo`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Git` for VCS failures and other variants for
    /// bad input; the caller turns either into a 500 response.
    fn handle<R: GitRepository>(
        &self,
        repo: &R,
        request: &HandlerRequest,
    ) -> ServiceResult<ApiResponse>;
}

// --- Payloads ---

/// Body of `PUT /git/commit`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRequest {
    pub files: Vec<String>,
    pub message: String,
}

/// Working tree status and remote-derived links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    pub deleted_files: Vec<String>,
    pub modified_files: Vec<String>,
    pub untracked_files: Vec<String>,
    pub last_commit_timestamp: String,
    pub repo_url: String,
    pub repo_name: String,
    pub org_url: String,
    pub org_name: String,
    pub branch_name: String,
}

/// Commit counts between the local branch and its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginInfo {
    pub commits_behind: usize,
    pub commits_ahead: usize,
}

/// Format epoch seconds as UTC ISO-8601 with microseconds, e.g.
/// `1970-01-01T00:00:00.000000Z`.
///
/// # Errors
///
/// Returns `ServiceError::Other` if `seconds` is outside chrono's range.
pub fn format_commit_timestamp(seconds: i64) -> ServiceResult<String> {
    DateTime::from_timestamp(seconds, 0)
        .map(|t| t.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
        .ok_or_else(|| ServiceError::Other(format!("commit time {seconds} out of range").into()))
}

fn current_branch<R: GitRepository>(repo: &R) -> GitResult<String> {
    repo.active_branch()?.ok_or(GitError::DetachedHead)
}

/// Turn per-ref push results into an error if any ref failed.
///
/// Every result is inspected. A rejected ref wins over other errors; among
/// equals the first one is reported.
///
/// # Errors
///
/// Returns `PushRejected`, `PushFailed`, or `EmptyPushResult`.
pub fn check_push_results(results: &[PushInfo]) -> GitResult<()> {
    if results.is_empty() {
        return Err(GitError::EmptyPushResult);
    }
    if let Some(rejected) = results.iter().find(|r| r.is_rejected()) {
        return Err(GitError::PushRejected {
            summary: rejected.summary.clone(),
        });
    }
    if let Some(failed) = results.iter().find(|r| r.is_error()) {
        return Err(GitError::PushFailed {
            summary: failed.summary.clone(),
        });
    }
    Ok(())
}

// --- Handlers ---

#[derive(Debug, Default, Clone, Copy)]
pub struct CommitHandler;

impl GitHandler for CommitHandler {
    const NAME: &'static str = "CommitHandler";
    const ROUTE: &'static str = "/commit";

    fn handle<R: GitRepository>(
        &self,
        repo: &R,
        request: &HandlerRequest,
    ) -> ServiceResult<ApiResponse> {
        let body: CommitRequest = request.json()?;
        repo.stage(&body.files)?;
        repo.commit(&body.message)?;
        Ok(ApiResponse::ok("Files committed successfully"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PullHandler;

impl GitHandler for PullHandler {
    const NAME: &'static str = "PullHandler";
    const ROUTE: &'static str = "/pull";

    fn handle<R: GitRepository>(&self, repo: &R, _: &HandlerRequest) -> ServiceResult<ApiResponse> {
        repo.pull()?;
        Ok(ApiResponse::ok("Repo pulled successfully"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InfoHandler;

impl InfoHandler {
    /// Collect the status payload.
    ///
    /// # Errors
    ///
    /// Returns a `ServiceError` if any git query fails, the remote is missing,
    /// or HEAD is detached.
    pub fn repo_info<R: GitRepository>(repo: &R, remote: &str) -> ServiceResult<RepoInfo> {
        let (deleted, modified): (Vec<_>, Vec<_>) =
            repo.index_diff()?.into_iter().partition(|entry| entry.deleted);
        let untracked_files = repo.untracked_files()?;
        let last_commit_timestamp = format_commit_timestamp(repo.head_commit_time()?)?;
        let remote_url = repo.remote_url(remote)?;
        let branch_name = current_branch(repo)?;

        Ok(RepoInfo {
            deleted_files: deleted.into_iter().map(|e| e.path).collect(),
            modified_files: modified.into_iter().map(|e| e.path).collect(),
            untracked_files,
            last_commit_timestamp,
            repo_url: url::browser_repo_url(&remote_url),
            repo_name: url::repo_name(&remote_url),
            org_url: url::browser_org_url(&remote_url),
            org_name: url::org_name(&remote_url),
            branch_name,
        })
    }
}

impl GitHandler for InfoHandler {
    const NAME: &'static str = "InfoHandler";
    const ROUTE: &'static str = "/info";

    fn handle<R: GitRepository>(
        &self,
        repo: &R,
        request: &HandlerRequest,
    ) -> ServiceResult<ApiResponse> {
        let info = Self::repo_info(repo, &request.remote)?;
        ApiResponse::ok("Status fetched successfully").with_field("repoInfo", &info)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OriginInfoHandler;

impl OriginInfoHandler {
    /// Fetch `remote` and count commits on each side of the upstream.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD is detached, the fetch fails, or the
    /// branch has no upstream.
    pub fn origin_info<R: GitRepository>(repo: &R, remote: &str) -> GitResult<OriginInfo> {
        let branch = current_branch(repo)?;
        repo.fetch(remote)?;
        let upstream = repo
            .upstream_branch(&branch)?
            .ok_or_else(|| GitError::NoUpstream {
                branch: branch.clone(),
            })?;

        let commits_behind = repo.iter_commits(&format!("{branch}..{upstream}"))?.len();
        let commits_ahead = repo.iter_commits(&format!("{upstream}..{branch}"))?.len();

        Ok(OriginInfo {
            commits_behind,
            commits_ahead,
        })
    }
}

impl GitHandler for OriginInfoHandler {
    const NAME: &'static str = "OriginInfoHandler";
    const ROUTE: &'static str = "/origin-info";

    fn handle<R: GitRepository>(
        &self,
        repo: &R,
        request: &HandlerRequest,
    ) -> ServiceResult<ApiResponse> {
        let info = Self::origin_info(repo, &request.remote)?;
        ApiResponse::ok("Origin status fetched successfully").with_field("repoInfo", &info)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PushHandler;

impl GitHandler for PushHandler {
    const NAME: &'static str = "PushHandler";
    const ROUTE: &'static str = "/push";

    fn handle<R: GitRepository>(
        &self,
        repo: &R,
        request: &HandlerRequest,
    ) -> ServiceResult<ApiResponse> {
        let branch = current_branch(repo)?;
        let results = repo.push(&request.remote, &branch)?;
        check_push_results(&results)?;
        Ok(ApiResponse::ok("Repo pushed successfully"))
    }
}

#[cfg(test)]
mod tests;
