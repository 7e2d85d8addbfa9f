// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    CommitHandler, GitHandler, HandlerRequest, InfoHandler, OriginInfo, OriginInfoHandler,
    PullHandler, PushHandler, RepoInfo, check_push_results, format_commit_timestamp,
};
use crate::api::response::ApiResponse;
use crate::api::wrap::{UNEXPECTED_ERROR, handle_exceptions};
use crate::error::{GitError, GitResult};
use crate::git::backend::{DiffEntry, RepoMutation, RepoQuery};
use crate::git::push::{PushFlags, PushInfo};
use crate::logging::LogContext;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory repository recording every mutation it receives.
#[derive(Default)]
struct MockRepo {
    workdir: PathBuf,
    branch: Option<String>,
    upstream: Option<String>,
    head_time: i64,
    remotes: HashMap<String, String>,
    diff: Vec<DiffEntry>,
    untracked: Vec<String>,
    commits: HashMap<String, Vec<String>>,
    push_results: Vec<PushInfo>,
    fail_pull: bool,
    fail_fetch: bool,
    staged: RefCell<Vec<Vec<String>>>,
    committed: RefCell<Vec<String>>,
    fetched: RefCell<Vec<String>>,
    pulls: RefCell<usize>,
    pushes: RefCell<Vec<(String, String)>>,
    /// Upstream lookups and commit ranges, in call order.
    queries: RefCell<Vec<String>>,
}

impl MockRepo {
    fn on_master() -> Self {
        Self {
            branch: Some("master".to_string()),
            ..Default::default()
        }
    }
}

impl RepoQuery for MockRepo {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn active_branch(&self) -> GitResult<Option<String>> {
        Ok(self.branch.clone())
    }

    fn upstream_branch(&self, branch: &str) -> GitResult<Option<String>> {
        self.queries.borrow_mut().push(format!("{branch}@{{upstream}}"));
        Ok(self.upstream.clone())
    }

    fn head_commit_time(&self) -> GitResult<i64> {
        Ok(self.head_time)
    }

    fn remote_url(&self, remote: &str) -> GitResult<String> {
        self.remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| GitError::RemoteNotFound {
                remote: remote.to_string(),
            })
    }

    fn index_diff(&self) -> GitResult<Vec<DiffEntry>> {
        Ok(self.diff.clone())
    }

    fn untracked_files(&self) -> GitResult<Vec<String>> {
        Ok(self.untracked.clone())
    }

    fn iter_commits(&self, range: &str) -> GitResult<Vec<String>> {
        self.queries.borrow_mut().push(range.to_string());
        Ok(self.commits.get(range).cloned().unwrap_or_default())
    }
}

impl RepoMutation for MockRepo {
    fn stage(&self, files: &[String]) -> GitResult<()> {
        self.staged.borrow_mut().push(files.to_vec());
        Ok(())
    }

    fn commit(&self, message: &str) -> GitResult<()> {
        self.committed.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn pull(&self) -> GitResult<()> {
        *self.pulls.borrow_mut() += 1;
        if self.fail_pull {
            return Err(GitError::CommandFailed {
                command: "git pull --quiet".to_string(),
                message: "CONFLICT (content): Merge conflict in a.txt".to_string(),
            });
        }
        Ok(())
    }

    fn fetch(&self, remote: &str) -> GitResult<()> {
        self.fetched.borrow_mut().push(remote.to_string());
        if self.fail_fetch {
            return Err(GitError::CommandFailed {
                command: format!("git fetch --quiet {remote}"),
                message: "fatal: unable to access 'https://git.example.com/org/repo.git/': Could not resolve host: git.example.com".to_string(),
            });
        }
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> GitResult<Vec<PushInfo>> {
        self.pushes
            .borrow_mut()
            .push((remote.to_string(), branch.to_string()));
        Ok(self.push_results.clone())
    }
}

fn request(uri: &str) -> HandlerRequest {
    HandlerRequest::new("PUT", uri, "origin")
}

/// Run a handler through the error boundary, as the router does.
fn run<H: GitHandler>(repo: &MockRepo, request: &HandlerRequest) -> ApiResponse {
    let log = LogContext::new(H::NAME, request.to_string());
    handle_exceptions(&log, || H::default().handle(repo, request))
}

// --- Commit ---

#[test]
fn test_commit_stages_exact_files_and_message() {
    let repo = MockRepo::on_master();
    let request = request("/git/commit").with_body(
        json!({"files": ["a.txt", ".mything.sh"], "message": "I am doing a commit"}).to_string(),
    );

    let response = run::<CommitHandler>(&repo, &request);

    assert_eq!(response, ApiResponse::ok("Files committed successfully"));
    assert_eq!(
        *repo.staged.borrow(),
        vec![vec!["a.txt".to_string(), ".mything.sh".to_string()]]
    );
    assert_eq!(*repo.committed.borrow(), vec!["I am doing a commit".to_string()]);
}

#[test]
fn test_commit_missing_message_is_generic_error() {
    let repo = MockRepo::on_master();
    let request = request("/git/commit").with_body(json!({"files": ["a.txt"]}).to_string());

    let response = run::<CommitHandler>(&repo, &request);

    assert_eq!(response.status, 500);
    assert_eq!(response.status_text, UNEXPECTED_ERROR);
    assert!(repo.staged.borrow().is_empty());
    assert!(repo.committed.borrow().is_empty());
}

#[test]
fn test_commit_without_body_is_generic_error() {
    let repo = MockRepo::on_master();
    let response = run::<CommitHandler>(&repo, &request("/git/commit"));
    assert_eq!(response.status_text, UNEXPECTED_ERROR);
}

// --- Pull ---

#[test]
fn test_pull_runs_pull() {
    let repo = MockRepo::on_master();
    let response = run::<PullHandler>(&repo, &request("/git/pull"));
    assert_eq!(response, ApiResponse::ok("Repo pulled successfully"));
    assert_eq!(*repo.pulls.borrow(), 1);
}

#[test]
fn test_pull_conflict_is_git_error() {
    let repo = MockRepo {
        fail_pull: true,
        ..MockRepo::on_master()
    };
    let response = run::<PullHandler>(&repo, &request("/git/pull"));
    assert_eq!(response.status, 500);
    assert!(
        response.status_text.starts_with("Git error: ")
            && response.status_text.contains("Merge conflict"),
        "got: {}",
        response.status_text
    );
}

// --- Info ---

#[test]
fn test_info_builds_repo_info() {
    let repo = MockRepo {
        diff: vec![
            DiffEntry::modified("modified.txt"),
            DiffEntry::deleted("deleted.txt"),
        ],
        untracked: vec!["untracked.txt".to_string()],
        head_time: 0,
        remotes: HashMap::from([(
            "origin".to_string(),
            "https://git.example.com/org/repo.git".to_string(),
        )]),
        ..MockRepo::on_master()
    };

    let response = run::<InfoHandler>(&repo, &request("/git/info"));

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "Status fetched successfully");
    assert_eq!(
        response.fields["repoInfo"],
        json!({
            "deletedFiles": ["deleted.txt"],
            "modifiedFiles": ["modified.txt"],
            "untrackedFiles": ["untracked.txt"],
            "lastCommitTimestamp": "1970-01-01T00:00:00.000000Z",
            "repoUrl": "https://git.example.com/org/repo",
            "repoName": "repo",
            "orgUrl": "https://git.example.com/org",
            "orgName": "org",
            "branchName": "master",
        })
    );

    let info: RepoInfo = serde_json::from_value(response.fields["repoInfo"].clone()).unwrap();
    assert_eq!(info.branch_name, "master");
}

#[test]
fn test_info_without_remote_is_git_error() {
    let repo = MockRepo::on_master();
    let response = run::<InfoHandler>(&repo, &request("/git/info"));
    assert_eq!(response.status, 500);
    assert_eq!(response.status_text, "Git error: remote not found: origin");
}

#[test]
fn test_info_detached_head_is_error() {
    let repo = MockRepo {
        branch: None,
        remotes: HashMap::from([("origin".to_string(), "git@h:o/r.git".to_string())]),
        ..Default::default()
    };
    let response = run::<InfoHandler>(&repo, &request("/git/info"));
    assert_eq!(response.status, 500);
    assert!(response.status_text.contains("detached"));
}

#[test]
fn test_commit_timestamp_format() {
    assert_eq!(
        format_commit_timestamp(0).unwrap(),
        "1970-01-01T00:00:00.000000Z"
    );
    assert_eq!(
        format_commit_timestamp(1_700_000_000).unwrap(),
        "2023-11-14T22:13:20.000000Z"
    );
}

// --- Origin info ---

#[test]
fn test_origin_info_counts_commits() {
    let repo = MockRepo {
        upstream: Some("origin/master".to_string()),
        commits: HashMap::from([
            (
                "master..origin/master".to_string(),
                vec!["c1".to_string(), "c2".to_string()],
            ),
            ("origin/master..master".to_string(), Vec::new()),
        ]),
        ..MockRepo::on_master()
    };

    let response = run::<OriginInfoHandler>(&repo, &request("/git/origin-info"));

    assert_eq!(response.status_text, "Origin status fetched successfully");
    let info: OriginInfo = serde_json::from_value(response.fields["repoInfo"].clone()).unwrap();
    assert_eq!(
        info,
        OriginInfo {
            commits_behind: 2,
            commits_ahead: 0
        }
    );
    assert_eq!(*repo.fetched.borrow(), vec!["origin".to_string()]);
}

#[test]
fn test_origin_info_fetch_failure_is_git_error() {
    let repo = MockRepo {
        fail_fetch: true,
        upstream: Some("origin/master".to_string()),
        ..MockRepo::on_master()
    };

    let response = run::<OriginInfoHandler>(&repo, &request("/git/origin-info"));

    assert_eq!(response.status, 500);
    assert!(
        response.status_text.starts_with("Git error: ")
            && response.status_text.contains("Could not resolve host"),
        "got: {}",
        response.status_text
    );
    assert!(response.fields.is_empty());
    assert_eq!(*repo.fetched.borrow(), vec!["origin".to_string()]);
    assert!(repo.queries.borrow().is_empty());
}

#[test]
fn test_origin_info_without_upstream_is_error() {
    let repo = MockRepo::on_master();
    let response = run::<OriginInfoHandler>(&repo, &request("/git/origin-info"));
    assert_eq!(response.status, 500);
    assert_eq!(
        response.status_text,
        "Git error: no upstream configured for branch master"
    );
}

// --- Push ---

fn push_repo(flags: PushFlags, summary: &str) -> MockRepo {
    MockRepo {
        push_results: vec![PushInfo::new(flags, summary)],
        ..MockRepo::on_master()
    }
}

#[test]
fn test_push_success() {
    let repo = push_repo(PushFlags::FAST_FORWARD, "abc..def");
    let response = run::<PushHandler>(&repo, &request("/git/push"));
    assert_eq!(response, ApiResponse::ok("Repo pushed successfully"));
    assert_eq!(
        *repo.pushes.borrow(),
        vec![("origin".to_string(), "master".to_string())]
    );
}

#[test]
fn test_push_rejected() {
    let repo = push_repo(
        PushFlags::ERROR | PushFlags::REJECTED,
        "[rejected] (non-fast-forward)",
    );
    let response = run::<PushHandler>(&repo, &request("/git/push"));
    assert_eq!(response.status, 500);
    insta::assert_snapshot!(
        response.status_text,
        @"Git error: Push rejected. You should pull remote changes and re-push after merging. Message: [rejected] (non-fast-forward)"
    );
}

#[test]
fn test_push_error() {
    let repo = push_repo(PushFlags::ERROR, "[remote failure] (unpacker error)");
    let response = run::<PushHandler>(&repo, &request("/git/push"));
    assert_eq!(response.status, 500);
    assert!(
        response
            .status_text
            .starts_with("Git error: Push failed. Message: [remote failure]"),
        "got: {}",
        response.status_text
    );
}

#[test]
fn test_push_results_rejection_wins_over_earlier_error() {
    let results = vec![
        PushInfo::new(PushFlags::ERROR, "[remote failure]"),
        PushInfo::new(PushFlags::ERROR | PushFlags::REJECTED, "[rejected] (fetch first)"),
    ];
    assert!(matches!(
        check_push_results(&results),
        Err(GitError::PushRejected { summary }) if summary == "[rejected] (fetch first)"
    ));
}

#[test]
fn test_push_results_empty() {
    assert!(matches!(
        check_push_results(&[]),
        Err(GitError::EmptyPushResult)
    ));
}

#[test]
fn test_push_detached_head_does_not_push() {
    let repo = MockRepo {
        branch: None,
        ..push_repo(PushFlags::FAST_FORWARD, "abc..def")
    };
    let response = run::<PushHandler>(&repo, &request("/git/push"));
    assert_eq!(response.status, 500);
    assert!(repo.pushes.borrow().is_empty());
}
