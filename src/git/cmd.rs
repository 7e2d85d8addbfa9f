// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git CLI execution.
//!
//! ```text
//! git_command --> git (exit != 0 is an error, stdout trimmed)
//! git_output  --> git (exit status returned, stdout raw)
//! ```
//!
//! Every invocation sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`
//! so a missing credential fails the request instead of hanging the server.

use std::path::Path;
use std::process::Command;

use tracing::{debug, trace};

use crate::error::{GitError, GitResult};

/// Captured result of a git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Best message to surface for a failed command: stderr, else stdout.
    #[must_use]
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

fn render(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

/// Run git and capture its output whatever the exit status.
///
/// # Errors
///
/// Returns `GitError::CommandFailed` only if the `git` executable cannot be spawned.
pub fn git_output(args: &[&str], cwd: &Path) -> GitResult<GitOutput> {
    debug!(command = %render(args), cwd = %cwd.display(), "running git");

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GCM_INTERACTIVE", "never")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| GitError::CommandFailed {
            command: render(args),
            message: format!("failed to execute git: {e}"),
        })?;

    let result = GitOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    trace!(success = result.success, stderr = %result.stderr.trim(), "git finished");
    Ok(result)
}

/// Run git, failing on a non-zero exit. Returns untrimmed stdout.
///
/// # Errors
///
/// Returns `GitError::CommandFailed` carrying git's message on failure.
pub fn git_raw(args: &[&str], cwd: &Path) -> GitResult<String> {
    let output = git_output(args, cwd)?;
    if !output.success {
        return Err(GitError::CommandFailed {
            command: render(args),
            message: output.failure_message(),
        });
    }
    Ok(output.stdout)
}

/// Run git, failing on a non-zero exit. Returns trimmed stdout.
///
/// # Errors
///
/// Returns `GitError::CommandFailed` carrying git's message on failure.
pub fn git_command(args: &[&str], cwd: &Path) -> GitResult<String> {
    git_raw(args, cwd).map(|stdout| stdout.trim().to_string())
}

/// Split NUL-terminated `-z` output into its fields.
#[must_use]
pub fn split_nul(output: &str) -> Vec<&str> {
    output.split('\0').filter(|s| !s.is_empty()).collect()
}
