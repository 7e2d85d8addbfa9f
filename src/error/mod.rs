// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          ServiceError (~24 bytes)
//!                  |
//!   +--------+-----+------+--------+
//!   |        |            |        |
//!   v        v            v        v
//!  Git   InvalidInput    Join    Other
//!  Box     Box<str>    Box<str> Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git     Gix, CommandFailed, RemoteNotFound, NoUpstream,
//!           PushRejected, PushFailed
//!
//! ConfigError (ParseError, InvalidValue) is raised while loading
//! configuration and reaches `main` through `anyhow`.
//!
//! Client mapping (api::wrap):
//!   Git  --> 500 "Git error: <message>"
//!   *    --> 500 "An unexpected error occurred."
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ServiceError`].
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Result type for the git layer.
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Top-level error type for request handling.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Error originating from the version-control layer.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Request body missing or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(Box<str>),

    /// Blocking worker panicked or was cancelled.
    #[error("worker error: {0}")]
    Join(Box<str>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl ServiceError {
    /// Create an [`ServiceError::InvalidInput`] from a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into().into_boxed_str())
    }

    /// The git error behind this error, if it came from the VCS layer.
    #[must_use]
    pub fn as_git(&self) -> Option<&GitError> {
        match self {
            Self::Git(e) => Some(e),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ServiceError {
                fn from(err: $error) -> Self {
                    ServiceError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_input(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string().into_boxed_str())
    }
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// gix has multiple error types that are converted through this enum.
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Failed to resolve HEAD to a commit.
    #[error("failed to resolve head commit: {0}")]
    HeadCommit(#[from] Box<gix::reference::head_commit::Error>),

    /// Failed to decode commit metadata.
    #[error("failed to read commit: {0}")]
    Commit(#[from] gix::object::commit::Error),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path is not inside a git work tree.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command exited unsuccessfully. `message` is git's stderr.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Remote with this name is not configured.
    #[error("remote not found: {remote}")]
    RemoteNotFound { remote: String },

    /// HEAD does not point at a branch.
    #[error("HEAD is detached, no active branch")]
    DetachedHead,

    /// Branch has no upstream-tracking ref.
    #[error("no upstream configured for branch {branch}")]
    NoUpstream { branch: String },

    /// Remote refused a non-fast-forward update.
    #[error(
        "Push rejected. You should pull remote changes and re-push after merging. Message: {summary}"
    )]
    PushRejected { summary: String },

    /// Push ref result carried the error flag.
    #[error("Push failed. Message: {summary}")]
    PushFailed { summary: String },

    /// Push reported no ref results at all.
    #[error("Push failed. Message: no ref was pushed")]
    EmptyPushResult,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
