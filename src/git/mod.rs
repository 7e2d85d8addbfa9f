// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!        RepoOpener::open()  (once per request)
//!                |
//!                v
//!      ,--------------------,
//!      |  backend (traits)  |
//!      '--+-------------+---'
//!         |             |
//!         v             v
//!    RepoQuery     RepoMutation
//!         \             /
//!          v           v
//!            LocalRepo
//!         gix  |  cmd.rs (git CLI)
//!  HEAD, config | diff, ls-files, rev-list,
//!               | add, commit, pull, fetch, push
//!
//!   push.rs  porcelain ref lines -> PushInfo { PushFlags }
//!   url.rs   remote URL -> browser repo/org URL and names
//! ```

pub mod backend;
pub mod cmd;
pub mod push;
pub mod url;

use std::path::{Path, PathBuf};

use crate::error::GitResult;
use backend::{GitRepository, LocalRepo};

/// Open the repository whose working tree contains `path`.
///
/// # Errors
///
/// Returns `GitError::RepoNotFound` if `path` is not inside a work tree.
pub fn open_repo(path: &Path) -> GitResult<LocalRepo> {
    LocalRepo::open(path)
}

/// Produces a fresh repository handle for each request.
pub trait RepoOpener: Send + Sync + 'static {
    type Repo: GitRepository;

    /// Open the served repository.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened.
    fn open(&self) -> GitResult<Self::Repo>;
}

/// Opens the repository at a fixed path.
#[derive(Debug, Clone)]
pub struct PathOpener {
    path: PathBuf,
}

impl PathOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RepoOpener for PathOpener {
    type Repo = LocalRepo;

    fn open(&self) -> GitResult<LocalRepo> {
        open_repo(&self.path)
    }
}
