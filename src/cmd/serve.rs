// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Serve command implementation.

use tracing::{debug, warn};

use crate::api;
use crate::config::Config;
use crate::error::Result;
use crate::git::backend::RepoQuery;
use crate::git::open_repo;

/// Run the HTTP server until interrupted.
///
/// The repository is only checked here; every request opens it again, so a
/// repository created after startup is picked up.
///
/// # Errors
///
/// Returns an error if the server cannot bind or fails while running.
pub async fn run_serve_command(config: &Config) -> Result<()> {
    match open_repo(&config.repo.path) {
        Ok(repo) => debug!(workdir = %repo.workdir().display(), "repository found"),
        Err(e) => warn!(error = %e, "requests will fail until a repository exists"),
    }

    api::serve(config).await
}
