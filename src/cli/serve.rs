// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `serve` command arguments.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `serve` command. Each one overrides its config key.
#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Address to listen on (server.bind).
    #[arg(short = 'b', long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Path inside the repository to serve (repo.path).
    #[arg(short = 'r', long, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// URL prefix for the /git routes (server.base_url).
    #[arg(long = "base-url", value_name = "PREFIX")]
    pub base_url: Option<String>,

    /// Remote used for info, fetch and push (repo.remote).
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,
}

impl ServeArgs {
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();
        if let Some(ref bind) = self.bind {
            overrides.push(format!("server.bind={bind}"));
        }
        if let Some(ref base_url) = self.base_url {
            overrides.push(format!("server.base_url={base_url}"));
        }
        if let Some(ref repo) = self.repo {
            overrides.push(format!("repo.path={}", repo.display()));
        }
        if let Some(ref remote) = self.remote {
            overrides.push(format!("repo.remote={remote}"));
        }
        overrides
    }
}
