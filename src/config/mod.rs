// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for nbgit.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. nbgit.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. NBGIT_* env vars
//! 5. --set KEY=VALUE
//! 6. serve flags (--bind, --repo, ...)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! NBGIT_SERVER__BIND=0.0.0.0:9000  → server.bind = "0.0.0.0:9000"
//! NBGIT_SERVER__BASE_URL=/user/me  → server.base_url = "/user/me"
//! NBGIT_REPO__REMOTE=upstream      → repo.remote = "upstream"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{GlobalConfig, RepoConfig, ServerConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// HTTP server options.
    pub server: ServerConfig,
    /// Repository options.
    pub repo: RepoConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nbgit::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("nbgit.toml")
    ///     .with_env_prefix("NBGIT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate values and normalize `server.base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unparseable bind address, a
    /// relative base URL, or an empty remote name.
    pub fn validate(&mut self) -> std::result::Result<(), ConfigError> {
        self.server.bind_addr()?;
        self.server.normalize_base_url()?;
        if self.repo.remote.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "repo".to_string(),
                key: "remote".to_string(),
                message: "remote name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert(
            "global.output_log_level",
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level",
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file", log_file.display().to_string());
        }
        options.insert("server.bind", self.server.bind.clone());
        options.insert("server.base_url", self.server.base_url.clone());
        options.insert("repo.path", self.repo.path.display().to_string());
        options.insert("repo.remote", self.repo.remote.clone());

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
