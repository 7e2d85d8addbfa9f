// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for nbgit.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, ServerConfig, RepoConfig
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// URL prefix the `/git` routes are mounted under.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8888".to_string(),
            base_url: "/".to_string(),
        }
    }
}

impl ServerConfig {
    /// Parse `bind` into a socket address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `bind` is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|e| ConfigError::InvalidValue {
            section: "server".to_string(),
            key: "bind".to_string(),
            message: format!("'{}' is not a socket address: {e}", self.bind),
        })
    }

    /// Validate and normalize `base_url` to `/prefix` form (root stays `/`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `base_url` does not start with `/`.
    pub fn normalize_base_url(&mut self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                section: "server".to_string(),
                key: "base_url".to_string(),
                message: format!("must start with '/', got '{}'", self.base_url),
            });
        }
        let trimmed = self.base_url.trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        Ok(())
    }
}

/// Repository the handlers operate on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Path inside the working tree (discovery walks up from here).
    pub path: PathBuf,
    /// Remote used for info, fetch and push.
    pub remote: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            remote: "origin".to_string(),
        }
    }
}
