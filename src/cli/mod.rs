// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for nbgit using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! nbgit [global options] [command]
//! serve [--bind ADDR] [--repo PATH] [--base-url PREFIX] [--remote NAME]
//! version
//! options
//! inis
//! ```

pub mod global;
pub mod serve;


use crate::cli::global::GlobalOptions;
use crate::cli::serve::ServeArgs;
use clap::{Parser, Subcommand};

/// Notebook Git Extension Server
///
/// Serves commit, pull, push and status endpoints for a local git repository.
#[derive(Debug, Parser)]
#[command(
    name = "nbgit",
    author,
    version,
    about = "Notebook Git Extension Server",
    long_about = "nbgit Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Serves PUT <base_url>/git/{commit,pull,info,origin-info,push}\n\
                  for the repository containing --repo. Running `nbgit` without\n\
                  a command starts the server.",
    after_help = "CONFIG FILES:\n\n\
                  nbgit reads `nbgit.toml` from the current directory if present,\n\
                  then every --ini in order, then NBGIT_<SECTION>__<KEY> environment\n\
                  variables, then --set options. Later sources override earlier ones."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs the HTTP server (default).
    Serve(ServeArgs),

    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files used by nbgit.
    Inis,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
