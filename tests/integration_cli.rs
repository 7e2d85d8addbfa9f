// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns, and
//! checks that the resulting overrides load into a valid configuration.

use clap::Parser;
use nbgit::cli::serve::ServeArgs;
use nbgit::cli::{Cli, Command};
use nbgit::config::Config;

fn load(cli: &Cli, serve: Option<&ServeArgs>) -> Config {
    let mut loader = Config::builder();
    for ini in &cli.global.inis {
        loader = loader.add_toml_file(ini);
    }
    let overrides = cli
        .global
        .to_config_overrides()
        .into_iter()
        .chain(serve.map(ServeArgs::to_config_overrides).unwrap_or_default());
    for assignment in overrides {
        loader = loader.set_assignment(&assignment).unwrap();
    }
    loader.build().unwrap()
}

// =============================================================================
// Version Command
// =============================================================================

#[test]
fn cli_version_command() {
    let cli = Cli::try_parse_from(["nbgit", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["nbgit", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

// =============================================================================
// Serve Command
// =============================================================================

#[test]
fn cli_serve_defaults() {
    let cli = Cli::try_parse_from(["nbgit", "serve"]).unwrap();
    let Some(Command::Serve(args)) = &cli.command else {
        panic!("expected serve command");
    };
    let config = load(&cli, Some(args));
    assert_eq!(config.server.bind, "127.0.0.1:8888");
    assert_eq!(config.server.base_url, "/");
    assert_eq!(config.repo.remote, "origin");
}

#[test]
fn cli_serve_flags_override_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let ini = temp.path().join("site.toml");
    std::fs::write(&ini, "[server]\nbind = \"127.0.0.1:7000\"\n\n[repo]\nremote = \"fork\"\n").unwrap();

    let cli = Cli::try_parse_from([
        "nbgit",
        "--ini",
        ini.to_str().unwrap(),
        "serve",
        "--bind",
        "127.0.0.1:7001",
        "--base-url",
        "/user/bob/",
    ])
    .unwrap();
    let Some(Command::Serve(args)) = &cli.command else {
        panic!("expected serve command");
    };
    let config = load(&cli, Some(args));

    assert_eq!(config.server.bind, "127.0.0.1:7001");
    assert_eq!(config.server.base_url, "/user/bob");
    assert_eq!(config.repo.remote, "fork");
}

#[test]
fn cli_set_option_applies() {
    let cli = Cli::try_parse_from(["nbgit", "-s", "repo.remote=upstream", "options"]).unwrap();
    let config = load(&cli, None);
    assert_eq!(config.repo.remote, "upstream");
}

#[test]
fn cli_unknown_command_fails() {
    assert!(Cli::try_parse_from(["nbgit", "build"]).is_err());
}
