// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> ConfigLoader --> Logging --> Command Dispatch
//!   Serve (default) | Version | Options | Inis
//! ```

use std::process::ExitCode;

use nbgit::cli::serve::ServeArgs;
use nbgit::cli::{self, Command};
use nbgit::cmd::config::{run_inis_command, run_options_command};
use nbgit::cmd::serve::run_serve_command;
use nbgit::config::Config;
use nbgit::config::loader::ConfigLoader;
use nbgit::config::types::GlobalConfig;
use nbgit::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Inis) => build_config_loader(&cli, None).map(|loader| {
            run_inis_command(&loader.format_loaded_files());
        }),
        Some(Command::Options) => {
            load_config(&cli, None).map(|config| run_options_command(&config))
        }
        Some(Command::Serve(args)) => run_serve(&cli, args).await,
        None => run_serve(&cli, &ServeArgs::default()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_serve(cli: &cli::Cli, args: &ServeArgs) -> nbgit::error::Result<()> {
    let config = load_config(cli, Some(args))?;
    let _log_guard = init_logging(&build_log_config(&config.global))
        .map_err(|e| e.context("Failed to initialize logging"))?;
    run_serve_command(&config).await
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_log_config(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

fn build_config_loader(
    cli: &cli::Cli,
    serve: Option<&ServeArgs>,
) -> nbgit::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional("nbgit.toml");
    for ini_path in &cli.global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader = loader.with_env_prefix("NBGIT");

    let overrides = cli
        .global
        .to_config_overrides()
        .into_iter()
        .chain(serve.map(ServeArgs::to_config_overrides).unwrap_or_default());
    for assignment in overrides {
        loader = loader.set_assignment(&assignment)?;
    }
    Ok(loader)
}

fn load_config(cli: &cli::Cli, serve: Option<&ServeArgs>) -> nbgit::error::Result<Config> {
    build_config_loader(cli, serve)?
        .build()
        .map_err(|e| e.context("Failed to load config"))
}
