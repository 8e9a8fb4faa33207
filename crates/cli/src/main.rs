//! `create-sample` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments** with `clap`; the first positional argument is the
//!    project name.
//! 2. **Load configuration** from `.create-sample.toml` (or `--config`).
//! 3. **Wire observability**: `tracing-subscriber` with text or JSON output.
//! 4. **Construct infrastructure**: the `toolchain` adapters, injected into
//!    [`nodes::CreateProject`].
//!
//! Exit status is `0` on success and `1` on any failure, with the full error
//! chain logged.

mod config;
mod telemetry;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nodes::{CreateProject, CreateRequest};
use toolchain::RegistrySource;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::telemetry::LogFormat;

/// Build the local packages and create a sample project that uses them.
#[derive(Debug, Parser)]
#[command(name = "create-sample", version)]
struct Cli {
    /// Project name, followed by any further positional arguments.
    #[arg(required = true, value_name = "NAME")]
    args: Vec<String>,

    /// Directory to create the project in. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Config file. Defaults to `.create-sample.toml` if present.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read the build registry from this JSON file instead of the configured source.
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init(cli.log_format);

    match run(cli).await {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let current = std::env::current_dir().context("cannot determine current directory")?;

    let config = match &cli.config {
        Some(path) => Config::load(path, true)?,
        None => Config::load(&current.join(DEFAULT_CONFIG_FILE), false)?,
    };

    let workspace_root = current.join(&config.build.workspace_root);
    let source = match &cli.registry {
        Some(file) => RegistrySource::File(current.join(file)),
        None => config.registry_source(&workspace_root),
    };
    tracing::debug!(?source, workspace = %workspace_root.display(), "configuration loaded");

    let create = CreateProject::new(
        Arc::new(config.builder(&workspace_root, source)),
        Arc::new(config.generator()),
        Arc::new(config.installer()),
    );
    let request = CreateRequest {
        args: cli.args,
        cwd: cli.cwd.map_or_else(|| current.clone(), |dir| current.join(dir)),
    };

    Ok(create.run(&request).await?)
}
