//! Fastly CLI - manage Fastly services and their versions

mod api;
mod cli;
mod commands;
mod config;
mod errlog;
mod errors;
mod output;
mod service;

use anyhow::Context as _;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use api::Client;
use cli::{Cli, Commands};
use commands::Context;
use config::ManifestData;
use errlog::ErrorLog;
use output::{ErrorReport, Output};

fn init_tracing(verbose: bool, agent: bool) {
    let default = if verbose { "fastly=debug" } else { "fastly=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if agent {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    // .env has to be loaded before clap reads FASTLY_API_TOKEN and friends
    let env_loaded = config::load_env();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.agent);
    if let Err(e) = env_loaded {
        tracing::warn!(error = %e, "ignoring .env");
    }

    let out = Output::new(cli.agent);

    // If no command provided, show help
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            eprintln!("Error: no command provided. Use --help for usage.");
            std::process::exit(1);
        }
    };

    let manifest = match ManifestData::load(cli.service_id).context("Failed to load project manifest") {
        Ok(manifest) => manifest,
        Err(e) => {
            let report = ErrorReport::from_error(&e);
            out.error(&report);
            std::process::exit(report.exit_code());
        }
    };
    if let Some(file) = &manifest.file {
        tracing::debug!(manifest = %file.name, "loaded {}", config::MANIFEST_FILENAME);
    }

    let token = cli.token.unwrap_or_default();
    if token.is_empty() {
        tracing::warn!("no API token, set FASTLY_API_TOKEN or pass --token");
    }

    let errlog = ErrorLog::new();
    let ctx = Context {
        api: Arc::new(Client::new(&cli.endpoint, &token)),
        out,
        errlog: errlog.clone(),
        manifest,
        service_name: cli.service_name,
        verbose: cli.verbose,
    };

    let result = match command {
        Commands::ServiceVersion(cmd) => commands::service_version::run(cmd, &ctx).await,
        Commands::Domain(cmd) => commands::domain::run(cmd, &ctx).await,
    };

    persist_errors(&errlog);

    if let Err(e) = result {
        let report = ErrorReport::from_error(&e);
        ctx.out.error(&report);
        std::process::exit(report.exit_code());
    }
}

fn persist_errors(errlog: &ErrorLog) {
    let Some(path) = config::error_log_path() else {
        return;
    };
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = errlog.persist(&path, &args) {
        tracing::warn!(error = %e, "failed to persist error log");
    }
}
