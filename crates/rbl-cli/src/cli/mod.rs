//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use rbl::{LookupConfig, ScanConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_ADDRESSES};
use std::time::Duration;

use crate::config::Config;
use crate::logging;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config = Config::load()?;
    let ctx = context(&cli, &config)?;

    // Dispatch to appropriate command
    match cli.command {
        Commands::Lookup(args) => commands::lookup::execute(ctx, args).await,
        Commands::Scan(args) => commands::scan::execute(ctx, args).await,
        Commands::Nameservers(args) => commands::nameservers::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}

/// Merge flags (already carrying env values) over the config file and defaults.
fn context(cli: &Cli, config: &Config) -> Result<commands::Context> {
    let mut lookup = LookupConfig::new();
    if let Some(server) = cli.server.or(config.server) {
        lookup = lookup.server(server);
    }
    if let Some(port) = cli.port.or(config.port) {
        lookup = lookup.port(port);
    }
    if let Some(secs) = cli.timeout.or(config.timeout_secs) {
        if secs == 0 {
            anyhow::bail!("timeout must be at least 1 second");
        }
        lookup = lookup.timeout(Duration::from_secs(secs));
    }

    let concurrency = cli
        .concurrency
        .or(config.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);
    if concurrency == 0 {
        anyhow::bail!("concurrency must be at least 1");
    }

    let scan = ScanConfig {
        concurrency,
        max_addresses: cli
            .max_addresses
            .or(config.max_addresses)
            .unwrap_or(DEFAULT_MAX_ADDRESSES),
    };

    Ok(commands::Context {
        lookup,
        scan,
        output_format: cli.output.or(config.output_format).unwrap_or_default(),
        progress: cli.progress,
        no_color: cli.no_color,
    })
}
