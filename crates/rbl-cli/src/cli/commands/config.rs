//! `rblscan config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load()?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&config)?);
        }
        OutputFormat::Csv | OutputFormat::Pretty => {
            println!("{}", "Current Configuration:".bold());
            println!();

            let show = |key: &str, value: Option<String>| {
                let value = value.unwrap_or_else(|| "(not set)".dimmed().to_string());
                println!("  {} {}", format!("{key}:").bold(), value);
            };

            show("server", config.server.map(|s| s.to_string()));
            show("port", config.port.map(|p| p.to_string()));
            show("timeout_secs", config.timeout_secs.map(|t| t.to_string()));
            show("concurrency", config.concurrency.map(|c| c.to_string()));
            show("max_addresses", config.max_addresses.map(|m| m.to_string()));
            show("output_format", config.output_format.map(|f| f.to_string()));
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());

    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
