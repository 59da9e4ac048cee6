//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use rbl::{Dnsbl, LookupResult, Outcome, ResultRecord, ScanResults, ScanSummary};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output
    #[default]
    Json,
    /// Tables with colors and a summary line
    Pretty,
    /// CSV output, one row per address
    Csv,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "table" => Ok(Self::Pretty),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: json, pretty, csv, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Record")]
    record: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&LookupResult> for ResultRow {
    fn from(result: &LookupResult) -> Self {
        let address = result
            .address
            .map_or_else(|| "-".to_string(), |a| a.to_string());

        let (status, record, detail) = match &result.outcome {
            Outcome::NotListed => ("clean".green().to_string(), String::new(), String::new()),
            Outcome::Listed { record, annotation } => (
                "LISTED".red().bold().to_string(),
                record.to_string(),
                annotation.clone().unwrap_or_default(),
            ),
            Outcome::Failed { detail } => {
                ("failed".yellow().to_string(), String::new(), detail.clone())
            }
            Outcome::Unresolved { detail } => (
                "unresolved".yellow().to_string(),
                String::new(),
                detail.clone(),
            ),
        };

        Self {
            address,
            status,
            record,
            detail,
        }
    }
}

/// Render an ordered batch of results, as produced by a range scan.
pub fn render_results(format: OutputFormat, list: &Dnsbl, results: &[LookupResult]) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(results)?,
        OutputFormat::Yaml => serde_yaml::to_string(results)?,
        OutputFormat::Csv => csv_records(results)?,
        OutputFormat::Pretty => {
            let mut out = format!("{} {}\n\n", "List:".bold(), list.as_str().cyan().bold());
            out.push_str(&pretty_table(results));
            out.push_str("\n\n");
            out.push_str(&summary_line(&ScanSummary::from_results(results)));
            out
        }
    };

    Ok(out)
}

/// Render the results for one host.
pub fn render_host(format: OutputFormat, host: &ScanResults) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(host)?,
        OutputFormat::Yaml => serde_yaml::to_string(host)?,
        OutputFormat::Csv => csv_records(&host.results)?,
        OutputFormat::Pretty => {
            let mut out = format!(
                "{} {}\n{} {}\n\n",
                "Host:".bold(),
                host.host.cyan().bold(),
                "List:".bold(),
                host.list.as_str().cyan()
            );
            out.push_str(&pretty_table(&host.results));
            out.push_str("\n\n");
            out.push_str(&summary_line(&ScanSummary::from_results(&host.results)));
            out
        }
    };

    Ok(out)
}

/// Render the nameserver addresses of a DNSBL zone.
pub fn render_nameservers(format: OutputFormat, list: &Dnsbl, servers: &[IpAddr]) -> Result<String> {
    #[derive(Serialize)]
    struct Nameservers<'a> {
        list: &'a Dnsbl,
        nameservers: &'a [IpAddr],
    }

    let doc = Nameservers {
        list,
        nameservers: servers,
    };

    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&doc)?,
        OutputFormat::Yaml => serde_yaml::to_string(&doc)?,
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(Vec::new());
            wtr.write_record(["list", "nameserver"])?;
            for server in servers {
                wtr.write_record([list.as_str(), &server.to_string()])?;
            }
            String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)?
        }
        OutputFormat::Pretty => {
            let mut out = format!("{} {}\n", "Nameservers for".bold(), list.as_str().cyan().bold());
            if servers.is_empty() {
                out.push_str(&format!("  {}", "(none found)".dimmed()));
            }
            for server in servers {
                out.push_str(&format!("  {server}\n"));
            }
            out.trim_end().to_string()
        }
    };

    Ok(out)
}

/// Print rendered output, logging rendering failures instead of failing the command.
pub fn emit(rendered: Result<String>) {
    match rendered {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => tracing::error!(error = %e, "failed to render output"),
    }
}

const CSV_HEADER: [&str; 6] = [
    "list",
    "address",
    "listedRecord",
    "annotation",
    "failed",
    "failureDetail",
];

/// One row per result; absent fields become empty cells so columns stay fixed.
fn csv_records(results: &[LookupResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for result in results {
        let record = ResultRecord::from(result.clone());
        wtr.write_record([
            record.list.as_str(),
            record.address.as_str(),
            record.listed_record.as_str(),
            record.annotation.as_deref().unwrap_or_default(),
            if record.failed { "true" } else { "false" },
            record.failure_detail.as_deref().unwrap_or_default(),
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)?)
}

fn pretty_table(results: &[LookupResult]) -> String {
    let rows: Vec<ResultRow> = results.iter().map(ResultRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn summary_line(summary: &ScanSummary) -> String {
    format!(
        "{} {} checked, {} listed, {} clean, {} failed",
        "Summary:".bold(),
        summary.total,
        summary.listed.to_string().red().bold(),
        summary.clean.to_string().green(),
        summary.failed.to_string().yellow()
    )
}
