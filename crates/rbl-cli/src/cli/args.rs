//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use rbl::Dnsbl;
use std::net::IpAddr;

use crate::output::OutputFormat;

/// Check hosts and whole IPv4 ranges against DNS blocklists
///
/// Results are written to stdout; diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(name = "rblscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// DNS server for DNSBL queries (defaults to the system resolver)
    #[arg(short, long, env = "RBLSCAN_SERVER", global = true)]
    pub server: Option<IpAddr>,

    /// Port of the DNS server [default: 53]
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Per-query timeout in seconds [default: 10]
    #[arg(short, long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Lookups in flight during range scans [default: 64]
    #[arg(short, long, global = true, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Largest range a scan may enumerate [default: 65536]
    #[arg(long, global = true, value_name = "N")]
    pub max_addresses: Option<u64>,

    /// Output format [default: json]
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Show a progress bar on stderr during range scans
    #[arg(long, global = true)]
    pub progress: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check one host or IP address against a DNSBL
    Lookup(LookupArgs),

    /// Check every address of an IPv4 CIDR block against a DNSBL
    Scan(ScanArgs),

    /// Show the authoritative nameservers of a DNSBL zone
    Nameservers(NameserversArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// DNSBL zone (e.g., zen.spamhaus.org)
    pub dnsbl: Dnsbl,

    /// Hostname or IPv4 address to check
    pub target: String,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// DNSBL zone (e.g., zen.spamhaus.org)
    pub dnsbl: Dnsbl,

    /// IPv4 range in CIDR notation (e.g., 192.0.2.0/24)
    pub cidr: String,
}

#[derive(Args, Debug)]
pub struct NameserversArgs {
    /// DNSBL zone (e.g., zen.spamhaus.org)
    pub dnsbl: Dnsbl,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}
