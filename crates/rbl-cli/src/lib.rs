//! # rbl-cli
//!
//! Command-line interface for DNSBL lookups.
//!
//! ## Features
//!
//! - **Range scans**: every address of a CIDR block, checked concurrently
//! - **Host lookups**: every IPv4 address a host name resolves to
//! - **Nameserver discovery** for a DNSBL zone
//! - **Multiple output formats**: JSON, pretty tables, CSV, YAML

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
