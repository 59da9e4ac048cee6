//! Command implementations.

pub mod config;
pub mod lookup;
pub mod nameservers;
pub mod scan;

use rbl::{LookupConfig, RangeScanner, RblClient, ScanConfig};

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolver settings for DNSBL queries
    pub lookup: LookupConfig,

    /// Range scan limits
    pub scan: ScanConfig,

    /// Output format
    pub output_format: OutputFormat,

    /// Show a progress bar during range scans
    pub progress: bool,

    /// Disable colors
    pub no_color: bool,
}

impl Context {
    /// Create a client with the configured resolver.
    pub fn client(&self) -> anyhow::Result<RblClient> {
        Ok(RblClient::builder().config(self.lookup).build()?)
    }

    /// Create a range scanner sharing one client across its workers.
    pub fn scanner(&self) -> anyhow::Result<RangeScanner> {
        Ok(RangeScanner::with_config(self.client()?, self.scan))
    }
}
