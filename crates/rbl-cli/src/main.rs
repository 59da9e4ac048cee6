//! rblscan - DNSBL checker
//!
//! Checks hosts and whole IPv4 ranges against a DNS blocklist.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    rbl_cli::run().await
}
