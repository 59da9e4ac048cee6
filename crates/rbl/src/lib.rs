//! DNSBL lookups for single hosts and whole IPv4 ranges.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rbl::{Dnsbl, RangeScanner, RblClient};
//!
//! #[tokio::main]
//! async fn main() -> rbl::Result<()> {
//!     let client = RblClient::builder()
//!         .server("9.9.9.9".parse().unwrap())
//!         .build()?;
//!     let list: Dnsbl = "zen.spamhaus.org".parse()?;
//!
//!     // One host, possibly several addresses
//!     let host = client.lookup(&list, "smtp.example.com").await;
//!     println!("listed: {}", host.any_listed());
//!
//!     // A whole block, results in address order
//!     let scanner = RangeScanner::new(client).concurrency(32);
//!     let scan = scanner.plan(list, "192.0.2.0/28")?;
//!     for result in scanner.scan(&scan).await {
//!         println!("{:?}", result.to_record());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Enables `scan`
//! - `scan` - Concurrent range scanning via [`RangeScanner`]

#![doc(html_root_url = "https://docs.rs/rbl/0.1.0")]

// Re-export core types
pub use rbl_core::*;

// Re-export client
pub use rbl_client::{
    DnsblResolver, HickoryResolver, LookupConfig, RblClient, RblClientBuilder, DEFAULT_DNS_PORT,
    DEFAULT_TIMEOUT,
};

// Re-export scanner if enabled
#[cfg(feature = "scan")]
pub use rbl_scan::{RangeScanner, ScanConfig, DEFAULT_CONCURRENCY};

// Re-export runtime for convenience
pub use tokio;
pub use serde;
pub use serde_json;
