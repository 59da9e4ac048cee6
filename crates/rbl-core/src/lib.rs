//! Core types and errors for DNSBL lookups.
//!
//! This crate provides the foundational pieces shared by the rblscan crates:
//!
//! - **Types**: [`Dnsbl`] zone names, per-address [`LookupResult`]s, single-host
//!   [`ScanResults`] and validated [`RangeScan`] work orders
//! - **Reverse formatting**: the octet-reversed labels DNSBLs are indexed by
//! - **Errors**: the [`RblError`] taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use rbl_core::{Dnsbl, RangeScan, Result};
//!
//! fn plan() -> Result<()> {
//!     let list: Dnsbl = "zen.spamhaus.org".parse()?;
//!     let scan = RangeScan::parse(list, "192.0.2.0/30", 256)?;
//!     assert_eq!(scan.count(), 4);
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/rbl-core/0.1.0")]

mod error;
pub mod reverse;
pub mod types;

pub use error::{RblError, Result};
pub use reverse::{query_name, reverse, reverse_ipv4, reverse_str};
pub use types::*;
