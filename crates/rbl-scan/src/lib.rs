//! Concurrent DNSBL scanning of IPv4 address ranges.
//!
//! [`RangeScanner`] checks every address of a [`RangeScan`](rbl_core::RangeScan)
//! with a bounded pool of workers and returns the results in enumeration
//! order, whatever order the queries complete in.

#![doc(html_root_url = "https://docs.rs/rbl-scan/0.1.0")]

pub mod scanner;

pub use scanner::{RangeScanner, ScanConfig, DEFAULT_CONCURRENCY};
