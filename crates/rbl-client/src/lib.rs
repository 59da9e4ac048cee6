//! DNSBL query client.
//!
//! This crate provides [`RblClient`], which checks single addresses and hosts
//! against a DNSBL through a [`DnsblResolver`]. The default resolver is backed
//! by `hickory-resolver` and talks either to the system's configured
//! nameservers or to one caller-specified server.

#![doc(html_root_url = "https://docs.rs/rbl-client/0.1.0")]

mod client;
mod config;
mod resolver;

#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use client::{RblClient, RblClientBuilder};
pub use config::*;
pub use rbl_core::{RblError, Result};
pub use resolver::{DnsblResolver, HickoryResolver};
