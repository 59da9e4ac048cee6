//! In-memory resolver for tests.

use async_trait::async_trait;
use rbl_core::{query_name, reverse_ipv4, Dnsbl, RblError, Result};
use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::resolver::DnsblResolver;

/// A resolver answering from fixed tables.
///
/// Unknown names behave like NXDOMAIN. Names registered with [`hang`](Self::hang)
/// never answer, which lets tests exercise the client's timeout.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    a: HashMap<String, Vec<Ipv4Addr>>,
    txt: HashMap<String, Vec<String>>,
    ns: HashMap<String, Vec<String>>,
    hosts: HashMap<String, Vec<IpAddr>>,
    failures: HashMap<String, String>,
    hanging: HashSet<String>,
    delays: HashMap<String, Duration>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StaticResolver {
    /// An empty resolver: every name is NXDOMAIN
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer A queries for `name`
    #[must_use]
    pub fn with_a(mut self, name: impl Into<String>, record: Ipv4Addr) -> Self {
        self.a.entry(name.into()).or_default().push(record);
        self
    }

    /// Answer TXT queries for `name`
    #[must_use]
    pub fn with_txt(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.txt.entry(name.into()).or_default().push(text.into());
        self
    }

    /// Answer NS queries for `zone`
    #[must_use]
    pub fn with_ns(mut self, zone: impl Into<String>, host: impl Into<String>) -> Self {
        self.ns.entry(zone.into()).or_default().push(host.into());
        self
    }

    /// Resolve `host` to the given addresses
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>, addrs: &[IpAddr]) -> Self {
        self.hosts.entry(host.into()).or_default().extend_from_slice(addrs);
        self
    }

    /// Make A queries for `name` fail with `detail`
    #[must_use]
    pub fn fail(mut self, name: impl Into<String>, detail: impl Into<String>) -> Self {
        self.failures.insert(name.into(), detail.into());
        self
    }

    /// Never answer A queries for `name`
    #[must_use]
    pub fn hang(mut self, name: impl Into<String>) -> Self {
        self.hanging.insert(name.into());
        self
    }

    /// Delay the A answer for `name`
    #[must_use]
    pub fn delay(mut self, name: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(name.into(), delay);
        self
    }

    /// List `address` on `list` with the given indicator
    #[must_use]
    pub fn listing(self, list: &Dnsbl, address: Ipv4Addr, record: Ipv4Addr) -> Self {
        self.with_a(name_for(list, address), record)
    }

    /// Queries seen so far, as `"<TYPE> <name>"`
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn record(&self, kind: &str, name: &str) {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(format!("{kind} {name}"));
        }
    }
}

/// Query name for `address` under `list`
#[must_use]
pub fn name_for(list: &Dnsbl, address: Ipv4Addr) -> String {
    query_name(&reverse_ipv4(&address), list)
}

#[async_trait]
impl DnsblResolver for StaticResolver {
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>> {
        self.record("A", name);

        if self.hanging.contains(name) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(detail) = self.failures.get(name) {
            return Err(RblError::Dns(detail.clone()));
        }

        Ok(self.a.get(name).cloned().unwrap_or_default())
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        self.record("TXT", name);
        Ok(self.txt.get(name).cloned().unwrap_or_default())
    }

    async fn lookup_ns(&self, zone: &str) -> Result<Vec<String>> {
        self.record("NS", zone);
        Ok(self.ns.get(zone).cloned().unwrap_or_default())
    }

    async fn resolve_host(&self, host: &str) -> Result<Vec<IpAddr>> {
        self.record("HOST", host);
        Ok(self.hosts.get(host).cloned().unwrap_or_default())
    }
}
