//! Resolver configuration types.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Per-query timeout ceiling
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Port used when a DNS server is given without one
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Where and how DNSBL queries are sent.
///
/// Read-only once a client is built; every lookup in a scan shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupConfig {
    /// DNS server for DNSBL queries; `None` uses the system resolver
    pub server: Option<IpAddr>,

    /// Port of `server`
    pub port: u16,

    /// Timeout applied to each individual query
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupConfig {
    /// System resolver, port 53, 10 second timeout
    #[must_use]
    pub const fn new() -> Self {
        Self {
            server: None,
            port: DEFAULT_DNS_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Send DNSBL queries to a specific server
    #[must_use]
    pub const fn server(mut self, server: IpAddr) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the server port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the per-query timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Socket address of the configured server, if any
    #[must_use]
    pub fn nameserver(&self) -> Option<SocketAddr> {
        self.server.map(|ip| SocketAddr::new(ip, self.port))
    }
}
