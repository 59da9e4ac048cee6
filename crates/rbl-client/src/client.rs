//! Main DNSBL client implementation.

use futures_util::future::join_all;
use rbl_core::{query_name, reverse_ipv4, Dnsbl, LookupResult, RblError, Result, ScanResults};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LookupConfig;
use crate::resolver::{DnsblResolver, HickoryResolver};

/// DNSBL client
#[derive(Clone)]
pub struct RblClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    resolver: Arc<dyn DnsblResolver>,
    config: LookupConfig,
}

impl RblClient {
    /// Create a client using the system resolver and default settings
    pub fn new() -> Result<Self> {
        RblClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> RblClientBuilder {
        RblClientBuilder::new()
    }

    /// Create a client around an existing resolver
    #[must_use]
    pub fn with_resolver(resolver: impl DnsblResolver + 'static, config: LookupConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                resolver: Arc::new(resolver),
                config,
            }),
        }
    }

    /// The configuration this client was built with
    #[must_use]
    pub fn config(&self) -> &LookupConfig {
        &self.inner.config
    }

    /// Check one IPv4 address against a DNSBL.
    ///
    /// Never returns an error: query failures are recorded in the result.
    /// The TXT record is only fetched when the A lookup produced a listing.
    pub async fn query(&self, list: &Dnsbl, address: Ipv4Addr) -> LookupResult {
        let name = query_name(&reverse_ipv4(&address), list);
        debug!(name = %name, "querying DNSBL");

        let records = match self.bounded(self.inner.resolver.lookup_a(&name)).await {
            Ok(records) => records,
            Err(e) => {
                warn!(name = %name, error = %e, "DNSBL query failed");
                return LookupResult::failed(list.clone(), address, e.to_string());
            }
        };

        let Some(&record) = records.first() else {
            return LookupResult::not_listed(list.clone(), address);
        };

        let annotation = match self.bounded(self.inner.resolver.lookup_txt(&name)).await {
            Ok(texts) => texts.into_iter().next(),
            Err(e) => {
                debug!(name = %name, error = %e, "no TXT annotation");
                None
            }
        };

        debug!(name = %name, record = %record, "address is listed");
        LookupResult::listed(list.clone(), address, record, annotation)
    }

    /// Check a host name or literal IP against a DNSBL.
    ///
    /// Produces one result per IPv4 address the target resolves to, in
    /// resolution order. A target with no IPv4 address yields a single
    /// unresolved placeholder.
    pub async fn lookup(&self, list: &Dnsbl, target: &str) -> ScanResults {
        let results = match self.resolve_target(target).await {
            Ok(addrs) if !addrs.is_empty() => {
                join_all(addrs.into_iter().map(|addr| self.query(list, addr))).await
            }
            Ok(_) => vec![LookupResult::unresolved(
                list.clone(),
                format!("no IPv4 address found for {target}"),
            )],
            Err(e) => {
                warn!(host = %target, error = %e, "could not resolve target");
                vec![LookupResult::unresolved(list.clone(), e.to_string())]
            }
        };

        ScanResults {
            list: list.clone(),
            host: target.to_string(),
            results,
        }
    }

    /// Addresses of the nameservers authoritative for a DNSBL zone.
    ///
    /// Each NS host contributes its first address. Hosts that do not resolve
    /// are skipped.
    pub async fn nameservers(&self, list: &Dnsbl) -> Result<Vec<IpAddr>> {
        let hosts = self
            .bounded(self.inner.resolver.lookup_ns(list.as_str()))
            .await?;

        let mut addrs = Vec::with_capacity(hosts.len());
        for host in hosts {
            match self.bounded(self.inner.resolver.resolve_host(&host)).await {
                Ok(resolved) => match resolved.first() {
                    Some(addr) => addrs.push(*addr),
                    None => warn!(host = %host, "nameserver has no address"),
                },
                Err(e) => warn!(host = %host, error = %e, "failed to resolve nameserver"),
            }
        }

        Ok(addrs)
    }

    async fn resolve_target(&self, target: &str) -> Result<Vec<Ipv4Addr>> {
        let target = target.trim();

        let addrs = match target.parse::<IpAddr>() {
            Ok(ip) => vec![ip],
            Err(_) => self.bounded(self.inner.resolver.resolve_host(target)).await?,
        };

        Ok(addrs
            .into_iter()
            .filter_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
            .collect())
    }

    /// Apply the per-query timeout to one resolver call
    async fn bounded<T>(&self, query: impl Future<Output = Result<T>>) -> Result<T> {
        let timeout = self.inner.config.timeout;
        tokio::time::timeout(timeout, query)
            .await
            .map_err(|_| RblError::Timeout(timeout))?
    }
}

impl std::fmt::Debug for RblClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RblClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring an [`RblClient`]
#[derive(Default)]
pub struct RblClientBuilder {
    config: LookupConfig,
    resolver: Option<Arc<dyn DnsblResolver>>,
}

impl RblClientBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole lookup configuration
    #[must_use]
    pub fn config(mut self, config: LookupConfig) -> Self {
        self.config = config;
        self
    }

    /// Send DNSBL queries to this server instead of the system resolver
    #[must_use]
    pub fn server(mut self, server: IpAddr) -> Self {
        self.config = self.config.server(server);
        self
    }

    /// Set the server port
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config = self.config.port(port);
        self
    }

    /// Set the per-query timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Use a custom resolver instead of hickory
    #[must_use]
    pub fn resolver(mut self, resolver: impl DnsblResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Build the client
    pub fn build(self) -> Result<RblClient> {
        let resolver = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(HickoryResolver::from_config(&self.config)?),
        };

        Ok(RblClient {
            inner: Arc::new(ClientInner {
                resolver,
                config: self.config,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{name_for, StaticResolver};

    fn list() -> Dnsbl {
        Dnsbl::new("bl.example.org").unwrap()
    }

    fn client(resolver: StaticResolver) -> RblClient {
        RblClient::with_resolver(resolver, LookupConfig::new().timeout(Duration::from_millis(200)))
    }

    #[tokio::test]
    async fn nxdomain_is_not_listed() {
        let addr = Ipv4Addr::new(192, 0, 2, 10);
        let result = client(StaticResolver::new()).query(&list(), addr).await;

        assert_eq!(result, LookupResult::not_listed(list(), addr));
        assert!(!result.is_failed());
    }

    #[tokio::test]
    async fn queries_reversed_name_under_zone() {
        let stub = StaticResolver::new();
        client(stub.clone())
            .query(&list(), Ipv4Addr::new(64, 233, 171, 108))
            .await;

        assert_eq!(stub.queries(), vec!["A 108.171.233.64.bl.example.org.".to_string()]);
    }

    #[tokio::test]
    async fn listed_address_carries_first_record_and_annotation() {
        let addr = Ipv4Addr::new(192, 0, 2, 20);
        let name = name_for(&list(), addr);
        let stub = StaticResolver::new()
            .with_a(&name, Ipv4Addr::new(127, 0, 0, 2))
            .with_a(&name, Ipv4Addr::new(127, 0, 0, 4))
            .with_txt(&name, "listed for spam, see https://example.org/lookup")
            .with_txt(&name, "second string");

        let result = client(stub.clone()).query(&list(), addr).await;

        assert_eq!(result.listed_record(), Some(Ipv4Addr::new(127, 0, 0, 2)));
        assert_eq!(
            result.annotation(),
            Some("listed for spam, see https://example.org/lookup")
        );
        assert_eq!(stub.queries().len(), 2);
    }

    #[tokio::test]
    async fn listing_without_txt_has_empty_annotation() {
        let addr = Ipv4Addr::new(192, 0, 2, 30);
        let stub = StaticResolver::new().listing(&list(), addr, Ipv4Addr::new(127, 0, 0, 2));

        let result = client(stub).query(&list(), addr).await;

        assert!(result.is_listed());
        assert_eq!(result.annotation(), None);
        assert_eq!(result.to_record().listed_record, "127.0.0.2");
    }

    #[tokio::test]
    async fn txt_is_skipped_when_not_listed() {
        let stub = StaticResolver::new();
        client(stub.clone())
            .query(&list(), Ipv4Addr::new(192, 0, 2, 40))
            .await;

        assert!(stub.queries().iter().all(|q| !q.starts_with("TXT")));
    }

    #[tokio::test]
    async fn resolver_error_is_captured_as_failure() {
        let addr = Ipv4Addr::new(192, 0, 2, 50);
        let stub = StaticResolver::new().fail(name_for(&list(), addr), "SERVFAIL");

        let result = client(stub).query(&list(), addr).await;

        assert!(result.is_failed());
        assert!(!result.is_listed());
        assert_eq!(result.failure_detail(), Some("DNS resolution failed: SERVFAIL"));
    }

    #[tokio::test]
    async fn hung_query_times_out() {
        let addr = Ipv4Addr::new(192, 0, 2, 60);
        let stub = StaticResolver::new().hang(name_for(&list(), addr));

        let result = client(stub).query(&list(), addr).await;

        assert!(result.is_failed());
        assert!(result.failure_detail().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn literal_ip_skips_host_resolution() {
        let stub = StaticResolver::new();
        let scan = client(stub.clone()).lookup(&list(), "198.51.100.7").await;

        assert_eq!(scan.host, "198.51.100.7");
        assert_eq!(scan.results.len(), 1);
        assert_eq!(scan.results[0].address, Some(Ipv4Addr::new(198, 51, 100, 7)));
        assert!(stub.queries().iter().all(|q| !q.starts_with("HOST")));
    }

    #[tokio::test]
    async fn hostname_yields_one_result_per_ipv4_address() {
        let first = Ipv4Addr::new(198, 51, 100, 1);
        let second = Ipv4Addr::new(198, 51, 100, 2);
        let stub = StaticResolver::new()
            .with_host(
                "mail.example.com",
                &[
                    IpAddr::V4(first),
                    "2001:db8::25".parse().unwrap(),
                    IpAddr::V4(second),
                ],
            )
            .listing(&list(), second, Ipv4Addr::new(127, 0, 0, 3));

        let scan = client(stub).lookup(&list(), "mail.example.com").await;

        let addrs: Vec<_> = scan.results.iter().map(|r| r.address).collect();
        assert_eq!(addrs, vec![Some(first), Some(second)]);
        assert!(!scan.results[0].is_listed());
        assert!(scan.results[1].is_listed());
        assert!(scan.any_listed());
    }

    #[tokio::test]
    async fn unresolvable_host_yields_placeholder() {
        let scan = client(StaticResolver::new()).lookup(&list(), "nowhere.invalid").await;

        assert_eq!(scan.results.len(), 1);
        let placeholder = &scan.results[0];
        assert_eq!(placeholder.address, None);
        assert!(matches!(placeholder.outcome, rbl_core::Outcome::Unresolved { .. }));
    }

    #[tokio::test]
    async fn ipv6_only_host_yields_placeholder() {
        let stub = StaticResolver::new().with_host("v6.example.com", &["2001:db8::1".parse().unwrap()]);
        let scan = client(stub).lookup(&list(), "v6.example.com").await;

        assert_eq!(scan.results.len(), 1);
        assert!(scan.results[0].is_failed());
    }

    #[tokio::test]
    async fn nameservers_resolve_each_host() {
        let stub = StaticResolver::new()
            .with_ns("bl.example.org", "ns1.example.org.")
            .with_ns("bl.example.org", "ns2.example.org.")
            .with_ns("bl.example.org", "ns3.example.org.")
            .with_host("ns1.example.org.", &["192.0.2.53".parse().unwrap()])
            .with_host(
                "ns3.example.org.",
                &["198.51.100.53".parse().unwrap(), "198.51.100.54".parse().unwrap()],
            );

        let servers = client(stub).nameservers(&list()).await.unwrap();

        assert_eq!(
            servers,
            vec![
                "192.0.2.53".parse::<IpAddr>().unwrap(),
                "198.51.100.53".parse::<IpAddr>().unwrap(),
            ]
        );
    }

    #[test]
    fn query_from_blocking_context() {
        let addr = Ipv4Addr::new(203, 0, 113, 9);
        let stub = StaticResolver::new().listing(&list(), addr, Ipv4Addr::new(127, 0, 0, 10));

        let result = tokio_test::block_on(client(stub).query(&list(), addr));
        assert_eq!(result.listed_record(), Some(Ipv4Addr::new(127, 0, 0, 10)));

        let servers = tokio_test::block_on(client(StaticResolver::new()).nameservers(&list()));
        assert!(tokio_test::assert_ok!(servers).is_empty());
    }

    #[test]
    fn builder_keeps_configuration() {
        let client = RblClient::builder()
            .server("9.9.9.9".parse().unwrap())
            .port(5353)
            .timeout(Duration::from_secs(3))
            .resolver(StaticResolver::new())
            .build()
            .unwrap();

        assert_eq!(client.config().nameserver(), Some("9.9.9.9:5353".parse().unwrap()));
        assert_eq!(client.config().timeout, Duration::from_secs(3));
    }
}
