//! Name resolution behind DNSBL queries.

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::{ProtoError, ProtoErrorKind};
use hickory_resolver::{ResolveError, TokioResolver};
use rbl_core::{RblError, Result};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::debug;

use crate::config::LookupConfig;

/// The DNS operations a DNSBL check needs.
///
/// `lookup_a` must return an empty vector when the name does not exist
/// (NXDOMAIN) or has no A records, and an error only for real failures. That
/// distinction is what separates "not listed" from "lookup failed".
#[async_trait]
pub trait DnsblResolver: Send + Sync {
    /// A records for a DNSBL query name
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>>;

    /// TXT strings for a DNSBL query name
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>>;

    /// NS host names for a zone
    async fn lookup_ns(&self, zone: &str) -> Result<Vec<String>>;

    /// Addresses of the host being checked
    async fn resolve_host(&self, host: &str) -> Result<Vec<IpAddr>>;
}

/// [`DnsblResolver`] backed by `hickory-resolver`.
///
/// DNSBL queries go to the configured server when one is set. Target hosts
/// and nameserver names are always resolved through the system resolver.
#[derive(Clone)]
pub struct HickoryResolver {
    dnsbl: TokioResolver,
    system: TokioResolver,
}

impl HickoryResolver {
    /// Build resolvers for the given configuration
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let system = system_resolver(config.timeout)?;

        let dnsbl = match config.server {
            Some(server) => {
                debug!(server = %server, port = config.port, "using custom DNS server for DNSBL queries");
                server_resolver(server, config.port, config.timeout)
            }
            None => system.clone(),
        };

        Ok(Self { dnsbl, system })
    }
}

impl std::fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl DnsblResolver for HickoryResolver {
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>> {
        match self.dnsbl.ipv4_lookup(name).await {
            Ok(lookup) => Ok(lookup.iter().map(|a| a.0).collect()),
            Err(e) => empty_if_missing(e),
        }
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        match self.dnsbl.txt_lookup(name).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|txt| {
                    txt.iter()
                        .map(|data| String::from_utf8_lossy(data).to_string())
                        .collect::<Vec<_>>()
                        .join("")
                })
                .collect()),
            Err(e) => empty_if_missing(e),
        }
    }

    async fn lookup_ns(&self, zone: &str) -> Result<Vec<String>> {
        match self.system.ns_lookup(zone).await {
            Ok(lookup) => Ok(lookup.iter().map(|ns| ns.0.to_utf8()).collect()),
            Err(e) => empty_if_missing(e),
        }
    }

    async fn resolve_host(&self, host: &str) -> Result<Vec<IpAddr>> {
        match self.system.lookup_ip(host).await {
            Ok(lookup) => Ok(lookup.iter().collect()),
            Err(e) => empty_if_missing(e),
        }
    }
}

/// NXDOMAIN and NODATA are answers, not failures.
///
/// hickory also reports SERVFAIL and REFUSED as "no records found", so the
/// response code decides.
fn empty_if_missing<T>(err: ResolveError) -> Result<Vec<T>> {
    match err.proto().map(ProtoError::kind) {
        Some(ProtoErrorKind::NoRecordsFound {
            response_code: ResponseCode::NXDomain | ResponseCode::NoError,
            ..
        }) => Ok(Vec::new()),
        _ => Err(RblError::Dns(err.to_string())),
    }
}

fn system_resolver(timeout: Duration) -> Result<TokioResolver> {
    let mut builder = TokioResolver::builder_tokio()
        .map_err(|e| RblError::Config(format!("failed to read system resolver configuration: {e}")))?;

    let opts = builder.options_mut();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.cache_size = 0;

    Ok(builder.build())
}

fn server_resolver(server: IpAddr, port: u16, timeout: Duration) -> TokioResolver {
    let config = ResolverConfig::from_parts(
        None,
        Vec::new(),
        NameServerConfigGroup::from_ips_clear(&[server], port, true),
    );

    let mut builder = TokioResolver::builder_with_config(config, TokioConnectionProvider::default());

    let opts = builder.options_mut();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.cache_size = 0;

    builder.build()
}
