//! Range scanning with a bounded worker pool.

use rbl_client::RblClient;
use rbl_core::{Dnsbl, LookupResult, Outcome, RangeScan, Result, ScanSummary, DEFAULT_MAX_ADDRESSES};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Default number of lookups in flight at once
pub const DEFAULT_CONCURRENCY: usize = 64;

/// Range scan configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum concurrent lookups (worker pool size)
    pub concurrency: usize,
    /// Largest range a scan may enumerate
    pub max_addresses: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_addresses: DEFAULT_MAX_ADDRESSES,
        }
    }
}

/// DNSBL range scanner
#[derive(Debug, Clone)]
pub struct RangeScanner {
    client: RblClient,
    config: ScanConfig,
}

impl RangeScanner {
    /// Create a scanner with default configuration
    #[must_use]
    pub fn new(client: RblClient) -> Self {
        Self::with_config(client, ScanConfig::default())
    }

    /// Create a scanner with custom configuration
    #[must_use]
    pub const fn with_config(client: RblClient, config: ScanConfig) -> Self {
        Self { client, config }
    }

    /// Set the worker pool size
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set the largest range accepted by [`plan`](Self::plan)
    #[must_use]
    pub fn max_addresses(mut self, max: u64) -> Self {
        self.config.max_addresses = max;
        self
    }

    /// The scanner's configuration
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Validate a CIDR block into a work order, applying the address cap.
    ///
    /// Nothing is queried; errors here are configuration errors.
    pub fn plan(&self, list: Dnsbl, cidr: &str) -> Result<RangeScan> {
        RangeScan::parse(list, cidr, self.config.max_addresses)
    }

    /// Check every address of the range, returning results in enumeration
    /// order: `results[i]` is the result for `scan.address_at(i)`.
    pub async fn scan(&self, scan: &RangeScan) -> Vec<LookupResult> {
        self.scan_with_progress(scan, |_| {}).await
    }

    /// Like [`scan`](Self::scan), calling `on_result` as each lookup
    /// completes (in completion order).
    pub async fn scan_with_progress<F>(&self, scan: &RangeScan, mut on_result: F) -> Vec<LookupResult>
    where
        F: FnMut(&LookupResult),
    {
        let count = scan.count();
        let workers = self.config.concurrency.clamp(1, count.max(1));
        let start = Instant::now();

        info!(
            list = %scan.list(),
            base = %scan.base(),
            prefix = scan.prefix(),
            count,
            workers,
            "starting range scan"
        );

        let scan = Arc::new(scan.clone());
        let next = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::channel(workers);

        let mut tasks = JoinSet::new();
        for _ in 0..workers {
            tasks.spawn(worker(
                self.client.clone(),
                Arc::clone(&scan),
                Arc::clone(&next),
                tx.clone(),
            ));
        }
        drop(tx);

        let mut slots: Vec<Option<LookupResult>> = vec![None; count];
        while let Some((index, result)) = rx.recv().await {
            on_result(&result);
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(result);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "scan worker did not finish");
            }
        }

        let results: Vec<LookupResult> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.unwrap_or_else(|| incomplete(&scan, index)))
            .collect();

        let summary = ScanSummary::from_results(&results);
        info!(
            total = summary.total,
            listed = summary.listed,
            clean = summary.clean,
            failed = summary.failed,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "range scan finished"
        );

        results
    }
}

/// Pull indices from the shared counter until the range is exhausted.
async fn worker(
    client: RblClient,
    scan: Arc<RangeScan>,
    next: Arc<AtomicUsize>,
    tx: mpsc::Sender<(usize, LookupResult)>,
) {
    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(address) = scan.address_at(index) else {
            break;
        };

        let result = client.query(scan.list(), address).await;
        if tx.send((index, result)).await.is_err() {
            debug!("result channel closed, stopping worker");
            break;
        }
    }
}

/// Result for a slot whose lookup never reported back
fn incomplete(scan: &RangeScan, index: usize) -> LookupResult {
    LookupResult {
        list: scan.list().clone(),
        address: scan.address_at(index),
        outcome: Outcome::Failed {
            detail: "lookup did not complete".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rbl_client::stub::{name_for, StaticResolver};
    use rbl_client::{DnsblResolver, LookupConfig};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn list() -> Dnsbl {
        Dnsbl::new("bl.example.org").unwrap()
    }

    fn scanner(resolver: impl DnsblResolver + 'static) -> RangeScanner {
        let client = RblClient::with_resolver(
            resolver,
            LookupConfig::new().timeout(Duration::from_millis(100)),
        );
        RangeScanner::new(client)
    }

    fn addresses(results: &[LookupResult]) -> Vec<Ipv4Addr> {
        results.iter().filter_map(|r| r.address).collect()
    }

    #[tokio::test]
    async fn returns_one_result_per_address_in_order() {
        let scanner = scanner(StaticResolver::new());
        let scan = scanner.plan(list(), "192.0.2.0/26").unwrap();

        let results = scanner.scan(&scan).await;

        assert_eq!(results.len(), 64);
        assert_eq!(addresses(&results), scan.addresses().collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn order_survives_reversed_completion() {
        let scan = RangeScan::parse(list(), "198.51.100.0/28", 256).unwrap();

        // Earlier addresses answer last
        let stub = scan.addresses().enumerate().fold(StaticResolver::new(), |stub, (i, addr)| {
            let delay = Duration::from_millis(3 * (16 - i as u64));
            stub.delay(name_for(&list(), addr), delay)
        });

        let results = scanner(stub).concurrency(16).scan(&scan).await;

        assert_eq!(results.len(), 16);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.address, scan.address_at(i));
        }
    }

    #[tokio::test]
    async fn never_listed_yields_clean_results() {
        let scanner = scanner(StaticResolver::new());
        let scan = scanner.plan(list(), "203.0.113.0/27").unwrap();

        let results = scanner.scan(&scan).await;

        assert_eq!(results.len(), 32);
        for result in &results {
            let record = result.to_record();
            assert_eq!(record.listed_record, "");
            assert!(!record.failed);
        }
    }

    #[tokio::test]
    async fn timeout_affects_only_its_own_address() {
        let scan = RangeScan::parse(list(), "192.0.2.8/29", 256).unwrap();
        let slow = Ipv4Addr::new(192, 0, 2, 11);
        let listed = Ipv4Addr::new(192, 0, 2, 12);
        let stub = StaticResolver::new()
            .hang(name_for(&list(), slow))
            .listing(&list(), listed, Ipv4Addr::new(127, 0, 0, 2));

        let results = scanner(stub).scan(&scan).await;

        assert_eq!(results.len(), 8);
        let slow_result = &results[3];
        assert_eq!(slow_result.address, Some(slow));
        assert!(slow_result.is_failed());
        assert!(!slow_result.failure_detail().unwrap_or_default().is_empty());

        assert!(results[4].is_listed());
        for (i, result) in results.iter().enumerate() {
            if i != 3 {
                assert!(!result.is_failed(), "index {i} should not fail");
            }
        }
    }

    #[tokio::test]
    async fn listing_without_txt_has_no_annotation() {
        let scan = RangeScan::parse(list(), "192.0.2.16/31", 256).unwrap();
        let listed = Ipv4Addr::new(192, 0, 2, 17);
        let stub = StaticResolver::new().listing(&list(), listed, Ipv4Addr::new(127, 0, 0, 4));

        let results = scanner(stub).scan(&scan).await;

        let record = results[1].to_record();
        assert_eq!(record.listed_record, "127.0.0.4");
        assert_eq!(record.annotation, None);
        assert!(!results[0].is_listed());
    }

    #[tokio::test]
    async fn slash_30_flags_only_third_address() {
        let scan = RangeScan::parse(list(), "10.1.2.0/30", 256).unwrap();
        let third = scan.address_at(2).unwrap();
        let stub = StaticResolver::new()
            .listing(&list(), third, Ipv4Addr::new(127, 0, 0, 2))
            .with_txt(name_for(&list(), third), "open relay");

        let results = scanner(stub).scan(&scan).await;

        let listed: Vec<bool> = results.iter().map(LookupResult::is_listed).collect();
        assert_eq!(listed, vec![false, false, true, false]);
        assert_eq!(results[2].annotation(), Some("open relay"));
    }

    #[tokio::test]
    async fn progress_sees_every_result() {
        let scanner = scanner(StaticResolver::new());
        let scan = scanner.plan(list(), "192.0.2.0/28").unwrap();

        let mut seen = 0;
        let results = scanner.scan_with_progress(&scan, |_| seen += 1).await;

        assert_eq!(seen, 16);
        assert_eq!(results.len(), 16);
    }

    #[test]
    fn plan_applies_address_cap() {
        let scanner = scanner(StaticResolver::new());
        assert!(scanner.plan(list(), "10.0.0.0/8").unwrap_err().is_config_error());

        let raised = scanner.max_addresses(1 << 24);
        assert_eq!(raised.plan(list(), "10.0.0.0/8").unwrap().count(), 1 << 24);
    }

    /// Tracks how many A queries are in flight at once.
    #[derive(Default)]
    struct Counters {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    struct CountingResolver(Arc<Counters>);

    #[async_trait]
    impl DnsblResolver for CountingResolver {
        async fn lookup_a(&self, _name: &str) -> Result<Vec<Ipv4Addr>> {
            let now = self.0.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.0.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn lookup_txt(&self, _name: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn lookup_ns(&self, _zone: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn resolve_host(&self, _host: &str) -> Result<Vec<IpAddr>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrency_is_bounded() {
        let counters = Arc::new(Counters::default());
        let scanner = scanner(CountingResolver(Arc::clone(&counters))).concurrency(4);
        let scan = scanner.plan(list(), "192.0.2.0/26").unwrap();

        let results = scanner.scan(&scan).await;

        assert_eq!(results.len(), 64);
        let peak = counters.peak.load(Ordering::SeqCst);
        assert!(peak <= 4, "peak in-flight was {peak}");
        assert!(peak >= 1);
    }
}
