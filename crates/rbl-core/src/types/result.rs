use serde::Serialize;
use std::net::Ipv4Addr;

use super::Dnsbl;

/// What a DNSBL said about one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No A record exists for the query name
    NotListed,
    /// The list returned an A record
    Listed {
        /// First address returned, usually in 127.0.0.0/8
        record: Ipv4Addr,
        /// First TXT string published for the listing, if any
        annotation: Option<String>,
    },
    /// The A query failed (timeout, network error, SERVFAIL)
    Failed {
        /// Underlying error description
        detail: String,
    },
    /// The target host did not resolve to any IPv4 address
    Unresolved {
        /// Why resolution produced nothing
        detail: String,
    },
}

/// Result of one DNSBL query against one IPv4 address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ResultRecord")]
pub struct LookupResult {
    /// The DNSBL that was queried
    pub list: Dnsbl,
    /// Address that was checked; `None` for an unresolved target
    pub address: Option<Ipv4Addr>,
    /// What the list said
    pub outcome: Outcome,
}

impl LookupResult {
    /// Address is absent from the list
    #[must_use]
    pub fn not_listed(list: Dnsbl, address: Ipv4Addr) -> Self {
        Self {
            list,
            address: Some(address),
            outcome: Outcome::NotListed,
        }
    }

    /// Address is listed with the given indicator record
    #[must_use]
    pub fn listed(
        list: Dnsbl,
        address: Ipv4Addr,
        record: Ipv4Addr,
        annotation: Option<String>,
    ) -> Self {
        Self {
            list,
            address: Some(address),
            outcome: Outcome::Listed { record, annotation },
        }
    }

    /// The query for this address failed
    #[must_use]
    pub fn failed(list: Dnsbl, address: Ipv4Addr, detail: impl Into<String>) -> Self {
        Self {
            list,
            address: Some(address),
            outcome: Outcome::Failed {
                detail: detail.into(),
            },
        }
    }

    /// Placeholder for a target that produced no address to check
    #[must_use]
    pub fn unresolved(list: Dnsbl, detail: impl Into<String>) -> Self {
        Self {
            list,
            address: None,
            outcome: Outcome::Unresolved {
                detail: detail.into(),
            },
        }
    }

    /// Returns true if the list returned an A record
    #[must_use]
    pub const fn is_listed(&self) -> bool {
        matches!(self.outcome, Outcome::Listed { .. })
    }

    /// Returns true if the lookup failed or the target never resolved
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(
            self.outcome,
            Outcome::Failed { .. } | Outcome::Unresolved { .. }
        )
    }

    /// The listing indicator, if listed
    #[must_use]
    pub const fn listed_record(&self) -> Option<Ipv4Addr> {
        match self.outcome {
            Outcome::Listed { record, .. } => Some(record),
            _ => None,
        }
    }

    /// TXT annotation attached to a listing
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Listed { annotation, .. } => annotation.as_deref(),
            _ => None,
        }
    }

    /// Error description for failed or unresolved lookups
    #[must_use]
    pub fn failure_detail(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed { detail } | Outcome::Unresolved { detail } => Some(detail),
            _ => None,
        }
    }

    /// Flatten into the serialized row shape
    #[must_use]
    pub fn to_record(&self) -> ResultRecord {
        ResultRecord::from(self.clone())
    }
}

/// Flat, serialized shape of a [`LookupResult`].
///
/// `listedRecord` is empty unless listed, `annotation` is only set for
/// listings, and `failureDetail` only when `failed` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// DNSBL queried
    pub list: String,
    /// Address checked, empty for an unresolved target
    pub address: String,
    /// Listing indicator, empty when not listed
    pub listed_record: String,
    /// TXT annotation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// Whether the lookup failed
    pub failed: bool,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_detail: Option<String>,
}

impl From<LookupResult> for ResultRecord {
    fn from(result: LookupResult) -> Self {
        let list = result.list.into();
        let address = result.address.map(|a| a.to_string()).unwrap_or_default();

        let (listed_record, annotation, failed, failure_detail) = match result.outcome {
            Outcome::NotListed => (String::new(), None, false, None),
            Outcome::Listed { record, annotation } => (record.to_string(), annotation, false, None),
            Outcome::Failed { detail } | Outcome::Unresolved { detail } => {
                (String::new(), None, true, Some(detail))
            }
        };

        Self {
            list,
            address,
            listed_record,
            annotation,
            failed,
            failure_detail,
        }
    }
}

/// Results of looking up one host or IP against one DNSBL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResults {
    /// The DNSBL that was searched
    pub list: Dnsbl,
    /// Host or IP as supplied (e.g. `smtp.gmail.com`)
    pub host: String,
    /// One result per IPv4 address the host resolved to
    pub results: Vec<LookupResult>,
}

impl ScanResults {
    /// Returns true if any resolved address is listed
    #[must_use]
    pub fn any_listed(&self) -> bool {
        self.results.iter().any(LookupResult::is_listed)
    }
}

/// Counts over a batch of results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Number of results
    pub total: usize,
    /// Listed addresses
    pub listed: usize,
    /// Addresses not on the list
    pub clean: usize,
    /// Failed or unresolved lookups
    pub failed: usize,
}

impl ScanSummary {
    /// Tally a slice of results
    #[must_use]
    pub fn from_results(results: &[LookupResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            match r.outcome {
                Outcome::NotListed => acc.clean += 1,
                Outcome::Listed { .. } => acc.listed += 1,
                Outcome::Failed { .. } | Outcome::Unresolved { .. } => acc.failed += 1,
            }
            acc
        })
    }
}
