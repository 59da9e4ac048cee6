use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for DNSBL operations
pub type Result<T> = std::result::Result<T, RblError>;

/// Errors that can occur while planning or running DNSBL lookups
#[derive(Error, Debug)]
pub enum RblError {
    /// CIDR string could not be parsed
    #[error("invalid CIDR block: {0}")]
    InvalidCidr(String),

    /// Prefix length outside 0..=32
    #[error("invalid prefix length: /{0}")]
    InvalidPrefix(u8),

    /// DNSBL zone name is malformed
    #[error("invalid DNSBL name {name:?}: {reason}")]
    InvalidDnsbl {
        /// The name as supplied
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Range holds more addresses than the configured cap
    #[error("/{prefix} expands to {count} addresses, more than the limit of {max}")]
    RangeTooLarge {
        /// Prefix length of the rejected block
        prefix: u8,
        /// Number of addresses the block expands to
        count: u64,
        /// Configured maximum
        max: u64,
    },

    /// Enumerating the range would run past 255.255.255.255
    #[error("range of {count} addresses starting at {base} leaves the IPv4 address space")]
    AddressOverflow {
        /// First address of the range
        base: Ipv4Addr,
        /// Number of addresses requested
        count: u64,
    },

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// Query timed out
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl RblError {
    /// Returns true if the error was raised while validating input, before
    /// any query was sent
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCidr(_)
                | Self::InvalidPrefix(_)
                | Self::InvalidDnsbl { .. }
                | Self::RangeTooLarge { .. }
                | Self::AddressOverflow { .. }
                | Self::Config(_)
        )
    }

    /// Returns true if the error came from a DNS query
    #[must_use]
    pub const fn is_query_error(&self) -> bool {
        matches!(self, Self::Dns(_) | Self::Timeout(_))
    }
}
