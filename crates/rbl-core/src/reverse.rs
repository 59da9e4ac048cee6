//! Octet-reversed labels for DNSBL queries.
//!
//! DNSBLs index listings by the reversed address placed under their zone:
//! checking `1.2.3.4` against `bl.example.org` queries `4.3.2.1.bl.example.org.`

use std::net::{IpAddr, Ipv4Addr};

use crate::types::Dnsbl;

/// Reverse an IPv4 address for DNSBL lookup.
///
/// Converts `64.233.171.108` into `108.171.233.64` (without zone suffix).
#[must_use]
pub fn reverse_ipv4(ip: &Ipv4Addr) -> String {
    let octets = ip.octets();
    format!("{}.{}.{}.{}", octets[3], octets[2], octets[1], octets[0])
}

/// Reverse any IP address.
///
/// IPv6 is not supported and yields an empty string.
#[must_use]
pub fn reverse(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => reverse_ipv4(&v4),
        IpAddr::V6(_) => String::new(),
    }
}

/// Reverse a textual address, yielding an empty string for anything that is
/// not a dotted-quad IPv4 address.
#[must_use]
pub fn reverse_str(ip: &str) -> String {
    ip.trim()
        .parse::<IpAddr>()
        .map(reverse)
        .unwrap_or_default()
}

/// Build the fully-qualified query name for a reversed label under a zone.
///
/// `query_name("4.3.2.1", "bl.example.org")` -> `"4.3.2.1.bl.example.org."`
#[must_use]
pub fn query_name(reversed: &str, dnsbl: &Dnsbl) -> String {
    format!("{reversed}.{dnsbl}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_known_address() {
        let ip: Ipv4Addr = "64.233.171.108".parse().unwrap();
        assert_eq!(reverse_ipv4(&ip), "108.171.233.64");
        assert_eq!(reverse_str("64.233.171.108"), "108.171.233.64");
    }

    #[test]
    fn reversal_is_self_inverse() {
        for text in ["1.2.3.4", "127.0.0.2", "10.0.0.255", "255.255.255.255", "0.0.0.0"] {
            let once = reverse_str(text);
            assert_eq!(reverse_str(&once), text);
        }
    }

    #[test]
    fn ipv6_and_garbage_yield_empty() {
        assert_eq!(reverse("2001:db8::1".parse().unwrap()), "");
        assert_eq!(reverse_str("2001:db8::1"), "");
        assert_eq!(reverse_str("not-an-ip"), "");
        assert_eq!(reverse_str("1.2.3"), "");
        assert_eq!(reverse_str(""), "");
    }

    #[test]
    fn builds_fqdn_query_name() {
        let list: Dnsbl = "bl.example.org".parse().unwrap();
        assert_eq!(query_name("4.3.2.1", &list), "4.3.2.1.bl.example.org.");
    }
}
