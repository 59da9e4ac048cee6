use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RblError, Result};

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A DNSBL zone name such as `zen.spamhaus.org`.
///
/// Only the shape of the name is checked. Whether the zone is an active
/// blocklist is never verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dnsbl(String);

impl Dnsbl {
    /// Validate and wrap a zone name. One trailing dot is accepted and dropped.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.strip_suffix('.').unwrap_or(&name);

        let invalid = |reason: &str| RblError::InvalidDnsbl {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("name is empty"));
        }
        if trimmed.len() > MAX_NAME_LEN {
            return Err(invalid("name is longer than 253 bytes"));
        }

        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(invalid("empty label"));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(invalid("label is longer than 63 bytes"));
            }
            if !label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
            {
                return Err(invalid("labels may only contain letters, digits, '-' and '_'"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid("labels may not start or end with '-'"));
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The zone name without a trailing dot
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Dnsbl {
    type Err = RblError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Dnsbl {
    type Error = RblError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Dnsbl> for String {
    fn from(list: Dnsbl) -> Self {
        list.0
    }
}

impl AsRef<str> for Dnsbl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dnsbl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
