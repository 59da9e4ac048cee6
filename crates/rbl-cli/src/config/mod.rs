//! Configuration management.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "RBLSCAN_CONFIG";

/// CLI configuration.
///
/// Every field is optional; command-line flags take precedence, then
/// environment variables, then this file, then built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// DNS server for DNSBL queries.
    pub server: Option<IpAddr>,

    /// Port of the DNS server.
    pub port: Option<u16>,

    /// Per-query timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Lookups in flight during range scans.
    pub concurrency: Option<usize>,

    /// Largest range a scan may enumerate.
    pub max_addresses: Option<u64>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Location of the config file: `$RBLSCAN_CONFIG`, else the platform
    /// config directory.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        ProjectDirs::from("org", "rblscan", "rblscan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .context("no home directory to hold the config file")
    }

    /// Read the config file, or defaults when there is none yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Write the config file, creating its directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .with_context(|| format!("invalid config file {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("cannot read {}", path.display())),
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
        }

        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("cannot write {}", path.display()))
    }

    /// Set one key from its textual value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => self.server = Some(value.parse()?),
            "port" => self.port = Some(value.parse()?),
            "timeout" | "timeout_secs" => self.timeout_secs = Some(value.parse()?),
            "concurrency" => {
                let n: usize = value.parse()?;
                if n == 0 {
                    anyhow::bail!("concurrency must be at least 1");
                }
                self.concurrency = Some(n);
            }
            "max_addresses" => self.max_addresses = Some(value.parse()?),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            _ => anyhow::bail!(
                "Unknown config key: {}\n\n\
                 Available keys:\n  \
                 server         - DNS server for DNSBL queries (IP address)\n  \
                 port           - DNS server port\n  \
                 timeout_secs   - Per-query timeout in seconds\n  \
                 concurrency    - Lookups in flight during range scans\n  \
                 max_addresses  - Largest range a scan may enumerate\n  \
                 output_format  - Default output format (json/pretty/csv/yaml)",
                key
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_parses_typed_values() {
        let mut config = Config::default();
        config.set("server", "9.9.9.9").unwrap();
        config.set("timeout", "3").unwrap();
        config.set("concurrency", "16").unwrap();
        config.set("output", "csv").unwrap();

        assert_eq!(config.server, Some("9.9.9.9".parse().unwrap()));
        assert_eq!(config.timeout_secs, Some(3));
        assert_eq!(config.concurrency, Some(16));
        assert_eq!(config.output_format, Some(OutputFormat::Csv));
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("server", "not-an-ip").is_err());
        assert!(config.set("concurrency", "0").is_err());
        assert!(config.set("api_key", "x").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_creates_directories_and_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            timeout_secs: Some(4),
            output_format: Some(OutputFormat::Pretty),
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn unknown_keys_are_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"x\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("invalid config file"));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config {
            server: Some("192.0.2.53".parse().unwrap()),
            port: Some(5353),
            max_addresses: Some(1 << 20),
            ..Config::default()
        };

        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }
}
