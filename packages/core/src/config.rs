//! Runtime console configuration
//!
//! `ConsoleConfig` is built once at startup from environment variables and
//! handed to the services. Nothing here is persisted.
//!
//! | Variable                            | Default      |
//! |-------------------------------------|--------------|
//! | `CITYLINE_REVALIDATE_URL`           | unset (notifier disabled) |
//! | `CITYLINE_REVALIDATE_TIMEOUT_SECS`  | unset (HTTP client default) |
//! | `CITYLINE_PORT`                     | 3020         |
//! | `CITYLINE_DB_PATH`                  | unset (in-memory store) |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3020;

pub const REVALIDATE_URL_VAR: &str = "CITYLINE_REVALIDATE_URL";
pub const REVALIDATE_TIMEOUT_VAR: &str = "CITYLINE_REVALIDATE_TIMEOUT_SECS";
pub const PORT_VAR: &str = "CITYLINE_PORT";
pub const DB_PATH_VAR: &str = "CITYLINE_DB_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the public site; revalidation posts to `{base}/api/revalidate`
    pub revalidate_base_url: Option<String>,

    /// Request timeout for revalidation calls (client default when `None`)
    pub revalidate_timeout: Option<Duration>,

    /// Port the console API listens on
    pub port: u16,

    /// RocksDB directory for the SurrealDB store (in-memory store when `None`)
    pub database_path: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            revalidate_base_url: None,
            revalidate_timeout: None,
            port: DEFAULT_PORT,
            database_path: None,
        }
    }
}

impl ConsoleConfig {
    /// Build config from the process environment
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (testable without touching env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("{} must be a port number, got '{}'", PORT_VAR, raw))?,
            None => DEFAULT_PORT,
        };

        let revalidate_timeout = match non_empty(REVALIDATE_TIMEOUT_VAR) {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse::<u64>().map_err(
                |_| format!("{} must be whole seconds, got '{}'", REVALIDATE_TIMEOUT_VAR, raw),
            )?)),
            None => None,
        };

        let config = Self {
            revalidate_base_url: non_empty(REVALIDATE_URL_VAR)
                .map(|url| url.trim().trim_end_matches('/').to_string()),
            revalidate_timeout,
            port,
            database_path: non_empty(DB_PATH_VAR).map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        if let Some(url) = &self.revalidate_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!(
                    "revalidate_base_url must start with http:// or https://, got '{}'",
                    url
                ));
            }
        }

        if self.revalidate_timeout == Some(Duration::ZERO) {
            return Err("revalidate_timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.port, 3020);
        assert!(config.revalidate_base_url.is_none());
        assert_eq!(config.revalidate_timeout, None);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[
            (REVALIDATE_URL_VAR, "https://www.example.com/"),
            (REVALIDATE_TIMEOUT_VAR, "5"),
            (PORT_VAR, "8080"),
            (DB_PATH_VAR, "/var/lib/cityline"),
        ]))
        .unwrap();

        assert_eq!(
            config.revalidate_base_url.as_deref(),
            Some("https://www.example.com")
        );
        assert_eq!(config.revalidate_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, Some(PathBuf::from("/var/lib/cityline")));
    }

    #[test]
    fn test_config_validation() {
        assert!(ConsoleConfig::from_lookup(lookup_from(&[(PORT_VAR, "http")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup_from(&[(PORT_VAR, "0")])).is_err());
        assert!(
            ConsoleConfig::from_lookup(lookup_from(&[(REVALIDATE_URL_VAR, "example.com")]))
                .is_err()
        );
        assert!(
            ConsoleConfig::from_lookup(lookup_from(&[(REVALIDATE_TIMEOUT_VAR, "0")])).is_err()
        );

        // Blank values count as unset
        let config = ConsoleConfig::from_lookup(lookup_from(&[(REVALIDATE_URL_VAR, "  ")])).unwrap();
        assert!(config.revalidate_base_url.is_none());
    }
}
