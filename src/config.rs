//! Console settings, read from the environment or a JSON file.
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `CONSOLE_API_BASE` | `api_base` | `http://localhost:8080/api` |
//! | `CONSOLE_PAGE_SIZE` | `page_size` | `50` |
//! | `CONSOLE_SESSION_FILE` | `session_file` | none (session kept in memory) |
//! | `RUST_LOG` | `log_filter` | `info` |

use crate::clients::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleConfig {
    /// Base URL of the REST API the console talks to.
    pub api_base: String,
    pub page_size: usize,
    /// Where the signed-in session is saved. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            session_file: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, falling back to defaults for unset keys.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(api_base) = lookup("CONSOLE_API_BASE").filter(|v| !v.trim().is_empty()) {
            config.api_base = api_base.trim_end_matches('/').to_string();
        }
        if let Some(value) = lookup("CONSOLE_PAGE_SIZE") {
            let size = value.trim().parse::<usize>().ok().filter(|size| *size > 0);
            config.page_size = size.ok_or(ConfigError::InvalidValue {
                key: "CONSOLE_PAGE_SIZE",
                value,
            })?;
        }
        if let Some(path) = lookup("CONSOLE_SESSION_FILE").filter(|v| !v.trim().is_empty()) {
            config.session_file = Some(PathBuf::from(path));
        }
        if let Some(filter) = lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }
        Ok(config)
    }

    /// Reads a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading config");
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        if config.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pageSize",
                value: "0".to_string(),
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ConsoleConfig::from_env_with(lookup(&[])).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_env_overrides() {
        let config = ConsoleConfig::from_env_with(lookup(&[
            ("CONSOLE_API_BASE", "https://bluemoon.example/api/"),
            ("CONSOLE_PAGE_SIZE", "20"),
            ("CONSOLE_SESSION_FILE", "/tmp/console/session.json"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "https://bluemoon.example/api");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/console/session.json")));
    }

    #[test]
    fn test_bad_page_size() {
        let err = ConsoleConfig::from_env_with(lookup(&[("CONSOLE_PAGE_SIZE", "zero")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "CONSOLE_PAGE_SIZE", .. }));
    }

    #[test]
    fn test_file_with_partial_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.json");
        std::fs::write(&path, r#"{ "pageSize": 10 }"#).unwrap();

        let config = ConsoleConfig::from_file(&path).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }
}
