//! Process configuration read from the environment.

use std::net::SocketAddr;
use thiserror::Error;

use crate::storage::StorageConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "fluentia_cms=debug,tower_http=debug";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid CMS_BIND_ADDR {0:?}")]
    BindAddr(String),

    #[error("Invalid storage configuration: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    /// Public host name, used to tell internal referrers apart
    pub site_host: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("CMS_BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::BindAddr(bind.clone()))?;

        let storage = StorageConfig::from_lookup(&lookup).map_err(ConfigError::Storage)?;

        Ok(Self {
            bind_addr,
            storage,
            site_host: lookup("CMS_SITE_HOST").filter(|v| !v.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageType;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.storage, StorageConfig::unconfigured());
        assert_eq!(config.site_host, None);
    }

    #[test]
    fn test_explicit_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("CMS_BIND_ADDR", "0.0.0.0:8080"),
            ("CMS_STORAGE", "memory"),
            ("CMS_SITE_HOST", "fluentia.de"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.storage.storage_type, Some(StorageType::Memory));
        assert_eq!(config.site_host.as_deref(), Some("fluentia.de"));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[("CMS_BIND_ADDR", "nowhere")])).unwrap_err(),
            ConfigError::BindAddr("nowhere".into())
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("CMS_STORAGE", "floppy")])),
            Err(ConfigError::Storage(_))
        ));
    }
}
