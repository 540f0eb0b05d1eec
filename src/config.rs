//! Environment-sourced service configuration.

use devops_api::DevOpsConfig;
use log::warn;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_ORGANIZATION: &str = "AZURE_ORG";
pub const ENV_PROJECT: &str = "AZ_PROYECTO";
pub const ENV_PAT: &str = "DEVOPS_PAT";
pub const ENV_HOURS_FIELD: &str = "HOURS_FIELD";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_SYNC_INTERVAL_SECS: &str = "SYNC_INTERVAL_SECS";
pub const ENV_DEVOPS_BASE_URL: &str = "DEVOPS_BASE_URL";
pub const ENV_TIMELOG_BASE_URL: &str = "TIMELOG_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "DEVOPS_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "DEVOPS_CONNECT_TIMEOUT_SECS";

/// Work item field the computed hours are written to.
pub const DEFAULT_HOURS_FIELD: &str = "Custom.HorasRegistradas";

/// Default listen address for the webhook server.
fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Default pause between two bulk runs.
fn default_sync_interval() -> Duration {
    Duration::from_secs(3600)
}

/// Parses a strictly positive number of seconds; anything else is ignored with a warning.
fn positive_secs(key: &str, raw: &str) -> Option<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("Ignoring invalid {}={}", key, raw);
            None
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Represents the service settings resolved once at start-up: DevOps connection details, the hours field to patch, the listen address and the bulk sync interval.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub devops: DevOpsConfig,
    pub hours_field: String,
    pub bind_addr: SocketAddr,
    /// `None` disables the periodic bulk sync.
    pub sync_interval: Option<Duration>,
}

impl SyncConfig {
    /// Builds the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let organization = read(ENV_ORGANIZATION);
        let project = read(ENV_PROJECT);
        let pat = read(ENV_PAT);

        let (organization, project, pat) = match (organization, project, pat) {
            (Some(organization), Some(project), Some(pat)) => (organization, project, pat),
            (organization, project, pat) => {
                let missing = [
                    (ENV_ORGANIZATION, organization.is_none()),
                    (ENV_PROJECT, project.is_none()),
                    (ENV_PAT, pat.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name)
                .collect();
                return Err(ConfigError::Missing(missing));
            }
        };

        let mut devops = DevOpsConfig::new(organization, project, pat);
        if let Some(base_url) = read(ENV_DEVOPS_BASE_URL) {
            devops = devops.with_base_url(base_url);
        }
        if let Some(base_url) = read(ENV_TIMELOG_BASE_URL) {
            devops = devops.with_extension_base_url(base_url);
        }
        if let Some(timeout) =
            read(ENV_TIMEOUT_SECS).and_then(|raw| positive_secs(ENV_TIMEOUT_SECS, &raw))
        {
            devops = devops.with_timeout(timeout);
        }
        if let Some(timeout) = read(ENV_CONNECT_TIMEOUT_SECS)
            .and_then(|raw| positive_secs(ENV_CONNECT_TIMEOUT_SECS, &raw))
        {
            devops = devops.with_connect_timeout(timeout);
        }

        let bind_addr = match read(ENV_BIND_ADDR) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid {}={}", ENV_BIND_ADDR, raw);
                default_bind_addr()
            }),
            None => default_bind_addr(),
        };

        let sync_interval = match read(ENV_SYNC_INTERVAL_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!("Ignoring invalid {}={}", ENV_SYNC_INTERVAL_SECS, raw);
                    Some(default_sync_interval())
                }
            },
            None => Some(default_sync_interval()),
        };

        Ok(Self {
            devops,
            hours_field: read(ENV_HOURS_FIELD).unwrap_or_else(|| DEFAULT_HOURS_FIELD.to_string()),
            bind_addr,
            sync_interval,
        })
    }

    /// Listen address used when the DevOps settings are incomplete and only the error surface is served.
    pub fn bind_addr_from_env() -> SocketAddr {
        std::env::var(ENV_BIND_ADDR)
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(default_bind_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_ORGANIZATION, "contoso"),
            (ENV_PROJECT, "Fabrikam"),
            (ENV_PAT, "pat-123"),
        ]
    }

    #[test]
    fn required_values_with_defaults() {
        let config = SyncConfig::from_lookup(lookup(&required())).expect("config should load");

        assert_eq!(config.devops.organization, "contoso");
        assert_eq!(config.devops.project, "Fabrikam");
        assert_eq!(config.devops.pat, "pat-123");
        assert_eq!(config.hours_field, "Custom.HorasRegistradas");
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.sync_interval, Some(Duration::from_secs(3600)));
        assert_eq!(config.devops.base_url, "https://dev.azure.com");
    }

    #[test]
    fn missing_values_are_all_reported() {
        let err = SyncConfig::from_lookup(lookup(&[(ENV_PROJECT, "Fabrikam"), (ENV_PAT, "  ")]))
            .unwrap_err();

        assert_eq!(err, ConfigError::Missing(vec![ENV_ORGANIZATION, ENV_PAT]));
        assert_eq!(
            err.to_string(),
            "missing environment variables: AZURE_ORG, DEVOPS_PAT"
        );
    }

    #[test]
    fn optional_overrides_are_applied() {
        let mut pairs = required();
        pairs.extend([
            (ENV_HOURS_FIELD, "Horas Registrada"),
            (ENV_BIND_ADDR, "127.0.0.1:9090"),
            (ENV_SYNC_INTERVAL_SECS, "600"),
            (ENV_DEVOPS_BASE_URL, "http://localhost:1234"),
            (ENV_TIMELOG_BASE_URL, "http://localhost:5678"),
        ]);
        let config = SyncConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.hours_field, "Horas Registrada");
        assert_eq!(config.bind_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.sync_interval, Some(Duration::from_secs(600)));
        assert_eq!(config.devops.base_url, "http://localhost:1234");
        assert_eq!(config.devops.extension_base_url, "http://localhost:5678");
    }

    #[test]
    fn client_timeouts_are_configurable() {
        let config = SyncConfig::from_lookup(lookup(&required())).unwrap();
        assert_eq!(config.devops.timeout, Duration::from_secs(30));
        assert_eq!(config.devops.connect_timeout, Duration::from_secs(10));

        let mut pairs = required();
        pairs.extend([(ENV_TIMEOUT_SECS, "90"), (ENV_CONNECT_TIMEOUT_SECS, "5")]);
        let config = SyncConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.devops.timeout, Duration::from_secs(90));
        assert_eq!(config.devops.connect_timeout, Duration::from_secs(5));

        let mut pairs = required();
        pairs.extend([(ENV_TIMEOUT_SECS, "0"), (ENV_CONNECT_TIMEOUT_SECS, "soon")]);
        let config = SyncConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.devops.timeout, Duration::from_secs(30));
        assert_eq!(config.devops.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn zero_interval_disables_timer_and_garbage_falls_back() {
        let mut pairs = required();
        pairs.push((ENV_SYNC_INTERVAL_SECS, "0"));
        assert!(SyncConfig::from_lookup(lookup(&pairs)).unwrap().sync_interval.is_none());

        let mut pairs = required();
        pairs.push((ENV_SYNC_INTERVAL_SECS, "hourly"));
        pairs.push((ENV_BIND_ADDR, "not-an-addr"));
        let config = SyncConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.sync_interval, Some(Duration::from_secs(3600)));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
    }
}
