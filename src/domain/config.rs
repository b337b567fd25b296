//! # Configuration
//!
//! Loads the process-wide settings once at startup. An optional YAML file provides
//! base values, the environment overrides them, and validation fails fast when a
//! required value is absent.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::error::ConfigError;

pub const DEFAULT_KEEP_ALIVE_INTERVAL: u64 = 1800;
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Main application configuration structure.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub discord_token: String,
    pub hf_token: String,
    pub api_url: String,
    /// Seconds between outbound keep-alive pings.
    pub keep_alive_interval: u64,
    pub log_level: String,
    pub log_file: Option<String>,
    pub open_weather_api_token: Option<String>,
    pub http: HttpConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            hf_token: String::new(),
            api_url: String::new(),
            keep_alive_interval: DEFAULT_KEEP_ALIVE_INTERVAL,
            log_level: default_log_level(),
            log_file: None,
            open_weather_api_token: None,
            http: HttpConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "INFO".to_string()
}

/// Bind address of the inbound keep-alive listener.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
        }
    }
}

impl HttpConfig {
    /// Host as the socket layer expects it: IPv6 literals lose their brackets.
    pub fn bind_host(&self) -> &str {
        self.host.trim().trim_start_matches('[').trim_end_matches(']')
    }

    /// Printable `host:port`, with IPv6 literals bracketed.
    pub fn bind_addr(&self) -> String {
        let host = self.bind_host();
        if host.contains(':') {
            format!("[{}]:{}", host, self.port)
        } else {
            format!("{}:{}", host, self.port)
        }
    }
}

/// Target, credential and cadence of the outbound pinger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveConfig {
    pub target_url: String,
    pub auth_token: String,
    pub interval: Duration,
    pub timeout: Duration,
}

impl KeepAliveConfig {
    /// Refuses to build a pinger config with a missing target, credential or a zero interval.
    pub fn new(
        target_url: impl Into<String>,
        auth_token: impl Into<String>,
        interval: Duration,
    ) -> Result<Self, ConfigError> {
        let target_url = target_url.into();
        let auth_token = auth_token.into();

        let mut missing = Vec::new();
        if target_url.trim().is_empty() {
            missing.push("API_URL");
        }
        if auth_token.trim().is_empty() {
            missing.push("HF_TOKEN");
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }
        if interval.is_zero() {
            return Err(ConfigError::Invalid {
                key: "KEEP_ALIVE_INTERVAL",
                value: "0".to_string(),
                reason: "interval must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            target_url,
            auth_token,
            interval,
            timeout: DEFAULT_PING_TIMEOUT,
        })
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl AppConfig {
    /// Load from an optional YAML file plus the real process environment, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an arbitrary variable lookup.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay environment values. Empty values are treated as unset.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("DISCORD_TOKEN") {
            self.discord_token = v;
        }
        if let Some(v) = get("HF_TOKEN") {
            self.hf_token = v;
        }
        if let Some(v) = get("API_URL") {
            self.api_url = v;
        }
        if let Some(v) = get("KEEP_ALIVE_INTERVAL") {
            self.keep_alive_interval =
                v.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    key: "KEEP_ALIVE_INTERVAL",
                    value: v.clone(),
                    reason: e.to_string(),
                })?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = get("LOG_FILE") {
            self.log_file = Some(v);
        }
        if let Some(v) = get("OPEN_WEATHER_API_TOKEN") {
            self.open_weather_api_token = Some(v);
        }
        if let Some(v) = get("PORT") {
            self.http.port = v.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: "PORT",
                    value: v.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(self)
    }

    /// Collects every missing required value before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.discord_token.trim().is_empty() {
            missing.push("DISCORD_TOKEN");
        }
        if self.hf_token.trim().is_empty() {
            missing.push("HF_TOKEN");
        }
        if self.api_url.trim().is_empty() {
            missing.push("API_URL");
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }
        if self.keep_alive_interval == 0 {
            return Err(ConfigError::Invalid {
                key: "KEEP_ALIVE_INTERVAL",
                value: "0".to_string(),
                reason: "interval must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn keep_alive(&self) -> Result<KeepAliveConfig, ConfigError> {
        KeepAliveConfig::new(
            self.api_url.clone(),
            self.hf_token.clone(),
            Duration::from_secs(self.keep_alive_interval),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DISCORD_TOKEN", "discord"),
        ("HF_TOKEN", "hf"),
        ("API_URL", "https://example.invalid/api"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::load_with(None, lookup(REQUIRED)).unwrap();
        assert_eq!(config.keep_alive_interval, 1800);
        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.http.bind_addr(), "0.0.0.0:7860");
        assert_eq!(config.http.bind_host(), "0.0.0.0");
        assert!(config.open_weather_api_token.is_none());
    }

    #[test]
    fn test_missing_discord_token_fails_before_startup() {
        let vars = [("HF_TOKEN", "hf"), ("API_URL", "https://example.invalid")];
        let err = AppConfig::load_with(None, lookup(&vars)).unwrap_err();
        match err {
            ConfigError::Missing(keys) => assert_eq!(keys, vec!["DISCORD_TOKEN"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_all_missing_reported_together() {
        let err = AppConfig::load_with(None, lookup(&[])).unwrap_err();
        match err {
            ConfigError::Missing(keys) => {
                assert_eq!(keys, vec!["DISCORD_TOKEN", "HF_TOKEN", "API_URL"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let vars = [
            ("DISCORD_TOKEN", "discord"),
            ("HF_TOKEN", "   "),
            ("API_URL", "https://example.invalid"),
        ];
        let err = AppConfig::load_with(None, lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref k) if k == &vec!["HF_TOKEN"]));
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("KEEP_ALIVE_INTERVAL", "soon"));
        let err = AppConfig::load_with(None, lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "KEEP_ALIVE_INTERVAL", .. }));

        let mut vars = REQUIRED.to_vec();
        vars.push(("KEEP_ALIVE_INTERVAL", "0"));
        assert!(AppConfig::load_with(None, lookup(&vars)).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("KEEP_ALIVE_INTERVAL", "60"),
            ("LOG_LEVEL", "DEBUG"),
            ("OPEN_WEATHER_API_TOKEN", "weather"),
            ("PORT", "8080"),
        ]);
        let config = AppConfig::load_with(None, lookup(&vars)).unwrap();
        assert_eq!(config.keep_alive_interval, 60);
        assert_eq!(config.log_level, "DEBUG");
        assert_eq!(config.open_weather_api_token.as_deref(), Some("weather"));
        assert_eq!(config.http.port, 8080);

        let keep_alive = config.keep_alive().unwrap();
        assert_eq!(keep_alive.interval, Duration::from_secs(60));
        assert_eq!(keep_alive.timeout, DEFAULT_PING_TIMEOUT);
        assert_eq!(keep_alive.auth_token, "hf");
    }

    #[test]
    fn test_file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "hf_token: from-file\napi_url: https://file.invalid\nkeep_alive_interval: 120\nhttp:\n  port: 9000"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path())
            .unwrap()
            .with_env(lookup(&[("DISCORD_TOKEN", "discord"), ("HF_TOKEN", "from-env")]))
            .unwrap();
        config.validate().unwrap();

        assert_eq!(config.hf_token, "from-env");
        assert_eq!(config.api_url, "https://file.invalid");
        assert_eq!(config.keep_alive_interval, 120);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
    }

    #[test]
    fn test_unreadable_file() {
        let err = AppConfig::from_file(Path::new("/nonexistent/beacon.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_keep_alive_config_fails_loudly() {
        let err = KeepAliveConfig::new("", "token", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref k) if k == &vec!["API_URL"]));

        let err = KeepAliveConfig::new("http://x", "", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref k) if k == &vec!["HF_TOKEN"]));

        let err = KeepAliveConfig::new("http://x", "t", Duration::ZERO).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_ipv6_host_bracketed_for_display_only() {
        let http = HttpConfig {
            host: "::".to_string(),
            port: 7860,
        };
        assert_eq!(http.bind_host(), "::");
        assert_eq!(http.bind_addr(), "[::]:7860");

        let bracketed = HttpConfig {
            host: "[::1]".to_string(),
            port: 80,
        };
        assert_eq!(bracketed.bind_host(), "::1");
        assert_eq!(bracketed.bind_addr(), "[::1]:80");
    }
}
