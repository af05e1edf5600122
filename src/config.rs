//! Runtime configuration, read from the process environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_API_BASE_URL: &str = "https://api.jikan.moe/v4";
pub const DEFAULT_ASSETS_DIR: &str = "dist";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Base of the anime search API; `/anime` is appended to it.
    pub api_base_url: Url,
    /// Directory holding the built widget HTML.
    pub assets_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API URL is valid"),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Build the configuration from `ANIME_MCP_*` / `ANIME_API_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("ANIME_MCP_HOST") {
            config.host = value.parse().map_err(|e: std::net::AddrParseError| {
                invalid("ANIME_MCP_HOST", &value, e)
            })?;
        }

        if let Some(value) = lookup("ANIME_MCP_PORT") {
            config.port = value
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("ANIME_MCP_PORT", &value, e))?;
        }

        if let Some(value) = lookup("ANIME_API_BASE_URL") {
            let url = Url::parse(&value)
                .map_err(|e| invalid("ANIME_API_BASE_URL", &value, e))?;
            if url.cannot_be_a_base() {
                return Err(invalid("ANIME_API_BASE_URL", &value, "not a base URL"));
            }
            config.api_base_url = url;
        }

        if let Some(value) = lookup("ANIME_MCP_ASSETS_DIR") {
            config.assets_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("ANIME_MCP_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|e: std::num::ParseIntError| {
                invalid("ANIME_MCP_REQUEST_TIMEOUT_SECS", &value, e)
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn invalid(key: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8787");
        assert_eq!(config.api_base_url.as_str(), "https://api.jikan.moe/v4");
        assert_eq!(config.assets_dir, PathBuf::from("dist"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("ANIME_MCP_HOST", "0.0.0.0"),
            ("ANIME_MCP_PORT", "9000"),
            ("ANIME_API_BASE_URL", "http://localhost:4000/v4/"),
            ("ANIME_MCP_ASSETS_DIR", "/srv/widgets"),
            ("ANIME_MCP_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.api_base_url.as_str(), "http://localhost:4000/v4/");
        assert_eq!(config.assets_dir, PathBuf::from("/srv/widgets"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("ANIME_MCP_PORT", "eighty")])).unwrap_err();
        let ConfigError::Invalid { key, value, .. } = err;
        assert_eq!(key, "ANIME_MCP_PORT");
        assert_eq!(value, "eighty");
    }

    #[test]
    fn non_base_api_url_is_rejected() {
        let err =
            Config::from_lookup(lookup_from(&[("ANIME_API_BASE_URL", "mailto:someone@example.com")]))
                .unwrap_err();
        assert!(err.to_string().contains("ANIME_API_BASE_URL"));
    }
}
