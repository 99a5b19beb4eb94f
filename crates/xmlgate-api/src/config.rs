//! Server configuration from the environment

use std::num::ParseIntError;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Error reading [`ServerConfig`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}={value:?}: {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        source: ParseIntError,
    },
}

/// Listener and request limits for the server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read `XMLGATE_HOST`, `XMLGATE_PORT`, `XMLGATE_MAX_BODY_BYTES` and `XMLGATE_LOG`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("XMLGATE_HOST").unwrap_or(defaults.host),
            port: parse_number(&lookup, "XMLGATE_PORT")?.unwrap_or(defaults.port),
            max_body_bytes: parse_number(&lookup, "XMLGATE_MAX_BODY_BYTES")?
                .unwrap_or(defaults.max_body_bytes),
            log_filter: lookup("XMLGATE_LOG").unwrap_or(defaults.log_filter),
        })
    }

    /// Socket address to bind
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|source| ConfigError::InvalidNumber {
                name,
                value,
                source,
            }),
        None => Ok(None),
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
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, Ok(ServerConfig::default()));
        assert_eq!(ServerConfig::default().addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("XMLGATE_HOST", "0.0.0.0"),
            ("XMLGATE_PORT", "8080"),
            ("XMLGATE_MAX_BODY_BYTES", " 2048 "),
            ("XMLGATE_LOG", "debug"),
        ]));
        assert_eq!(
            config,
            Ok(ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                max_body_bytes: 2048,
                log_filter: "debug".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("XMLGATE_PORT", "http")])).err();
        assert!(matches!(
            err,
            Some(ConfigError::InvalidNumber { name: "XMLGATE_PORT", .. })
        ));
    }

    #[test]
    fn test_port_out_of_range() {
        let err = ServerConfig::from_lookup(lookup(&[("XMLGATE_PORT", "70000")]))
            .err()
            .map(|err| err.to_string());
        assert_eq!(
            err.as_deref(),
            Some("invalid XMLGATE_PORT=\"70000\": number too large to fit in target type")
        );
    }
}
