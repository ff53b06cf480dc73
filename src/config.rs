use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://mailinglist.db";
pub const DEFAULT_JSON_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_GRPC_ADDR: &str = "127.0.0.1:8081";

/// Server settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub json_addr: SocketAddr,
    pub grpc_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys take their defaults;
    /// set but malformed addresses are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let json_addr = parse_addr(&lookup, "MAILINGLIST_JSON_ADDR", DEFAULT_JSON_ADDR)?;
        let grpc_addr = parse_addr(&lookup, "MAILINGLIST_GRPC_ADDR", DEFAULT_GRPC_ADDR)?;

        Ok(Config {
            database_url,
            json_addr,
            grpc_addr,
        })
    }
}

fn parse_addr(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<SocketAddr> {
    let raw = lookup(key).unwrap_or_else(|| default.into());
    raw.parse()
        .with_context(|| format!("{key} must be a socket address like {default}, got {raw:?}"))
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
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.json_addr.port(), 8080);
        assert_eq!(config.grpc_addr.port(), 8081);
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("MAILINGLIST_JSON_ADDR", "0.0.0.0:9000"),
            ("MAILINGLIST_GRPC_ADDR", "0.0.0.0:9001"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.json_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.grpc_addr, "0.0.0.0:9001".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn malformed_addr_is_error() {
        let err = Config::from_lookup(lookup(&[("MAILINGLIST_GRPC_ADDR", ":8081")])).unwrap_err();
        assert!(err.to_string().contains("MAILINGLIST_GRPC_ADDR"));
    }
}
