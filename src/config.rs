use crate::errors::ConfigError;
use reqwest::Url;
use std::{env, time::Duration};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8081/api/books";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base of the books resource, without a trailing slash.
    pub api_base: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let raw_url = lookup("BOOKSTORE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base = resolve_api_base(&raw_url)?;

        let request_timeout = match lookup("BOOKSTORE_API_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("ignoring BOOKSTORE_API_TIMEOUT_SECS={value}, using {DEFAULT_TIMEOUT_SECS}s");
                    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            port,
            api_base,
            request_timeout,
        })
    }
}

fn resolve_api_base(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidUrl(err.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
