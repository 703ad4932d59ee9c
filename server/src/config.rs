//! Server configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SITE_DIR: &str = "client/dist";
pub const DEFAULT_COINBASE_API_URI: &str = "https://api.coinbase.com/";
pub const DEFAULT_COINBASE_API_VERSION: &str = "2016-02-18";
pub const DEFAULT_COINBASE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOBBY_PRICE_PAIR: &str = "BTC-USD";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinbaseConfig {
    pub base_uri: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub site_dir: PathBuf,
    pub coinbase: CoinbaseConfig,
    pub lobby_pair: String,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 5000
    /// - `SITE_DIR`: static client bundle, default `client/dist`
    /// - `COINBASE_API_URI`: default `https://api.coinbase.com/`
    /// - `COINBASE_API_VERSION`: `CB-VERSION` header, default `2016-02-18`
    /// - `COINBASE_TIMEOUT_SECS`: default 10
    /// - `LOBBY_PRICE_PAIR`: pair quoted in lobby announcements, default `BTC-USD`
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let site_dir = std::env::var("SITE_DIR").map_or_else(|_| PathBuf::from(DEFAULT_SITE_DIR), PathBuf::from);
        let coinbase = CoinbaseConfig {
            base_uri: env_or("COINBASE_API_URI", DEFAULT_COINBASE_API_URI),
            api_version: env_or("COINBASE_API_VERSION", DEFAULT_COINBASE_API_VERSION),
            timeout_secs: env_parse("COINBASE_TIMEOUT_SECS", DEFAULT_COINBASE_TIMEOUT_SECS)?,
        };
        let lobby_pair = env_or("LOBBY_PRICE_PAIR", DEFAULT_LOBBY_PRICE_PAIR);

        Ok(Self { port, site_dir, coinbase, lobby_pair })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
