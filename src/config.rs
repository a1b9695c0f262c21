//! Process configuration, read once at startup and handed to the gateway.

use crate::error::ConfigError;
use dotenvy::dotenv;
use log::{error, info};
use std::{
    env as stdenv,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4242;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CORS_FILE: &str = ".env_cors";

#[derive(Clone)]
pub struct GatewayConfig {
    pub secret_key: String,
    pub publishable_key: Option<String>,
    pub price_id: Option<String>,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub api_base: String,
    pub provider_timeout: Duration,
    pub cors_origins_file: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            publishable_key: None,
            price_id: None,
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            api_base: DEFAULT_API_BASE.to_owned(),
            provider_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cors_origins_file: PathBuf::from(DEFAULT_CORS_FILE),
        }
    }
}

// Keys stay out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("secret_key", &redact(&self.secret_key))
            .field("publishable_key", &self.publishable_key)
            .field("price_id", &self.price_id)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .field("api_base", &self.api_base)
            .field("provider_timeout", &self.provider_timeout)
            .field("cors_origins_file", &self.cors_origins_file)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "**redacted**"
    }
}

impl GatewayConfig {
    /// Reads the process environment. Call [`load_env_file`] first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| stdenv::var(key).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                expected: "a TCP port number",
                value: raw,
            })?,
            None => defaults.port,
        };
        let provider_timeout = match get("STRIPE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "STRIPE_TIMEOUT_SECS",
                        expected: "a positive number of seconds",
                        value: raw,
                    })
                }
            },
            None => defaults.provider_timeout,
        };

        Ok(Self {
            secret_key: get("STRIPE_SECRET_KEY").unwrap_or_default(),
            publishable_key: get("STRIPE_PUBLISHABLE_KEY"),
            price_id: get("STRIPE_PRICE_ID"),
            host: get("HOST").unwrap_or(defaults.host),
            port,
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            api_base: get("STRIPE_API_BASE").unwrap_or(defaults.api_base),
            provider_timeout,
            cors_origins_file: get("CORS_ORIGINS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.cors_origins_file),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_secret_key(&self) -> bool {
        !self.secret_key.is_empty()
    }
}

/// Loads `.env` from the working directory if there is one.
pub fn load_env_file() {
    let current_dir = stdenv::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let env_path = current_dir.join(".env");

    if dotenv().is_err() {
        error!(
            ".env file not found. Expected it at: {}",
            env_path.display()
        );
    } else {
        info!(".env loading at: {}", env_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 4242);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.api_base, "https://api.stripe.com");
        assert_eq!(config.provider_timeout, Duration::from_secs(10));
        assert!(config.publishable_key.is_none());
        assert!(config.price_id.is_none());
        assert!(!config.has_secret_key());
    }

    #[test]
    fn reads_stripe_settings() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("STRIPE_PUBLISHABLE_KEY", "pk_test_123"),
            ("STRIPE_PRICE_ID", "price_123"),
            ("PORT", "8081"),
            ("STRIPE_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert!(config.has_secret_key());
        assert_eq!(config.publishable_key.as_deref(), Some("pk_test_123"));
        assert_eq!(config.price_id.as_deref(), Some("price_123"));
        assert_eq!(config.bind_address(), "127.0.0.1:8081");
        assert_eq!(config.provider_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("STRIPE_PUBLISHABLE_KEY", ""),
            ("STRIPE_PRICE_ID", "   "),
        ]))
        .unwrap();
        assert!(config.publishable_key.is_none());
        assert!(config.price_id.is_none());
    }

    #[test]
    fn rejects_bad_port_and_timeout() {
        let err = GatewayConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
        let err = GatewayConfig::from_lookup(lookup(&[("STRIPE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "STRIPE_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn debug_hides_secret_key() {
        let config = GatewayConfig {
            secret_key: "sk_live_very_secret".into(),
            ..GatewayConfig::default()
        };
        assert!(!format!("{:?}", config).contains("sk_live_very_secret"));
    }
}
