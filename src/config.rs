//! Service configuration
//!
//! Loaded from a TOML file, then selected values are overridden from the
//! environment. Every field has a default so the service also starts with no
//! file at all.

use crate::pricing::{calculator::default_tax_rate, PricingCalculator, ShippingRates};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::info;

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "BOOKSTORE_API_URL";
/// Environment variable overriding `api.token`.
pub const ENV_API_TOKEN: &str = "BOOKSTORE_API_TOKEN";
/// Environment variable overriding `server.port`.
pub const ENV_PORT: &str = "BOOKSTORE_PORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {name}")]
    InvalidOverride { name: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub pricing: PricingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Checkout sessions untouched for this long are dropped.
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            session_ttl_secs: 1800,
        }
    }
}

impl ServerConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

/// Remote store API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer token sent with every request, if set.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api".to_string(),
            timeout_secs: 10,
            token: None,
        }
    }
}

/// Checkout pricing rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Fraction of the subtotal charged as tax, e.g. `0.15`.
    pub tax_rate: Decimal,
    pub currency: String,
    pub shipping: ShippingRates,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            currency: "USD".to_string(),
            shipping: ShippingRates::default(),
        }
    }
}

impl PricingConfig {
    pub fn calculator(&self) -> PricingCalculator {
        PricingCalculator::new(self.tax_rate, self.shipping)
    }
}

impl AppConfig {
    /// Reads `path` if it exists (defaults otherwise), applies environment
    /// overrides and validates the result.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "loaded configuration");
            Self::from_toml_str(&raw)?
        } else {
            info!(path = %path.display(), "configuration file not found, using defaults");
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies overrides from `lookup` (the process environment in production).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidOverride {
                    name: ENV_PORT,
                    value: port,
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.pricing.tax_rate;
        if rate.is_sign_negative() || rate > Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "pricing.tax_rate must be between 0 and 1, got {}",
                rate
            )));
        }

        let rates = &self.pricing.shipping;
        if [rates.standard, rates.express, rates.pickup]
            .iter()
            .any(|fee| fee.is_negative())
        {
            return Err(ConfigError::Invalid(
                "shipping fees must not be negative".to_string(),
            ));
        }

        if self.server.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.session_ttl_secs must be positive".to_string(),
            ));
        }

        if self.pricing.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("pricing.currency is empty".to_string()));
        }
        Ok(())
    }

    pub fn server_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "invalid server address {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }
}
