//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_LOGIN_DELAY_MS` - Simulated sign-in latency (default: 1000)
//! - `STOREFRONT_DEMO_CART` - Seed an empty cart at checkout (default: false)
//! - `CHECKOUT_FREE_SHIPPING_THRESHOLD` - Subtotal that ships free (default: 75)
//! - `CHECKOUT_FLAT_SHIPPING` - Shipping below the threshold (default: 5.99)
//! - `CHECKOUT_TAX_RATE` - Tax as a fraction of the subtotal (default: 0.0825)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::checkout::PricingPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// How long the simulated sign-in waits before resolving
    pub login_delay: Duration,
    /// Seed the demo lines into an empty cart at checkout
    pub demo_cart: bool,
    /// Shipping and tax rules
    pub pricing: PricingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            login_delay: Duration::from_millis(1000),
            demo_cart: false,
            pricing: PricingPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env = Env(lookup);

        let login_delay_ms: u64 = env.parse_or("STOREFRONT_LOGIN_DELAY_MS", 1000)?;

        let pricing = PricingPolicy {
            free_shipping_threshold: env.parse_or(
                "CHECKOUT_FREE_SHIPPING_THRESHOLD",
                defaults.pricing.free_shipping_threshold,
            )?,
            flat_shipping: env.parse_or("CHECKOUT_FLAT_SHIPPING", defaults.pricing.flat_shipping)?,
            tax_rate: env.parse_or("CHECKOUT_TAX_RATE", defaults.pricing.tax_rate)?,
        };
        validate_pricing(&pricing)?;

        Ok(Self {
            host: env.parse_or("STOREFRONT_HOST", defaults.host)?,
            port: env.parse_or("STOREFRONT_PORT", defaults.port)?,
            base_url: env.get("STOREFRONT_BASE_URL").unwrap_or(defaults.base_url),
            login_delay: Duration::from_millis(login_delay_ms),
            demo_cart: env.flag("STOREFRONT_DEMO_CART")?,
            pricing,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: env.parse_or(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-empty value of `key`.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        match self.get(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("0" | "false" | "no" | "off") => Ok(false),
            Some("1" | "true" | "yes" | "on") => Ok(true),
            Some(other) => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got '{other}'"),
            )),
        }
    }
}

/// Reject negative amounts and tax rates of 100% or more.
fn validate_pricing(pricing: &PricingPolicy) -> Result<(), ConfigError> {
    let checks = [
        (
            "CHECKOUT_FREE_SHIPPING_THRESHOLD",
            pricing.free_shipping_threshold.is_sign_negative(),
        ),
        ("CHECKOUT_FLAT_SHIPPING", pricing.flat_shipping.is_sign_negative()),
        (
            "CHECKOUT_TAX_RATE",
            pricing.tax_rate.is_sign_negative() || pricing.tax_rate >= Decimal::ONE,
        ),
    ];

    for (key, invalid) in checks {
        if invalid {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "out of range".to_string(),
            ));
        }
    }
    Ok(())
}
