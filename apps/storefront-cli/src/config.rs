//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                                | Default                |
//! |-----------------------------------------|------------------------|
//! | `STOREFRONT_SHIPPING_RATE_CENTS_PER_KG` | `2000`                 |
//! | `STOREFRONT_REPORT_TIMING`              | `before-balance-check` |
//! | `STOREFRONT_OUTPUT`                     | `text`                 |
//! | `STOREFRONT_CUSTOMER_BALANCE_CENTS`     | `50000`                |

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storefront_core::{
    CheckoutOptions, ReportTiming, ShippingRate, DEFAULT_SHIPPING_RATE_CENTS_PER_KG,
};

const SHIPPING_RATE_VAR: &str = "STOREFRONT_SHIPPING_RATE_CENTS_PER_KG";
const REPORT_TIMING_VAR: &str = "STOREFRONT_REPORT_TIMING";
const OUTPUT_VAR: &str = "STOREFRONT_OUTPUT";
const BALANCE_VAR: &str = "STOREFRONT_CUSTOMER_BALANCE_CENTS";

/// How the CLI prints a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Notice, receipt and summary as console text.
    #[default]
    Text,
    /// The completed order as one JSON document.
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(()),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Shipping charge per kilogram, in cents
    pub shipping_rate_cents_per_kg: i64,

    /// When notice and receipt are printed relative to the balance check
    pub report_timing: ReportTiming,

    /// Console text or JSON
    pub output: OutputFormat,

    /// Starting balance of the demo customer, in cents
    pub customer_balance_cents: i64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            shipping_rate_cents_per_kg: DEFAULT_SHIPPING_RATE_CENTS_PER_KG,
            report_timing: ReportTiming::default(),
            output: OutputFormat::default(),
            customer_balance_cents: 50000,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup. `load` passes the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StorefrontConfig::default();

        let config = StorefrontConfig {
            shipping_rate_cents_per_kg: parse_or(
                &lookup,
                SHIPPING_RATE_VAR,
                defaults.shipping_rate_cents_per_kg,
            )?,
            report_timing: parse_or(&lookup, REPORT_TIMING_VAR, defaults.report_timing)?,
            output: parse_or(&lookup, OUTPUT_VAR, defaults.output)?,
            customer_balance_cents: parse_or(
                &lookup,
                BALANCE_VAR,
                defaults.customer_balance_cents,
            )?,
        };

        if config.shipping_rate_cents_per_kg < 0 {
            return Err(ConfigError::InvalidValue(SHIPPING_RATE_VAR.to_string()));
        }
        if config.customer_balance_cents < 0 {
            return Err(ConfigError::InvalidValue(BALANCE_VAR.to_string()));
        }

        Ok(config)
    }

    pub fn checkout_options(&self) -> CheckoutOptions {
        CheckoutOptions {
            shipping_rate: ShippingRate::from_cents_per_kg(self.shipping_rate_cents_per_kg),
            report_timing: self.report_timing,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
