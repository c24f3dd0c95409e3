//! # Configuration
//!
//! Loaded from built-in defaults, then an optional `storefront.toml` in the
//! working directory, then `STOREFRONT__*` environment variables:
//!
//! ```bash
//! STOREFRONT__GATEWAY_SECRET=s3cret
//! STOREFRONT__FREE_SHIPPING_THRESHOLD=1499
//! ```

use crate::backend::ServiceablePincode;
use crate::pricing::PricingPolicy;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_minor_units")]
    pub minor_units_per_major: u32,
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: Decimal,
    /// Used when the tax rate cannot be fetched.
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate_percent: Decimal,
    /// Merchant secret shared with the payment gateway.
    #[serde(default = "default_gateway_secret")]
    pub gateway_secret: String,
    #[serde(default = "default_actor_buffer")]
    pub actor_buffer: usize,
    #[serde(default = "default_pincodes")]
    pub pincodes: Vec<ServiceablePincode>,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_minor_units() -> u32 {
    100
}

fn default_free_shipping_threshold() -> Decimal {
    Decimal::from(999)
}

fn default_tax_rate() -> Decimal {
    Decimal::from(18)
}

fn default_gateway_secret() -> String {
    "storefront-dev-secret".to_string()
}

fn default_actor_buffer() -> usize {
    32
}

fn default_pincodes() -> Vec<ServiceablePincode> {
    [("411001", 50, true), ("400001", 60, true), ("110001", 80, false)]
        .into_iter()
        .filter_map(|(pincode, charge, cod)| {
            Some(ServiceablePincode {
                pincode: pincode.parse().ok()?,
                shipping_charge: Decimal::from(charge),
                cod_available: cod,
            })
        })
        .collect()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            minor_units_per_major: default_minor_units(),
            free_shipping_threshold: default_free_shipping_threshold(),
            default_tax_rate_percent: default_tax_rate(),
            gateway_secret: default_gateway_secret(),
            actor_buffer: default_actor_buffer(),
            pincodes: default_pincodes(),
        }
    }
}

impl CheckoutConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("storefront").required(false))
            .add_source(config::Environment::with_prefix("STOREFRONT").separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minor_units_per_major == 0 {
            return Err(ConfigError::Invalid("minor_units_per_major must be positive".into()));
        }
        if self.default_tax_rate_percent.is_sign_negative() {
            return Err(ConfigError::Invalid("default_tax_rate_percent must not be negative".into()));
        }
        if self.gateway_secret.is_empty() {
            return Err(ConfigError::Invalid("gateway_secret must be set".into()));
        }
        if self.actor_buffer == 0 {
            return Err(ConfigError::Invalid("actor_buffer must be positive".into()));
        }
        Ok(())
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            free_shipping_threshold: self.free_shipping_threshold,
            minor_units_per_major: self.minor_units_per_major,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_storefront_rules() {
        let config = CheckoutConfig::default();
        assert_eq!(config.currency, "INR");
        assert_eq!(config.pricing_policy(), PricingPolicy::default());
        assert_eq!(config.default_tax_rate_percent, Decimal::from(18));
        assert_eq!(config.pincodes.len(), 3);
        config.validate().unwrap();
    }

    #[test]
    fn test_overrides_deserialize_over_defaults() {
        let settings = config::Config::builder()
            .set_override("free_shipping_threshold", "1499")
            .unwrap()
            .set_override("actor_buffer", 8)
            .unwrap()
            .build()
            .unwrap();
        let config: CheckoutConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.free_shipping_threshold, Decimal::from(1499));
        assert_eq!(config.actor_buffer, 8);
        assert_eq!(config.minor_units_per_major, 100);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let config = CheckoutConfig {
            gateway_secret: String::new(),
            ..CheckoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = CheckoutConfig {
            minor_units_per_major: 0,
            ..CheckoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
