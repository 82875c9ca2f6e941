//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `KITAE_API_BASE_URL` - Base URL of the commerce REST API
//! - `KITAE_BASE_URL` - Public origin of the storefront (redirect URLs are
//!   built from this)
//! - `KITAE_WIDGET_CLIENT_KEY` - Client key for the hosted payment widget
//!
//! ## Optional
//! - `KITAE_ORDER_PREFIX` - Prefix for external order references
//!   (default: KITAE)
//! - `KITAE_SHIPPING_FEE` - Flat shipping fee in currency units
//!   (default: 3000)
//! - `KITAE_CURRENCY` - ISO 4217 store currency (default: KRW)

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use kitae_core::Currency;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure value in {0}: {1}")]
    InsecureValue(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the commerce REST API (e.g., <https://api.kitae.shop/api>)
    pub api_base_url: String,
    /// Payment widget client key, passed through to the widget integration.
    /// Implements `Debug` with redaction via `SecretString`.
    pub widget_client_key: SecretString,
    /// Checkout flow configuration.
    pub checkout: CheckoutConfig,
}

/// Configuration consumed by the checkout orchestrator and the payment
/// confirmation handler.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Public origin of the storefront; success/fail redirect URLs are
    /// derived from it.
    pub base_url: Url,
    /// Prefix composed into external order references (`<prefix>-<id>`).
    pub order_prefix: String,
    /// Flat shipping fee added to the cart subtotal.
    pub shipping_fee: Decimal,
    /// Store currency, forwarded to the payment widget.
    pub currency: Currency,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the widget client key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("KITAE_API_BASE_URL")?;
        let widget_client_key = get_validated_key("KITAE_WIDGET_CLIENT_KEY")?;
        let checkout = CheckoutConfig::from_env()?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            widget_client_key,
            checkout,
        })
    }
}

impl CheckoutConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("KITAE_BASE_URL")?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("KITAE_BASE_URL".to_string(), e.to_string()))?;

        let shipping_fee = get_env_or_default("KITAE_SHIPPING_FEE", "3000")
            .parse::<Decimal>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("KITAE_SHIPPING_FEE".to_string(), e.to_string())
            })?;

        let currency = get_env_or_default("KITAE_CURRENCY", "KRW")
            .parse::<Currency>()
            .map_err(|e| ConfigError::InvalidEnvVar("KITAE_CURRENCY".to_string(), e))?;

        Ok(Self {
            base_url,
            order_prefix: get_env_or_default("KITAE_ORDER_PREFIX", "KITAE"),
            shipping_fee,
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Check that a key is not an obvious placeholder left over from setup docs.
fn validate_key(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureValue(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load and validate a widget key from environment.
fn get_validated_key(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_key(&value, key)?;
    Ok(SecretString::from(value))
}
