//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//! - `FRUITTURA_DATA_DIR` - Directory for persisted stores (default: .fruittura)
//! - `FRUITTURA_STORAGE_PREFIX` - Key prefix for persisted stores (default: fruittura)
//! - `FRUITTURA_FREE_SHIPPING_THRESHOLD` - Subtotal that ships free (default: 999)
//! - `FRUITTURA_FLAT_SHIPPING_FEE` - Fee below the threshold (default: 49)
//! - `FRUITTURA_CURRENCY` - ISO 4217 code (default: INR)
//! - `FRUITTURA_CATALOG_PATH` - JSON catalog file
//! - `RAZORPAY_KEY_ID` - Public payment gateway key passed to the widget
//! - `RAZORPAY_KEY_SECRET` - Gateway secret (high entropy, never logged)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use fruittura_core::CurrencyCode;

use crate::pricing::{CouponTable, PricingEngine, ShippingPolicy};
use crate::store::DEFAULT_KEY_PREFIX;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
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
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the persisted store files
    pub data_dir: PathBuf,
    /// Prefix for persisted store keys
    pub storage_prefix: String,
    pub currency: CurrencyCode,
    pub shipping: ShippingPolicy,
    /// JSON catalog file, if any
    pub catalog_path: Option<PathBuf>,
    pub payment: PaymentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Payment gateway credentials.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone, Default)]
pub struct PaymentConfig {
    /// Public key (safe to expose to the widget)
    pub key_id: Option<String>,
    /// Server-side secret
    pub key_secret: Option<SecretString>,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("key_id", &self.key_id)
            .field(
                "key_secret",
                &self.key_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".fruittura"),
            storage_prefix: DEFAULT_KEY_PREFIX.to_string(),
            currency: CurrencyCode::default(),
            shipping: ShippingPolicy::default(),
            catalog_path: None,
            payment: PaymentConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
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
    /// Returns `ConfigError` if a variable cannot be parsed or the gateway
    /// secret fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let shipping = ShippingPolicy::new(
            parse_amount(
                "FRUITTURA_FREE_SHIPPING_THRESHOLD",
                get("FRUITTURA_FREE_SHIPPING_THRESHOLD"),
                defaults.shipping.free_shipping_threshold,
            )?,
            parse_amount(
                "FRUITTURA_FLAT_SHIPPING_FEE",
                get("FRUITTURA_FLAT_SHIPPING_FEE"),
                defaults.shipping.flat_fee,
            )?,
        );

        let currency = get("FRUITTURA_CURRENCY")
            .map(|v| {
                CurrencyCode::from_str(&v).map_err(|e| {
                    ConfigError::InvalidEnvVar("FRUITTURA_CURRENCY".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(defaults.currency);

        let key_secret = get("RAZORPAY_KEY_SECRET")
            .map(|v| {
                validate_secret_strength(&v, "RAZORPAY_KEY_SECRET")?;
                Ok::<_, ConfigError>(SecretString::from(v))
            })
            .transpose()?;

        Ok(Self {
            data_dir: get("FRUITTURA_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            storage_prefix: get("FRUITTURA_STORAGE_PREFIX").unwrap_or(defaults.storage_prefix),
            currency,
            shipping,
            catalog_path: get("FRUITTURA_CATALOG_PATH").map(PathBuf::from),
            payment: PaymentConfig {
                key_id: get("RAZORPAY_KEY_ID"),
                key_secret,
            },
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Pricing engine with the standard coupon table and this shipping policy.
    #[must_use]
    pub fn pricing_engine(&self) -> PricingEngine {
        PricingEngine::new(CouponTable::standard(), self.shipping, self.currency)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a non-negative amount, falling back to `default` when unset.
fn parse_amount(key: &str, value: Option<String>, default: Decimal) -> Result<Decimal, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    let amount = Decimal::from_str(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if amount.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the gateway dashboard."
            ),
        ));
    }

    Ok(())
}
