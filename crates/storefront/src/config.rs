//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAKEHOUSE_DOCSTORE_URL` - Base URL of the hosted document database
//! - `BAKEHOUSE_DOCSTORE_KEY` - Document database API key
//! - `BAKEHOUSE_IDENTITY_URL` - Base URL of the hosted identity service
//! - `BAKEHOUSE_IDENTITY_KEY` - Identity service API key
//! - `BAKEHOUSE_STORAGE_URL` - Base URL of the object storage service
//! - `BAKEHOUSE_STORAGE_BUCKET` - Object storage bucket name
//! - `PAYMONGO_SECRET_KEY` - Payment gateway secret key
//!
//! ## Optional
//! - `PAYMONGO_API_URL` - Payment gateway base URL (default: <https://api.paymongo.com/v1>)
//! - `BAKEHOUSE_CART_DIR` - Directory for the durable cart record (default: `.bakehouse`)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Hosted document database configuration
    pub docstore: DocStoreConfig,
    /// Hosted identity service configuration
    pub identity: IdentityConfig,
    /// Object storage configuration
    pub storage: StorageConfig,
    /// Payment gateway configuration
    pub payment: PaymentConfig,
    /// Directory holding the durable cart record
    pub cart_dir: PathBuf,
}

/// Hosted document database configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct DocStoreConfig {
    /// Base URL, e.g. `https://docs.example-cloud.com/v1`
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: SecretString,
}

impl std::fmt::Debug for DocStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Hosted identity service configuration.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Base URL of the identity REST API
    pub base_url: String,
    /// API key appended to identity requests
    pub api_key: SecretString,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Object storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the object storage REST API
    pub base_url: String,
    /// Bucket holding product images and profile photos
    pub bucket: String,
}

/// Payment gateway configuration.
#[derive(Clone)]
pub struct PaymentConfig {
    /// Gateway REST base URL
    pub base_url: String,
    /// Secret key used for basic auth
    pub secret_key: SecretString,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("base_url", &self.base_url)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Default payment gateway endpoint.
pub const DEFAULT_PAYMENT_API_URL: &str = "https://api.paymongo.com/v1";

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid,
    /// or if secrets look like placeholders.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            docstore: DocStoreConfig {
                base_url: get_base_url("BAKEHOUSE_DOCSTORE_URL")?,
                api_key: get_validated_secret("BAKEHOUSE_DOCSTORE_KEY")?,
            },
            identity: IdentityConfig {
                base_url: get_base_url("BAKEHOUSE_IDENTITY_URL")?,
                api_key: get_validated_secret("BAKEHOUSE_IDENTITY_KEY")?,
            },
            storage: StorageConfig {
                base_url: get_base_url("BAKEHOUSE_STORAGE_URL")?,
                bucket: get_required_env("BAKEHOUSE_STORAGE_BUCKET")?,
            },
            payment: PaymentConfig {
                base_url: get_env_or_default("PAYMONGO_API_URL", DEFAULT_PAYMENT_API_URL),
                secret_key: get_validated_secret("PAYMONGO_SECRET_KEY")?,
            },
            cart_dir: PathBuf::from(get_env_or_default("BAKEHOUSE_CART_DIR", ".bakehouse")),
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

/// Get a required environment variable and check it parses as a URL.
fn get_base_url(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    url::Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    // Trailing slashes would double up when joining paths
    Ok(value.trim_end_matches('/').to_string())
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_value(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_value(&value, key)?;
    Ok(SecretString::from(value))
}
