//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SALESFORCE_INSTANCE_URL` - CRM instance URL (e.g., <https://acme.my.salesforce.com>)
//! - `SALESFORCE_ACCESS_TOKEN` - Bearer token sent on every CRM request
//!
//! ## Optional
//! - `CASEDESK_HOST` - Bind address (default: 127.0.0.1)
//! - `CASEDESK_PORT` - Listen port (default: 3000)
//! - `SALESFORCE_API_VERSION` - REST API version (default: v60.0)
//! - `SALESFORCE_TIMEOUT_SECS` - Outbound request timeout (default: none)
//! - `CASEDESK_PHOTO_BASE_URL` - Prefix for contact photos; the employee key is appended
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_VERSION: &str = "v60.0";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// CRM API configuration
    pub salesforce: SalesforceConfig,
    /// Prefix for contact photo URLs on the account page
    pub photo_base_url: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// CRM REST API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct SalesforceConfig {
    /// Instance base URL
    pub instance_url: Url,
    /// REST API version (e.g., v60.0)
    pub api_version: String,
    /// Bearer token for the `Authorization` header
    pub access_token: SecretString,
    /// Outbound request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for SalesforceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceConfig")
            .field("instance_url", &self.instance_url.as_str())
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CASEDESK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CASEDESK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CASEDESK_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CASEDESK_PORT".to_string(), e.to_string()))?;

        let salesforce = SalesforceConfig::from_env()?;

        Ok(Self {
            host,
            port,
            salesforce,
            photo_base_url: get_optional_env("CASEDESK_PHOTO_BASE_URL"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SalesforceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let instance_url = parse_instance_url(
            "SALESFORCE_INSTANCE_URL",
            &get_required_env("SALESFORCE_INSTANCE_URL")?,
        )?;

        let timeout = get_optional_env("SALESFORCE_TIMEOUT_SECS")
            .map(|value| {
                value.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar("SALESFORCE_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            instance_url,
            api_version: get_env_or_default("SALESFORCE_API_VERSION", DEFAULT_API_VERSION),
            access_token: get_validated_secret("SALESFORCE_ACCESS_TOKEN")?,
            timeout,
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

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the CRM instance URL; only absolute http(s) URLs are accepted.
fn parse_instance_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be an http(s) URL (got '{value}')"),
        ));
    }

    Ok(url)
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
    let len = s.len() as f64;
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

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real access tokens are long random strings
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Is this a real token?"
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
