//! Plugin service configuration loaded from environment variables.
//!
//! Slack credentials and routing are not read here; they live in the
//! persisted settings file (see [`crate::settings`]).
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ESCALATED_SLACK_HOST` - Bind address (default: 127.0.0.1)
//! - `ESCALATED_SLACK_PORT` - Listen port (default: 3002)
//! - `ESCALATED_SLACK_SETTINGS_PATH` - Settings file (default: config/settings.json)
//! - `ESCALATED_HOST_CALLBACK_URL` - Host endpoint receiving re-emitted actions
//! - `SLACK_API_BASE_URL` - Web API base URL (default: <https://slack.com/api>)
//! - `SLACK_API_TIMEOUT_SECS` - Per-call timeout (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)
//!
//! ## Optional (TLS)
//! - `ESCALATED_SLACK_TLS_CERT` - PEM-encoded certificate chain
//! - `ESCALATED_SLACK_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::slack::{SLACK_API_BASE, SlackApiConfig};

/// Default settings file location, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Plugin service configuration.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Persisted settings file
    pub settings_path: PathBuf,
    /// Host endpoint for re-emitted actions; in-process only when unset
    pub host_callback_url: Option<Url>,
    /// Slack Web API endpoint and timeout
    pub slack_api: SlackApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_parts(
            get_optional_env("ESCALATED_SLACK_TLS_CERT"),
            get_optional_env("ESCALATED_SLACK_TLS_KEY"),
        )
    }

    fn from_parts(cert_pem: Option<String>, key_pem: Option<String>) -> Result<Option<Self>, ConfigError> {
        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ESCALATED_SLACK_TLS_*".to_string(),
                "Both ESCALATED_SLACK_TLS_CERT and ESCALATED_SLACK_TLS_KEY must be set together"
                    .to_string(),
            )),
        }
    }
}

impl PluginConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ESCALATED_SLACK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ESCALATED_SLACK_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("ESCALATED_SLACK_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ESCALATED_SLACK_PORT".to_string(), e.to_string())
            })?;
        let host_callback_url = get_optional_env("ESCALATED_HOST_CALLBACK_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "ESCALATED_HOST_CALLBACK_URL".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            host,
            port,
            settings_path: settings_path_from_env(),
            host_callback_url,
            slack_api: slack_api_from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_optional_env("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            tls: TlsConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Settings file location from `ESCALATED_SLACK_SETTINGS_PATH`.
///
/// Shared with the CLI so both operate on the same file.
#[must_use]
pub fn settings_path_from_env() -> PathBuf {
    PathBuf::from(get_env_or_default(
        "ESCALATED_SLACK_SETTINGS_PATH",
        DEFAULT_SETTINGS_PATH,
    ))
}

/// Slack Web API endpoint from `SLACK_API_BASE_URL` and `SLACK_API_TIMEOUT_SECS`.
///
/// # Errors
///
/// Returns `ConfigError` if either variable is malformed.
pub fn slack_api_from_env() -> Result<SlackApiConfig, ConfigError> {
    Ok(SlackApiConfig {
        base_url: parse_api_base_url(&get_env_or_default("SLACK_API_BASE_URL", SLACK_API_BASE))?,
        timeout: parse_timeout(&get_env_or_default("SLACK_API_TIMEOUT_SECS", "15"))?,
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate an http(s) base URL and strip any trailing slash.
fn parse_api_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("SLACK_API_BASE_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "SLACK_API_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Parse a positive whole number of seconds.
fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        Ok(_) => Err(ConfigError::InvalidEnvVar(
            "SLACK_API_TIMEOUT_SECS".to_string(),
            "must be greater than zero".to_string(),
        )),
        Err(e) => Err(ConfigError::InvalidEnvVar(
            "SLACK_API_TIMEOUT_SECS".to_string(),
            e.to_string(),
        )),
    }
}
