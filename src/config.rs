//! Application configuration loaded from environment variables.
//!
//! Everything here is process-wide: client credentials, the public callback
//! URL Strava calls back on, and the webhook verify token.

use std::env;
use std::time::Duration;

/// Default Strava REST API base URL.
pub const STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
/// Default Strava OAuth base URL.
pub const STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth";
/// Upper bound for `ACTIVITY_DAYS_BACK`.
pub const MAX_ACTIVITY_DAYS_BACK: i64 = 365;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Strava credentials ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Publicly reachable URL of `/exchange_token` (OAuth redirect and webhook callback)
    pub callback_url: String,
    /// Webhook verification token echoed back by Strava during the handshake
    pub webhook_verify_token: String,

    // --- Endpoints ---
    pub strava_api_url: String,
    pub strava_oauth_url: String,

    // --- Server ---
    /// Server port
    pub port: u16,

    // --- Subscription lifecycle ---
    /// Register the webhook subscription after the first inbound request
    pub auto_subscribe: bool,
    pub subscribe_delay: Duration,
    pub unsubscribe_delay: Duration,
    /// How long shutdown waits for the best-effort unsubscribe
    pub shutdown_grace: Duration,

    /// Number of days of activities fetched after OAuth
    pub activity_days_back: i64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            callback_url: "http://localhost:8080/exchange_token".to_string(),
            webhook_verify_token: "test_verify_token".to_string(),
            strava_api_url: STRAVA_API_URL.to_string(),
            strava_oauth_url: STRAVA_OAUTH_URL.to_string(),
            port: 8080,
            auto_subscribe: false,
            subscribe_delay: Duration::ZERO,
            unsubscribe_delay: Duration::ZERO,
            shutdown_grace: Duration::from_secs(1),
            activity_days_back: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: required("STRAVA_CLIENT_ID")?,
            strava_client_secret: required("STRAVA_CLIENT_SECRET")?,
            callback_url: required("CALLBACK_URL")?,
            webhook_verify_token: required("WEBHOOK_VERIFY_TOKEN")?,

            strava_api_url: env::var("STRAVA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| STRAVA_OAUTH_URL.to_string()),

            port: parse_or("PORT", 8080)?,

            auto_subscribe: parse_or("AUTO_SUBSCRIBE", true)?,
            subscribe_delay: Duration::from_secs(parse_or("SUBSCRIBE_DELAY_SECS", 4)?),
            unsubscribe_delay: Duration::from_secs(parse_or("UNSUBSCRIBE_DELAY_SECS", 1)?),
            shutdown_grace: Duration::from_secs(parse_or("SHUTDOWN_GRACE_SECS", 10)?),

            activity_days_back: days_back()?,
        })
    }
}

/// Read a required variable, trimming stray whitespace from secret bindings.
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Read an optional variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// `ACTIVITY_DAYS_BACK`, limited to `1..=MAX_ACTIVITY_DAYS_BACK`.
fn days_back() -> Result<i64, ConfigError> {
    let days: i64 = parse_or("ACTIVITY_DAYS_BACK", 30)?;
    if (1..=MAX_ACTIVITY_DAYS_BACK).contains(&days) {
        Ok(days)
    } else {
        Err(ConfigError::Invalid {
            name: "ACTIVITY_DAYS_BACK",
            value: days.to_string(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
