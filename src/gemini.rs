//! Provider HTTP client configuration with sensible defaults.

use crate::error::{Result, SkrivError};
use reqwest::Client;
use std::time::Duration;

/// Default timeout for provider API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Create an HTTP client with the default timeout.
///
/// Uses a 5-minute timeout to prevent hung API calls.
pub fn create_client() -> Result<Client> {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an HTTP client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Resolve the provider API key from the environment.
pub fn api_key() -> Result<String> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(SkrivError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            API_KEY_ENV, API_KEY_ENV
        ))),
    }
}

/// Check whether the provider API key is configured.
pub fn is_api_key_configured() -> bool {
    std::env::var(API_KEY_ENV).map(|k| !k.is_empty()).unwrap_or(false)
}
