//! Shared Google Cloud settings and HTTP plumbing for the cloud providers.
//!
//! Responsibilities:
//! - Hold endpoint URLs, the optional bearer token, and the request timeout.
//! - Read those settings from environment variables.
//! - Issue blocking GET requests and map HTTP status codes onto the provider contract.
//!
//! Does NOT handle:
//! - Obtaining or refreshing access tokens.
//! - Retrying requests.
//!
//! Invariants:
//! - Endpoint URLs are absolute http(s) URLs with a host and no trailing slash.
//! - HTTP 404 maps to an absent payload; every other non-success status is `SourceUnavailable`.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, warn};
use url::Url;

use crate::constants::{
    DEFAULT_SECRET_MANAGER_URL, DEFAULT_STORAGE_URL, DEFAULT_TIMEOUT_SECS, ENV_ACCESS_TOKEN,
    ENV_SECRET_MANAGER_URL, ENV_STORAGE_URL, ENV_TIMEOUT_SECS, MAX_TIMEOUT_SECS,
    USER_PROJECT_HEADER,
};
use crate::env::env_var_or_none;
use crate::error::ConfigError;

/// Connection settings shared by the Secret Manager and Cloud Storage providers.
#[derive(Debug, Clone)]
pub struct GcpConfig {
    secret_manager_url: String,
    storage_url: String,
    access_token: Option<SecretString>,
    timeout: Duration,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            secret_manager_url: DEFAULT_SECRET_MANAGER_URL.to_string(),
            storage_url: DEFAULT_STORAGE_URL.to_string(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GcpConfig {
    /// Build settings from the defaults overridden by environment variables.
    ///
    /// Reads `APP_CONFIG_GCP_SECRET_MANAGER_URL`, `APP_CONFIG_GCP_STORAGE_URL`,
    /// `GOOGLE_OAUTH_ACCESS_TOKEN` and `APP_CONFIG_GCP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = env_var_or_none(ENV_SECRET_MANAGER_URL) {
            config.secret_manager_url = validate_and_normalize_base_url(ENV_SECRET_MANAGER_URL, &url)?;
        }
        if let Some(url) = env_var_or_none(ENV_STORAGE_URL) {
            config.storage_url = validate_and_normalize_base_url(ENV_STORAGE_URL, &url)?;
        }
        if let Some(token) = env_var_or_none(ENV_ACCESS_TOKEN) {
            config.access_token = Some(SecretString::new(token.into()));
        }
        if let Some(timeout) = env_var_or_none(ENV_TIMEOUT_SECS) {
            let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_TIMEOUT_SECS.to_string(),
                message: "must be a number".to_string(),
            })?;
            config.timeout = validate_timeout(ENV_TIMEOUT_SECS, secs)?;
        }

        Ok(config)
    }

    /// Override the Secret Manager base URL.
    pub fn with_secret_manager_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.secret_manager_url = validate_and_normalize_base_url("secret_manager_url", url)?;
        Ok(self)
    }

    /// Override the Cloud Storage base URL.
    pub fn with_storage_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.storage_url = validate_and_normalize_base_url("storage_url", url)?;
        Ok(self)
    }

    /// Set the bearer token sent with every request.
    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        self.timeout = validate_timeout("timeout", timeout.as_secs())?;
        Ok(self)
    }

    pub fn secret_manager_url(&self) -> &str {
        &self.secret_manager_url
    }

    pub fn storage_url(&self) -> &str {
        &self.storage_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    pub(crate) fn endpoint(
        &self,
        base: &str,
        segments: &[&str],
        location: &str,
    ) -> Result<Url, ConfigError> {
        let mut url = Url::parse(base).map_err(|e| unavailable(location, e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| unavailable(location, format!("{base} cannot be a base URL")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a blocking GET.
    ///
    /// Returns `Ok(None)` for HTTP 404, the response for any success status,
    /// and `SourceUnavailable` otherwise.
    pub(crate) fn get(
        &self,
        url: Url,
        user_project: Option<&str>,
        location: &str,
    ) -> Result<Option<Response>, ConfigError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| unavailable(location, format!("failed to build HTTP client: {e}")))?;

        let mut request = client.get(url.clone());
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(project) = user_project {
            request = request.header(USER_PROJECT_HEADER, project);
        }

        debug!(%url, "Sending Google Cloud request");
        let response = request.send().map_err(|e| {
            error!(%location, error = %e, "Google Cloud request failed");
            unavailable(location, e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(Some(response));
        }
        if status == StatusCode::NOT_FOUND {
            warn!(%location, "Google Cloud resource does not exist");
            return Ok(None);
        }

        let body = response
            .text()
            .unwrap_or_else(|_| "Could not read error response body".to_string());
        error!(%location, status = status.as_u16(), "Google Cloud request was rejected");
        Err(unavailable(
            location,
            format!("HTTP {}: {}", status.as_u16(), body.trim()),
        ))
    }
}

pub(crate) fn unavailable(location: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::SourceUnavailable {
        location: location.to_string(),
        reason: reason.into(),
    }
}

fn validate_timeout(var: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("must be between 1 and {MAX_TIMEOUT_SECS} seconds (got {secs})"),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Validates and normalizes a base URL string.
///
/// Validation rules:
/// - Trim surrounding whitespace
/// - Parse as an absolute URL
/// - Require scheme is http or https
/// - Require host is present
/// - Normalize by stripping trailing slash
fn validate_and_normalize_base_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        var: var.to_string(),
        message,
    };

    let parsed = Url::parse(raw.trim())
        .map_err(|e| invalid(format!("must be an absolute http(s) URL with a host: {e}")))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(invalid(format!("scheme must be http or https, got: {scheme}")));
    }

    if parsed.host_str().is_none() {
        return Err(invalid("host is required".to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
