//! Centralized constants for the app-config workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Env Key Normalization
// =============================================================================

/// Delimiter that separates nesting levels in environment-style keys.
pub const NESTING_DELIMITER: &str = "__";

// =============================================================================
// Google Cloud Endpoints
// =============================================================================

/// Default base URL for the Secret Manager REST API.
pub const DEFAULT_SECRET_MANAGER_URL: &str = "https://secretmanager.googleapis.com/v1";

/// Default base URL for the Cloud Storage JSON API.
pub const DEFAULT_STORAGE_URL: &str = "https://storage.googleapis.com";

/// Secret version fetched by the secret provider.
pub const SECRET_VERSION: &str = "latest";

/// Header naming the project billed for Cloud Storage requests.
pub const USER_PROJECT_HEADER: &str = "x-goog-user-project";

// =============================================================================
// Timeout Defaults & Bounds
// =============================================================================

/// Default HTTP request timeout for cloud providers in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed HTTP request timeout for cloud providers in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 600;

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides the Secret Manager base URL (emulators, private endpoints).
pub const ENV_SECRET_MANAGER_URL: &str = "APP_CONFIG_GCP_SECRET_MANAGER_URL";

/// Overrides the Cloud Storage base URL.
pub const ENV_STORAGE_URL: &str = "APP_CONFIG_GCP_STORAGE_URL";

/// Bearer token attached to Google Cloud requests.
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// HTTP request timeout for Google Cloud requests, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "APP_CONFIG_GCP_TIMEOUT_SECS";

/// Set to `1` or `true` to skip `.env` loading.
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";
