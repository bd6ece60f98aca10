//! Shared test utilities for app-config CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - Google Cloud settings from the host never leak into the command.

use assert_cmd::Command;

/// Returns a hermetic `app-config` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Cloud endpoint, token, and project variables are cleared.
pub fn app_config_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("app-config");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    // Clear potential host leakage
    cmd.env_remove("APP_CONFIG_GCP_SECRET_MANAGER_URL")
        .env_remove("APP_CONFIG_GCP_STORAGE_URL")
        .env_remove("APP_CONFIG_GCP_TIMEOUT_SECS")
        .env_remove("GOOGLE_OAUTH_ACCESS_TOKEN")
        .env_remove("GOOGLE_CLOUD_PROJECT")
        .env_remove("RUST_LOG");

    cmd
}

/// Returns a hermetic command whose cloud endpoints point at `server_url`.
#[allow(dead_code)]
pub fn app_config_cmd_with_server(server_url: &str) -> Command {
    let mut cmd = app_config_cmd();
    cmd.env("APP_CONFIG_GCP_SECRET_MANAGER_URL", server_url)
        .env("APP_CONFIG_GCP_STORAGE_URL", server_url)
        .env("GOOGLE_OAUTH_ACCESS_TOKEN", "test-token");
    cmd
}
