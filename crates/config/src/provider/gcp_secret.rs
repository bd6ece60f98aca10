//! Secret Manager provider.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::Deserialize;
use tracing::{error, info};

use super::ConfigProvider;
use super::gcp::{GcpConfig, unavailable};
use crate::constants::SECRET_VERSION;
use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    /// Base64-encoded secret bytes.
    data: String,
}

/// Fetches the latest version of a secret from Secret Manager.
#[derive(Debug, Clone)]
pub struct GcpSecretConfigProvider {
    secret_name: String,
    project_id: String,
    gcp: GcpConfig,
}

impl GcpSecretConfigProvider {
    pub fn new(secret_name: impl Into<String>, project_id: impl Into<String>, gcp: GcpConfig) -> Self {
        Self {
            secret_name: secret_name.into(),
            project_id: project_id.into(),
            gcp,
        }
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

impl ConfigProvider for GcpSecretConfigProvider {
    fn get_config(&self) -> Result<Option<String>, ConfigError> {
        let location = self.location();
        let version = format!("{SECRET_VERSION}:access");
        let url = self.gcp.endpoint(
            self.gcp.secret_manager_url(),
            &[
                "projects",
                &self.project_id,
                "secrets",
                &self.secret_name,
                "versions",
                &version,
            ],
            &location,
        )?;

        let Some(response) = self.gcp.get(url, None, &location)? else {
            return Ok(None);
        };

        let body: AccessSecretVersionResponse = response.json().map_err(|e| {
            error!(%location, error = %e, "Unexpected Secret Manager response");
            unavailable(&location, format!("unexpected Secret Manager response: {e}"))
        })?;

        let bytes = BASE64_STANDARD
            .decode(body.payload.data.trim())
            .map_err(|e| unavailable(&location, format!("secret payload is not valid base64: {e}")))?;
        let payload = String::from_utf8(bytes)
            .map_err(|_| unavailable(&location, "secret payload is not valid UTF-8"))?;

        info!(
            secret = %self.secret_name,
            project = %self.project_id,
            "Successfully fetched secret"
        );
        Ok(Some(payload))
    }

    fn location(&self) -> String {
        format!(
            "projects/{}/secrets/{}/versions/{}",
            self.project_id, self.secret_name, SECRET_VERSION
        )
    }
}
