//! Cloud Storage provider.

use tracing::{error, info};

use super::ConfigProvider;
use super::gcp::{GcpConfig, unavailable};
use crate::error::ConfigError;

/// Downloads an object from a Cloud Storage bucket as text.
#[derive(Debug, Clone)]
pub struct GcpStorageConfigProvider {
    bucket: String,
    blob_name: String,
    project_id: String,
    gcp: GcpConfig,
}

impl GcpStorageConfigProvider {
    pub fn new(
        bucket: impl Into<String>,
        blob_name: impl Into<String>,
        project_id: impl Into<String>,
        gcp: GcpConfig,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            blob_name: blob_name.into(),
            project_id: project_id.into(),
            gcp,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn blob_name(&self) -> &str {
        &self.blob_name
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

impl ConfigProvider for GcpStorageConfigProvider {
    fn get_config(&self) -> Result<Option<String>, ConfigError> {
        let location = self.location();
        let mut url = self.gcp.endpoint(
            self.gcp.storage_url(),
            &["storage", "v1", "b", &self.bucket, "o", &self.blob_name],
            &location,
        )?;
        url.query_pairs_mut().append_pair("alt", "media");

        let Some(response) = self.gcp.get(url, Some(&self.project_id), &location)? else {
            error!(
                bucket = %self.bucket,
                blob = %self.blob_name,
                project = %self.project_id,
                "Blob does not exist"
            );
            return Ok(None);
        };

        let data = response.text().map_err(|e| {
            error!(%location, error = %e, "Failed to read blob contents");
            unavailable(&location, format!("failed to read blob contents: {e}"))
        })?;

        info!(%location, project = %self.project_id, "Successfully fetched config file from GCS");
        Ok(Some(data))
    }

    fn location(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.blob_name)
    }
}
