//! JSON configuration loader.

use serde_json::Value;
use tracing::{error, info};

use super::{ConfigLoader, ConfigMap, fetch_payload, into_mapping};
use crate::descriptor::ConfigFormat;
use crate::error::ConfigError;
use crate::provider::ConfigProvider;

/// Loads a JSON document from a provider.
#[derive(Debug)]
pub struct JsonLoader {
    provider: Box<dyn ConfigProvider>,
}

impl JsonLoader {
    pub fn new(provider: Box<dyn ConfigProvider>) -> Self {
        Self { provider }
    }
}

impl ConfigLoader for JsonLoader {
    fn load(&self) -> Result<ConfigMap, ConfigError> {
        let payload = fetch_payload(self.provider.as_ref())?;

        let document: Value = serde_json::from_str(&payload).map_err(|e| {
            error!(location = %self.location(), error = %e, "Failed to parse JSON content");
            ConfigError::MalformedPayload {
                location: self.location(),
                format: ConfigFormat::Json,
                message: e.to_string(),
            }
        })?;

        let mapping = into_mapping(document, ConfigFormat::Json, self.location())?;
        info!(location = %self.location(), "Successfully parsed JSON configuration");
        Ok(mapping)
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Json
    }

    fn location(&self) -> String {
        self.provider.location()
    }
}
