//! YAML configuration loader.

use serde_json::Value;
use tracing::{error, info};

use super::{ConfigLoader, ConfigMap, fetch_payload, into_mapping};
use crate::descriptor::ConfigFormat;
use crate::error::ConfigError;
use crate::provider::ConfigProvider;

/// Loads a YAML document from a provider.
///
/// The document is deserialized straight into JSON values, so YAML-only
/// constructs without a JSON equivalent (non-string mapping keys, tags)
/// are reported as malformed.
#[derive(Debug)]
pub struct YamlLoader {
    provider: Box<dyn ConfigProvider>,
}

impl YamlLoader {
    pub fn new(provider: Box<dyn ConfigProvider>) -> Self {
        Self { provider }
    }
}

impl ConfigLoader for YamlLoader {
    fn load(&self) -> Result<ConfigMap, ConfigError> {
        let payload = fetch_payload(self.provider.as_ref())?;

        let document: Value = serde_yaml::from_str(&payload).map_err(|e| {
            error!(location = %self.location(), error = %e, "Failed to parse YAML content");
            ConfigError::MalformedPayload {
                location: self.location(),
                format: ConfigFormat::Yaml,
                message: e.to_string(),
            }
        })?;

        let mapping = into_mapping(document, ConfigFormat::Yaml, self.location())?;
        info!(location = %self.location(), "Successfully parsed YAML configuration");
        Ok(mapping)
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Yaml
    }

    fn location(&self) -> String {
        self.provider.location()
    }
}
