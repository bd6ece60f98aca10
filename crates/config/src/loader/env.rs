//! Env-file configuration loader.
//!
//! Responsibilities:
//! - Parse dotenv-style payloads (`KEY=value` lines) into a flat mapping.
//! - Hand the flat mapping to an `EnvProcessor` for nesting and JSON coercion.
//!
//! Does NOT handle:
//! - Loading `.env` files into the process environment (see `crate::env::load_dotenv`).
//!
//! Invariants:
//! - Parse errors report only the line and position, never the offending line.
//! - Duplicate keys keep the last occurrence.
//! - Values are taken literally apart from `${NAME}` references; a bare `KEY` line is `null`.

use tracing::{error, info};

use super::{ConfigLoader, ConfigMap, dotenv, fetch_payload};
use crate::descriptor::ConfigFormat;
use crate::error::ConfigError;
use crate::normalizer::{DefaultEnvProcessor, EnvProcessor};
use crate::provider::ConfigProvider;

/// Loads a dotenv payload and nests its `__`-delimited keys.
#[derive(Debug)]
pub struct EnvLoader {
    provider: Box<dyn ConfigProvider>,
    processor: Box<dyn EnvProcessor>,
}

impl EnvLoader {
    pub fn new(provider: Box<dyn ConfigProvider>, processor: Box<dyn EnvProcessor>) -> Self {
        Self {
            provider,
            processor,
        }
    }

    /// Loader using [`DefaultEnvProcessor`].
    pub fn with_default_processor(provider: Box<dyn ConfigProvider>) -> Self {
        Self::new(provider, Box::new(DefaultEnvProcessor))
    }

    fn parse_payload(&self, payload: &str) -> Result<Vec<(String, Option<String>)>, ConfigError> {
        dotenv::parse(payload).map_err(|e| {
            let message = format!(
                "invalid dotenv syntax on line {} at position {}",
                e.line, e.position
            );
            error!(location = %self.location(), reason = %message, "Failed to parse environment payload");
            ConfigError::MalformedPayload {
                location: self.location(),
                format: ConfigFormat::Env,
                message,
            }
        })
    }
}

impl ConfigLoader for EnvLoader {
    fn load(&self) -> Result<ConfigMap, ConfigError> {
        let payload = fetch_payload(self.provider.as_ref())?;
        let flat = self.parse_payload(&payload)?;
        let nested = self.processor.process(flat);
        info!(location = %self.location(), "Successfully processed environment variables");
        Ok(nested)
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Env
    }

    fn location(&self) -> String {
        self.provider.location()
    }
}
