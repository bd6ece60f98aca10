//! Format loaders: raw payload in, nested configuration mapping out.
//!
//! Responsibilities:
//! - Define the `ConfigLoader` trait shared by every format.
//! - Reject absent or blank payloads before any parsing happens.
//! - Require that parsed documents have a mapping at the top level.
//!
//! Does NOT handle:
//! - Fetching payloads (delegated to a `ConfigProvider`).
//! - Choosing which loader to build (see `factory` and `registry`).
//!
//! Invariants:
//! - A loader fetches from its provider on every `load()` call; nothing is cached.
//! - Every failure names the provider location it came from.

use serde_json::Value;
use std::fmt;

use crate::descriptor::ConfigFormat;
use crate::error::ConfigError;
use crate::provider::ConfigProvider;

mod dotenv;
mod env;
mod json;
mod yaml;

pub use env::EnvLoader;
pub use json::JsonLoader;
pub use yaml::YamlLoader;

/// Nested configuration mapping produced by every loader.
pub type ConfigMap = serde_json::Map<String, Value>;

/// Produces a nested configuration mapping from some source.
pub trait ConfigLoader: Send + Sync + fmt::Debug {
    /// Fetch and parse the configuration.
    fn load(&self) -> Result<ConfigMap, ConfigError>;

    /// Format this loader parses.
    fn format(&self) -> ConfigFormat;

    /// Location of the underlying provider, for diagnostics.
    fn location(&self) -> String;
}

/// Fetch a payload, treating absent or whitespace-only content as an error.
pub(crate) fn fetch_payload(provider: &dyn ConfigProvider) -> Result<String, ConfigError> {
    match provider.get_config()? {
        Some(payload) if !payload.trim().is_empty() => {
            tracing::debug!(location = %provider.location(), bytes = payload.len(), "Fetched configuration payload");
            Ok(payload)
        }
        _ => {
            tracing::error!(location = %provider.location(), "Configuration content is empty or invalid");
            Err(ConfigError::EmptyPayload {
                location: provider.location(),
            })
        }
    }
}

/// Unwrap a parsed document into its top-level mapping.
pub(crate) fn into_mapping(
    document: Value,
    format: ConfigFormat,
    location: String,
) -> Result<ConfigMap, ConfigError> {
    match document {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::MalformedPayload {
            location,
            format,
            message: format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
