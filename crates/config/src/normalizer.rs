//! Flat-to-nested normalization of environment-style configuration.
//!
//! Responsibilities:
//! - Turn `SECTION__KEY=value` pairs into a nested mapping (`nest`).
//! - Decode string leaves that hold JSON into typed values (`coerce_json_fields`).
//! - Provide the `EnvProcessor` seam used by the env loader.
//!
//! Does NOT handle:
//! - Parsing dotenv text (see `loader::env`).
//! - Validating the resulting mapping against a settings type (see `settings`).
//!
//! Invariants:
//! - Keys are lower-cased before splitting on `__`.
//! - When a key prefix is used both as a leaf and as a nesting prefix, the later
//!   key wins silently. This behavior is provisional (see DESIGN.md).
//! - A string that fails to decode as JSON is kept unchanged; this is never an error.
//! - Absent values become `null` and are never coerced.

use serde_json::Value;
use tracing::debug;

use crate::constants::NESTING_DELIMITER;
use crate::loader::ConfigMap;

/// Transform flat env-style keys into a nested mapping.
///
/// Every value is stored as a JSON string (or `null` when absent); run
/// [`coerce_json_fields`] afterwards to recover typed values.
pub fn nest<I, K, V>(flat: I) -> ConfigMap
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut nested = ConfigMap::new();
    for (key, value) in flat {
        let lowered = key.as_ref().to_lowercase();
        let segments: Vec<&str> = lowered.split(NESTING_DELIMITER).collect();
        let value = value.map_or(Value::Null, |v| Value::String(v.into()));
        insert_path(&mut nested, &segments, value);
    }
    nested
}

fn insert_path(level: &mut ConfigMap, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            if let Some(Value::Object(_)) = level.insert((*leaf).to_string(), value) {
                debug!(key = %leaf, "Replacing nested mapping with scalar value");
            }
        }
        [head, rest @ ..] => {
            let mut child = match level.remove(*head) {
                Some(Value::Object(map)) => map,
                Some(_) => {
                    debug!(key = %head, "Replacing scalar value with nested mapping");
                    ConfigMap::new()
                }
                None => ConfigMap::new(),
            };
            insert_path(&mut child, rest, value);
            level.insert((*head).to_string(), Value::Object(child));
        }
    }
}

/// Recursively decode JSON-looking string leaves in place.
///
/// `"55"` becomes `55`, `"false"` becomes `false`, `"[1,2]"` becomes `[1, 2]`;
/// `"airflow"` stays a string. Mappings are recursed into, never decoded.
pub fn coerce_json_fields(nested: &mut ConfigMap) {
    for (key, value) in nested.iter_mut() {
        let decoded = match value {
            Value::Object(child) => {
                coerce_json_fields(child);
                continue;
            }
            Value::String(raw) => serde_json::from_str::<Value>(raw),
            _ => continue,
        };

        match decoded {
            Ok(parsed) => {
                debug!(key = %key, "Parsed JSON field");
                *value = parsed;
            }
            Err(_) => debug!(key = %key, "Skipping non-JSON field"),
        }
    }
}

/// Inverse of [`nest`] for string leaves: joins key paths with `__`.
///
/// Keys are upper-cased the way environment variables are usually written.
/// Non-string scalars are rendered as JSON text, `null` becomes an absent
/// value, and empty mappings are dropped because they have no flat form.
pub fn flatten(nested: &ConfigMap) -> Vec<(String, Option<String>)> {
    let mut flat = Vec::new();
    flatten_into(nested, None, &mut flat);
    flat
}

fn flatten_into(level: &ConfigMap, prefix: Option<&str>, out: &mut Vec<(String, Option<String>)>) {
    for (key, value) in level {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{NESTING_DELIMITER}{}", key.to_uppercase()),
            None => key.to_uppercase(),
        };
        match value {
            Value::Object(child) => flatten_into(child, Some(&path), out),
            Value::Null => out.push((path, None)),
            Value::String(s) => out.push((path, Some(s.clone()))),
            other => out.push((path, Some(other.to_string()))),
        }
    }
}

/// Converts a flat env mapping into the nested mapping handed to settings.
pub trait EnvProcessor: Send + Sync + std::fmt::Debug {
    fn process(&self, flat: Vec<(String, Option<String>)>) -> ConfigMap;
}

/// Nests on `__` and then coerces JSON-looking values.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEnvProcessor;

impl EnvProcessor for DefaultEnvProcessor {
    fn process(&self, flat: Vec<(String, Option<String>)>) -> ConfigMap {
        let count = flat.len();
        let mut nested = nest(flat);
        coerce_json_fields(&mut nested);
        debug!(keys = count, "Processed environment variables");
        nested
    }
}
