//! Output formatters for CLI commands.
//!
//! Provides JSON and YAML renderings of a loaded configuration mapping.

use anyhow::{Context, Result};
use app_config::ConfigMap;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: json, yaml", s),
        }
    }
}

/// Formatter trait for different output types.
pub trait Formatter {
    /// Format a nested configuration mapping.
    fn format_config(&self, config: &ConfigMap) -> Result<String>;
}

/// JSON formatter.
pub struct JsonFormatter {
    pub pretty: bool,
}

impl Formatter for JsonFormatter {
    fn format_config(&self, config: &ConfigMap) -> Result<String> {
        let mut output = if self.pretty {
            serde_json::to_string_pretty(config)?
        } else {
            serde_json::to_string(config)?
        };
        output.push('\n');
        Ok(output)
    }
}

/// YAML formatter.
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn format_config(&self, config: &ConfigMap) -> Result<String> {
        Ok(serde_yaml::to_string(config)?)
    }
}

/// Get a formatter for the specified output format.
pub fn get_formatter(format: OutputFormat, pretty: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter { pretty }),
        OutputFormat::Yaml => Box::new(YamlFormatter),
    }
}

/// Write content to a file, replacing it atomically.
pub fn write_to_file(content: &str, path: &std::path::Path) -> Result<()> {
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // If path has no parent (e.g., just "config.json"), use current directory
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => std::path::Path::new("."),
    };

    fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create directory: {}", parent_dir.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temp file in: {}", parent_dir.display()))?;
    temp_file
        .write_all(content.as_bytes())
        .with_context(|| "Failed to write to temp file")?;
    temp_file
        .flush()
        .with_context(|| "Failed to flush temp file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ConfigMap {
        match json!({
            "airflow_core": {"airflow_uid": 55, "load_examples": false},
            "meta_database": {"postgres_user": "airflow"},
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("YAML").unwrap(), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_str("yml").unwrap(), OutputFormat::Yaml);
        assert!(OutputFormat::from_str("table").is_err());
    }

    #[test]
    fn test_json_formatter_compact_and_pretty() {
        let compact = JsonFormatter { pretty: false }.format_config(&sample()).unwrap();
        assert_eq!(compact.lines().count(), 1);

        let pretty = JsonFormatter { pretty: true }.format_config(&sample()).unwrap();
        assert!(pretty.lines().count() > 1);

        let reparsed: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(reparsed["airflow_core"]["airflow_uid"], 55);
    }

    #[test]
    fn test_yaml_formatter() {
        let output = YamlFormatter.format_config(&sample()).unwrap();
        assert!(output.contains("airflow_uid: 55"));
        assert!(output.contains("load_examples: false"));
    }

    #[test]
    fn test_write_to_file_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("config.json");

        write_to_file("{}\n", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
