//! Loader descriptors identifying a configuration source and its format.
//!
//! Responsibilities:
//! - Define the closed set of configuration sources (file, secret, blob) and formats.
//! - Derive the exact `DescriptorTag` used by the registry for dispatch.
//! - Validate descriptor fields before any provider is constructed.
//!
//! Does NOT handle:
//! - Fetching payloads (see `provider`).
//! - Choosing a loader implementation (see `factory` and `registry`).
//!
//! Invariants:
//! - Descriptors are immutable values with no behavior beyond validation.
//! - Every (source kind, format) pair maps to exactly one `DescriptorTag`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

/// Payload format of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Env,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigFormat::Env => "env",
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }

    /// Infer the format from a file path, blob name, or secret name.
    ///
    /// Names starting or ending with `.env` are env files (`.env`, `.env.dev`,
    /// `prod.env`); otherwise the extension decides. Returns `None` when the
    /// name carries no recognizable hint.
    pub fn infer(name: &str) -> Option<Self> {
        let file_name = name.rsplit('/').next().unwrap_or(name).to_ascii_lowercase();

        if file_name.starts_with(".env") || file_name.ends_with(".env") {
            return Some(ConfigFormat::Env);
        }

        match Path::new(&file_name).extension().and_then(|e| e.to_str()) {
            Some("json") => Some(ConfigFormat::Json),
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "env" | "dotenv" => Ok(ConfigFormat::Env),
            "json" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            other => Err(ConfigError::InvalidDescriptor {
                field: "format",
                message: format!("expected one of env, json, yaml (got '{other}')"),
            }),
        }
    }
}

/// Where a configuration payload lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigSource {
    /// A file on the local filesystem.
    File { path: PathBuf },
    /// The latest version of a Secret Manager secret.
    GcpSecret {
        secret_name: String,
        project_id: String,
    },
    /// An object in a Cloud Storage bucket.
    GcpStorage {
        bucket: String,
        blob_name: String,
        project_id: String,
    },
}

impl ConfigSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            ConfigSource::File { .. } => SourceKind::File,
            ConfigSource::GcpSecret { .. } => SourceKind::GcpSecret,
            ConfigSource::GcpStorage { .. } => SourceKind::GcpStorage,
        }
    }
}

/// Source kind without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    File,
    GcpSecret,
    GcpStorage,
}

/// Exact variant tag of a descriptor; the registry's lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorTag {
    FileEnv,
    FileJson,
    FileYaml,
    GcpSecretEnv,
    GcpSecretJson,
    GcpSecretYaml,
    GcpStorageEnv,
    GcpStorageJson,
    GcpStorageYaml,
}

impl DescriptorTag {
    /// All tags, in declaration order.
    pub const ALL: [DescriptorTag; 9] = [
        DescriptorTag::FileEnv,
        DescriptorTag::FileJson,
        DescriptorTag::FileYaml,
        DescriptorTag::GcpSecretEnv,
        DescriptorTag::GcpSecretJson,
        DescriptorTag::GcpSecretYaml,
        DescriptorTag::GcpStorageEnv,
        DescriptorTag::GcpStorageJson,
        DescriptorTag::GcpStorageYaml,
    ];

    pub const fn of(kind: SourceKind, format: ConfigFormat) -> Self {
        match (kind, format) {
            (SourceKind::File, ConfigFormat::Env) => DescriptorTag::FileEnv,
            (SourceKind::File, ConfigFormat::Json) => DescriptorTag::FileJson,
            (SourceKind::File, ConfigFormat::Yaml) => DescriptorTag::FileYaml,
            (SourceKind::GcpSecret, ConfigFormat::Env) => DescriptorTag::GcpSecretEnv,
            (SourceKind::GcpSecret, ConfigFormat::Json) => DescriptorTag::GcpSecretJson,
            (SourceKind::GcpSecret, ConfigFormat::Yaml) => DescriptorTag::GcpSecretYaml,
            (SourceKind::GcpStorage, ConfigFormat::Env) => DescriptorTag::GcpStorageEnv,
            (SourceKind::GcpStorage, ConfigFormat::Json) => DescriptorTag::GcpStorageJson,
            (SourceKind::GcpStorage, ConfigFormat::Yaml) => DescriptorTag::GcpStorageYaml,
        }
    }

    pub const fn kind(self) -> SourceKind {
        match self {
            DescriptorTag::FileEnv | DescriptorTag::FileJson | DescriptorTag::FileYaml => {
                SourceKind::File
            }
            DescriptorTag::GcpSecretEnv
            | DescriptorTag::GcpSecretJson
            | DescriptorTag::GcpSecretYaml => SourceKind::GcpSecret,
            DescriptorTag::GcpStorageEnv
            | DescriptorTag::GcpStorageJson
            | DescriptorTag::GcpStorageYaml => SourceKind::GcpStorage,
        }
    }

    pub const fn format(self) -> ConfigFormat {
        match self {
            DescriptorTag::FileEnv | DescriptorTag::GcpSecretEnv | DescriptorTag::GcpStorageEnv => {
                ConfigFormat::Env
            }
            DescriptorTag::FileJson
            | DescriptorTag::GcpSecretJson
            | DescriptorTag::GcpStorageJson => ConfigFormat::Json,
            DescriptorTag::FileYaml
            | DescriptorTag::GcpSecretYaml
            | DescriptorTag::GcpStorageYaml => ConfigFormat::Yaml,
        }
    }
}

impl fmt::Display for DescriptorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind() {
            SourceKind::File => "file",
            SourceKind::GcpSecret => "gcp-secret",
            SourceKind::GcpStorage => "gcp-storage",
        };
        write!(f, "{}-{}", kind, self.format())
    }
}

/// Identifies a configuration source and the format of its payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoaderDescriptor {
    pub format: ConfigFormat,
    #[serde(flatten)]
    pub source: ConfigSource,
}

impl LoaderDescriptor {
    pub fn new(format: ConfigFormat, source: ConfigSource) -> Self {
        Self { format, source }
    }

    /// Describe a local file.
    pub fn file(format: ConfigFormat, path: impl Into<PathBuf>) -> Self {
        Self::new(format, ConfigSource::File { path: path.into() })
    }

    /// Describe the latest version of a Secret Manager secret.
    pub fn gcp_secret(
        format: ConfigFormat,
        secret_name: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self::new(
            format,
            ConfigSource::GcpSecret {
                secret_name: secret_name.into(),
                project_id: project_id.into(),
            },
        )
    }

    /// Describe a Cloud Storage object.
    pub fn gcp_storage(
        format: ConfigFormat,
        bucket: impl Into<String>,
        blob_name: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self::new(
            format,
            ConfigSource::GcpStorage {
                bucket: bucket.into(),
                blob_name: blob_name.into(),
                project_id: project_id.into(),
            },
        )
    }

    pub fn tag(&self) -> DescriptorTag {
        DescriptorTag::of(self.source.kind(), self.format)
    }

    /// Reject blank string fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.source {
            ConfigSource::File { path } => {
                require_non_blank("path", &path.to_string_lossy())?;
            }
            ConfigSource::GcpSecret {
                secret_name,
                project_id,
            } => {
                require_non_blank("secret_name", secret_name)?;
                require_non_blank("project_id", project_id)?;
            }
            ConfigSource::GcpStorage {
                bucket,
                blob_name,
                project_id,
            } => {
                require_non_blank("bucket", bucket)?;
                require_non_blank("blob_name", blob_name)?;
                require_non_blank("project_id", project_id)?;
            }
        }
        Ok(())
    }
}

fn require_non_blank(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidDescriptor {
            field,
            message: "must not be blank".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trips_kind_and_format() {
        for tag in DescriptorTag::ALL {
            assert_eq!(DescriptorTag::of(tag.kind(), tag.format()), tag);
        }
    }

    #[test]
    fn test_descriptor_tag_is_exact() {
        let file = LoaderDescriptor::file(ConfigFormat::Yaml, "config.yaml");
        let secret = LoaderDescriptor::gcp_secret(ConfigFormat::Yaml, "app-config-yaml", "proj");
        let blob =
            LoaderDescriptor::gcp_storage(ConfigFormat::Env, "bucket", ".env.dev", "proj");

        assert_eq!(file.tag(), DescriptorTag::FileYaml);
        assert_eq!(secret.tag(), DescriptorTag::GcpSecretYaml);
        assert_eq!(blob.tag(), DescriptorTag::GcpStorageEnv);
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(DescriptorTag::FileEnv.to_string(), "file-env");
        assert_eq!(DescriptorTag::GcpStorageYaml.to_string(), "gcp-storage-yaml");
    }

    #[test]
    fn test_infer_format_from_names() {
        assert_eq!(ConfigFormat::infer(".env"), Some(ConfigFormat::Env));
        assert_eq!(ConfigFormat::infer(".env.local"), Some(ConfigFormat::Env));
        assert_eq!(ConfigFormat::infer("deploy/prod.env"), Some(ConfigFormat::Env));
        assert_eq!(ConfigFormat::infer("config.dev.json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::infer("config.YAML"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::infer("settings/config.yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::infer("app-config-env-dev"), None);
        assert_eq!(ConfigFormat::infer("config.toml"), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("YAML".parse::<ConfigFormat>().unwrap(), ConfigFormat::Yaml);
        assert_eq!("yml".parse::<ConfigFormat>().unwrap(), ConfigFormat::Yaml);
        assert_eq!(" env ".parse::<ConfigFormat>().unwrap(), ConfigFormat::Env);
        assert!(matches!(
            "toml".parse::<ConfigFormat>(),
            Err(ConfigError::InvalidDescriptor { field: "format", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let blank_path = LoaderDescriptor::file(ConfigFormat::Json, "  ");
        assert!(matches!(
            blank_path.validate(),
            Err(ConfigError::InvalidDescriptor { field: "path", .. })
        ));

        let blank_project = LoaderDescriptor::gcp_secret(ConfigFormat::Json, "secret", "");
        assert!(matches!(
            blank_project.validate(),
            Err(ConfigError::InvalidDescriptor {
                field: "project_id",
                ..
            })
        ));

        let blank_blob = LoaderDescriptor::gcp_storage(ConfigFormat::Json, "bucket", " ", "p");
        assert!(matches!(
            blank_blob.validate(),
            Err(ConfigError::InvalidDescriptor {
                field: "blob_name",
                ..
            })
        ));

        let ok = LoaderDescriptor::gcp_storage(ConfigFormat::Json, "bucket", "config.json", "p");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_descriptor_deserializes_from_json() {
        let descriptor: LoaderDescriptor = serde_json::from_str(
            r#"{"kind": "gcp_storage", "format": "yaml", "bucket": "b", "blob_name": "config.yaml", "project_id": "p"}"#,
        )
        .unwrap();

        assert_eq!(
            descriptor,
            LoaderDescriptor::gcp_storage(ConfigFormat::Yaml, "b", "config.yaml", "p")
        );
    }
}
