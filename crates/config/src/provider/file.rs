//! Local file provider.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::ConfigProvider;
use crate::error::ConfigError;

/// Reads a configuration file from the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn get_config(&self) -> Result<Option<String>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                info!(path = %self.path.display(), "Read configuration file");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!(path = %self.path.display(), "Configuration file not found");
                Ok(None)
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read configuration file");
                Err(ConfigError::SourceUnavailable {
                    location: self.location(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
