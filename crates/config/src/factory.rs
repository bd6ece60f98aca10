//! Static-dispatch loader factory.
//!
//! Responsibilities:
//! - Map every descriptor to its {provider, loader} pair with one exhaustive match.
//! - Supply the wiring reused by the registry's default constructors.
//!
//! Does NOT handle:
//! - Runtime registration of new descriptor kinds (see `registry`).
//! - Caching loaders; every call builds a fresh pair.
//!
//! Invariants:
//! - Descriptors are validated before any provider is constructed.
//! - The match over (source, format) is exhaustive, so there is no unsupported case.

use tracing::info;

use crate::descriptor::{ConfigFormat, ConfigSource, LoaderDescriptor};
use crate::error::ConfigError;
use crate::loader::{ConfigLoader, EnvLoader, JsonLoader, YamlLoader};
use crate::provider::{
    ConfigProvider, FileConfigProvider, GcpConfig, GcpSecretConfigProvider,
    GcpStorageConfigProvider,
};

/// Builds loaders for descriptors using a fixed, compile-time-checked mapping.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoaderFactory {
    gcp: GcpConfig,
}

impl ConfigLoaderFactory {
    pub fn new(gcp: GcpConfig) -> Self {
        Self { gcp }
    }

    /// Factory configured from environment variables (see [`GcpConfig::from_env`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(GcpConfig::from_env()?))
    }

    pub fn gcp(&self) -> &GcpConfig {
        &self.gcp
    }

    /// Build the loader for `descriptor`.
    pub fn get_loader(
        &self,
        descriptor: &LoaderDescriptor,
    ) -> Result<Box<dyn ConfigLoader>, ConfigError> {
        build_default_loader(descriptor, &self.gcp)
    }
}

/// Wire the provider and format loader for a descriptor.
pub fn build_default_loader(
    descriptor: &LoaderDescriptor,
    gcp: &GcpConfig,
) -> Result<Box<dyn ConfigLoader>, ConfigError> {
    descriptor.validate()?;

    let provider: Box<dyn ConfigProvider> = match &descriptor.source {
        ConfigSource::File { path } => Box::new(FileConfigProvider::new(path.clone())),
        ConfigSource::GcpSecret {
            secret_name,
            project_id,
        } => Box::new(GcpSecretConfigProvider::new(
            secret_name.clone(),
            project_id.clone(),
            gcp.clone(),
        )),
        ConfigSource::GcpStorage {
            bucket,
            blob_name,
            project_id,
        } => Box::new(GcpStorageConfigProvider::new(
            bucket.clone(),
            blob_name.clone(),
            project_id.clone(),
            gcp.clone(),
        )),
    };

    let loader: Box<dyn ConfigLoader> = match descriptor.format {
        ConfigFormat::Env => Box::new(EnvLoader::with_default_processor(provider)),
        ConfigFormat::Json => Box::new(JsonLoader::new(provider)),
        ConfigFormat::Yaml => Box::new(YamlLoader::new(provider)),
    };

    info!(
        tag = %descriptor.tag(),
        location = %loader.location(),
        "Created loader"
    );
    Ok(loader)
}
