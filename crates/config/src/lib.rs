//! Configuration loading for applications that keep settings in local files,
//! Secret Manager secrets, or Cloud Storage blobs.
//!
//! A [`LoaderDescriptor`] names a source and a payload format. The
//! [`ConfigLoaderFactory`] or a [`LoaderRegistry`] turns it into a
//! [`ConfigLoader`], whose `load()` fetches the payload and returns a nested
//! [`ConfigMap`] ready to deserialize into a typed [`Settings`] value.

mod constants;
mod descriptor;
mod env;
mod error;
mod factory;
pub mod loader;
pub mod normalizer;
pub mod provider;
pub mod registry;
mod settings;

pub use constants::{
    ENV_ACCESS_TOKEN, ENV_DOTENV_DISABLED, ENV_SECRET_MANAGER_URL, ENV_STORAGE_URL,
    ENV_TIMEOUT_SECS, NESTING_DELIMITER,
};
pub use descriptor::{ConfigFormat, ConfigSource, DescriptorTag, LoaderDescriptor, SourceKind};
pub use env::{env_var_or_none, load_dotenv};
pub use error::ConfigError;
pub use factory::{ConfigLoaderFactory, build_default_loader};
pub use loader::{ConfigLoader, ConfigMap, EnvLoader, JsonLoader, YamlLoader};
pub use normalizer::{DefaultEnvProcessor, EnvProcessor, coerce_json_fields, flatten, nest};
pub use provider::{
    ConfigProvider, FileConfigProvider, GcpConfig, GcpSecretConfigProvider,
    GcpStorageConfigProvider,
};
pub use registry::{LoaderConstructor, LoaderRegistry};
pub use settings::{CachedSettings, Settings, load_settings};
