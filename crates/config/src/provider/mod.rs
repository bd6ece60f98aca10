//! Config providers: fetch raw configuration text from a named source.
//!
//! Responsibilities:
//! - Define the `ConfigProvider` contract consumed by format loaders.
//! - Implement providers for local files, Secret Manager secrets, and Cloud Storage blobs.
//!
//! Does NOT handle:
//! - Parsing payloads (see `loader`).
//! - Acquiring cloud credentials; an access token is supplied through `GcpConfig`.
//! - Retrying failed requests.
//!
//! Invariants:
//! - A source that does not exist yields `Ok(None)`, never an error.
//! - Other failures yield `ConfigError::SourceUnavailable` naming the location.
//! - Every call performs a fresh, blocking fetch on the calling thread.

use std::fmt;

use crate::error::ConfigError;

mod file;
mod gcp;
mod gcp_secret;
mod gcp_storage;

pub use file::FileConfigProvider;
pub use gcp::GcpConfig;
pub use gcp_secret::GcpSecretConfigProvider;
pub use gcp_storage::GcpStorageConfigProvider;

/// Retrieves a raw configuration payload.
pub trait ConfigProvider: Send + Sync + fmt::Debug {
    /// Fetch the payload; `Ok(None)` when the source does not exist.
    fn get_config(&self) -> Result<Option<String>, ConfigError>;

    /// Human-readable location of the source (path, secret resource, `gs://` URI).
    fn location(&self) -> String;
}
