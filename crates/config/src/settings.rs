//! Typed settings on top of loaders.
//!
//! Responsibilities:
//! - Deserialize a loader's nested mapping into any `DeserializeOwned` type.
//! - Load settings once and share them (`CachedSettings`).
//!
//! Does NOT handle:
//! - Schema defaults or field validation beyond what serde derives express.
//!
//! Invariants:
//! - `CachedSettings` invokes its loader at most once per successful load.
//! - A failed load leaves the cache empty so the next `get` retries.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::descriptor::LoaderDescriptor;
use crate::error::ConfigError;
use crate::loader::ConfigLoader;
use crate::registry::LoaderRegistry;

/// A settings type that can be populated from any loader.
pub trait Settings: DeserializeOwned {
    /// Load and deserialize the loader's mapping.
    fn load(loader: &dyn ConfigLoader) -> Result<Self, ConfigError> {
        let mapping = loader.load()?;
        serde_json::from_value(Value::Object(mapping)).map_err(|e| {
            error!(location = %loader.location(), error = %e, "Settings validation failed");
            ConfigError::Validation(e.to_string())
        })
    }
}

impl<T: DeserializeOwned> Settings for T {}

/// Resolve `descriptor` through `registry` and load `S` from it.
pub fn load_settings<S: Settings>(
    registry: &LoaderRegistry,
    descriptor: &LoaderDescriptor,
) -> Result<S, ConfigError> {
    let loader = registry.get_loader(descriptor)?;
    S::load(loader.as_ref())
}

/// Settings loaded on first access and shared afterwards.
pub struct CachedSettings<S> {
    loader: Box<dyn ConfigLoader>,
    slot: Mutex<Option<Arc<S>>>,
}

impl<S> fmt::Debug for CachedSettings<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSettings")
            .field("loader", &self.loader)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl<S: Settings> CachedSettings<S> {
    pub fn new(loader: Box<dyn ConfigLoader>) -> Self {
        Self {
            loader,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached settings, loading them on the first call.
    pub fn get(&self) -> Result<Arc<S>, ConfigError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(settings) = slot.as_ref() {
            return Ok(Arc::clone(settings));
        }

        debug!(location = %self.loader.location(), "Loading settings");
        let settings = Arc::new(S::load(self.loader.as_ref())?);
        *slot = Some(Arc::clone(&settings));
        Ok(settings)
    }
}

impl<S> CachedSettings<S> {
    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
