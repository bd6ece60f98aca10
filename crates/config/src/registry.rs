//! Runtime-extensible loader registry.
//!
//! Responsibilities:
//! - Map each `DescriptorTag` to the constructor that builds its loader.
//! - Allow callers to register, replace, and inspect constructors at runtime.
//! - Provide an optional process-wide instance with an explicit lifecycle.
//!
//! Does NOT handle:
//! - Caching loaders; every `get_loader` call invokes the constructor afresh.
//! - Lazily creating the global instance (callers must `init_global` first).
//!
//! Invariants:
//! - At most one constructor per tag; re-registration replaces the old one.
//! - Constructors run outside the registry lock.
//! - A poisoned lock is recovered; the map is never left partially written.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info, warn};

use crate::descriptor::{DescriptorTag, LoaderDescriptor};
use crate::error::ConfigError;
use crate::factory::build_default_loader;
use crate::loader::ConfigLoader;
use crate::provider::GcpConfig;

/// Builds a loader for a descriptor of the tag it was registered under.
pub type LoaderConstructor =
    Arc<dyn Fn(&LoaderDescriptor) -> Result<Box<dyn ConfigLoader>, ConfigError> + Send + Sync>;

/// Table of loader constructors keyed by descriptor tag.
#[derive(Default)]
pub struct LoaderRegistry {
    constructors: RwLock<HashMap<DescriptorTag, LoaderConstructor>>,
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("tags", &self.registered_tags())
            .finish()
    }
}

impl LoaderRegistry {
    /// Empty registry; every lookup fails until constructors are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in constructor for every tag.
    pub fn with_defaults(gcp: GcpConfig) -> Self {
        let registry = Self::new();
        for tag in DescriptorTag::ALL {
            registry.register(tag, default_constructor(tag, gcp.clone()));
        }
        registry
    }

    /// Register `constructor` for `tag`, replacing any existing entry.
    pub fn register(&self, tag: DescriptorTag, constructor: LoaderConstructor) {
        let previous = self
            .constructors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tag, constructor);

        if previous.is_some() {
            warn!(%tag, "Overwriting existing loader constructor");
        }
        info!(%tag, "Registered loader constructor");
    }

    /// Build the loader registered for `descriptor`'s tag.
    pub fn get_loader(
        &self,
        descriptor: &LoaderDescriptor,
    ) -> Result<Box<dyn ConfigLoader>, ConfigError> {
        let tag = descriptor.tag();
        let constructor = self
            .constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tag)
            .cloned();

        let Some(constructor) = constructor else {
            error!(%tag, "Unsupported loader descriptor");
            return Err(ConfigError::UnsupportedDescriptor(tag));
        };

        constructor(descriptor).map_err(|e| {
            error!(%tag, error = %e, "Failed to create loader");
            ConfigError::LoaderConstruction {
                tag,
                source: Box::new(e),
            }
        })
    }

    pub fn is_registered(&self, tag: DescriptorTag) -> bool {
        self.constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&tag)
    }

    /// Registered tags in declaration order.
    pub fn registered_tags(&self) -> Vec<DescriptorTag> {
        let mut tags: Vec<DescriptorTag> = self
            .constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        tags.sort();
        tags
    }
}

/// Built-in constructor for `tag`, rejecting descriptors of any other tag.
pub fn default_constructor(tag: DescriptorTag, gcp: GcpConfig) -> LoaderConstructor {
    Arc::new(move |descriptor: &LoaderDescriptor| {
        let actual = descriptor.tag();
        if actual != tag {
            return Err(ConfigError::DescriptorMismatch {
                expected: tag,
                actual,
            });
        }
        build_default_loader(descriptor, &gcp)
    })
}

static GLOBAL: RwLock<Option<Arc<LoaderRegistry>>> = RwLock::new(None);

/// Install the process-wide registry.
pub fn init_global(registry: LoaderRegistry) -> Result<Arc<LoaderRegistry>, ConfigError> {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(ConfigError::RegistryAlreadyInitialized);
    }
    let registry = Arc::new(registry);
    *slot = Some(Arc::clone(&registry));
    info!("Initialized global loader registry");
    Ok(registry)
}

/// The process-wide registry installed by [`init_global`].
pub fn global() -> Result<Arc<LoaderRegistry>, ConfigError> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(ConfigError::RegistryNotInitialized)
}

/// Remove the process-wide registry, returning it if one was installed.
pub fn shutdown_global() -> Option<Arc<LoaderRegistry>> {
    let previous = GLOBAL.write().unwrap_or_else(PoisonError::into_inner).take();
    if previous.is_some() {
        info!("Shut down global loader registry");
    }
    previous
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serial_test::serial;

    use super::*;
    use crate::descriptor::{ConfigFormat, SourceKind};
    use crate::loader::YamlLoader;
    use crate::loader::test_support::StaticProvider;

    fn yaml_constructor(payload: &'static str, calls: Arc<AtomicUsize>) -> LoaderConstructor {
        Arc::new(
            move |_descriptor: &LoaderDescriptor| -> Result<Box<dyn ConfigLoader>, ConfigError> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(YamlLoader::new(Box::new(StaticProvider::new(Some(payload))))))
            },
        )
    }

    #[test]
    fn test_registered_constructor_handles_matching_descriptor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = LoaderRegistry::new();
        registry.register(
            DescriptorTag::FileYaml,
            yaml_constructor("database:\n  user: airflow\n", Arc::clone(&calls)),
        );

        let descriptor = LoaderDescriptor::file(ConfigFormat::Yaml, "config.yaml");
        let config = registry.get_loader(&descriptor).unwrap().load().unwrap();

        assert_eq!(config["database"]["user"], "airflow");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_lookup_builds_a_fresh_loader() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = LoaderRegistry::new();
        registry.register(DescriptorTag::FileYaml, yaml_constructor("a: 1\n", Arc::clone(&calls)));

        let descriptor = LoaderDescriptor::file(ConfigFormat::Yaml, "config.yaml");
        registry.get_loader(&descriptor).unwrap();
        registry.get_loader(&descriptor).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let registry = LoaderRegistry::new();
        registry.register(
            DescriptorTag::FileYaml,
            yaml_constructor("a: 1\n", Arc::new(AtomicUsize::new(0))),
        );

        let result = registry.get_loader(&LoaderDescriptor::file(ConfigFormat::Json, "config.json"));
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedDescriptor(DescriptorTag::FileJson))
        ));
    }

    #[test]
    fn test_reregistration_replaces_constructor() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let registry = LoaderRegistry::new();
        registry.register(DescriptorTag::FileYaml, yaml_constructor("a: 1\n", Arc::clone(&first)));
        registry.register(DescriptorTag::FileYaml, yaml_constructor("a: 2\n", Arc::clone(&second)));

        let descriptor = LoaderDescriptor::file(ConfigFormat::Yaml, "config.yaml");
        let config = registry.get_loader(&descriptor).unwrap().load().unwrap();

        assert_eq!(config["a"], 2);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(registry.registered_tags(), vec![DescriptorTag::FileYaml]);
    }

    fn descriptor_for(tag: DescriptorTag) -> LoaderDescriptor {
        match tag.kind() {
            SourceKind::File => LoaderDescriptor::file(tag.format(), "config"),
            SourceKind::GcpSecret => LoaderDescriptor::gcp_secret(tag.format(), "secret", "p"),
            SourceKind::GcpStorage => {
                LoaderDescriptor::gcp_storage(tag.format(), "bucket", "config", "p")
            }
        }
    }

    #[test]
    fn test_concurrent_registration_and_lookup() {
        let registry = Arc::new(LoaderRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register(DescriptorTag::FileYaml, yaml_constructor("a: 1\n", Arc::clone(&calls)));

        let writers: Vec<_> = DescriptorTag::ALL
            .into_iter()
            .map(|tag| {
                let registry = Arc::clone(&registry);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    registry.register(tag, yaml_constructor("a: 1\n", calls));
                    registry.get_loader(&descriptor_for(tag)).map(|_| ())
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let descriptor = descriptor_for(DescriptorTag::FileYaml);
                    (0..100)
                        .map(|_| registry.get_loader(&descriptor).map(|_| ()))
                        .collect::<Result<Vec<_>, _>>()
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap().unwrap();
        }
        for reader in readers {
            reader.join().unwrap().unwrap();
        }

        assert_eq!(registry.registered_tags(), DescriptorTag::ALL.to_vec());
        assert_eq!(calls.load(Ordering::SeqCst), 9 + 4 * 100);
    }

    #[test]
    fn test_constructor_errors_are_wrapped() {
        let registry = LoaderRegistry::new();
        registry.register(
            DescriptorTag::GcpSecretEnv,
            Arc::new(
                |_descriptor: &LoaderDescriptor| -> Result<Box<dyn ConfigLoader>, ConfigError> {
                    Err(ConfigError::Validation("boom".to_string()))
                },
            ),
        );

        let err = registry
            .get_loader(&LoaderDescriptor::gcp_secret(ConfigFormat::Env, "s", "p"))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::LoaderConstruction {
                tag: DescriptorTag::GcpSecretEnv,
                ..
            }
        ));
        assert!(matches!(err.root_cause(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_defaults_cover_every_tag_deterministically() {
        let registry = LoaderRegistry::with_defaults(GcpConfig::default());
        assert_eq!(registry.registered_tags(), DescriptorTag::ALL.to_vec());

        let descriptor =
            LoaderDescriptor::gcp_storage(ConfigFormat::Yaml, "app-config-boilerplate", "config.dev.yaml", "p");
        let first = registry.get_loader(&descriptor).unwrap();
        let second = registry.get_loader(&descriptor).unwrap();

        assert_eq!(first.format(), ConfigFormat::Yaml);
        assert_eq!(first.location(), second.location());
        assert_eq!(first.location(), "gs://app-config-boilerplate/config.dev.yaml");
    }

    #[test]
    fn test_default_constructor_rejects_mismatched_descriptor() {
        let registry = LoaderRegistry::new();
        registry.register(
            DescriptorTag::FileJson,
            default_constructor(DescriptorTag::FileEnv, GcpConfig::default()),
        );

        let err = registry
            .get_loader(&LoaderDescriptor::file(ConfigFormat::Json, "config.json"))
            .unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ConfigError::DescriptorMismatch {
                expected: DescriptorTag::FileEnv,
                actual: DescriptorTag::FileJson,
            }
        ));
    }

    #[test]
    #[serial]
    fn test_global_lifecycle() {
        shutdown_global();
        assert!(matches!(global(), Err(ConfigError::RegistryNotInitialized)));

        let installed = init_global(LoaderRegistry::new()).unwrap();
        installed.register(
            DescriptorTag::FileYaml,
            yaml_constructor("a: 1\n", Arc::new(AtomicUsize::new(0))),
        );
        assert!(global().unwrap().is_registered(DescriptorTag::FileYaml));

        assert!(matches!(
            init_global(LoaderRegistry::new()),
            Err(ConfigError::RegistryAlreadyInitialized)
        ));

        assert!(shutdown_global().is_some());
        assert!(shutdown_global().is_none());
        assert!(global().is_err());
    }
}
