//! Backend registry for managing available backends.
//!
//! The [`BackendRegistry`] provides a central point for discovering and
//! creating backend instances by name.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

/// Factory function type for registered backends.
type Factory = Box<dyn Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync>;

/// Central registry for backends.
pub struct BackendRegistry {
    factories: FxHashMap<String, Factory>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Register a backend type under `name`.
    pub fn register<B>(&mut self, name: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        let name = name.into();
        debug!("Registering backend: {}", name);
        self.factories.insert(
            name,
            Box::new(|config| {
                let backend = B::from_config(config)?;
                Ok(Box::new(backend))
            }),
        );
    }

    /// Register a backend factory with a custom constructor.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering factory backend: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Create a backend by name.
    pub fn create(&self, name: &str, config: BackendConfig) -> HalResult<Box<dyn Backend>> {
        match self.factories.get(name) {
            Some(factory) => factory(config),
            None => Err(HalError::BackendUnavailable(format!(
                "No backend registered with name '{name}'"
            ))),
        }
    }

    /// List all available backend names, sorted.
    pub fn available_backends(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a backend is available by name.
    pub fn has_backend(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
