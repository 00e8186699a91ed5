//! Named level-converter factories.
//!
//! # Responsibilities
//! - Map a configured converter name to a constructor
//! - Surface unknown names and failing constructors as errors
//!
//! # Design Decisions
//! - A failed lookup never falls back to the default converter: every level
//!   decision in the process would silently change
//! - The global registry starts with [`DEFAULT_CONVERTER`]; private registries
//!   are independent and start with the same entry

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use super::level::{DefaultLevelConverter, LevelConverter};

/// Name under which the standard mapping is registered.
pub const DEFAULT_CONVERTER: &str = "default";

pub type BoxError = Box<dyn Error + Send + Sync>;

/// Constructor for a level converter.
pub type ConverterFactory = Arc<dyn Fn() -> Result<Arc<dyn LevelConverter>, BoxError> + Send + Sync>;

/// Errors resolving a converter by name. Always fatal to the caller's setup.
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("no level converter registered under {0:?}")]
    NotRegistered(String),

    #[error("failed to create custom level converter {name:?}: {source}")]
    Instantiation {
        name: String,
        #[source]
        source: BoxError,
    },
}

/// Registry of converter factories keyed by name.
#[derive(Clone)]
pub struct ConverterRegistry {
    factories: Arc<DashMap<String, ConverterFactory>>,
}

impl ConverterRegistry {
    /// A registry holding only [`DEFAULT_CONVERTER`].
    pub fn new() -> Self {
        let registry = Self {
            factories: Arc::new(DashMap::new()),
        };
        registry.register_instance(DEFAULT_CONVERTER, Arc::new(DefaultLevelConverter));
        registry
    }

    /// The process-wide registry consulted by configuration.
    pub fn global() -> &'static ConverterRegistry {
        static GLOBAL: OnceLock<ConverterRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ConverterRegistry::new)
    }

    /// Register (or replace) a named constructor.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn LevelConverter>, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(converter = %name, "Level converter registered");
        self.factories.insert(name, Arc::new(factory));
    }

    /// Register an already-built converter under a name.
    pub fn register_instance(&self, name: impl Into<String>, converter: Arc<dyn LevelConverter>) {
        self.register(name, move || Ok(converter.clone()));
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Build the converter registered under `name`.
    pub fn create(&self, name: &str) -> Result<Arc<dyn LevelConverter>, ConverterError> {
        let factory = self
            .factories
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ConverterError::NotRegistered(name.to_string()))?;

        factory().map_err(|source| {
            tracing::error!(converter = %name, error = %source, "Level converter construction failed");
            ConverterError::Instantiation {
                name: name.to_string(),
                source,
            }
        })
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("names", &self.names())
            .finish()
    }
}
