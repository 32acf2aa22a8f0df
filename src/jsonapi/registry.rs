//! Key to constructor registry.
//!
//! The registry is built once at startup and then shared read-only with the
//! [`Dispatcher`](crate::Dispatcher) behind an `Arc`. Registration is
//! first-writer-wins: a second registration under the same key is ignored.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::jsonapi::errors::DispatchError;
use crate::jsonapi::resource::Resource;

/// Constructor producing a fresh, empty resource ready for rehydration.
pub type ResourceFactory = Arc<dyn Fn() -> Box<dyn Resource> + Send + Sync>;

/// Maps registry keys to [`ResourceFactory`] constructors.
///
/// # Example
///
/// ```rust,ignore
/// use jsonapi_dispatch::Registry;
///
/// let mut registry = Registry::new();
/// assert!(registry.register_type::<Widget>("widgets"));
/// assert!(!registry.register_type::<OtherWidget>("widgets")); // ignored
///
/// let factory = registry.resolve("widgets")?;
/// let blank = factory();
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<String, ResourceFactory>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `key` unless the key is already taken.
    ///
    /// Returns `true` if the factory was inserted.
    pub fn register(&mut self, key: impl Into<String>, factory: ResourceFactory) -> bool {
        match self.factories.entry(key.into()) {
            Entry::Vacant(entry) => {
                entry.insert(factory);
                true
            }
            Entry::Occupied(entry) => {
                tracing::debug!(
                    "Ignoring duplicate registration for resource key '{}'",
                    entry.key()
                );
                false
            }
        }
    }

    /// Registers a constructor closure under `key`.
    pub fn register_fn<F>(&mut self, key: impl Into<String>, constructor: F) -> bool
    where
        F: Fn() -> Box<dyn Resource> + Send + Sync + 'static,
    {
        self.register(key, Arc::new(constructor))
    }

    /// Registers `T::default` under `key`.
    pub fn register_type<T>(&mut self, key: impl Into<String>) -> bool
    where
        T: Resource + Default,
    {
        self.register_fn(key, || Box::new(T::default()) as Box<dyn Resource>)
    }

    /// Returns the factory registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnregisteredKey`] when nothing is registered.
    pub fn resolve(&self, key: &str) -> Result<ResourceFactory, DispatchError> {
        self.factories
            .get(key)
            .cloned()
            .ok_or_else(|| DispatchError::UnregisteredKey {
                key: key.to_string(),
            })
    }

    /// Returns `true` if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Returns the number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns the registered keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.keys())
            .finish()
    }
}

// Verify Registry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
};
