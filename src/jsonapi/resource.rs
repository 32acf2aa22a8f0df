//! The [`Resource`] capability and its parameter bag.
//!
//! A Resource Type knows two things: which URL it lives at, and how to
//! populate itself from one raw JSON:API resource node plus the side-loaded
//! `included` pool. Everything else (transport, routing, credentials,
//! pagination) belongs to the [`Dispatcher`](crate::Dispatcher).
//!
//! # Implementing a Resource
//!
//! ```rust
//! use jsonapi_dispatch::{RehydrateError, Resource, ResourceParams};
//! use serde_json::Value;
//!
//! #[derive(Debug, Default)]
//! struct Widget {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Resource for Widget {
//!     fn build_url(&self, params: &ResourceParams) -> String {
//!         if params.get("id").is_some() {
//!             params.expand("/widgets/{id}")
//!         } else {
//!             params.expand("/widgets")
//!         }
//!     }
//!
//!     fn rehydrate(&mut self, node: &Value, _included: &[Value]) -> Result<(), RehydrateError> {
//!         self.id = node["id"].as_str().ok_or_else(|| RehydrateError::missing("id"))?.to_string();
//!         self.name = node["attributes"]["name"].as_str().unwrap_or_default().to_string();
//!         Ok(())
//!     }
//! }
//!
//! let params = ResourceParams::new().with_option("id", "7").with_option("include", "parts");
//! assert_eq!(Widget::default().build_url(&params), "/widgets/7?include=parts");
//! ```

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_json::Value;

use crate::jsonapi::errors::RehydrateError;
use crate::jsonapi::path::{append_query, build_path, placeholders};

/// Upcast helper so boxed resources can be downcast to their concrete type.
///
/// Implemented automatically for every `Send + Sync + 'static` type.
pub trait AsAny: Any + Send + Sync + 'static {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A typed object the dispatcher can fetch and rehydrate.
pub trait Resource: AsAny + fmt::Debug + 'static {
    /// Returns the request path (or absolute URL) for `params`.
    ///
    /// Relative paths are resolved against the configured API base URL.
    fn build_url(&self, params: &ResourceParams) -> String;

    /// Populates `self` from one JSON:API resource node.
    ///
    /// `included` is the full side-loaded pool of the response, for
    /// resolving relationships.
    ///
    /// # Errors
    ///
    /// Returns [`RehydrateError`] when the node does not have the expected
    /// shape. The dispatcher reports it as a malformed payload.
    fn rehydrate(&mut self, node: &Value, included: &[Value]) -> Result<(), RehydrateError>;
}

impl dyn Resource {
    /// Returns the concrete resource if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Resource>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    /// Returns `true` if the concrete resource is a `T`.
    #[must_use]
    pub fn is<T: Resource>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }
}

/// Parameters for one dispatch.
///
/// `link` overrides the resource's URL builder entirely. `options` are
/// opaque to the dispatcher and only interpreted by
/// [`Resource::build_url`]. Options are kept sorted so expanded query
/// strings are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceParams {
    link: Option<String>,
    options: BTreeMap<String, String>,
}

impl ResourceParams {
    /// Creates an empty parameter bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates parameters that dispatch straight to `link`.
    #[must_use]
    pub fn from_link(link: impl Into<String>) -> Self {
        Self::new().with_link(link)
    }

    /// Sets the explicit link, relative or absolute.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Adds an option for the resource's URL builder.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Returns the explicit link, if set.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Returns one option value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Returns all options.
    #[must_use]
    pub const fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Expands `template`: options named by `{placeholders}` are interpolated,
    /// the remaining options are appended as a query string.
    #[must_use]
    pub fn expand(&self, template: &str) -> String {
        let names = placeholders(template);

        let ids: HashMap<&str, &str> = self
            .options
            .iter()
            .filter(|(key, _)| names.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let path = build_path(template, &ids);

        let query = self
            .options
            .iter()
            .filter(|(key, _)| !names.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value.as_str()));

        append_query(&path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Gadget;

    impl Resource for Gadget {
        fn build_url(&self, params: &ResourceParams) -> String {
            params.expand("/gadgets/{id}")
        }

        fn rehydrate(&mut self, _node: &Value, _included: &[Value]) -> Result<(), RehydrateError> {
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Gizmo;

    impl Resource for Gizmo {
        fn build_url(&self, _params: &ResourceParams) -> String {
            "/gizmos".to_string()
        }

        fn rehydrate(&mut self, _node: &Value, _included: &[Value]) -> Result<(), RehydrateError> {
            Ok(())
        }
    }

    #[test]
    fn test_downcast_ref_matches_concrete_type() {
        let boxed: Box<dyn Resource> = Box::new(Gadget);
        let resource = &*boxed;

        assert!(resource.is::<Gadget>());
        assert!(resource.downcast_ref::<Gadget>().is_some());
        assert!(resource.downcast_ref::<Gizmo>().is_none());
    }

    #[test]
    fn test_params_builder_and_getters() {
        let params = ResourceParams::from_link("/widgets?page=2").with_option("id", "1");

        assert_eq!(params.link(), Some("/widgets?page=2"));
        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.options().len(), 1);
    }

    #[test]
    fn test_expand_interpolates_and_appends_sorted_query() {
        let params = ResourceParams::new()
            .with_option("sort", "-created")
            .with_option("id", "5")
            .with_option("include", "owner");

        assert_eq!(
            Gadget.build_url(&params),
            "/gadgets/5?include=owner&sort=-created"
        );
    }

    #[test]
    fn test_expand_without_options() {
        assert_eq!(ResourceParams::new().expand("/gizmos"), "/gizmos");
    }
}
