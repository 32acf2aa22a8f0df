//! JSON:API dispatch: registry, resources, wire format and the dispatcher.
//!
//! This module provides:
//!
//! - [`Registry`]: key to constructor map, first registration wins
//! - [`Resource`]: the capability every fetchable type implements
//! - [`Dispatcher`]: URL routing, credentials, transport and rehydration
//! - [`ResponseEnvelope`]: the uniform result, with page continuations
//! - [`Document`] and the relationship helpers for `rehydrate` implementors
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jsonapi_dispatch::{BrowserContext, Dispatcher, DispatcherConfig, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register_type::<Widget>("widgets");
//!
//! let dispatcher = Dispatcher::new(
//!     Arc::new(registry),
//!     DispatcherConfig::from_env()?,
//!     Arc::new(BrowserContext),
//! )?;
//!
//! let envelope = dispatcher.get("widgets", None).await?;
//! for widget in envelope.data.many::<Widget>() {
//!     println!("{widget:?}");
//! }
//! ```

mod dispatcher;
mod document;
mod errors;
mod path;
mod registry;
mod resource;
mod response;

pub use dispatcher::Dispatcher;
pub use document::{
    application_failure, error_message, find_included, identifier, resolve_relationship,
    Document, Link, Links,
};
pub use errors::{DispatchError, RehydrateError};
pub use path::{append_query, build_path, placeholders};
pub use registry::{Registry, ResourceFactory};
pub use resource::{AsAny, Resource, ResourceParams};
pub use response::{PageFetcher, PrimaryData, ResponseEnvelope};
