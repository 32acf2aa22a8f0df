//! # jsonapi-dispatch
//!
//! A typed request dispatcher for JSON:API backends, shared by server-side
//! rendering and browser code paths.
//!
//! ## Overview
//!
//! This crate provides:
//! - A [`Registry`] mapping string keys to resource constructors
//! - The [`Resource`] trait: build a URL, rehydrate from a JSON:API node
//! - A [`Dispatcher`] with `get`, `post`, `put`, `patch` and `delete` verbs
//! - Context-aware routing: direct on the server, through a `?uri=` proxy in
//!   the browser
//! - Bearer credentials from the `next-auth` session cookie, server-side only
//! - A uniform [`ResponseEnvelope`] with `next_page`/`prev_page` continuations
//! - Type-safe configuration via [`DispatcherConfig`] and
//!   [`DispatcherConfigBuilder`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use jsonapi_dispatch::{ApiUrl, DispatcherConfig};
//!
//! let config = DispatcherConfig::builder()
//!     .public_api_url(ApiUrl::new("https://api.example.com/v1").unwrap())
//!     .internal_api_url(ApiUrl::new("https://app.example.com/api/proxy").unwrap())
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.public_api_url().join("/widgets/1"), "https://api.example.com/v1/widgets/1");
//! ```
//!
//! ## Dispatching
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jsonapi_dispatch::{Dispatcher, DispatcherConfig, Registry, ResourceParams, ServerContext};
//!
//! let mut registry = Registry::new();
//! registry.register_type::<Widget>("widgets");
//!
//! // One context per incoming request, built from its Cookie header
//! let context = ServerContext::from_cookie_header(cookie_header);
//! let dispatcher = Dispatcher::new(
//!     Arc::new(registry),
//!     DispatcherConfig::from_env()?,
//!     Arc::new(context),
//! )?;
//!
//! let envelope = dispatcher.get("widgets", None).await?;
//! if envelope.ok {
//!     for widget in envelope.data.many::<Widget>() {
//!         println!("{}", widget.name);
//!     }
//! } else {
//!     eprintln!("{} {}", envelope.response, envelope.error);
//! }
//!
//! if let Some(next) = envelope.fetch_next_page().await {
//!     let page_two = next?;
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the registry and configuration are injected
//! - **Fail-fast validation**: URLs validate on construction
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **HTTP failures are data**: non-2xx and transport failures land in the
//!   envelope, only programming and payload errors are `Err`

pub mod clients;
pub mod config;
pub mod context;
pub mod error;
pub mod jsonapi;

// Re-export public types at crate root for convenience
pub use config::{ApiUrl, DispatcherConfig, DispatcherConfigBuilder, SessionToken};
pub use context::{BrowserContext, ExecutionContext, ServerContext};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    InvalidHttpRequestError, Transport,
};

// Re-export dispatch types
pub use jsonapi::{
    DispatchError, Dispatcher, PageFetcher, PrimaryData, Registry, RehydrateError, Resource,
    ResourceFactory, ResourceParams, ResponseEnvelope,
};
