//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that
//! invalid settings are rejected when the dispatcher is built, not on the
//! first request.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_dispatch::{ApiUrl, ConfigError};
//!
//! let result = ApiUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidApiUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while building a [`DispatcherConfig`](crate::DispatcherConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An API URL is not an absolute `http`/`https` URL, or the public base
    /// URL carries a query string or fragment.
    #[error("Invalid API URL '{url}'. Expected an absolute URL such as 'https://api.example.com'.")]
    InvalidApiUrl {
        /// The rejected URL.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The request timeout could not be used.
    #[error("Invalid request timeout '{value}'. Expected a positive number of milliseconds.")]
    InvalidTimeout {
        /// The rejected value as it was supplied.
        value: String,
    },
}
