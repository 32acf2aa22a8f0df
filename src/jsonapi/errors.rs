//! Error types for dispatch and rehydration.
//!
//! # Propagation
//!
//! | Failure                        | Surfaced as                                   |
//! |--------------------------------|-----------------------------------------------|
//! | Unknown registry key           | `Err(DispatchError::UnregisteredKey)`, no I/O |
//! | Body is not a JSON:API document| `Err(DispatchError::MalformedPayload)`        |
//! | Resource rejects its node      | `Err(DispatchError::MalformedPayload)`        |
//! | Non-2xx status                 | `Ok(envelope)` with `ok == false`             |
//! | Timeout / network failure      | `Ok(envelope)` with `ok == false`, status `0` |
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_dispatch::DispatchError;
//!
//! match dispatcher.get("widgets", None).await {
//!     Ok(envelope) if envelope.ok => { /* use envelope.data */ }
//!     Ok(envelope) => println!("{} {}", envelope.response, envelope.error),
//!     Err(DispatchError::UnregisteredKey { key }) => panic!("forgot to register {key}"),
//!     Err(e) => println!("bad payload: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::HttpError;
use crate::error::ConfigError;

/// Error returned by [`Resource::rehydrate`](crate::Resource::rehydrate).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RehydrateError {
    /// A required member is absent from the resource node.
    #[error("missing field '{field}'")]
    MissingField {
        /// Dotted path of the missing member (e.g. `attributes.name`).
        field: String,
    },

    /// A member is present but has the wrong shape.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// Dotted path of the offending member.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The node's `type` does not match the resource.
    #[error("expected resource type '{expected}', found '{found}'")]
    UnexpectedType {
        /// The type the resource handles.
        expected: String,
        /// The type found in the node.
        found: String,
    },
}

impl RehydrateError {
    /// Shorthand for [`RehydrateError::MissingField`].
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for [`RehydrateError::InvalidField`].
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error type for dispatcher operations.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No resource factory is registered under the key.
    ///
    /// Raised before any network I/O.
    #[error("No resource type registered under key '{key}'")]
    UnregisteredKey {
        /// The key that was looked up.
        key: String,
    },

    /// The response body is not a usable JSON:API document.
    #[error("Malformed JSON:API payload for '{key}': {reason}")]
    MalformedPayload {
        /// The registry key of the dispatch.
        key: String,
        /// What was wrong with the payload.
        reason: String,
    },

    /// The request could not be built or the transport could not be created.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DispatchError {
    pub(crate) fn malformed(key: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
