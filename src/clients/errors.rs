//! HTTP-level error types.
//!
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//! - [`HttpError`]: unified error for everything that can go wrong between
//!   building a request and receiving a status line
//!
//! Non-2xx responses are not errors at this layer. The dispatcher reports
//! them through [`ResponseEnvelope::ok`](crate::ResponseEnvelope).

use std::time::Duration;

use thiserror::Error;

/// Error returned when an HTTP request fails validation.
///
/// # Example
///
/// ```rust
/// use jsonapi_dispatch::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::UnexpectedBody {
///     method: "get".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot send a body with get.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A GET or DELETE request was given a body.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that does not take a body.
        method: String,
    },

    /// The request URL is not absolute.
    #[error("Request URL '{url}' is not absolute.")]
    RelativeUrl {
        /// The rejected URL.
        url: String,
    },
}

/// Unified error type for transport-level failures.
///
/// # Example
///
/// ```rust,ignore
/// match transport.send(request).await {
///     Ok(response) => { /* inspect status */ }
///     Err(HttpError::Timeout { after }) => { /* gave up */ }
///     Err(HttpError::Network(e)) => { /* DNS, reset, TLS */ }
///     Err(e) => { /* invalid request or custom transport failure */ }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {}ms", after.as_millis())]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure reported by a non-reqwest transport.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },
}

impl HttpError {
    /// Returns `true` if this error is a timeout, including reqwest's own.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Network(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_includes_duration() {
        let error = HttpError::Timeout {
            after: Duration::from_millis(1500),
        };
        assert_eq!(error.to_string(), "Request timed out after 1500ms");
        assert!(error.is_timeout());
    }

    #[test]
    fn test_invalid_request_is_transparent() {
        let error: HttpError = InvalidHttpRequestError::RelativeUrl {
            url: "/widgets".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Request URL '/widgets' is not absolute.");
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_transport_error_message() {
        let error = HttpError::Transport {
            message: "connection reset".to_string(),
        };
        assert!(error.to_string().contains("connection reset"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let invalid: &dyn std::error::Error = &InvalidHttpRequestError::UnexpectedBody {
            method: "delete".to_string(),
        };
        let _ = invalid;

        let http: &dyn std::error::Error = &HttpError::Timeout {
            after: Duration::from_secs(1),
        };
        let _ = http;
    }
}
