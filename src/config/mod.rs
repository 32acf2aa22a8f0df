//! Configuration types for the dispatcher.
//!
//! # Overview
//!
//! - [`DispatcherConfig`]: the settings shared by every dispatch
//! - [`DispatcherConfigBuilder`]: builder for [`DispatcherConfig`]
//! - [`ApiUrl`]: a validated absolute API URL
//! - [`SessionToken`]: a credential with masked debug output
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use jsonapi_dispatch::{ApiUrl, DispatcherConfig};
//!
//! let config = DispatcherConfig::builder()
//!     .public_api_url(ApiUrl::new("https://api.example.com").unwrap())
//!     .internal_api_url(ApiUrl::new("https://app.example.com/api/internal").unwrap())
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.timeout(), Duration::from_secs(10));
//! ```

mod newtypes;

pub use newtypes::{is_absolute_url, ApiUrl, SessionToken};

use std::time::Duration;

use crate::error::ConfigError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the public API base URL.
pub const PUBLIC_API_URL_VAR: &str = "NEXT_PUBLIC_API_URL";

/// Environment variable holding the internal proxy endpoint.
pub const INTERNAL_API_URL_VAR: &str = "NEXT_PUBLIC_INTERNAL_API_URL";

/// Environment variable holding the request timeout in milliseconds.
pub const TIMEOUT_MS_VAR: &str = "API_TIMEOUT_MS";

/// Settings shared by every dispatch.
///
/// # Thread Safety
///
/// `DispatcherConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    public_api_url: ApiUrl,
    internal_api_url: ApiUrl,
    timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl DispatcherConfig {
    /// Creates a new builder for constructing a `DispatcherConfig`.
    #[must_use]
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::new()
    }

    /// Reads the configuration from the process environment.
    ///
    /// See [`from_lookup`](Self::from_lookup) for the variables consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Reads [`PUBLIC_API_URL_VAR`], [`INTERNAL_API_URL_VAR`] and, optionally,
    /// [`TIMEOUT_MS_VAR`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] when a URL variable is
    /// absent, [`ConfigError::InvalidApiUrl`] when it is not absolute, and
    /// [`ConfigError::InvalidTimeout`] when the timeout is not a positive
    /// integer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use jsonapi_dispatch::DispatcherConfig;
    ///
    /// let config = DispatcherConfig::from_lookup(|name| match name {
    ///     "NEXT_PUBLIC_API_URL" => Some("https://api.example.com".to_string()),
    ///     "NEXT_PUBLIC_INTERNAL_API_URL" => Some("https://app.example.com/api/internal".to_string()),
    ///     "API_TIMEOUT_MS" => Some("2500".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.timeout(), Duration::from_millis(2500));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let public_api_url = lookup(PUBLIC_API_URL_VAR).ok_or(ConfigError::MissingRequiredField {
            field: "public_api_url",
        })?;
        let internal_api_url =
            lookup(INTERNAL_API_URL_VAR).ok_or(ConfigError::MissingRequiredField {
                field: "internal_api_url",
            })?;

        let mut builder = Self::builder()
            .public_api_url(ApiUrl::new(public_api_url)?)
            .internal_api_url(ApiUrl::new(internal_api_url)?);

        if let Some(raw) = lookup(TIMEOUT_MS_VAR) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })?;
            builder = builder.timeout(Duration::from_millis(millis));
        }

        builder.build()
    }

    /// Returns the public API base URL used for direct server-side calls.
    #[must_use]
    pub const fn public_api_url(&self) -> &ApiUrl {
        &self.public_api_url
    }

    /// Returns the proxy endpoint browser traffic is tunneled through.
    #[must_use]
    pub const fn internal_api_url(&self) -> &ApiUrl {
        &self.internal_api_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify DispatcherConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DispatcherConfig>();
};

/// Builder for constructing [`DispatcherConfig`] instances.
///
/// `public_api_url` and `internal_api_url` are required.
///
/// # Defaults
///
/// - `timeout`: [`DEFAULT_TIMEOUT`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct DispatcherConfigBuilder {
    public_api_url: Option<ApiUrl>,
    internal_api_url: Option<ApiUrl>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl DispatcherConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the public API base URL (required).
    ///
    /// The URL must not carry a query string or fragment.
    #[must_use]
    pub fn public_api_url(mut self, url: ApiUrl) -> Self {
        self.public_api_url = Some(url);
        self
    }

    /// Sets the internal proxy endpoint (required).
    #[must_use]
    pub fn internal_api_url(mut self, url: ApiUrl) -> Self {
        self.internal_api_url = Some(url);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for outgoing requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`DispatcherConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if either URL is unset,
    /// [`ConfigError::InvalidApiUrl`] if the public API URL carries a query
    /// string or fragment, or [`ConfigError::InvalidTimeout`] for a zero
    /// timeout.
    pub fn build(self) -> Result<DispatcherConfig, ConfigError> {
        let public_api_url = self
            .public_api_url
            .ok_or(ConfigError::MissingRequiredField {
                field: "public_api_url",
            })?;
        let internal_api_url = self
            .internal_api_url
            .ok_or(ConfigError::MissingRequiredField {
                field: "internal_api_url",
            })?;

        // The public URL is the join base for relative paths.
        if public_api_url.has_query() {
            return Err(ConfigError::InvalidApiUrl {
                url: public_api_url.to_string(),
            });
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                value: "0".to_string(),
            });
        }

        Ok(DispatcherConfig {
            public_api_url,
            internal_api_url,
            timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
