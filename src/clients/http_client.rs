//! Transport seam and the default reqwest-backed HTTP client.
//!
//! The dispatcher talks to the network only through the [`Transport`] trait.
//! [`HttpClient`] is the production implementation; tests substitute spies.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::DispatcherConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sends one [`HttpRequest`] and returns the raw [`HttpResponse`].
///
/// Implementations must not retry and must not interpret the status code:
/// any response that arrives is `Ok`, only transport failures are `Err`.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use jsonapi_dispatch::clients::{HttpError, HttpRequest, HttpResponse, Transport};
///
/// #[derive(Debug)]
/// struct AlwaysNoContent;
///
/// #[async_trait]
/// impl Transport for AlwaysNoContent {
///     async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(204, "No Content", Default::default(), String::new()))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends the request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when no response could be obtained.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// HTTP client backed by `reqwest` with rustls.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`; the inner connection pool is shared by clones
/// of the underlying `reqwest::Client`.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Headers added to every request before the request's own headers.
    default_headers: HashMap<String, String>,
    /// Timeout applied by reqwest, reported back in [`HttpError::Timeout`].
    timeout: Duration,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the dispatcher configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the reqwest client cannot be built
    /// (e.g. TLS initialization failure).
    pub fn new(config: &DispatcherConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}jsonapi-dispatch v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            default_headers,
            timeout: config.timeout(),
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Parses response headers into a `HashMap` keyed by lowercase name.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    fn map_send_error(&self, error: reqwest::Error) -> HttpError {
        if error.is_timeout() {
            HttpError::Timeout {
                after: self.timeout,
            }
        } else {
            HttpError::Network(error)
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let method = match request.http_method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut headers = self.default_headers.clone();
        headers.extend(request.headers.clone());

        let mut req_builder = self.client.request(method, &request.url);
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(body) = request.body_text() {
            req_builder = req_builder.body(body);
        }

        let res = req_builder
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = res.status();
        let code = status.as_u16();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let res_headers = Self::parse_response_headers(res.headers());
        let body = res.text().await.map_err(|e| self.map_send_error(e))?;

        Ok(HttpResponse::new(code, status_text, res_headers, body))
    }
}
