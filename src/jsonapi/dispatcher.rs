//! The request dispatcher.
//!
//! A [`Dispatcher`] turns `(key, params)` into one HTTP call and one
//! [`ResponseEnvelope`]:
//!
//! 1. resolve the [`ResourceFactory`] registered under `key`;
//! 2. take `params.link`, or ask a blank resource for its URL;
//! 3. route the URL for the [`ExecutionContext`] (direct on the server,
//!    through the proxy in the browser) and attach the session credential
//!    when running server-side;
//! 4. send under the configured timeout;
//! 5. interpret the status and rehydrate the primary data.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jsonapi_dispatch::{Dispatcher, DispatcherConfig, Registry, ResourceParams, ServerContext};
//!
//! let mut registry = Registry::new();
//! registry.register_type::<Widget>("widgets");
//!
//! let dispatcher = Dispatcher::new(
//!     Arc::new(registry),
//!     DispatcherConfig::from_env()?,
//!     Arc::new(ServerContext::from_cookie_header(cookie_header)),
//! )?;
//!
//! let envelope = dispatcher
//!     .get("widgets", Some(ResourceParams::new().with_option("id", "1")))
//!     .await?;
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::config::{is_absolute_url, DispatcherConfig};
use crate::context::ExecutionContext;
use crate::jsonapi::document::{application_failure, error_message, Document, Link};
use crate::jsonapi::errors::DispatchError;
use crate::jsonapi::registry::{Registry, ResourceFactory};
use crate::jsonapi::resource::{Resource, ResourceParams};
use crate::jsonapi::response::{PageFetcher, PrimaryData, ResponseEnvelope};

struct Inner {
    registry: Arc<Registry>,
    config: DispatcherConfig,
    context: Arc<dyn ExecutionContext>,
    transport: Arc<dyn Transport>,
}

/// Dispatches resource requests and rehydrates the responses.
///
/// Cheap to clone; clones share the registry, configuration, context and
/// transport.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

// Verify Dispatcher is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Dispatcher>();
};

impl Dispatcher {
    /// Creates a dispatcher backed by the reqwest [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Http`] if the HTTP client cannot be built.
    pub fn new(
        registry: Arc<Registry>,
        config: DispatcherConfig,
        context: Arc<dyn ExecutionContext>,
    ) -> Result<Self, DispatchError> {
        let transport = HttpClient::new(&config)?;
        Ok(Self::with_transport(
            registry,
            config,
            context,
            Arc::new(transport),
        ))
    }

    /// Creates a dispatcher that sends through `transport`.
    #[must_use]
    pub fn with_transport(
        registry: Arc<Registry>,
        config: DispatcherConfig,
        context: Arc<dyn ExecutionContext>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                config,
                context,
                transport,
            }),
        }
    }

    /// Returns a dispatcher for another execution context (for example the
    /// next incoming request's cookies), sharing registry and transport.
    #[must_use]
    pub fn with_context(&self, context: Arc<dyn ExecutionContext>) -> Self {
        Self::with_transport(
            Arc::clone(&self.inner.registry),
            self.inner.config.clone(),
            context,
            Arc::clone(&self.inner.transport),
        )
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.inner.config
    }

    /// Returns the execution context.
    #[must_use]
    pub fn context(&self) -> &dyn ExecutionContext {
        self.inner.context.as_ref()
    }

    /// Sends a GET request for `key`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub async fn get(
        &self,
        key: &str,
        params: Option<ResourceParams>,
    ) -> Result<ResponseEnvelope, DispatchError> {
        self.dispatch(HttpMethod::Get, key, params, None).await
    }

    /// Sends a POST request for `key`. The body defaults to `{}`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub async fn post(
        &self,
        key: &str,
        params: Option<ResourceParams>,
        body: Option<Value>,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let body = body.unwrap_or_else(|| json!({}));
        self.dispatch(HttpMethod::Post, key, params, Some(body)).await
    }

    /// Sends a PUT request for `key`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub async fn put(
        &self,
        key: &str,
        params: Option<ResourceParams>,
        body: Option<Value>,
    ) -> Result<ResponseEnvelope, DispatchError> {
        self.dispatch(HttpMethod::Put, key, params, body).await
    }

    /// Sends a PATCH request for `key`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub async fn patch(
        &self,
        key: &str,
        params: Option<ResourceParams>,
        body: Option<Value>,
    ) -> Result<ResponseEnvelope, DispatchError> {
        self.dispatch(HttpMethod::Patch, key, params, body).await
    }

    /// Sends a DELETE request for `key`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub async fn delete(
        &self,
        key: &str,
        params: Option<ResourceParams>,
    ) -> Result<ResponseEnvelope, DispatchError> {
        self.dispatch(HttpMethod::Delete, key, params, None).await
    }

    /// Runs the full dispatch pipeline.
    ///
    /// Non-2xx statuses and transport failures are reported through the
    /// envelope's `ok`, `response` and `error` fields, not as `Err`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnregisteredKey`] when `key` is unknown, before
    ///   any I/O.
    /// - [`DispatchError::Http`] when the request cannot be built (for
    ///   example a body on GET).
    /// - [`DispatchError::MalformedPayload`] when a 2xx body is not a usable
    ///   JSON:API document or a resource rejects its node.
    pub async fn dispatch(
        &self,
        method: HttpMethod,
        key: &str,
        params: Option<ResourceParams>,
        body: Option<Value>,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let factory = self.inner.registry.resolve(key)?;
        let params = params.unwrap_or_default();

        let link = match params.link() {
            Some(link) => link.to_string(),
            None => factory().build_url(&params),
        };
        let url = self.resolve_url(&link);

        tracing::debug!("Dispatching {} '{}' to {}", method, key, url);

        let mut builder = HttpRequest::builder(method, &url).maybe_body(body);
        if self.inner.context.is_server_side() {
            if let Some(token) = self.inner.context.credential() {
                builder = builder.header("Authorization", token.bearer());
            }
        }
        let request = builder.build().map_err(HttpError::from)?;

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!("Request for '{}' to {} failed: {}", key, url, error);
                return Ok(ResponseEnvelope::transport_failure(&error));
            }
        };

        self.interpret(key, &factory, &response)
    }

    /// Routes `link` for the current execution context.
    ///
    /// Server-side, relative links are joined onto the public API URL and
    /// absolute links pass through. In the browser, the public API URL is
    /// stripped from absolute links and the remaining path is tunneled
    /// through the internal proxy as `?uri=<path>`.
    #[must_use]
    pub fn resolve_url(&self, link: &str) -> String {
        let config = &self.inner.config;

        if self.inner.context.is_server_side() {
            if is_absolute_url(link) {
                link.to_string()
            } else {
                config.public_api_url().join(link)
            }
        } else {
            let path = config.public_api_url().strip_from(link).unwrap_or(link);
            config.internal_api_url().with_query_param("uri", path)
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let after = self.inner.config.timeout();
        tokio::time::timeout(after, self.inner.transport.send(request))
            .await
            .map_err(|_| HttpError::Timeout { after })?
    }

    fn interpret(
        &self,
        key: &str,
        factory: &ResourceFactory,
        response: &HttpResponse,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let mut envelope = ResponseEnvelope::with_status(response.code);

        if !response.is_ok() {
            let body = serde_json::from_str::<Value>(&response.body).ok();
            let message = body
                .as_ref()
                .and_then(error_message)
                .or_else(|| Some(response.status_text.clone()).filter(|text| !text.is_empty()))
                .unwrap_or_else(|| format!("HTTP {}", response.code));

            tracing::debug!(
                "Request for '{}' returned {}: {}",
                key,
                response.code,
                message
            );
            envelope.fail(message);
            return Ok(envelope);
        }

        if response.is_no_content() {
            return Ok(envelope);
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| DispatchError::malformed(key, format!("invalid JSON: {e}")))?;
        if !body.is_object() {
            return Err(DispatchError::malformed(key, "body is not a JSON object"));
        }

        if let Some(message) = application_failure(&body) {
            tracing::debug!(
                "Request for '{}' returned {} with an application failure: {}",
                key,
                response.code,
                message
            );
            envelope.fail(message);
            return Ok(envelope);
        }

        let document: Document = serde_json::from_value(body)
            .map_err(|e| DispatchError::malformed(key, e.to_string()))?;
        let (data, included, links) = document.into_parts();

        // Blank hrefs count as undeclared.
        let next = links.next.as_ref().and_then(Link::declared_href);
        let prev = links.prev.as_ref().and_then(Link::declared_href);

        envelope.self_link = links
            .self_link
            .as_ref()
            .and_then(Link::declared_href)
            .map(str::to_string);
        envelope.next = next.map(str::to_string);
        envelope.prev = prev.map(str::to_string);
        envelope.next_page = next.map(|href| PageFetcher::new(self.clone(), key, href));
        envelope.prev_page = prev.map(|href| PageFetcher::new(self.clone(), key, href));

        envelope.data = match &data {
            Value::Array(nodes) => PrimaryData::Many(
                nodes
                    .iter()
                    .map(|node| rehydrate(key, factory, node, &included))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Object(_) => PrimaryData::One(rehydrate(key, factory, &data, &included)?),
            Value::Null => PrimaryData::default(),
            other => {
                return Err(DispatchError::malformed(
                    key,
                    format!("data must be an object or an array, got {}", json_type(other)),
                ))
            }
        };

        Ok(envelope)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.inner.registry)
            .field("config", &self.inner.config)
            .field("context", &self.inner.context)
            .field("transport", &self.inner.transport)
            .finish()
    }
}

fn rehydrate(
    key: &str,
    factory: &ResourceFactory,
    node: &Value,
    included: &[Value],
) -> Result<Box<dyn Resource>, DispatchError> {
    if !node.is_object() {
        return Err(DispatchError::malformed(
            key,
            format!("resource node must be an object, got {}", json_type(node)),
        ));
    }

    let mut resource = factory();
    resource
        .rehydrate(node, included)
        .map_err(|e| DispatchError::malformed(key, e.to_string()))?;
    Ok(resource)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiUrl;
    use crate::context::{BrowserContext, ServerContext};
    use crate::jsonapi::errors::RehydrateError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct Widget {
        id: String,
    }

    impl Resource for Widget {
        fn build_url(&self, params: &ResourceParams) -> String {
            params.expand("/widgets/{id}")
        }

        fn rehydrate(&mut self, node: &Value, _included: &[Value]) -> Result<(), RehydrateError> {
            self.id = node["id"]
                .as_str()
                .ok_or_else(|| RehydrateError::missing("id"))?
                .to_string();
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Canned {
        response: Mutex<Option<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(code: u16, body: &str) -> Self {
            Self {
                response: Mutex::new(Some(HttpResponse::new(
                    code,
                    "",
                    HashMap::new(),
                    body.to_string(),
                ))),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.requests.lock().unwrap().push(request);
            self.response
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| HttpError::Transport {
                    message: "no canned response left".to_string(),
                })
        }
    }

    #[derive(Debug)]
    struct Hanging;

    #[async_trait]
    impl Transport for Hanging {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, HttpError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(HttpError::Transport {
                message: "unreachable".to_string(),
            })
        }
    }

    fn config() -> DispatcherConfig {
        DispatcherConfig::builder()
            .public_api_url(ApiUrl::new("https://api.example.com/v1").unwrap())
            .internal_api_url(ApiUrl::new("https://app.example.com/api/proxy").unwrap())
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap()
    }

    fn dispatcher(context: Arc<dyn ExecutionContext>, transport: Arc<dyn Transport>) -> Dispatcher {
        let mut registry = Registry::new();
        registry.register_type::<Widget>("widgets");
        Dispatcher::with_transport(Arc::new(registry), config(), context, transport)
    }

    #[test]
    fn test_server_side_joins_relative_links() {
        let d = dispatcher(Arc::new(ServerContext::anonymous()), Arc::new(Canned::default()));

        assert_eq!(
            d.resolve_url("/widgets/1"),
            "https://api.example.com/v1/widgets/1"
        );
        assert_eq!(
            d.resolve_url("https://elsewhere.test/x"),
            "https://elsewhere.test/x"
        );
    }

    #[test]
    fn test_browser_tunnels_through_proxy() {
        let d = dispatcher(Arc::new(BrowserContext), Arc::new(Canned::default()));

        assert_eq!(
            d.resolve_url("https://api.example.com/v1/widgets/1"),
            "https://app.example.com/api/proxy?uri=%2Fwidgets%2F1"
        );
        assert_eq!(
            d.resolve_url("/widgets?page=2"),
            "https://app.example.com/api/proxy?uri=%2Fwidgets%3Fpage%3D2"
        );
    }

    #[test]
    fn test_with_context_shares_registry() {
        let d = dispatcher(Arc::new(BrowserContext), Arc::new(Canned::default()));
        let server = d.with_context(Arc::new(ServerContext::anonymous()));

        assert!(server.context().is_server_side());
        assert!(!d.context().is_server_side());
        assert!(server.registry().contains("widgets"));
    }

    #[tokio::test]
    async fn test_data_of_wrong_type_is_malformed() {
        let transport = Arc::new(Canned::new(200, r#"{"data": "nope"}"#));
        let d = dispatcher(Arc::new(ServerContext::anonymous()), transport);

        let result = d.get("widgets", Some(ResourceParams::new().with_option("id", "1"))).await;
        assert!(matches!(result, Err(DispatchError::MalformedPayload { .. })));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let transport = Arc::new(Canned::new(200, "<html></html>"));
        let d = dispatcher(Arc::new(ServerContext::anonymous()), transport);

        let result = d.get("widgets", None).await;
        assert!(matches!(result, Err(DispatchError::MalformedPayload { .. })));
    }

    #[tokio::test]
    async fn test_rehydrate_error_is_malformed() {
        let transport = Arc::new(Canned::new(200, r#"{"data": [{"type": "widgets"}]}"#));
        let d = dispatcher(Arc::new(ServerContext::anonymous()), transport);

        match d.get("widgets", None).await {
            Err(DispatchError::MalformedPayload { key, reason }) => {
                assert_eq!(key, "widgets");
                assert!(reason.contains("missing field 'id'"));
            }
            other => panic!("expected malformed payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_links_create_no_continuations() {
        let body = r#"{
            "data": [{"type": "widgets", "id": "2"}],
            "links": {"self": "", "next": "", "prev": {"href": "  "}}
        }"#;
        let transport = Arc::new(Canned::new(200, body));
        let d = dispatcher(Arc::new(ServerContext::anonymous()), transport);

        let envelope = d.get("widgets", None).await.unwrap();

        assert!(envelope.ok);
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.self_link, None);
        assert_eq!(envelope.next, None);
        assert_eq!(envelope.prev, None);
        assert!(!envelope.has_next_page());
        assert!(!envelope.has_prev_page());
        assert!(envelope.fetch_next_page().await.is_none());
    }

    #[tokio::test]
    async fn test_null_data_is_empty_collection() {
        let transport = Arc::new(Canned::new(200, r#"{"data": null}"#));
        let d = dispatcher(Arc::new(ServerContext::anonymous()), transport);

        let envelope = d.get("widgets", None).await.unwrap();
        assert!(envelope.ok);
        assert!(envelope.data.is_collection());
        assert!(envelope.data.is_empty());
    }

    #[tokio::test]
    async fn test_error_falls_back_to_http_code_without_status_text() {
        let transport = Arc::new(Canned::new(599, ""));
        let d = dispatcher(Arc::new(ServerContext::anonymous()), transport);

        let envelope = d.get("widgets", None).await.unwrap();
        assert!(!envelope.ok);
        assert_eq!(envelope.response, 599);
        assert_eq!(envelope.error, "HTTP 599");
    }

    #[tokio::test]
    async fn test_hanging_transport_times_out() {
        let d = dispatcher(Arc::new(ServerContext::anonymous()), Arc::new(Hanging));

        let envelope = d.get("widgets", None).await.unwrap();
        assert!(envelope.is_transport_failure());
        assert!(envelope.error.contains("timed out after 50ms"));
    }

    #[tokio::test]
    async fn test_body_on_get_is_rejected_before_sending() {
        let transport = Arc::new(Canned::new(200, "{}"));
        let d = dispatcher(Arc::new(ServerContext::anonymous()), transport.clone());

        let result = d
            .dispatch(HttpMethod::Get, "widgets", None, Some(json!({"a": 1})))
            .await;

        assert!(matches!(result, Err(DispatchError::Http(_))));
        assert!(transport.requests.lock().unwrap().is_empty());
    }
}
