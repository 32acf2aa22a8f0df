//! Integration tests for the resource registry.
//!
//! These tests verify first-registration-wins semantics both on the registry
//! itself and through a full dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use jsonapi_dispatch::{
    ApiUrl, Dispatcher, DispatcherConfig, HttpError, HttpRequest, HttpResponse, Registry,
    RehydrateError, Resource, ResourceFactory, ResourceParams, ServerContext, Transport,
};
use serde_json::Value;

#[derive(Debug, Default)]
struct Original {
    id: String,
}

impl Resource for Original {
    fn build_url(&self, _params: &ResourceParams) -> String {
        "/things".to_string()
    }

    fn rehydrate(&mut self, node: &Value, _included: &[Value]) -> Result<(), RehydrateError> {
        self.id = node["id"].as_str().unwrap_or_default().to_string();
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Impostor;

impl Resource for Impostor {
    fn build_url(&self, _params: &ResourceParams) -> String {
        "/impostors".to_string()
    }

    fn rehydrate(&mut self, _node: &Value, _included: &[Value]) -> Result<(), RehydrateError> {
        Ok(())
    }
}

/// Answers every request with a fixed two-element collection.
#[derive(Debug)]
struct Fixture;

#[async_trait]
impl Transport for Fixture {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        assert!(request.url.ends_with("/things"));
        Ok(HttpResponse::new(
            200,
            "OK",
            Default::default(),
            r#"{"data": [{"type": "things", "id": "a"}, {"type": "things", "id": "b"}]}"#,
        ))
    }
}

#[test]
fn test_resolve_returns_exact_factory() {
    let factory: ResourceFactory = Arc::new(|| Box::new(Original::default()) as Box<dyn Resource>);
    let other: ResourceFactory = Arc::new(|| Box::new(Impostor) as Box<dyn Resource>);

    let mut registry = Registry::new();
    assert!(registry.register("things", Arc::clone(&factory)));
    assert!(!registry.register("things", Arc::clone(&other)));

    let resolved = registry.resolve("things").unwrap();
    assert!(Arc::ptr_eq(&resolved, &factory));
    assert!(!Arc::ptr_eq(&resolved, &other));
}

#[test]
fn test_registries_are_independent() {
    let mut first = Registry::new();
    let mut second = Registry::new();

    first.register_type::<Original>("things");
    second.register_type::<Impostor>("things");

    assert!(first.resolve("things").unwrap()().is::<Original>());
    assert!(second.resolve("things").unwrap()().is::<Impostor>());
}

#[tokio::test]
async fn test_dispatch_uses_first_registered_type() {
    let mut registry = Registry::new();
    registry.register_type::<Original>("things");
    registry.register_type::<Impostor>("things");

    let config = DispatcherConfig::builder()
        .public_api_url(ApiUrl::new("https://api.example.com").unwrap())
        .internal_api_url(ApiUrl::new("https://app.example.com/api/proxy").unwrap())
        .build()
        .unwrap();
    let dispatcher = Dispatcher::with_transport(
        Arc::new(registry),
        config,
        Arc::new(ServerContext::anonymous()),
        Arc::new(Fixture),
    );

    let envelope = dispatcher.get("things", None).await.unwrap();

    let ids: Vec<&str> = envelope
        .data
        .many::<Original>()
        .iter()
        .map(|thing| thing.id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(envelope.data.iter().all(|resource| resource.is::<Original>()));
}
