//! HTTP layer used by the dispatcher.
//!
//! # Overview
//!
//! - [`Transport`]: the seam the dispatcher sends requests through
//! - [`HttpClient`]: the reqwest-backed [`Transport`]
//! - [`HttpRequest`] / [`HttpRequestBuilder`]: an outgoing request
//! - [`HttpResponse`]: a raw status, headers and body
//! - [`HttpMethod`]: GET, POST, PUT, PATCH, DELETE
//! - [`HttpError`]: timeout, network and validation failures
//!
//! No retries happen at this layer.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, Transport, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, DEFAULT_HEADERS};
pub use http_response::HttpResponse;
