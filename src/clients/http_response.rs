//! HTTP response type.

use std::collections::HashMap;

/// A raw HTTP response as returned by a [`Transport`](crate::clients::Transport).
///
/// The body is kept as text; interpretation belongs to the dispatcher.
///
/// # Example
///
/// ```rust
/// use jsonapi_dispatch::clients::HttpResponse;
///
/// let response = HttpResponse::new(204, "No Content", Default::default(), String::new());
/// assert!(response.is_ok());
/// assert!(response.is_no_content());
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The status reason text (e.g. `"Not Found"`).
    pub status_text: String,
    /// Response headers, lowercased names, possibly multi-valued.
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub fn new(
        code: u16,
        status_text: impl Into<String>,
        headers: HashMap<String, Vec<String>>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            code,
            status_text: status_text.into(),
            headers,
            body: body.into(),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for a 204 or an empty successful body.
    #[must_use]
    pub fn is_no_content(&self) -> bool {
        self.code == 204 || (self.is_ok() && self.body.trim().is_empty())
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
