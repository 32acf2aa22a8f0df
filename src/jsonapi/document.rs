//! JSON:API wire format.
//!
//! Only the top level is interpreted here: `data`, `included` and `links`.
//! Resource nodes stay raw [`Value`]s and are handed to
//! [`Resource::rehydrate`](crate::Resource::rehydrate) untouched.
//!
//! Error bodies come in two shapes, both understood by [`error_message`]:
//!
//! - application envelope: `{ "ok": false, "message": "..." | ["...", ...] }`
//! - JSON:API errors: `{ "errors": [{ "title": "...", "detail": "..." }] }`

use serde::Deserialize;
use serde_json::Value;

/// A pagination or self link, in either string or `{ "href": ... }` form.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Link {
    /// `"links": { "next": "/widgets?page=2" }`
    Href(String),
    /// `"links": { "next": { "href": "/widgets?page=2", "meta": {...} } }`
    Object {
        /// The link target.
        href: String,
    },
}

impl Link {
    /// Returns the link target.
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Self::Href(href) | Self::Object { href } => href,
        }
    }

    /// Returns the link target, or `None` when it is blank.
    #[must_use]
    pub fn declared_href(&self) -> Option<&str> {
        Some(self.href()).filter(|href| !href.trim().is_empty())
    }
}

/// Top-level `links` member.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Links {
    /// The link that produced this document.
    #[serde(rename = "self", default)]
    pub self_link: Option<Link>,
    /// The next page.
    #[serde(default)]
    pub next: Option<Link>,
    /// The previous page.
    #[serde(default)]
    pub prev: Option<Link>,
}

/// A JSON:API response document.
///
/// # Example
///
/// ```rust
/// use jsonapi_dispatch::jsonapi::Document;
/// use serde_json::json;
///
/// let document: Document = serde_json::from_value(json!({
///     "data": [{ "type": "widgets", "id": "1" }],
///     "links": { "next": "/widgets?page=2" }
/// }))
/// .unwrap();
///
/// assert!(document.data.is_array());
/// assert!(document.included().is_empty());
/// assert_eq!(document.links().next.unwrap().href(), "/widgets?page=2");
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Document {
    /// Primary data: an object, an array of objects, or `null`.
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    included: Option<Vec<Value>>,
    #[serde(default)]
    links: Option<Links>,
}

impl Document {
    /// Returns the side-loaded resources (empty when absent).
    #[must_use]
    pub fn included(&self) -> &[Value] {
        self.included.as_deref().unwrap_or_default()
    }

    /// Returns the top-level links (all empty when absent).
    #[must_use]
    pub fn links(&self) -> Links {
        self.links.clone().unwrap_or_default()
    }

    /// Splits the document into primary data, included pool and links.
    #[must_use]
    pub fn into_parts(self) -> (Value, Vec<Value>, Links) {
        (
            self.data,
            self.included.unwrap_or_default(),
            self.links.unwrap_or_default(),
        )
    }
}

/// Extracts a human-readable error from a response body.
///
/// Tries `message` (string, or array of strings joined by `", "`), then
/// JSON:API `errors[].detail` falling back to `errors[].title`.
#[must_use]
pub fn error_message(body: &Value) -> Option<String> {
    match body.get("message") {
        Some(Value::String(message)) if !message.is_empty() => return Some(message.clone()),
        Some(Value::Array(messages)) => {
            let joined = join_strings(messages.iter().filter_map(Value::as_str));
            if !joined.is_empty() {
                return Some(joined);
            }
        }
        _ => {}
    }

    let errors = body.get("errors")?.as_array()?;
    let joined = join_strings(errors.iter().filter_map(|error| {
        error
            .get("detail")
            .and_then(Value::as_str)
            .or_else(|| error.get("title").and_then(Value::as_str))
    }));

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Returns the error of an application envelope that reports `"ok": false`
/// regardless of the HTTP status.
#[must_use]
pub fn application_failure(body: &Value) -> Option<String> {
    if body.get("ok").and_then(Value::as_bool) == Some(false) {
        Some(error_message(body).unwrap_or_else(|| "Request failed".to_string()))
    } else {
        None
    }
}

/// Returns the `(type, id)` identifier of a resource node.
#[must_use]
pub fn identifier(node: &Value) -> Option<(&str, &str)> {
    let kind = node.get("type")?.as_str()?;
    let id = node.get("id")?.as_str()?;
    Some((kind, id))
}

/// Finds a side-loaded resource by type and id.
#[must_use]
pub fn find_included<'a>(included: &'a [Value], kind: &str, id: &str) -> Option<&'a Value> {
    included
        .iter()
        .find(|candidate| identifier(candidate) == Some((kind, id)))
}

/// Resolves a relationship of `node` against the side-loaded pool.
///
/// Works for to-one and to-many relationships. Linkage entries without a
/// matching included resource are skipped.
///
/// # Example
///
/// ```rust
/// use jsonapi_dispatch::jsonapi::resolve_relationship;
/// use serde_json::json;
///
/// let node = json!({
///     "type": "widgets", "id": "1",
///     "relationships": { "owner": { "data": { "type": "people", "id": "9" } } }
/// });
/// let included = vec![json!({ "type": "people", "id": "9", "attributes": { "name": "Ada" } })];
///
/// let owners = resolve_relationship(&node, "owner", &included);
/// assert_eq!(owners[0]["attributes"]["name"], "Ada");
/// ```
#[must_use]
pub fn resolve_relationship<'a>(
    node: &Value,
    name: &str,
    included: &'a [Value],
) -> Vec<&'a Value> {
    let Some(linkage) = node
        .get("relationships")
        .and_then(|relationships| relationships.get(name))
        .and_then(|relationship| relationship.get("data"))
    else {
        return Vec::new();
    };

    let lookup = |entry: &Value| {
        identifier(entry).and_then(|(kind, id)| find_included(included, kind, id))
    };

    match linkage {
        Value::Array(entries) => entries.iter().filter_map(lookup).collect(),
        Value::Object(_) => lookup(linkage).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn join_strings<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
