//! Path template helpers for [`Resource::build_url`](crate::Resource::build_url)
//! implementations.
//!
//! Templates use `{name}` placeholders:
//!
//! ```rust
//! use jsonapi_dispatch::jsonapi::{append_query, build_path};
//! use std::collections::HashMap;
//!
//! let mut ids = HashMap::new();
//! ids.insert("id", "42");
//! let path = build_path("/widgets/{id}", &ids);
//! assert_eq!(path, "/widgets/42");
//!
//! let path = append_query(&path, [("include", "parts,owner")]);
//! assert_eq!(path, "/widgets/42?include=parts%2Cowner");
//! ```

use std::collections::HashMap;
use std::fmt::Display;

/// Interpolates `{name}` placeholders in `template` with url-encoded values.
///
/// Placeholders without a value are left untouched.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn build_path<V: Display>(template: &str, ids: &HashMap<&str, V>) -> String {
    let mut result = template.to_string();

    for (key, value) in ids {
        let placeholder = format!("{{{key}}}");
        let value = value.to_string();
        result = result.replace(&placeholder, &urlencoding::encode(&value));
    }

    result
}

/// Returns the placeholder names in `template`, in order of appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        names.push(&after[..end]);
        rest = &after[end + 1..];
    }
    names
}

/// Appends url-encoded query pairs to `path`.
///
/// Uses `&` when `path` already carries a query string.
#[must_use]
pub fn append_query<'a, I>(path: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let query: Vec<String> = pairs
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect();

    if query.is_empty() {
        return path.to_string();
    }

    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{}", query.join("&"))
}
