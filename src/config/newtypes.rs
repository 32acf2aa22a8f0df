//! Validated newtype wrappers for configuration and credential values.
//!
//! Invalid values are rejected on construction with a [`ConfigError`].

use crate::error::ConfigError;
use std::fmt;

/// Returns `true` if `link` carries an `http://` or `https://` scheme.
///
/// Anything else (including protocol-relative `//host/path` links) is
/// treated as a path relative to an API base URL.
///
/// # Example
///
/// ```rust
/// use jsonapi_dispatch::config::is_absolute_url;
///
/// assert!(is_absolute_url("https://api.example.com/widgets"));
/// assert!(!is_absolute_url("/widgets"));
/// ```
#[must_use]
pub fn is_absolute_url(link: &str) -> bool {
    let lower = link.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// A validated absolute API URL.
///
/// Used for both the public API base URL and the internal proxy endpoint.
/// A trailing `/` is trimmed on construction so joins never produce `//`.
///
/// # Example
///
/// ```rust
/// use jsonapi_dispatch::ApiUrl;
///
/// let url = ApiUrl::new("https://api.example.com/v1/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com/v1");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "api.example.com");
/// assert_eq!(url.join("/widgets/1"), "https://api.example.com/v1/widgets/1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl ApiUrl {
    /// Creates a new validated API URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] if the URL has no `http`/`https`
    /// scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        if !is_absolute_url(&url) {
            return Err(ConfigError::InvalidApiUrl { url });
        }

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidApiUrl { url: url.clone() })?;
        let host_start = scheme_end + 3;

        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidApiUrl { url });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Returns `true` if the URL carries a query string or fragment.
    ///
    /// Such a URL cannot be used as a base for [`join`](Self::join).
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.url[self.host_end..].contains(['?', '#'])
    }

    /// Appends a relative path to this URL with exactly one `/` between them.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return self.url.clone();
        }
        if path.starts_with('?') || path.starts_with('#') {
            return format!("{}{path}", self.url);
        }
        format!("{}/{path}", self.url)
    }

    /// Strips this URL from the front of `link`, returning the remaining
    /// relative part.
    ///
    /// Returns `None` when `link` does not live under this URL. A bare match
    /// yields `"/"`.
    #[must_use]
    pub fn strip_from<'a>(&self, link: &'a str) -> Option<&'a str> {
        let rest = link.strip_prefix(self.url.as_str())?;
        if rest.is_empty() {
            return Some("/");
        }
        if rest.starts_with(['/', '?', '#']) {
            Some(rest)
        } else {
            None
        }
    }

    /// Appends a single url-encoded query parameter to this URL.
    #[must_use]
    pub fn with_query_param(&self, key: &str, value: &str) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}{key}={}",
            self.url,
            urlencoding::encode(value)
        )
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A session token read from the request cookies.
///
/// The `Debug` implementation masks the value so tokens never end up in logs.
///
/// # Example
///
/// ```rust
/// use jsonapi_dispatch::SessionToken;
///
/// let token = SessionToken::new("abc.def.ghi").unwrap();
/// assert_eq!(token.as_ref(), "abc.def.ghi");
/// assert_eq!(format!("{:?}", token), "SessionToken(*****)");
/// assert_eq!(token.bearer(), "Bearer abc.def.ghi");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a non-empty token. Empty or whitespace-only values yield `None`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_rejects_relative_path() {
        assert!(matches!(
            ApiUrl::new("/api"),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn test_api_url_rejects_other_schemes() {
        assert!(ApiUrl::new("ftp://files.example.com").is_err());
    }

    #[test]
    fn test_api_url_rejects_missing_host() {
        assert!(ApiUrl::new("https://").is_err());
        assert!(ApiUrl::new("https:///path").is_err());
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let url = ApiUrl::new("http://localhost:8080/").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:8080");
        assert_eq!(url.host_name(), "localhost");
    }

    #[test]
    fn test_has_query_detects_query_and_fragment() {
        assert!(!ApiUrl::new("https://api.test/v1").unwrap().has_query());
        assert!(!ApiUrl::new("http://localhost:8080").unwrap().has_query());
        assert!(ApiUrl::new("https://api.test/v1?k=1").unwrap().has_query());
        assert!(ApiUrl::new("https://api.test?k=1").unwrap().has_query());
        assert!(ApiUrl::new("https://api.test/v1#top").unwrap().has_query());
    }

    #[test]
    fn test_join_produces_single_slash() {
        let url = ApiUrl::new("https://api.test").unwrap();
        assert_eq!(url.join("/widgets/1"), "https://api.test/widgets/1");
        assert_eq!(url.join("widgets/1"), "https://api.test/widgets/1");
        assert_eq!(url.join(""), "https://api.test");
    }

    #[test]
    fn test_strip_from_recovers_relative_path() {
        let url = ApiUrl::new("https://api.test/v1").unwrap();
        assert_eq!(
            url.strip_from("https://api.test/v1/widgets?page=2"),
            Some("/widgets?page=2")
        );
        assert_eq!(url.strip_from("https://api.test/v1"), Some("/"));
    }

    #[test]
    fn test_strip_from_rejects_lookalike_prefix() {
        let url = ApiUrl::new("https://api.test/v1").unwrap();
        assert_eq!(url.strip_from("https://api.test/v10/widgets"), None);
        assert_eq!(url.strip_from("https://other.test/v1/widgets"), None);
    }

    #[test]
    fn test_with_query_param_encodes_value() {
        let url = ApiUrl::new("https://app.test/api/internal").unwrap();
        assert_eq!(
            url.with_query_param("uri", "/widgets/1"),
            "https://app.test/api/internal?uri=%2Fwidgets%2F1"
        );

        let url = ApiUrl::new("https://app.test/proxy?v=2").unwrap();
        assert_eq!(
            url.with_query_param("uri", "/a"),
            "https://app.test/proxy?v=2&uri=%2Fa"
        );
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("HTTP://api.test"));
        assert!(is_absolute_url("https://api.test/x"));
        assert!(!is_absolute_url("widgets/1"));
        assert!(!is_absolute_url("//api.test/x"));
    }

    #[test]
    fn test_session_token_rejects_blank() {
        assert!(SessionToken::new("").is_none());
        assert!(SessionToken::new("   ").is_none());
    }

    #[test]
    fn test_session_token_debug_is_masked() {
        let token = SessionToken::new("secret-value").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret-value"));
    }
}
