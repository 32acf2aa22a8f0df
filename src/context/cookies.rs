//! Request cookie jar and session token lookup.

use std::collections::HashMap;
use std::fmt;

use crate::config::SessionToken;

/// Cookie holding the session token on plain HTTP deployments.
pub const SESSION_TOKEN_COOKIE: &str = "next-auth.session-token";

/// Cookie holding the session token when served over HTTPS.
pub const SECURE_SESSION_TOKEN_COOKIE: &str = "__Secure-next-auth.session-token";

/// The cookies of the incoming request being rendered server-side.
///
/// `Debug` prints cookie names only.
///
/// # Example
///
/// ```rust
/// use jsonapi_dispatch::context::CookieJar;
///
/// let jar = CookieJar::parse("theme=dark; __Secure-next-auth.session-token=abc");
/// assert_eq!(jar.get("theme"), Some("dark"));
/// assert_eq!(jar.session_token().unwrap().as_ref(), "abc");
/// ```
#[derive(Clone, Default)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `Cookie` request header value (`name=value; name2=value2`).
    ///
    /// Pairs without `=` are skipped. Surrounding double quotes are removed
    /// from values. On repeated names the first occurrence wins.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"');
            jar.cookies
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }
        jar
    }

    /// Inserts or replaces a cookie.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Returns a cookie value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns the number of cookies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if the jar holds no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Returns the session token, preferring [`SESSION_TOKEN_COOKIE`] over
    /// [`SECURE_SESSION_TOKEN_COOKIE`].
    ///
    /// A blank cookie counts as absent.
    #[must_use]
    pub fn session_token(&self) -> Option<SessionToken> {
        self.get(SESSION_TOKEN_COOKIE)
            .and_then(SessionToken::new)
            .or_else(|| self.get(SECURE_SESSION_TOKEN_COOKIE).and_then(SessionToken::new))
    }
}

impl<K, V> FromIterator<(K, V)> for CookieJar
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut jar = Self::new();
        for (name, value) in iter {
            jar.insert(name, value);
        }
        jar
    }
}

impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.cookies.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CookieJar").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_pairs() {
        let jar = CookieJar::parse("a=1; b=two ;c=\"quoted\"");
        assert_eq!(jar.len(), 3);
        assert_eq!(jar.get("a"), Some("1"));
        assert_eq!(jar.get("b"), Some("two"));
        assert_eq!(jar.get("c"), Some("quoted"));
    }

    #[test]
    fn test_parse_skips_malformed_pairs() {
        let jar = CookieJar::parse("novalue; =orphan; ok=yes");
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get("ok"), Some("yes"));
    }

    #[test]
    fn test_parse_keeps_equals_in_value() {
        let jar = CookieJar::parse("token=abc==");
        assert_eq!(jar.get("token"), Some("abc=="));
    }

    #[test]
    fn test_session_token_prefers_plain_cookie() {
        let jar: CookieJar = [
            (SECURE_SESSION_TOKEN_COOKIE, "secure-token"),
            (SESSION_TOKEN_COOKIE, "plain-token"),
        ]
        .into_iter()
        .collect();

        assert_eq!(jar.session_token().unwrap().as_ref(), "plain-token");
    }

    #[test]
    fn test_session_token_falls_back_to_secure_cookie() {
        let jar = CookieJar::parse("__Secure-next-auth.session-token=secure-token");
        assert_eq!(jar.session_token().unwrap().as_ref(), "secure-token");
    }

    #[test]
    fn test_blank_plain_cookie_falls_back() {
        let jar = CookieJar::parse(
            "next-auth.session-token=; __Secure-next-auth.session-token=secure-token",
        );
        assert_eq!(jar.session_token().unwrap().as_ref(), "secure-token");
    }

    #[test]
    fn test_no_session_cookie_yields_none() {
        let jar = CookieJar::parse("theme=dark");
        assert!(jar.session_token().is_none());
        assert!(CookieJar::new().session_token().is_none());
    }

    #[test]
    fn test_debug_hides_values() {
        let jar = CookieJar::parse("next-auth.session-token=super-secret");
        let debug = format!("{jar:?}");
        assert!(debug.contains("next-auth.session-token"));
        assert!(!debug.contains("super-secret"));
    }
}
