//! Execution context: where a dispatch runs and which credential it carries.
//!
//! The dispatcher never inspects its environment. Callers inject an
//! [`ExecutionContext`] instead:
//!
//! - [`ServerContext`]: server-side rendering. Requests go straight to the
//!   public API and carry the session token from the incoming cookies.
//! - [`BrowserContext`]: browser-side. Requests are tunneled through the
//!   internal proxy and never carry credentials.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_dispatch::context::{BrowserContext, ExecutionContext, ServerContext};
//!
//! let server = ServerContext::from_cookie_header("next-auth.session-token=abc");
//! assert!(server.is_server_side());
//! assert_eq!(server.credential().unwrap().as_ref(), "abc");
//!
//! assert!(!BrowserContext.is_server_side());
//! assert!(BrowserContext.credential().is_none());
//! ```

mod cookies;

pub use cookies::{CookieJar, SECURE_SESSION_TOKEN_COOKIE, SESSION_TOKEN_COOKIE};

use std::fmt;

use crate::config::SessionToken;

/// Capability describing where a dispatch executes.
pub trait ExecutionContext: Send + Sync + fmt::Debug {
    /// Returns `true` when running server-side (direct API access).
    fn is_server_side(&self) -> bool;

    /// Returns the credential to attach, if any.
    ///
    /// Only consulted when [`is_server_side`](Self::is_server_side) is `true`.
    fn credential(&self) -> Option<SessionToken>;
}

/// Browser execution: proxy routing, no credentials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrowserContext;

impl ExecutionContext for BrowserContext {
    fn is_server_side(&self) -> bool {
        false
    }

    fn credential(&self) -> Option<SessionToken> {
        None
    }
}

/// Server-side execution for one incoming request.
#[derive(Clone, Debug, Default)]
pub struct ServerContext {
    cookies: CookieJar,
}

impl ServerContext {
    /// Creates a context from the incoming request's cookies.
    #[must_use]
    pub const fn new(cookies: CookieJar) -> Self {
        Self { cookies }
    }

    /// Creates a context from a raw `Cookie` header value.
    #[must_use]
    pub fn from_cookie_header(header: &str) -> Self {
        Self::new(CookieJar::parse(header))
    }

    /// Creates a server-side context with no cookies.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the request cookies.
    #[must_use]
    pub const fn cookies(&self) -> &CookieJar {
        &self.cookies
    }
}

impl ExecutionContext for ServerContext {
    fn is_server_side(&self) -> bool {
        true
    }

    fn credential(&self) -> Option<SessionToken> {
        self.cookies.session_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_server_context_has_no_credential() {
        let context = ServerContext::anonymous();
        assert!(context.is_server_side());
        assert!(context.credential().is_none());
        assert!(context.cookies().is_empty());
    }

    #[test]
    fn test_server_context_reads_secure_cookie() {
        let context =
            ServerContext::from_cookie_header("__Secure-next-auth.session-token=tok; x=y");
        assert_eq!(context.credential().unwrap().as_ref(), "tok");
    }

    #[test]
    fn test_contexts_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BrowserContext>();
        assert_send_sync::<ServerContext>();
    }
}
