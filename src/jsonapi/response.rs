//! The uniform result of every dispatch.
//!
//! [`ResponseEnvelope`] carries the status, the rehydrated [`PrimaryData`],
//! an error string and, when the payload declared them, pagination links
//! with ready-to-run [`PageFetcher`] continuations.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut envelope = dispatcher.get("widgets", None).await?;
//! loop {
//!     for widget in envelope.data.many::<Widget>() {
//!         println!("{}", widget.name);
//!     }
//!     match envelope.fetch_next_page().await {
//!         Some(next) => envelope = next?,
//!         None => break,
//!     }
//! }
//! ```

use std::fmt;

use crate::clients::HttpError;
use crate::jsonapi::dispatcher::Dispatcher;
use crate::jsonapi::errors::DispatchError;
use crate::jsonapi::resource::{Resource, ResourceParams};

/// Rehydrated primary data.
///
/// Mirrors the payload: a single object becomes [`PrimaryData::One`], an
/// array becomes [`PrimaryData::Many`] in source order. Failures, 204s and
/// `null` data are an empty [`PrimaryData::Many`].
#[derive(Debug)]
pub enum PrimaryData {
    /// The payload's `data` was a single resource object.
    One(Box<dyn Resource>),
    /// The payload's `data` was an array (or there was no data).
    Many(Vec<Box<dyn Resource>>),
}

impl Default for PrimaryData {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl PrimaryData {
    /// Returns `true` if the payload's `data` was an array.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(resources) => resources.len(),
        }
    }

    /// Returns `true` if there are no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the resources in source order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Resource + 'static)> + '_ {
        let slice = match self {
            Self::One(resource) => std::slice::from_ref(resource),
            Self::Many(resources) => resources.as_slice(),
        };
        slice.iter().map(|resource| &**resource)
    }

    /// Returns the single resource as a `T`.
    ///
    /// `None` for collections or when the resource is not a `T`.
    #[must_use]
    pub fn one<T: Resource>(&self) -> Option<&T> {
        match self {
            Self::One(resource) => (**resource).downcast_ref::<T>(),
            Self::Many(_) => None,
        }
    }

    /// Returns every resource that is a `T`, in source order.
    #[must_use]
    pub fn many<T: Resource>(&self) -> Vec<&T> {
        self.iter()
            .filter_map(|resource| resource.downcast_ref::<T>())
            .collect()
    }

    /// Consumes the data, returning the resources in source order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Box<dyn Resource>> {
        match self {
            Self::One(resource) => vec![resource],
            Self::Many(resources) => resources,
        }
    }
}

/// Continuation that fetches another page of the same resource.
///
/// Replays the whole dispatch pipeline with a GET on the same registry key
/// against the literal link from the payload. No cursor state is shared.
#[derive(Clone)]
pub struct PageFetcher {
    dispatcher: Dispatcher,
    key: String,
    link: String,
}

impl PageFetcher {
    pub(crate) fn new(dispatcher: Dispatcher, key: &str, link: &str) -> Self {
        Self {
            dispatcher,
            key: key.to_string(),
            link: link.to_string(),
        }
    }

    /// Returns the registry key the page is fetched with.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the literal link the page is fetched from.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Fetches the page.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::get`].
    pub async fn fetch(&self) -> Result<ResponseEnvelope, DispatchError> {
        self.dispatcher
            .get(&self.key, Some(ResourceParams::from_link(self.link.as_str())))
            .await
    }
}

impl fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageFetcher")
            .field("key", &self.key)
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}

/// The uniform result of a dispatch.
#[derive(Debug)]
pub struct ResponseEnvelope {
    /// `true` for a 2xx status without an application-level failure.
    pub ok: bool,
    /// The HTTP status, or `0` when no response was received.
    pub response: u16,
    /// The rehydrated primary data.
    pub data: PrimaryData,
    /// The error text; empty on success.
    pub error: String,
    /// `links.self` from the payload.
    pub self_link: Option<String>,
    /// `links.next` from the payload.
    pub next: Option<String>,
    /// `links.prev` from the payload.
    pub prev: Option<String>,
    pub(crate) next_page: Option<PageFetcher>,
    pub(crate) prev_page: Option<PageFetcher>,
}

impl ResponseEnvelope {
    /// Creates an empty envelope for a received status.
    #[must_use]
    pub fn with_status(code: u16) -> Self {
        Self {
            ok: (200..300).contains(&code),
            response: code,
            data: PrimaryData::default(),
            error: String::new(),
            self_link: None,
            next: None,
            prev: None,
            next_page: None,
            prev_page: None,
        }
    }

    /// Creates the envelope for a request that never got a response.
    #[must_use]
    pub fn transport_failure(error: &HttpError) -> Self {
        let mut envelope = Self::with_status(0);
        envelope.error = error.to_string();
        envelope
    }

    /// Marks the envelope failed with `message`, keeping the status.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.ok = false;
        self.error = message.into();
    }

    /// Returns `true` if no HTTP response was received at all.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        !self.ok && self.response == 0
    }

    /// Returns the next-page continuation, if the payload declared one.
    #[must_use]
    pub const fn next_page(&self) -> Option<&PageFetcher> {
        self.next_page.as_ref()
    }

    /// Returns the previous-page continuation, if the payload declared one.
    #[must_use]
    pub const fn prev_page(&self) -> Option<&PageFetcher> {
        self.prev_page.as_ref()
    }

    /// Returns `true` if a next page is available.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Returns `true` if a previous page is available.
    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.prev_page.is_some()
    }

    /// Fetches the next page, or `None` when there is none.
    pub async fn fetch_next_page(&self) -> Option<Result<Self, DispatchError>> {
        match &self.next_page {
            Some(fetcher) => Some(fetcher.fetch().await),
            None => None,
        }
    }

    /// Fetches the previous page, or `None` when there is none.
    pub async fn fetch_prev_page(&self) -> Option<Result<Self, DispatchError>> {
        match &self.prev_page {
            Some(fetcher) => Some(fetcher.fetch().await),
            None => None,
        }
    }
}
