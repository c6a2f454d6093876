use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::CatalogResult;

/// The verbs the catalog layer issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a document.
    Get,
    /// Replace or update a resource.
    Put,
    /// Create a resource under a collection.
    Post,
    /// Remove a resource.
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// One request handed to the [`Transport`].
#[derive(Debug, Clone)]
pub struct RawRequest {
    /// The verb.
    pub method: Method,
    /// The absolute address.
    pub url: Url,
    /// The body, for mutating verbs.
    pub body: Option<Bytes>,
    /// Content type of the body.
    pub content_type: Option<String>,
}

impl RawRequest {
    /// A bodyless GET.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            body: None,
            content_type: None,
        }
    }

    /// A PUT carrying `body`.
    #[must_use]
    pub fn put(url: Url, body: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            url,
            body: Some(body),
            content_type: Some(content_type.into()),
        }
    }

    /// A POST carrying `body`.
    #[must_use]
    pub fn post(url: Url, body: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url,
            body: Some(body),
            content_type: Some(content_type.into()),
        }
    }

    /// A bodyless DELETE.
    #[must_use]
    pub fn delete(url: Url) -> Self {
        Self {
            method: Method::Delete,
            url,
            body: None,
            content_type: None,
        }
    }
}

/// One response from the [`Transport`].
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// The raw body.
    pub body: Bytes,
}

impl RawResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The wire seam.
///
/// Implementations own authentication, TLS, timeouts, and retries; the
/// catalog layer above only sees statuses and bodies. Connection-level
/// failures surface as [`CatalogError::Transport`].
///
/// [`CatalogError::Transport`]: crate::error::CatalogError::Transport
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Performs one request.
    async fn request(&self, request: RawRequest) -> CatalogResult<RawResponse>;
}
