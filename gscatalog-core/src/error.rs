use url::Url;

use crate::transport::Method;

/// A convenience [`Result`] for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors produced while reading or mutating the remote catalog.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The server reports no resource at the given catalog address.
    #[error("No catalog entity at {0}")]
    NotFound(Url),

    /// A name matched more than one entity within the requested scope.
    #[error("{query:?} does not uniquely identify a {kind}: {candidates} candidates")]
    AmbiguousRequest {
        /// Entity family that was queried.
        kind: &'static str,
        /// The name that failed to resolve uniquely.
        query: String,
        /// How many entities matched.
        candidates: usize,
    },

    /// Creation was requested without overwrite but a like-named entity exists.
    #[error("There is already a {kind} named {name}")]
    ConflictingData {
        /// Entity family of the collision.
        kind: &'static str,
        /// The colliding name.
        name: String,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse {
        /// Address that served the document.
        url: Url,
        /// What was wrong with it.
        reason: String,
    },

    /// A read returned a non-success status.
    #[error("Fetch of {url} failed with status {status}")]
    Fetch {
        /// Address that was fetched.
        url: Url,
        /// HTTP status code.
        status: u16,
    },

    /// A mutating request returned a non-success status.
    #[error("{method} {url} failed with status {status}: {body}")]
    FailedRequest {
        /// Verb of the failed request.
        method: Method,
        /// Address of the failed request.
        url: Url,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for display.
        body: String,
    },

    /// A bulk-data upload was rejected by the server.
    #[error("Upload to {url} rejected with status {status}: {body}")]
    Upload {
        /// Upload address.
        url: Url,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for display.
        body: String,
    },

    /// A get/set on a field the entity kind does not declare.
    #[error("{kind} has no field {field:?}")]
    UnsupportedField {
        /// Entity kind that rejected the field.
        kind: &'static str,
        /// The undeclared field name.
        field: String,
    },

    /// A set with a value that does not match the field's declared shape.
    #[error("Field {field:?} of {kind} expects a {expected} value")]
    FieldType {
        /// Entity kind that rejected the value.
        kind: &'static str,
        /// The field being set.
        field: String,
        /// The shape the codec table declares.
        expected: &'static str,
    },

    /// The configured base URL cannot carry path segments.
    #[error("Base URL {0} cannot be extended with path segments")]
    BaseUrl(Url),

    /// Errors raised below the catalog layer, e.g. by the HTTP client.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl CatalogError {
    /// Wraps a transport-level source error.
    pub fn transport<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(source))
    }

    /// Truncates a response body for inclusion in an error message.
    #[must_use]
    pub fn body_snippet(body: &[u8]) -> String {
        const MAX: usize = 200;
        let text = String::from_utf8_lossy(body);
        let mut snippet: String = text.chars().take(MAX).collect();
        if text.chars().count() > MAX {
            snippet.push('…');
        }
        snippet
    }
}
