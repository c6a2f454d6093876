#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

/// Response caching with a short freshness window.
pub mod cache;
/// Per-kind field tables and the partial-update codec.
pub mod codec;
/// The parsed-document model and its tolerant accessors.
pub mod document;
/// The error taxonomy.
pub mod error;
/// The lazy dirty-tracking entity proxy.
pub mod proxy;
/// The transport-plus-cache gateway.
pub mod remote;
/// The wire seam.
pub mod transport;
/// Field value types.
pub mod value;

pub use cache::{CachedBody, DEFAULT_TTL, ResponseCache};
pub use codec::{Codec, FieldKind, FieldSpec, ResourceKind};
pub use document::Document;
pub use error::{CatalogError, CatalogResult};
pub use proxy::{Binding, ResourceProxy};
pub use remote::Remote;
pub use transport::{Method, RawRequest, RawResponse, Transport};
pub use value::{Attribution, Bounds, FieldValue};
