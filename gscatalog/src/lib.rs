#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod catalog;
mod config;
mod entities;
mod http;
mod paths;
mod resolver;

pub use catalog::{Catalog, UploadPayload};
pub use config::CatalogConfig;
pub use entities::{
    CatalogEntity, Coverage, CoverageStore, DataStore, FeatureType, Layer, LayerGroup, Resource,
    Store, Style, Workspace,
};
pub use http::HttpTransport;

pub use gscatalog_core::{
    Attribution, Binding, Bounds, CatalogError, CatalogResult, Document, FieldValue, Method,
    RawRequest, RawResponse, Remote, ResourceKind, Transport,
};
