//! The typed entity kinds of the catalog.
//!
//! Every kind wraps a [`ResourceProxy`] and adds typed accessors for its
//! declared fields; the string-keyed `get`/`set` surface stays available on
//! each wrapper for callers that work field names dynamically.

use gscatalog_core::{CatalogResult, ResourceProxy};
use url::Url;

mod layer;
mod layergroup;
mod resource;
mod store;
mod style;
mod workspace;

pub use layer::Layer;
pub use layergroup::LayerGroup;
pub use resource::{Coverage, FeatureType, Resource};
pub use store::{CoverageStore, DataStore, Store};
pub use style::Style;
pub use workspace::Workspace;

/// The seam between the catalog façade and the entity kinds.
///
/// A kind knows where it lives: its canonical address under the base URL and
/// the collection a create is POSTed to.
pub trait CatalogEntity {
    /// The proxy behind this entity.
    fn proxy(&self) -> &ResourceProxy;

    /// Mutable access to the proxy.
    fn proxy_mut(&mut self) -> &mut ResourceProxy;

    /// The collection a create call for this entity is POSTed to.
    fn collection_url(&self, base: &Url) -> CatalogResult<Url>;

    /// The entity's canonical address under `base`.
    fn canonical_url(&self, base: &Url) -> CatalogResult<Url>;
}

/// The passthrough surface every wrapper exposes.
macro_rules! entity_common {
    () => {
        /// The entity name.
        #[must_use]
        pub fn name(&self) -> &str {
            self.proxy.name()
        }

        /// Where the entity stands in its creation lifecycle.
        #[must_use]
        pub fn binding(&self) -> gscatalog_core::Binding {
            self.proxy.binding()
        }

        /// Reads a logical field by name.
        pub async fn get(
            &mut self,
            field: &str,
        ) -> gscatalog_core::CatalogResult<Option<gscatalog_core::FieldValue>> {
            self.proxy.get(field).await
        }

        /// Records a local modification of a logical field.
        pub fn set(
            &mut self,
            field: &str,
            value: gscatalog_core::FieldValue,
        ) -> gscatalog_core::CatalogResult<()> {
            self.proxy.set(field, value)
        }

        /// Whether any field awaits saving.
        #[must_use]
        pub fn is_dirty(&self) -> bool {
            self.proxy.is_dirty()
        }
    };
}
pub(crate) use entity_common;

macro_rules! text_field {
    ($(#[$doc:meta])* $field:literal, $get:ident, $set:ident) => {
        $(#[$doc])*
        pub async fn $get(&mut self) -> gscatalog_core::CatalogResult<Option<String>> {
            Ok(self
                .proxy
                .get($field)
                .await?
                .and_then(gscatalog_core::FieldValue::into_text))
        }

        #[doc = concat!("Sets the `", $field, "` field locally.")]
        pub fn $set(&mut self, value: impl Into<String>) -> gscatalog_core::CatalogResult<()> {
            self.proxy
                .set($field, gscatalog_core::FieldValue::Text(value.into()))
        }
    };
}
pub(crate) use text_field;

macro_rules! flag_field {
    ($(#[$doc:meta])* $field:literal, $get:ident, $set:ident) => {
        $(#[$doc])*
        pub async fn $get(&mut self) -> gscatalog_core::CatalogResult<Option<bool>> {
            Ok(self
                .proxy
                .get($field)
                .await?
                .and_then(gscatalog_core::FieldValue::into_flag))
        }

        #[doc = concat!("Sets the `", $field, "` field locally.")]
        pub fn $set(&mut self, value: bool) -> gscatalog_core::CatalogResult<()> {
            self.proxy.set($field, gscatalog_core::FieldValue::Flag(value))
        }
    };
}
pub(crate) use flag_field;

macro_rules! bounds_field {
    ($(#[$doc:meta])* $field:literal, $get:ident, $set:ident) => {
        $(#[$doc])*
        pub async fn $get(
            &mut self,
        ) -> gscatalog_core::CatalogResult<Option<gscatalog_core::Bounds>> {
            Ok(self
                .proxy
                .get($field)
                .await?
                .and_then(gscatalog_core::FieldValue::into_bounds))
        }

        #[doc = concat!("Sets the `", $field, "` field locally.")]
        pub fn $set(
            &mut self,
            value: gscatalog_core::Bounds,
        ) -> gscatalog_core::CatalogResult<()> {
            self.proxy.set($field, gscatalog_core::FieldValue::Bounds(value))
        }
    };
}
pub(crate) use bounds_field;

macro_rules! list_field {
    ($(#[$doc:meta])* $field:literal, $get:ident, $set:ident) => {
        $(#[$doc])*
        pub async fn $get(&mut self) -> gscatalog_core::CatalogResult<Option<Vec<String>>> {
            Ok(self
                .proxy
                .get($field)
                .await?
                .and_then(gscatalog_core::FieldValue::into_list))
        }

        #[doc = concat!("Sets the `", $field, "` field locally.")]
        pub fn $set<I, S>(&mut self, items: I) -> gscatalog_core::CatalogResult<()>
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.proxy.set($field, gscatalog_core::FieldValue::list(items))
        }
    };
}
pub(crate) use list_field;

macro_rules! entries_field {
    ($(#[$doc:meta])* $field:literal, $get:ident, $set:ident) => {
        $(#[$doc])*
        pub async fn $get(
            &mut self,
        ) -> gscatalog_core::CatalogResult<
            Option<std::collections::BTreeMap<String, String>>,
        > {
            Ok(self
                .proxy
                .get($field)
                .await?
                .and_then(gscatalog_core::FieldValue::into_entries))
        }

        #[doc = concat!("Sets the `", $field, "` field locally.")]
        pub fn $set(
            &mut self,
            entries: std::collections::BTreeMap<String, String>,
        ) -> gscatalog_core::CatalogResult<()> {
            self.proxy
                .set($field, gscatalog_core::FieldValue::Entries(entries))
        }
    };
}
pub(crate) use entries_field;

macro_rules! attribution_field {
    ($(#[$doc:meta])* $field:literal, $get:ident, $set:ident) => {
        $(#[$doc])*
        pub async fn $get(
            &mut self,
        ) -> gscatalog_core::CatalogResult<Option<gscatalog_core::Attribution>> {
            Ok(self
                .proxy
                .get($field)
                .await?
                .and_then(gscatalog_core::FieldValue::into_attribution))
        }

        #[doc = concat!("Sets the `", $field, "` field locally.")]
        pub fn $set(
            &mut self,
            value: gscatalog_core::Attribution,
        ) -> gscatalog_core::CatalogResult<()> {
            self.proxy
                .set($field, gscatalog_core::FieldValue::Attribution(value))
        }
    };
}
pub(crate) use attribution_field;
