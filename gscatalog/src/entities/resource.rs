use gscatalog_core::{CatalogResult, FieldValue, Remote, ResourceKind, ResourceProxy};
use url::Url;

use super::{
    CatalogEntity, bounds_field, entity_common, entries_field, flag_field, list_field, text_field,
};
use crate::paths;

/// A vector dataset within a data store.
#[derive(Debug, Clone)]
pub struct FeatureType {
    pub(crate) proxy: ResourceProxy,
    workspace: String,
    store: String,
}

impl FeatureType {
    pub(crate) fn bound(
        remote: Remote,
        base: &Url,
        workspace: &str,
        store: &str,
        name: &str,
    ) -> CatalogResult<Self> {
        let url = paths::featuretype(base, workspace, store, name)?;
        Ok(Self {
            proxy: ResourceProxy::bound(remote, ResourceKind::FeatureType, name, url),
            workspace: workspace.to_string(),
            store: store.to_string(),
        })
    }

    /// The owning workspace.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        &self.workspace
    }

    /// The owning store.
    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.store
    }

    entity_common!();

    text_field!("title", title, set_title);

    text_field!(
        /// The descriptive abstract.
        "abstract", abstract_text, set_abstract
    );

    list_field!("keywords", keywords, set_keywords);

    bounds_field!(
        /// Extent in the native projection.
        "native_bbox", native_bbox, set_native_bbox
    );

    bounds_field!(
        /// Extent in latitude/longitude.
        "latlon_bbox", latlon_bbox, set_latlon_bbox
    );

    text_field!(
        /// The declared projection identifier, e.g. `EPSG:4326`.
        "projection", projection, set_projection
    );

    text_field!(
        /// How the server reconciles declared and native projections.
        "projection_policy", projection_policy, set_projection_policy
    );

    flag_field!("enabled", enabled, set_enabled);

    entries_field!(
        /// The extensible key/value metadata attached to this resource.
        "metadata", metadata, set_metadata
    );

    list_field!(
        /// The attribute descriptors, by name.
        "attributes", attributes, set_attributes
    );
}

impl CatalogEntity for FeatureType {
    fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        &mut self.proxy
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::featuretypes_list(base, &self.workspace, &self.store)
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::featuretype(base, &self.workspace, &self.store, self.proxy.name())
    }
}

/// A raster dataset within a coverage store.
#[derive(Debug, Clone)]
pub struct Coverage {
    pub(crate) proxy: ResourceProxy,
    workspace: String,
    store: String,
}

impl Coverage {
    pub(crate) fn bound(
        remote: Remote,
        base: &Url,
        workspace: &str,
        store: &str,
        name: &str,
    ) -> CatalogResult<Self> {
        let url = paths::coverage(base, workspace, store, name)?;
        Ok(Self {
            proxy: ResourceProxy::bound(remote, ResourceKind::Coverage, name, url),
            workspace: workspace.to_string(),
            store: store.to_string(),
        })
    }

    /// The owning workspace.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        &self.workspace
    }

    /// The owning store.
    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.store
    }

    entity_common!();

    text_field!("title", title, set_title);

    text_field!(
        /// The descriptive abstract (the raster family calls it a
        /// description on the wire).
        "abstract", abstract_text, set_abstract
    );

    list_field!("keywords", keywords, set_keywords);

    bounds_field!("native_bbox", native_bbox, set_native_bbox);

    bounds_field!("latlon_bbox", latlon_bbox, set_latlon_bbox);

    text_field!("projection", projection, set_projection);

    text_field!("projection_policy", projection_policy, set_projection_policy);

    flag_field!("enabled", enabled, set_enabled);

    entries_field!("metadata", metadata, set_metadata);

    list_field!(
        /// The band/dimension descriptors, by name.
        "dimensions", dimensions, set_dimensions
    );
}

impl CatalogEntity for Coverage {
    fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        &mut self.proxy
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::coverages_list(base, &self.workspace, &self.store)
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::coverage(base, &self.workspace, &self.store, self.proxy.name())
    }
}

/// Either kind of resource, as returned by the merged resource lookups.
#[derive(Debug, Clone)]
pub enum Resource {
    /// A vector dataset.
    Feature(FeatureType),
    /// A raster dataset.
    Coverage(Coverage),
}

impl Resource {
    /// The resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Feature(r) => r.name(),
            Self::Coverage(r) => r.name(),
        }
    }

    /// The owning workspace.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        match self {
            Self::Feature(r) => r.workspace_name(),
            Self::Coverage(r) => r.workspace_name(),
        }
    }

    /// The owning store.
    #[must_use]
    pub fn store_name(&self) -> &str {
        match self {
            Self::Feature(r) => r.store_name(),
            Self::Coverage(r) => r.store_name(),
        }
    }

    /// Reads a logical field by name.
    pub async fn get(&mut self, field: &str) -> CatalogResult<Option<FieldValue>> {
        match self {
            Self::Feature(r) => r.get(field).await,
            Self::Coverage(r) => r.get(field).await,
        }
    }

    /// Records a local modification of a logical field.
    pub fn set(&mut self, field: &str, value: FieldValue) -> CatalogResult<()> {
        match self {
            Self::Feature(r) => r.set(field, value),
            Self::Coverage(r) => r.set(field, value),
        }
    }

    /// Whether any field awaits saving.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.proxy().is_dirty()
    }

    /// The vector resource, if this is one.
    #[must_use]
    pub fn as_feature(&self) -> Option<&FeatureType> {
        match self {
            Self::Feature(r) => Some(r),
            Self::Coverage(_) => None,
        }
    }

    /// The raster resource, if this is one.
    #[must_use]
    pub fn as_coverage(&self) -> Option<&Coverage> {
        match self {
            Self::Feature(_) => None,
            Self::Coverage(r) => Some(r),
        }
    }
}

impl CatalogEntity for Resource {
    fn proxy(&self) -> &ResourceProxy {
        match self {
            Self::Feature(r) => r.proxy(),
            Self::Coverage(r) => r.proxy(),
        }
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        match self {
            Self::Feature(r) => r.proxy_mut(),
            Self::Coverage(r) => r.proxy_mut(),
        }
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        match self {
            Self::Feature(r) => r.collection_url(base),
            Self::Coverage(r) => r.collection_url(base),
        }
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        match self {
            Self::Feature(r) => r.canonical_url(base),
            Self::Coverage(r) => r.canonical_url(base),
        }
    }
}
