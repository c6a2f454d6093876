use gscatalog_core::{CatalogResult, FieldValue, Remote, ResourceKind, ResourceProxy};
use url::Url;

use super::{CatalogEntity, entity_common, entries_field, flag_field, text_field};
use crate::paths;

/// A vector data store owned by exactly one workspace.
#[derive(Debug, Clone)]
pub struct DataStore {
    pub(crate) proxy: ResourceProxy,
    workspace: String,
}

impl DataStore {
    pub(crate) fn bound(
        remote: Remote,
        base: &Url,
        workspace: &str,
        name: &str,
    ) -> CatalogResult<Self> {
        let url = paths::datastore(base, workspace, name)?;
        Ok(Self {
            proxy: ResourceProxy::bound(remote, ResourceKind::DataStore, name, url),
            workspace: workspace.to_string(),
        })
    }

    pub(crate) fn unbound(remote: Remote, workspace: &str, name: &str) -> Self {
        Self {
            proxy: ResourceProxy::unbound(remote, ResourceKind::DataStore, name),
            workspace: workspace.to_string(),
        }
    }

    /// The owning workspace.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        &self.workspace
    }

    entity_common!();

    flag_field!(
        /// Whether resources from this store are served.
        "enabled", enabled, set_enabled
    );

    entries_field!(
        /// The opaque key/value parameters the server connects to the
        /// underlying storage with.
        "connection_parameters", connection_parameters, set_connection_parameters
    );
}

impl CatalogEntity for DataStore {
    fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        &mut self.proxy
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::datastores_collection(base, &self.workspace)
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::datastore(base, &self.workspace, self.proxy.name())
    }
}

/// A raster data store owned by exactly one workspace.
#[derive(Debug, Clone)]
pub struct CoverageStore {
    pub(crate) proxy: ResourceProxy,
    workspace: String,
}

impl CoverageStore {
    pub(crate) fn bound(
        remote: Remote,
        base: &Url,
        workspace: &str,
        name: &str,
    ) -> CatalogResult<Self> {
        let url = paths::coveragestore(base, workspace, name)?;
        Ok(Self {
            proxy: ResourceProxy::bound(remote, ResourceKind::CoverageStore, name, url),
            workspace: workspace.to_string(),
        })
    }

    pub(crate) fn unbound(remote: Remote, workspace: &str, name: &str) -> Self {
        Self {
            proxy: ResourceProxy::unbound(remote, ResourceKind::CoverageStore, name),
            workspace: workspace.to_string(),
        }
    }

    /// The owning workspace.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        &self.workspace
    }

    entity_common!();

    flag_field!(
        /// Whether resources from this store are served.
        "enabled", enabled, set_enabled
    );

    text_field!(
        /// The raster format, e.g. `GeoTIFF`.
        "type", store_type, set_store_type
    );

    text_field!(
        /// Where the store's data lives, as the server sees it.
        "url", data_url, set_data_url
    );

    text_field!("description", description, set_description);
}

impl CatalogEntity for CoverageStore {
    fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        &mut self.proxy
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::coveragestores_collection(base, &self.workspace)
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::coveragestore(base, &self.workspace, self.proxy.name())
    }
}

/// Either kind of store, as returned by the merged store lookups.
#[derive(Debug, Clone)]
pub enum Store {
    /// A vector data store.
    Data(DataStore),
    /// A raster coverage store.
    Coverage(CoverageStore),
}

impl Store {
    /// The store name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Data(s) => s.name(),
            Self::Coverage(s) => s.name(),
        }
    }

    /// The owning workspace.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        match self {
            Self::Data(s) => s.workspace_name(),
            Self::Coverage(s) => s.workspace_name(),
        }
    }

    /// Reads a logical field by name.
    pub async fn get(&mut self, field: &str) -> CatalogResult<Option<FieldValue>> {
        match self {
            Self::Data(s) => s.get(field).await,
            Self::Coverage(s) => s.get(field).await,
        }
    }

    /// Records a local modification of a logical field.
    pub fn set(&mut self, field: &str, value: FieldValue) -> CatalogResult<()> {
        match self {
            Self::Data(s) => s.set(field, value),
            Self::Coverage(s) => s.set(field, value),
        }
    }

    /// Whether any field awaits saving.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.proxy().is_dirty()
    }

    /// The vector store, if this is one.
    #[must_use]
    pub fn as_data(&self) -> Option<&DataStore> {
        match self {
            Self::Data(s) => Some(s),
            Self::Coverage(_) => None,
        }
    }

    /// The raster store, if this is one.
    #[must_use]
    pub fn as_coverage(&self) -> Option<&CoverageStore> {
        match self {
            Self::Data(_) => None,
            Self::Coverage(s) => Some(s),
        }
    }
}

impl CatalogEntity for Store {
    fn proxy(&self) -> &ResourceProxy {
        match self {
            Self::Data(s) => s.proxy(),
            Self::Coverage(s) => s.proxy(),
        }
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        match self {
            Self::Data(s) => s.proxy_mut(),
            Self::Coverage(s) => s.proxy_mut(),
        }
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        match self {
            Self::Data(s) => s.collection_url(base),
            Self::Coverage(s) => s.collection_url(base),
        }
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        match self {
            Self::Data(s) => s.canonical_url(base),
            Self::Coverage(s) => s.canonical_url(base),
        }
    }
}
