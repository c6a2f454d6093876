use gscatalog_core::{CatalogResult, Remote, ResourceKind, ResourceProxy};
use url::Url;

use super::{CatalogEntity, entity_common};
use crate::paths;

/// A named container of data and coverage stores.
///
/// Exactly one workspace is the server-wide default; see
/// [`Catalog::get_default_workspace`](crate::Catalog::get_default_workspace).
#[derive(Debug, Clone)]
pub struct Workspace {
    pub(crate) proxy: ResourceProxy,
}

impl Workspace {
    pub(crate) fn bound(remote: Remote, base: &Url, name: &str) -> CatalogResult<Self> {
        let url = paths::workspace(base, name)?;
        Ok(Self {
            proxy: ResourceProxy::bound(remote, ResourceKind::Workspace, name, url),
        })
    }

    pub(crate) fn unbound(remote: Remote, name: &str) -> Self {
        Self {
            proxy: ResourceProxy::unbound(remote, ResourceKind::Workspace, name),
        }
    }

    entity_common!();
}

impl CatalogEntity for Workspace {
    fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        &mut self.proxy
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::workspaces_collection(base)
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::workspace(base, self.proxy.name())
    }
}
