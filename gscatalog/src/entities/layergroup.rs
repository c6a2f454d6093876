use gscatalog_core::{CatalogResult, Remote, ResourceKind, ResourceProxy};
use url::Url;

use super::{CatalogEntity, bounds_field, entity_common, list_field};
use crate::paths;

/// An ordered grouping of layers drawn as one.
///
/// `layers` and `styles` are index-aligned: group layer *i* is drawn with
/// style *i*.
#[derive(Debug, Clone)]
pub struct LayerGroup {
    pub(crate) proxy: ResourceProxy,
}

impl LayerGroup {
    pub(crate) fn bound(remote: Remote, base: &Url, name: &str) -> CatalogResult<Self> {
        let url = paths::layergroup(base, name)?;
        Ok(Self {
            proxy: ResourceProxy::bound(remote, ResourceKind::LayerGroup, name, url),
        })
    }

    entity_common!();

    list_field!(
        /// The member layer names, in draw order.
        "layers", layers, set_layers
    );

    list_field!(
        /// The style names, index-aligned with the member layers.
        "styles", styles, set_styles
    );

    bounds_field!(
        /// The group's advertised extent.
        "bounds", bounds, set_bounds
    );
}

impl CatalogEntity for LayerGroup {
    fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        &mut self.proxy
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::layergroups_collection(base)
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::layergroup(base, self.proxy.name())
    }
}
