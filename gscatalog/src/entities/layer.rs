use gscatalog_core::{CatalogResult, Remote, ResourceKind, ResourceProxy};
use url::Url;

use super::{CatalogEntity, attribution_field, entity_common, flag_field, list_field, text_field};
use crate::paths;

/// A published map layer.
///
/// A layer references exactly one resource and one default style, both by
/// name/href rather than as embedded objects; the references are resolved at
/// read time through the catalog.
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) proxy: ResourceProxy,
}

impl Layer {
    pub(crate) fn bound(remote: Remote, base: &Url, name: &str) -> CatalogResult<Self> {
        let url = paths::layer(base, name)?;
        Ok(Self {
            proxy: ResourceProxy::bound(remote, ResourceKind::Layer, name, url),
        })
    }

    entity_common!();

    flag_field!(
        /// Whether the server exposes this layer.
        "enabled", enabled, set_enabled
    );

    text_field!(
        /// Name of the style used when none is requested.
        "default_style", default_style, set_default_style
    );

    list_field!(
        /// Names of the additional styles this layer may be drawn with.
        "styles", styles, set_styles
    );

    text_field!(
        /// Catalog href of the resource this layer publishes.
        "resource", resource_href, set_resource_href
    );

    attribution_field!(
        /// Data-provider attribution shown with the layer.
        "attribution", attribution, set_attribution
    );
}

impl CatalogEntity for Layer {
    fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        &mut self.proxy
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::layers_list(base)
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::layer(base, self.proxy.name())
    }
}
