//! Turns `(name, scope)` pairs into concrete entities.
//!
//! Resolution walks the containment hierarchy through the cached listing
//! documents and applies one uniform rule everywhere: zero matches is `None`
//! (or an empty sequence), more than one is [`CatalogError::AmbiguousRequest`].
//! Enumeration order follows the server's listings and is not stable across
//! server-side changes.

use gscatalog_core::{CatalogError, CatalogResult, Document, Remote};
use gscatalog_core::document::{as_text, lookup};
use log::warn;
use url::Url;

use crate::entities::{
    Coverage, CoverageStore, DataStore, FeatureType, Layer, LayerGroup, Resource, Store, Style,
    Workspace,
};
use crate::paths;

pub(crate) struct Resolver<'a> {
    remote: &'a Remote,
    base: &'a Url,
}

impl<'a> Resolver<'a> {
    pub fn new(remote: &'a Remote, base: &'a Url) -> Self {
        Self { remote, base }
    }

    pub async fn workspaces(&self) -> CatalogResult<Vec<Workspace>> {
        let doc = self.remote.document(&paths::workspaces_list(self.base)?).await?;
        listing_names(&doc, "workspaces", "workspace")
            .iter()
            .map(|name| Workspace::bound(self.remote.clone(), self.base, name))
            .collect()
    }

    pub async fn find_workspace(&self, name: &str) -> CatalogResult<Option<Workspace>> {
        let matches = self
            .workspaces()
            .await?
            .into_iter()
            .filter(|ws| ws.name() == name)
            .collect();
        unique("workspace", name, matches)
    }

    pub async fn default_workspace(&self) -> CatalogResult<Workspace> {
        let url = paths::default_workspace(self.base)?;
        let doc = self.remote.document(&url).await?;
        let name = doc
            .root("workspace")
            .and_then(|root| lookup(root, &["name"]))
            .and_then(as_text)
            .ok_or_else(|| CatalogError::MalformedResponse {
                url,
                reason: "missing workspace name".to_string(),
            })?;
        Workspace::bound(self.remote.clone(), self.base, &name)
    }

    pub async fn stores(&self, workspace: Option<&Workspace>) -> CatalogResult<Vec<Store>> {
        match workspace {
            Some(ws) => self.stores_in(ws.name()).await,
            None => {
                let mut stores = Vec::new();
                for ws in self.workspaces().await? {
                    stores.extend(self.stores_in(ws.name()).await?);
                }
                Ok(stores)
            }
        }
    }

    async fn stores_in(&self, workspace: &str) -> CatalogResult<Vec<Store>> {
        let mut stores = Vec::new();

        let ds_doc = self
            .remote
            .document(&paths::datastores_list(self.base, workspace)?)
            .await?;
        for name in listing_names(&ds_doc, "dataStores", "dataStore") {
            stores.push(Store::Data(DataStore::bound(
                self.remote.clone(),
                self.base,
                workspace,
                &name,
            )?));
        }

        let cs_doc = self
            .remote
            .document(&paths::coveragestores_list(self.base, workspace)?)
            .await?;
        for name in listing_names(&cs_doc, "coverageStores", "coverageStore") {
            stores.push(Store::Coverage(CoverageStore::bound(
                self.remote.clone(),
                self.base,
                workspace,
                &name,
            )?));
        }

        Ok(stores)
    }

    pub async fn find_store(
        &self,
        name: &str,
        workspace: Option<&Workspace>,
    ) -> CatalogResult<Option<Store>> {
        let matches = self
            .stores(workspace)
            .await?
            .into_iter()
            .filter(|store| store.name() == name)
            .collect();
        unique("store", name, matches)
    }

    pub async fn resources(
        &self,
        store: Option<&Store>,
        workspace: Option<&Workspace>,
    ) -> CatalogResult<Vec<Resource>> {
        if let Some(store) = store {
            return self.resources_in(store).await;
        }
        let mut resources = Vec::new();
        for store in self.stores(workspace).await? {
            resources.extend(self.resources_in(&store).await?);
        }
        Ok(resources)
    }

    async fn resources_in(&self, store: &Store) -> CatalogResult<Vec<Resource>> {
        match store {
            Store::Data(ds) => {
                let url = paths::featuretypes_list(self.base, ds.workspace_name(), ds.name())?;
                let doc = self.remote.document(&url).await?;
                listing_names(&doc, "featureTypes", "featureType")
                    .iter()
                    .map(|name| {
                        FeatureType::bound(
                            self.remote.clone(),
                            self.base,
                            ds.workspace_name(),
                            ds.name(),
                            name,
                        )
                        .map(Resource::Feature)
                    })
                    .collect()
            }
            Store::Coverage(cs) => {
                let url = paths::coverages_list(self.base, cs.workspace_name(), cs.name())?;
                let doc = self.remote.document(&url).await?;
                listing_names(&doc, "coverages", "coverage")
                    .iter()
                    .map(|name| {
                        Coverage::bound(
                            self.remote.clone(),
                            self.base,
                            cs.workspace_name(),
                            cs.name(),
                            name,
                        )
                        .map(Resource::Coverage)
                    })
                    .collect()
            }
        }
    }

    pub async fn find_resource(
        &self,
        name: &str,
        store: Option<&Store>,
        workspace: Option<&Workspace>,
    ) -> CatalogResult<Option<Resource>> {
        let matches = self
            .resources(store, workspace)
            .await?
            .into_iter()
            .filter(|resource| resource.name() == name)
            .collect();
        unique("resource", name, matches)
    }

    pub async fn layers(&self) -> CatalogResult<Vec<Layer>> {
        let doc = self.remote.document(&paths::layers_list(self.base)?).await?;
        listing_names(&doc, "layers", "layer")
            .iter()
            .map(|name| Layer::bound(self.remote.clone(), self.base, name))
            .collect()
    }

    pub async fn find_layer(&self, name: &str) -> CatalogResult<Option<Layer>> {
        let matches = self
            .layers()
            .await?
            .into_iter()
            .filter(|layer| layer.name() == name)
            .collect();
        unique("layer", name, matches)
    }

    pub async fn layergroups(&self) -> CatalogResult<Vec<LayerGroup>> {
        let doc = self
            .remote
            .document(&paths::layergroups_list(self.base)?)
            .await?;
        listing_names(&doc, "layerGroups", "layerGroup")
            .iter()
            .map(|name| LayerGroup::bound(self.remote.clone(), self.base, name))
            .collect()
    }

    pub async fn find_layergroup(&self, name: &str) -> CatalogResult<Option<LayerGroup>> {
        let matches = self
            .layergroups()
            .await?
            .into_iter()
            .filter(|group| group.name() == name)
            .collect();
        unique("layer group", name, matches)
    }

    pub async fn styles(&self) -> CatalogResult<Vec<Style>> {
        let doc = self.remote.document(&paths::styles_list(self.base)?).await?;
        listing_names(&doc, "styles", "style")
            .iter()
            .map(|name| Style::bound(self.remote.clone(), self.base, name))
            .collect()
    }

    pub async fn find_style(&self, name: &str) -> CatalogResult<Option<Style>> {
        let matches = self
            .styles()
            .await?
            .into_iter()
            .filter(|style| style.name() == name)
            .collect();
        unique("style", name, matches)
    }
}

/// Names in a listing document.
///
/// Tolerates the remote renderer's shapes for empty and single-element
/// collections: a missing item member, an empty string, or a bare object.
fn listing_names(doc: &Document, container: &str, item: &str) -> Vec<String> {
    let Some(root) = doc.root(container) else {
        warn!("Listing document has no {container:?} member");
        return Vec::new();
    };
    lookup(root, &[item])
        .map(gscatalog_core::document::as_items)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.get("name").and_then(as_text).or_else(|| as_text(entry)))
        .collect()
}

/// The uniform zero/one/many rule.
fn unique<T>(kind: &'static str, query: &str, mut matches: Vec<T>) -> CatalogResult<Option<T>> {
    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        candidates => Err(CatalogError::AmbiguousRequest {
            kind,
            query: query.to_string(),
            candidates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn listings_tolerate_collapsed_shapes() {
        let doc = Document::new(json!({"workspaces": {"workspace": {"name": "solo"}}}));
        assert_eq!(listing_names(&doc, "workspaces", "workspace"), vec!["solo"]);

        let empty = Document::new(json!({"workspaces": ""}));
        assert!(listing_names(&empty, "workspaces", "workspace").is_empty());

        let missing = Document::new(json!({"unexpected": {}}));
        assert!(listing_names(&missing, "workspaces", "workspace").is_empty());
    }

    #[test]
    fn unique_applies_the_zero_one_many_rule() {
        assert_eq!(unique::<u8>("store", "x", vec![]).expect("zero is none"), None);
        assert_eq!(unique("store", "x", vec![7]).expect("one is some"), Some(7));
        let err = unique("store", "x", vec![1, 2]).expect_err("many is ambiguous");
        assert!(matches!(
            err,
            CatalogError::AmbiguousRequest { candidates: 2, .. }
        ));
    }
}
