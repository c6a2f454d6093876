//! Canonical catalog addresses.
//!
//! Every address is derived from the configured base URL; entity names are
//! pushed as path segments so they get percent-encoded.

use gscatalog_core::{CatalogError, CatalogResult};
use url::Url;

fn push(base: &Url, segments: &[&str]) -> CatalogResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CatalogError::BaseUrl(base.clone()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn doc(name: &str) -> String {
    format!("{name}.json")
}

pub fn workspaces_list(base: &Url) -> CatalogResult<Url> {
    push(base, &["workspaces.json"])
}

pub fn workspaces_collection(base: &Url) -> CatalogResult<Url> {
    push(base, &["workspaces"])
}

pub fn workspace(base: &Url, name: &str) -> CatalogResult<Url> {
    push(base, &["workspaces", &doc(name)])
}

pub fn default_workspace(base: &Url) -> CatalogResult<Url> {
    push(base, &["workspaces", "default.json"])
}

pub fn datastores_list(base: &Url, workspace: &str) -> CatalogResult<Url> {
    push(base, &["workspaces", workspace, "datastores.json"])
}

pub fn datastores_collection(base: &Url, workspace: &str) -> CatalogResult<Url> {
    push(base, &["workspaces", workspace, "datastores"])
}

pub fn datastore(base: &Url, workspace: &str, name: &str) -> CatalogResult<Url> {
    push(base, &["workspaces", workspace, "datastores", &doc(name)])
}

pub fn datastore_upload(base: &Url, workspace: &str, name: &str) -> CatalogResult<Url> {
    push(base, &["workspaces", workspace, "datastores", name, "file.shp"])
}

pub fn featuretypes_list(base: &Url, workspace: &str, store: &str) -> CatalogResult<Url> {
    push(
        base,
        &["workspaces", workspace, "datastores", store, "featuretypes.json"],
    )
}

pub fn featuretype(base: &Url, workspace: &str, store: &str, name: &str) -> CatalogResult<Url> {
    push(
        base,
        &["workspaces", workspace, "datastores", store, "featuretypes", &doc(name)],
    )
}

pub fn coveragestores_list(base: &Url, workspace: &str) -> CatalogResult<Url> {
    push(base, &["workspaces", workspace, "coveragestores.json"])
}

pub fn coveragestores_collection(base: &Url, workspace: &str) -> CatalogResult<Url> {
    push(base, &["workspaces", workspace, "coveragestores"])
}

pub fn coveragestore(base: &Url, workspace: &str, name: &str) -> CatalogResult<Url> {
    push(base, &["workspaces", workspace, "coveragestores", &doc(name)])
}

pub fn coveragestore_upload(
    base: &Url,
    workspace: &str,
    name: &str,
    format: &str,
) -> CatalogResult<Url> {
    push(
        base,
        &["workspaces", workspace, "coveragestores", name, &format!("file.{format}")],
    )
}

pub fn coverages_list(base: &Url, workspace: &str, store: &str) -> CatalogResult<Url> {
    push(
        base,
        &["workspaces", workspace, "coveragestores", store, "coverages.json"],
    )
}

pub fn coverage(base: &Url, workspace: &str, store: &str, name: &str) -> CatalogResult<Url> {
    push(
        base,
        &["workspaces", workspace, "coveragestores", store, "coverages", &doc(name)],
    )
}

pub fn layers_list(base: &Url) -> CatalogResult<Url> {
    push(base, &["layers.json"])
}

pub fn layer(base: &Url, name: &str) -> CatalogResult<Url> {
    push(base, &["layers", &doc(name)])
}

pub fn layergroups_list(base: &Url) -> CatalogResult<Url> {
    push(base, &["layergroups.json"])
}

pub fn layergroups_collection(base: &Url) -> CatalogResult<Url> {
    push(base, &["layergroups"])
}

pub fn layergroup(base: &Url, name: &str) -> CatalogResult<Url> {
    push(base, &["layergroups", &doc(name)])
}

pub fn styles_list(base: &Url) -> CatalogResult<Url> {
    push(base, &["styles.json"])
}

pub fn styles_collection(base: &Url) -> CatalogResult<Url> {
    push(base, &["styles"])
}

pub fn style(base: &Url, name: &str) -> CatalogResult<Url> {
    push(base, &["styles", &doc(name)])
}

pub fn style_sld(base: &Url, name: &str) -> CatalogResult<Url> {
    push(base, &["styles", &format!("{name}.sld")])
}
