use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use gscatalog_core::{
    Binding, CatalogError, CatalogResult, Method, RawRequest, Remote, Transport,
};
use log::{debug, info};
use url::Url;

use crate::config::CatalogConfig;
use crate::entities::{
    CatalogEntity, CoverageStore, DataStore, Layer, LayerGroup, Resource, Store, Style, Workspace,
};
use crate::http::HttpTransport;
use crate::paths;
use crate::resolver::Resolver;

const JSON_CONTENT_TYPE: &str = "application/json";
const SLD_CONTENT_TYPE: &str = "application/vnd.ogc.sld+xml";

/// Bulk data handed to the store-creation uploads.
///
/// The catalog treats the archive as opaque: whatever produced it (a
/// shapefile bundler, a GeoTIFF on disk) stays outside this crate.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// The archive or file bytes.
    pub data: Bytes,
    /// The content type sent with the upload.
    pub content_type: String,
}

impl UploadPayload {
    /// A payload with an explicit content type.
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    /// A zip archive payload.
    pub fn zip(data: impl Into<Bytes>) -> Self {
        Self::new(data, "application/zip")
    }

    /// A GeoTIFF payload.
    pub fn geotiff(data: impl Into<Bytes>) -> Self {
        Self::new(data, "image/tiff")
    }
}

/// The catalog façade.
///
/// Owns the transport and the response cache; every lookup goes through the
/// resolver and the cache, every mutation clears the cache wholesale. A
/// `Catalog` holds no durable state: dropping it loses nothing but cached
/// responses.
#[derive(Debug, Clone)]
pub struct Catalog {
    config: CatalogConfig,
    remote: Remote,
}

impl Catalog {
    /// Connects the catalog over HTTP with the given settings.
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Connects the catalog over an injected transport.
    ///
    /// The seam the tests drive an in-memory server through; also the hook
    /// for callers that need custom authentication or middleware.
    pub fn with_transport(
        config: CatalogConfig,
        transport: Arc<dyn Transport>,
    ) -> CatalogResult<Self> {
        if config.base_url.cannot_be_a_base() {
            return Err(CatalogError::BaseUrl(config.base_url.clone()));
        }
        let remote = Remote::new(transport, config.cache_ttl);
        Ok(Self { config, remote })
    }

    /// The configured REST root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.remote, &self.config.base_url)
    }

    /// All workspaces.
    pub async fn get_workspaces(&self) -> CatalogResult<Vec<Workspace>> {
        self.resolver().workspaces().await
    }

    /// The workspace with the given name, if any.
    pub async fn get_workspace(&self, name: &str) -> CatalogResult<Option<Workspace>> {
        self.resolver().find_workspace(name).await
    }

    /// The server-wide default workspace.
    pub async fn get_default_workspace(&self) -> CatalogResult<Workspace> {
        self.resolver().default_workspace().await
    }

    /// All stores, of both kinds, optionally limited to one workspace.
    pub async fn get_stores(&self, workspace: Option<&Workspace>) -> CatalogResult<Vec<Store>> {
        self.resolver().stores(workspace).await
    }

    /// The store with the given name within the scope, if any.
    pub async fn get_store(
        &self,
        name: &str,
        workspace: Option<&Workspace>,
    ) -> CatalogResult<Option<Store>> {
        self.resolver().find_store(name, workspace).await
    }

    /// All resources within the scope.
    pub async fn get_resources(
        &self,
        store: Option<&Store>,
        workspace: Option<&Workspace>,
    ) -> CatalogResult<Vec<Resource>> {
        self.resolver().resources(store, workspace).await
    }

    /// The resource with the given name within the scope, if any.
    ///
    /// A store scope takes precedence over a workspace scope; with neither,
    /// the whole catalog is searched.
    pub async fn get_resource(
        &self,
        name: &str,
        store: Option<&Store>,
        workspace: Option<&Workspace>,
    ) -> CatalogResult<Option<Resource>> {
        self.resolver().find_resource(name, store, workspace).await
    }

    /// All layers, optionally only those publishing `resource`.
    ///
    /// Filtering by resource reads each layer's backing document to compare
    /// the reference href.
    pub async fn get_layers(&self, resource: Option<&Resource>) -> CatalogResult<Vec<Layer>> {
        let layers = self.resolver().layers().await?;
        let Some(resource) = resource else {
            return Ok(layers);
        };
        let href = resource.canonical_url(self.base_url())?.to_string();
        let mut matching = Vec::new();
        for mut layer in layers {
            let layer_href = layer.resource_href().await?;
            if layer_href.as_deref() == Some(href.as_str()) {
                matching.push(layer);
            }
        }
        Ok(matching)
    }

    /// The layer with the given name, if any.
    pub async fn get_layer(&self, name: &str) -> CatalogResult<Option<Layer>> {
        self.resolver().find_layer(name).await
    }

    /// All layer groups.
    pub async fn get_layergroups(&self) -> CatalogResult<Vec<LayerGroup>> {
        self.resolver().layergroups().await
    }

    /// The layer group with the given name, if any.
    pub async fn get_layergroup(&self, name: &str) -> CatalogResult<Option<LayerGroup>> {
        self.resolver().find_layergroup(name).await
    }

    /// All styles.
    pub async fn get_styles(&self) -> CatalogResult<Vec<Style>> {
        self.resolver().styles().await
    }

    /// The style with the given name, if any.
    pub async fn get_style(&self, name: &str) -> CatalogResult<Option<Style>> {
        self.resolver().find_style(name).await
    }

    /// Persists an entity's locally modified fields.
    ///
    /// Bound entities are PUT to their address with the minimal dirty-field
    /// document; unbound ones are POSTed to their collection and promoted to
    /// `Bound` only once the server confirms. Either way the response cache
    /// is cleared and the entity's dirty set dropped on success. An empty
    /// dirty set still issues the (empty) update; skipping is the caller's
    /// decision.
    pub async fn save<E: CatalogEntity>(&self, entity: &mut E) -> CatalogResult<()> {
        let document = entity.proxy().serialize_for_save();
        let body = Bytes::from(serde_json::to_vec(&document).map_err(CatalogError::transport)?);

        match entity.proxy().binding() {
            Binding::Deleted => Err(self.entity_gone(entity)),
            Binding::Bound => {
                let url = match entity.proxy().url() {
                    Some(url) => url.clone(),
                    None => entity.canonical_url(self.base_url())?,
                };
                let response = self
                    .remote
                    .execute(RawRequest::put(url.clone(), body, JSON_CONTENT_TYPE))
                    .await?;
                if !response.is_success() {
                    return Err(CatalogError::FailedRequest {
                        method: Method::Put,
                        url,
                        status: response.status,
                        body: CatalogError::body_snippet(&response.body),
                    });
                }
                info!("Saved {kind} {name}", kind = entity.proxy().kind().label(), name = entity.proxy().name());
                self.remote.invalidate();
                entity.proxy_mut().clear_dirty();
                Ok(())
            }
            Binding::Unbound | Binding::PendingCreate => {
                let collection = entity.collection_url(self.base_url())?;
                entity.proxy_mut().mark_pending();
                let response = self
                    .remote
                    .execute(RawRequest::post(collection.clone(), body, JSON_CONTENT_TYPE))
                    .await?;
                if !response.is_success() {
                    // Unconfirmed creates stay pending; they are never
                    // promoted to Bound.
                    return Err(CatalogError::FailedRequest {
                        method: Method::Post,
                        url: collection,
                        status: response.status,
                        body: CatalogError::body_snippet(&response.body),
                    });
                }
                let url = entity.canonical_url(self.base_url())?;
                info!("Created {kind} {name} at {url}", kind = entity.proxy().kind().label(), name = entity.proxy().name());
                entity.proxy_mut().bind(url);
                self.remote.invalidate();
                entity.proxy_mut().clear_dirty();
                Ok(())
            }
        }
    }

    /// Removes an entity from the catalog.
    ///
    /// `recurse` cascades to dependents, `purge` also removes underlying
    /// data where the server supports it. The entity is terminal afterwards:
    /// every further operation on it fails with `NotFound`.
    pub async fn delete<E: CatalogEntity>(
        &self,
        entity: &mut E,
        purge: bool,
        recurse: bool,
    ) -> CatalogResult<()> {
        if entity.proxy().binding() == Binding::Deleted {
            return Err(self.entity_gone(entity));
        }
        let Some(mut url) = entity.proxy().url().cloned() else {
            return Err(self.entity_gone(entity));
        };
        if recurse {
            url.query_pairs_mut().append_pair("recurse", "true");
        }
        if purge {
            url.query_pairs_mut().append_pair("purge", "true");
        }
        let response = self.remote.execute(RawRequest::delete(url.clone())).await?;
        if !response.is_success() {
            return Err(CatalogError::FailedRequest {
                method: Method::Delete,
                url,
                status: response.status,
                body: CatalogError::body_snippet(&response.body),
            });
        }
        info!("Deleted {kind} {name}", kind = entity.proxy().kind().label(), name = entity.proxy().name());
        self.remote.invalidate();
        entity.proxy_mut().mark_deleted();
        Ok(())
    }

    /// A client-side workspace with no confirmed address yet.
    ///
    /// Save it to issue the create call; it is promoted to `Bound` only once
    /// the server confirms.
    #[must_use]
    pub fn unsaved_workspace(&self, name: &str) -> Workspace {
        Workspace::unbound(self.remote.clone(), name)
    }

    /// A client-side data store with no confirmed address yet.
    #[must_use]
    pub fn unsaved_datastore(&self, name: &str, workspace: &str) -> DataStore {
        DataStore::unbound(self.remote.clone(), workspace, name)
    }

    /// A client-side coverage store with no confirmed address yet.
    #[must_use]
    pub fn unsaved_coveragestore(&self, name: &str, workspace: &str) -> CoverageStore {
        CoverageStore::unbound(self.remote.clone(), workspace, name)
    }

    /// Creates a workspace.
    pub async fn create_workspace(&self, name: &str) -> CatalogResult<Workspace> {
        if self.get_workspace(name).await?.is_some() {
            return Err(CatalogError::ConflictingData {
                kind: "workspace",
                name: name.to_string(),
            });
        }
        let mut workspace = self.unsaved_workspace(name);
        self.save(&mut workspace).await?;
        Ok(workspace)
    }

    /// Creates a data store from connection parameters alone.
    ///
    /// No bulk data moves; the server is pointed at storage it can already
    /// reach. Defaults to the server's default workspace.
    pub async fn create_datastore(
        &self,
        name: &str,
        workspace: Option<&Workspace>,
        connection_parameters: BTreeMap<String, String>,
    ) -> CatalogResult<DataStore> {
        if self.get_store(name, workspace).await?.is_some() {
            return Err(self.store_conflict(name, workspace));
        }
        let workspace_name = match workspace {
            Some(ws) => ws.name().to_string(),
            None => self.get_default_workspace().await?.name().to_string(),
        };
        let mut store = self.unsaved_datastore(name, &workspace_name);
        store.set_enabled(true)?;
        store.set_connection_parameters(connection_parameters)?;
        self.save(&mut store).await?;
        Ok(store)
    }

    /// Creates a data store by uploading a shapefile archive.
    pub async fn create_featurestore(
        &self,
        name: &str,
        payload: UploadPayload,
        workspace: Option<&Workspace>,
        overwrite: bool,
    ) -> CatalogResult<()> {
        if !overwrite && self.get_store(name, workspace).await?.is_some() {
            return Err(self.store_conflict(name, workspace));
        }
        let workspace_name = match workspace {
            Some(ws) => ws.name().to_string(),
            None => self.get_default_workspace().await?.name().to_string(),
        };
        let url = paths::datastore_upload(self.base_url(), &workspace_name, name)?;
        self.upload(url, payload).await
    }

    /// Creates a coverage store by uploading raster data.
    ///
    /// `format` selects the server-side ingestion, e.g. `geotiff` or
    /// `worldimage`.
    pub async fn create_coveragestore(
        &self,
        name: &str,
        format: &str,
        payload: UploadPayload,
        workspace: Option<&Workspace>,
        overwrite: bool,
    ) -> CatalogResult<()> {
        if !overwrite && self.get_store(name, workspace).await?.is_some() {
            return Err(self.store_conflict(name, workspace));
        }
        let workspace_name = match workspace {
            Some(ws) => ws.name().to_string(),
            None => self.get_default_workspace().await?.name().to_string(),
        };
        let url = paths::coveragestore_upload(self.base_url(), &workspace_name, name, format)?;
        self.upload(url, payload).await
    }

    /// Creates or overwrites a style from an SLD document.
    pub async fn create_style(
        &self,
        name: &str,
        sld_body: &str,
        overwrite: bool,
    ) -> CatalogResult<()> {
        if !overwrite && self.get_style(name).await?.is_some() {
            return Err(CatalogError::ConflictingData {
                kind: "style",
                name: name.to_string(),
            });
        }
        let body = Bytes::from(sld_body.to_string());
        let request = if overwrite {
            RawRequest::put(
                paths::style_sld(self.base_url(), name)?,
                body,
                SLD_CONTENT_TYPE,
            )
        } else {
            RawRequest::post(
                paths::styles_collection(self.base_url())?,
                body,
                SLD_CONTENT_TYPE,
            )
        };
        let url = request.url.clone();
        let method = request.method;
        let response = self.remote.execute(request).await?;
        if !response.is_success() {
            return Err(CatalogError::Upload {
                url,
                status: response.status,
                body: CatalogError::body_snippet(&response.body),
            });
        }
        debug!("{method} of style {name} succeeded");
        self.remote.invalidate();
        Ok(())
    }

    async fn upload(&self, url: Url, payload: UploadPayload) -> CatalogResult<()> {
        let response = self
            .remote
            .execute(RawRequest::put(
                url.clone(),
                payload.data,
                payload.content_type,
            ))
            .await?;
        // The server may have partially applied a rejected upload, so the
        // cache is cleared whatever the status.
        self.remote.invalidate();
        if !response.is_success() {
            return Err(CatalogError::Upload {
                url,
                status: response.status,
                body: CatalogError::body_snippet(&response.body),
            });
        }
        info!("Uploaded bulk data to {url}");
        Ok(())
    }

    fn store_conflict(&self, name: &str, workspace: Option<&Workspace>) -> CatalogError {
        let name = match workspace {
            Some(ws) => format!("{ws_name} :: {name}", ws_name = ws.name()),
            None => name.to_string(),
        };
        CatalogError::ConflictingData { kind: "store", name }
    }

    fn entity_gone<E: CatalogEntity>(&self, entity: &E) -> CatalogError {
        let url = entity
            .proxy()
            .url()
            .cloned()
            .unwrap_or_else(|| self.config.base_url.clone());
        CatalogError::NotFound(url)
    }
}
