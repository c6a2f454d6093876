//! An in-memory stand-in for the REST service.
//!
//! Serves a seeded two-workspace catalog, merges PUT bodies into stored
//! documents, maintains listing documents across POST/DELETE, and records
//! every request so tests can count fetches and inspect bodies.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use gscatalog::{
    Catalog, CatalogConfig, CatalogResult, Method, RawRequest, RawResponse, Transport,
};
use serde_json::{Value, json};

pub const BASE: &str = "http://localhost:8080/geoserver/rest";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: Method,
    pub path: String,
    pub body: Option<Bytes>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct FakeServer {
    docs: DashMap<String, Value>,
    texts: DashMap<String, String>,
    log: Mutex<Vec<RequestRecord>>,
    reject_mutations: AtomicBool,
}

impl FakeServer {
    /// The standard two-workspace fixture.
    ///
    /// `topp` holds the `states_shapefile` data store (feature type
    /// `states`) and a `shared` data store (feature type `lakes`); `sf`
    /// holds its own `shared` data store (feature type `lakes`) and the
    /// `sfdem` coverage store (coverage `sfdem`). The duplicated names are
    /// what the disambiguation tests lean on.
    #[must_use]
    pub fn seeded() -> Arc<Self> {
        let server = Self::default();

        server.put_doc(
            "/workspaces.json",
            json!({"workspaces": {"workspace": [
                {"name": "topp", "href": format!("{BASE}/workspaces/topp.json")},
                {"name": "sf", "href": format!("{BASE}/workspaces/sf.json")},
            ]}}),
        );
        server.put_doc("/workspaces/default.json", json!({"workspace": {"name": "topp"}}));
        server.put_doc("/workspaces/topp.json", json!({"workspace": {"name": "topp"}}));
        server.put_doc("/workspaces/sf.json", json!({"workspace": {"name": "sf"}}));

        server.put_doc(
            "/workspaces/topp/datastores.json",
            json!({"dataStores": {"dataStore": [
                {"name": "states_shapefile"},
                {"name": "shared"},
            ]}}),
        );
        server.put_doc("/workspaces/topp/coveragestores.json", json!({"coverageStores": ""}));
        server.put_doc(
            "/workspaces/sf/datastores.json",
            json!({"dataStores": {"dataStore": [{"name": "shared"}]}}),
        );
        server.put_doc(
            "/workspaces/sf/coveragestores.json",
            json!({"coverageStores": {"coverageStore": [{"name": "sfdem"}]}}),
        );

        server.put_doc(
            "/workspaces/topp/datastores/states_shapefile.json",
            json!({"dataStore": {
                "name": "states_shapefile",
                "enabled": true,
                "connectionParameters": {"url": "file:data/shapefiles/states.shp", "namespace": "topp"}
            }}),
        );
        server.put_doc(
            "/workspaces/topp/datastores/shared.json",
            json!({"dataStore": {"name": "shared", "enabled": true}}),
        );
        server.put_doc(
            "/workspaces/sf/datastores/shared.json",
            json!({"dataStore": {"name": "shared", "enabled": false}}),
        );
        server.put_doc(
            "/workspaces/sf/coveragestores/sfdem.json",
            json!({"coverageStore": {
                "name": "sfdem",
                "enabled": true,
                "type": "GeoTIFF",
                "url": "file:data/sf/sfdem.tif"
            }}),
        );

        server.put_doc(
            "/workspaces/topp/datastores/states_shapefile/featuretypes.json",
            json!({"featureTypes": {"featureType": [{"name": "states"}]}}),
        );
        server.put_doc(
            "/workspaces/topp/datastores/shared/featuretypes.json",
            json!({"featureTypes": {"featureType": [{"name": "lakes"}]}}),
        );
        server.put_doc(
            "/workspaces/sf/datastores/shared/featuretypes.json",
            json!({"featureTypes": {"featureType": [{"name": "lakes"}]}}),
        );
        server.put_doc(
            "/workspaces/sf/coveragestores/sfdem/coverages.json",
            json!({"coverages": {"coverage": [{"name": "sfdem"}]}}),
        );

        server.put_doc(
            "/workspaces/topp/datastores/states_shapefile/featuretypes/states.json",
            json!({"featureType": {
                "name": "states",
                "title": "USA Population",
                "abstract": "Census data",
                "keywords": {"string": ["census", "boundaries"]},
                "nativeBoundingBox": {
                    "minx": -124.731_422,
                    "miny": 24.955_967,
                    "maxx": -66.969_849,
                    "maxy": 49.371_735,
                    "crs": "EPSG:4326"
                },
                "latLonBoundingBox": {
                    "minx": -124.731_422,
                    "miny": 24.955_967,
                    "maxx": -66.969_849,
                    "maxy": 49.371_735,
                    "crs": "EPSG:4326"
                },
                "srs": "EPSG:4326",
                "projectionPolicy": "FORCE_DECLARED",
                "enabled": true,
                "metadata": {"cachingEnabled": "false"},
                "attributes": {"attribute": [{"name": "STATE_NAME"}, {"name": "PERSONS"}]}
            }}),
        );
        server.put_doc(
            "/workspaces/topp/datastores/shared/featuretypes/lakes.json",
            json!({"featureType": {"name": "lakes", "title": "Lakes of topp"}}),
        );
        server.put_doc(
            "/workspaces/sf/datastores/shared/featuretypes/lakes.json",
            json!({"featureType": {"name": "lakes", "title": "Lakes of sf"}}),
        );
        server.put_doc(
            "/workspaces/sf/coveragestores/sfdem/coverages/sfdem.json",
            json!({"coverage": {
                "name": "sfdem",
                "title": "Digital elevation model",
                "description": "Elevation in meters",
                "enabled": "true",
                "dimensions": {"coverageDimension": [{"name": "GRAY_INDEX"}]}
            }}),
        );

        server.put_doc(
            "/layers.json",
            json!({"layers": {"layer": [{"name": "states"}, {"name": "sfdem"}]}}),
        );
        server.put_doc(
            "/layers/states.json",
            json!({"layer": {
                "name": "states",
                "enabled": true,
                "defaultStyle": {"name": "population"},
                "styles": {"style": [{"name": "polygon"}]},
                "resource": {
                    "@class": "featureType",
                    "name": "states",
                    "href": format!("{BASE}/workspaces/topp/datastores/states_shapefile/featuretypes/states.json")
                },
                "attribution": {
                    "title": "USGS",
                    "href": "http://usgs.gov",
                    "logoURL": "http://usgs.gov/logo.png",
                    "logoWidth": 100,
                    "logoHeight": 50,
                    "logoType": "image/png"
                }
            }}),
        );
        server.put_doc(
            "/layers/sfdem.json",
            json!({"layer": {
                "name": "sfdem",
                "enabled": true,
                "defaultStyle": {"name": "raster"},
                "resource": {
                    "@class": "coverage",
                    "name": "sfdem",
                    "href": format!("{BASE}/workspaces/sf/coveragestores/sfdem/coverages/sfdem.json")
                }
            }}),
        );

        server.put_doc(
            "/layergroups.json",
            json!({"layerGroups": {"layerGroup": [{"name": "spearfish"}]}}),
        );
        server.put_doc(
            "/layergroups/spearfish.json",
            json!({"layerGroup": {
                "name": "spearfish",
                "layers": {"layer": [{"name": "sfdem"}, {"name": "states"}]},
                "styles": {"style": [{"name": "raster"}, {"name": "population"}]},
                "bounds": {"minx": 589_425.0, "miny": 4_913_959.0, "maxx": 609_518.0, "maxy": 4_928_082.0, "crs": "EPSG:26713"}
            }}),
        );

        server.put_doc(
            "/styles.json",
            json!({"styles": {"style": [{"name": "population"}, {"name": "polygon"}, {"name": "raster"}]}}),
        );
        server.put_doc(
            "/styles/population.json",
            json!({"style": {"name": "population", "filename": "population.sld"}}),
        );
        server.put_doc(
            "/styles/polygon.json",
            json!({"style": {"name": "polygon", "filename": "polygon.sld"}}),
        );
        server.put_doc(
            "/styles/raster.json",
            json!({"style": {"name": "raster", "filename": "raster.sld"}}),
        );
        server.texts.insert(
            full_path("/styles/population.sld"),
            concat!(
                "<StyledLayerDescriptor><NamedLayer><sld:Name>population</sld:Name>",
                "<UserStyle><Title>Population in the United States</Title></UserStyle>",
                "</NamedLayer></StyledLayerDescriptor>"
            )
            .to_string(),
        );

        Arc::new(server)
    }

    pub fn reject_mutations(&self, reject: bool) {
        self.reject_mutations.store(reject, Ordering::SeqCst);
    }

    /// How many GETs hit the path so far.
    pub fn gets_of(&self, path: &str) -> usize {
        let path = full_path(path);
        self.log
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|r| r.method == Method::Get && r.path == path)
            .count()
    }

    /// The most recent request with the given method, if any.
    pub fn last_request(&self, method: Method) -> Option<RequestRecord> {
        self.log
            .lock()
            .expect("lock poisoned")
            .iter()
            .rev()
            .find(|r| r.method == method)
            .cloned()
    }

    pub fn stored_doc(&self, path: &str) -> Option<Value> {
        self.docs.get(&full_path(path)).map(|d| d.value().clone())
    }

    fn put_doc(&self, path: &str, doc: Value) {
        self.docs.insert(full_path(path), doc);
    }

    fn handle_get(&self, path: &str) -> RawResponse {
        if let Some(text) = self.texts.get(path) {
            return respond(200, text.value().clone());
        }
        match self.docs.get(path) {
            Some(doc) => respond(200, doc.to_string()),
            None => respond(404, "no such resource"),
        }
    }

    fn handle_put(&self, path: &str, body: &[u8]) -> RawResponse {
        if path.ends_with(".sld") {
            self.texts
                .insert(path.to_string(), String::from_utf8_lossy(body).into_owned());
            return respond(200, "");
        }
        if is_upload(path) {
            return respond(201, "");
        }
        let Ok(update) = serde_json::from_slice::<Value>(body) else {
            return respond(400, "unparseable body");
        };
        let Some(mut stored) = self.docs.get_mut(path) else {
            return respond(404, "no such resource");
        };
        let Some((root_key, fields)) = single_member(&update) else {
            return respond(400, "expected a single root member");
        };
        if let (Some(target), Some(fields)) =
            (stored.get_mut(root_key).and_then(Value::as_object_mut), fields.as_object())
        {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        respond(200, "")
    }

    fn handle_post(&self, path: &str, body: &[u8]) -> RawResponse {
        let Some(collection) = path.rsplit('/').next() else {
            return respond(404, "");
        };
        if collection == "styles" {
            // Style creation takes an SLD body, not a catalog document.
            return respond(201, "");
        }
        let Ok(doc) = serde_json::from_slice::<Value>(body) else {
            return respond(400, "unparseable body");
        };
        let Some((_, fields)) = single_member(&doc) else {
            return respond(400, "expected a single root member");
        };
        let Some(name) = fields.get("name").and_then(Value::as_str).map(str::to_string) else {
            return respond(400, "missing name");
        };
        self.docs.insert(format!("{path}/{name}.json"), doc.clone());
        self.append_listing(path, &name);
        if collection == "workspaces" {
            self.docs
                .insert(format!("{path}/{name}/datastores.json"), json!({"dataStores": ""}));
            self.docs.insert(
                format!("{path}/{name}/coveragestores.json"),
                json!({"coverageStores": ""}),
            );
        }
        respond(201, "")
    }

    fn handle_delete(&self, path: &str) -> RawResponse {
        if self.docs.remove(path).is_none() {
            return respond(404, "no such resource");
        }
        if let Some((collection, name)) = path.strip_suffix(".json").and_then(|p| p.rsplit_once('/'))
        {
            self.remove_from_listing(collection, name);
        }
        respond(200, "")
    }

    fn append_listing(&self, collection_path: &str, name: &str) {
        let Some((container, item)) = listing_keys(collection_path) else {
            return;
        };
        let listing_path = format!("{collection_path}.json");
        let mut doc = self
            .docs
            .entry(listing_path)
            .or_insert_with(|| json!({container: {item: []}}));
        let entry = json!({"name": name});
        match doc.get_mut(container) {
            Some(Value::Object(members)) => match members.get_mut(item) {
                Some(Value::Array(items)) => items.push(entry),
                _ => {
                    members.insert(item.to_string(), json!([entry]));
                }
            },
            _ => {
                *doc = json!({container: {item: [entry]}});
            }
        }
    }

    fn remove_from_listing(&self, collection_path: &str, name: &str) {
        let Some((container, item)) = listing_keys(collection_path) else {
            return;
        };
        let listing_path = format!("{collection_path}.json");
        if let Some(mut doc) = self.docs.get_mut(&listing_path) {
            if let Some(Value::Array(items)) = doc
                .get_mut(container)
                .and_then(|members| members.get_mut(item))
            {
                items.retain(|entry| entry.get("name").and_then(Value::as_str) != Some(name));
            }
        }
    }
}

#[async_trait]
impl Transport for FakeServer {
    async fn request(&self, request: RawRequest) -> CatalogResult<RawResponse> {
        let path_with_query = match request.url.query() {
            Some(query) => format!("{}?{query}", request.url.path()),
            None => request.url.path().to_string(),
        };
        self.log.lock().expect("lock poisoned").push(RequestRecord {
            method: request.method,
            path: path_with_query,
            body: request.body.clone(),
            content_type: request.content_type.clone(),
        });

        if request.method != Method::Get && self.reject_mutations.load(Ordering::SeqCst) {
            return Ok(respond(500, "mutations rejected"));
        }

        let body = request.body.as_deref().unwrap_or_default();
        let path = request.url.path();
        Ok(match request.method {
            Method::Get => self.handle_get(path),
            Method::Put => self.handle_put(path, body),
            Method::Post => self.handle_post(path, body),
            Method::Delete => self.handle_delete(path),
        })
    }
}

fn listing_keys(collection_path: &str) -> Option<(&'static str, &'static str)> {
    match collection_path.rsplit('/').next()? {
        "workspaces" => Some(("workspaces", "workspace")),
        "datastores" => Some(("dataStores", "dataStore")),
        "coveragestores" => Some(("coverageStores", "coverageStore")),
        "featuretypes" => Some(("featureTypes", "featureType")),
        "coverages" => Some(("coverages", "coverage")),
        "layers" => Some(("layers", "layer")),
        "layergroups" => Some(("layerGroups", "layerGroup")),
        "styles" => Some(("styles", "style")),
        _ => None,
    }
}

fn single_member(doc: &Value) -> Option<(&str, &Value)> {
    let obj = doc.as_object()?;
    let mut members = obj.iter();
    let (key, value) = members.next()?;
    if members.next().is_some() {
        return None;
    }
    Some((key.as_str(), value))
}

fn respond(status: u16, body: impl Into<String>) -> RawResponse {
    RawResponse {
        status,
        body: Bytes::from(body.into()),
    }
}

fn full_path(path: &str) -> String {
    format!("/geoserver/rest{path}")
}

/// A catalog wired to a seeded fake server with the default TTL.
pub fn seeded_catalog() -> (Arc<FakeServer>, Catalog) {
    seeded_catalog_with_ttl(Duration::from_secs(5))
}

pub fn seeded_catalog_with_ttl(ttl: Duration) -> (Arc<FakeServer>, Catalog) {
    init_logging();
    let server = FakeServer::seeded();
    let config = CatalogConfig::new(BASE.parse().expect("static url")).with_cache_ttl(ttl);
    let catalog = Catalog::with_transport(config, Arc::clone(&server) as Arc<dyn Transport>)
        .expect("valid base");
    (server, catalog)
}

fn is_upload(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.starts_with("file."))
}
