use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::{debug, trace};
use url::Url;

use crate::cache::{CachedBody, ResponseCache};
use crate::document::Document;
use crate::error::{CatalogError, CatalogResult};
use crate::transport::{RawRequest, RawResponse, Transport};

/// Shared gateway to the remote service: transport plus response cache plus
/// the invalidation epoch.
///
/// Every entity holds a clone, so a lazy field read can fetch its backing
/// document without the catalog façade in hand. The epoch counter lets
/// entities that already hold a decoded document notice that a mutation has
/// happened since they loaded it.
#[derive(Debug, Clone)]
pub struct Remote {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    epoch: AtomicU64,
}

impl Remote {
    /// Combines a transport with a fresh cache using the given TTL.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                cache: ResponseCache::new(ttl),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// The current cache-invalidation epoch.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::Acquire)
    }

    /// Clears the response cache and advances the epoch.
    ///
    /// Called after every successful mutation. The clear is coarse on
    /// purpose: a mutation can change sibling and parent listing documents,
    /// and the cache tracks no dependencies between addresses.
    pub fn invalidate(&self) {
        self.inner.cache.clear();
        let epoch = self.inner.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("Response cache cleared, epoch now {epoch}");
    }

    /// The parsed document at `url`, from cache or a fresh fetch.
    pub async fn document(&self, url: &Url) -> CatalogResult<Arc<Document>> {
        if let Some(CachedBody::Json(doc)) = self.inner.cache.get(url).await {
            trace!("Cache HIT for {url}");
            return Ok(doc);
        }
        trace!("Cache MISS for {url}");
        let response = self.fetch(url).await?;
        let document = Document::parse(&response.body).map_err(|e| {
            CatalogError::MalformedResponse {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;
        let document = Arc::new(document);
        self.inner
            .cache
            .insert(url.clone(), CachedBody::Json(Arc::clone(&document)))
            .await;
        Ok(document)
    }

    /// The raw text body at `url`, from cache or a fresh fetch.
    ///
    /// Used for the style-body (SLD) documents, which are not JSON.
    pub async fn text(&self, url: &Url) -> CatalogResult<Arc<str>> {
        if let Some(CachedBody::Text(text)) = self.inner.cache.get(url).await {
            trace!("Cache HIT for {url}");
            return Ok(text);
        }
        trace!("Cache MISS for {url}");
        let response = self.fetch(url).await?;
        let text: Arc<str> = Arc::from(String::from_utf8_lossy(&response.body).into_owned());
        self.inner
            .cache
            .insert(url.clone(), CachedBody::Text(Arc::clone(&text)))
            .await;
        Ok(text)
    }

    /// Performs an uncached request.
    ///
    /// Mutations go through here; on success the caller is responsible for
    /// [`Remote::invalidate`].
    pub async fn execute(&self, request: RawRequest) -> CatalogResult<RawResponse> {
        self.inner.transport.request(request).await
    }

    // A failed fetch is never cached; it propagates with the URL and status.
    async fn fetch(&self, url: &Url) -> CatalogResult<RawResponse> {
        debug!("Fetching {url}");
        let response = self
            .inner
            .transport
            .request(RawRequest::get(url.clone()))
            .await?;
        match response.status {
            404 => Err(CatalogError::NotFound(url.clone())),
            status if !response.is_success() => Err(CatalogError::Fetch {
                url: url.clone(),
                status,
            }),
            _ => Ok(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;

    /// Serves a scripted sequence of responses and counts requests.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<RawResponse>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| RawResponse {
                            status,
                            body: Bytes::from_static(body.as_bytes()),
                        })
                        .collect(),
                ),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn request(&self, _request: RawRequest) -> CatalogResult<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .expect("lock poisoned")
                .pop_front()
                .ok_or_else(|| CatalogError::transport(std::io::Error::other("script exhausted")))
        }
    }

    fn url() -> Url {
        "http://localhost:8080/geoserver/rest/workspaces.json"
            .parse()
            .expect("static url")
    }

    fn remote(transport: &Arc<ScriptedTransport>) -> Remote {
        Remote::new(
            Arc::clone(transport) as Arc<dyn Transport>,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let transport = ScriptedTransport::new([(200, r#"{"workspaces": ""}"#)]);
        let remote = remote(&transport);

        remote.document(&url()).await.expect("first fetch");
        remote.document(&url()).await.expect("cached read");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_a_fresh_fetch() {
        let transport = ScriptedTransport::new([
            (200, r#"{"workspaces": ""}"#),
            (200, r#"{"workspaces": ""}"#),
        ]);
        let remote = remote(&transport);

        remote.document(&url()).await.expect("first fetch");
        let before = remote.epoch();
        remote.invalidate();
        assert_eq!(remote.epoch(), before + 1);

        remote.document(&url()).await.expect("refetch");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn failures_are_never_cached() {
        let transport =
            ScriptedTransport::new([(500, "boom"), (200, r#"{"workspaces": ""}"#)]);
        let remote = remote(&transport);

        let err = remote.document(&url()).await.expect_err("first fetch fails");
        assert!(matches!(err, CatalogError::Fetch { status: 500, .. }));

        remote.document(&url()).await.expect("retry bypasses cache");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn missing_resources_surface_as_not_found() {
        let transport = ScriptedTransport::new([(404, "")]);
        let remote = remote(&transport);
        let err = remote.document(&url()).await.expect_err("404");
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn unparseable_bodies_surface_as_malformed() {
        let transport = ScriptedTransport::new([(200, "<html>not json</html>")]);
        let remote = remote(&transport);
        let err = remote.document(&url()).await.expect_err("parse error");
        assert!(matches!(err, CatalogError::MalformedResponse { .. }));
    }
}
