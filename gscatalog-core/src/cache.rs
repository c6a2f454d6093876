use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use url::Url;

use crate::document::Document;

/// Freshness window applied when the config does not override it.
///
/// The cache is a staleness bound, not a durability layer, so the window is
/// deliberately short.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// A cached response body: a parsed catalog document, or raw text for the
/// style-body (SLD) fetches.
#[derive(Debug, Clone)]
pub enum CachedBody {
    /// A parsed JSON document.
    Json(Arc<Document>),
    /// A raw text body.
    Text(Arc<str>),
}

/// Short-TTL map from catalog address to last-fetched response.
///
/// Entries expire `ttl` after insertion; any successful mutation clears the
/// whole cache, because the cache tracks no dependencies between a resource
/// and the listing documents that mention it.
#[derive(Clone)]
pub struct ResponseCache(Cache<Url, CachedBody>);

impl ResponseCache {
    /// Creates a cache with the given freshness window.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self(
            Cache::builder()
                .name("catalog_response_cache")
                .max_capacity(4096)
                .time_to_live(ttl)
                .build(),
        )
    }

    /// The still-fresh body for `url`, if any.
    pub async fn get(&self, url: &Url) -> Option<CachedBody> {
        self.0.get(url).await
    }

    /// Stores a freshly fetched body.
    pub async fn insert(&self, url: Url, body: CachedBody) {
        self.0.insert(url, body).await;
    }

    /// Discards every cached response.
    pub fn clear(&self) {
        self.0.invalidate_all();
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.0.entry_count())
            .finish()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc() -> CachedBody {
        CachedBody::Json(Arc::new(Document::new(json!({"workspace": {"name": "topp"}}))))
    }

    #[tokio::test]
    async fn entries_expire_after_the_ttl() {
        let cache = ResponseCache::new(Duration::from_millis(40));
        let url: Url = "http://localhost:8080/geoserver/rest/workspaces.json"
            .parse()
            .expect("static url");

        cache.insert(url.clone(), doc()).await;
        assert!(cache.get(&url).await.is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(cache.get(&url).await.is_none());
    }

    #[tokio::test]
    async fn clear_discards_fresh_entries() {
        let cache = ResponseCache::new(Duration::from_secs(5));
        let url: Url = "http://localhost:8080/geoserver/rest/layers.json"
            .parse()
            .expect("static url");

        cache.insert(url.clone(), doc()).await;
        cache.clear();
        assert!(cache.get(&url).await.is_none());
    }
}
