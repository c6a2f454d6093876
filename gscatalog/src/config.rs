use std::time::Duration;

use gscatalog_core::DEFAULT_TTL;
use serde::{Deserialize, Serialize};
use url::Url;

/// Connection settings for a [`Catalog`](crate::Catalog).
///
/// All state a client needs is carried here explicitly; there is no ambient
/// credential or opener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Address of the REST API root, e.g. `http://localhost:8080/geoserver/rest`.
    pub base_url: Url,
    /// Basic-auth user.
    pub username: String,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Freshness window of the response cache.
    #[serde(with = "humantime_serde", default = "default_ttl")]
    pub cache_ttl: Duration,
}

fn default_ttl() -> Duration {
    DEFAULT_TTL
}

impl CatalogConfig {
    /// Settings for `base_url` with the stock credentials of a fresh server.
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        // A trailing slash would produce double-slash catalog addresses.
        let trimmed = base_url.path().trim_end_matches('/').to_string();
        base_url.set_path(&trimmed);
        Self {
            base_url,
            username: "admin".to_string(),
            password: Some("geoserver".to_string()),
            cache_ttl: DEFAULT_TTL,
        }
    }

    /// Replaces the credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: Option<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password;
        self
    }

    /// Replaces the cache freshness window.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}
