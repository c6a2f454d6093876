use async_trait::async_trait;
use gscatalog_core::{CatalogError, CatalogResult, Method, RawRequest, RawResponse, Transport};
use log::trace;
use reqwest::header::ACCEPT;

use crate::config::CatalogConfig;

const USER_AGENT: &str = concat!("gscatalog/", env!("CARGO_PKG_VERSION"));

/// The reqwest-backed [`Transport`].
///
/// Owns basic-auth credentials and the JSON accept header; timeouts, TLS,
/// and connection pooling are reqwest's. Everything above this type only
/// sees statuses and bodies.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    username: String,
    password: Option<String>,
}

impl HttpTransport {
    /// Builds a transport from the catalog settings.
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(CatalogError::transport)?;
        Ok(Self {
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: RawRequest) -> CatalogResult<RawResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };
        trace!("{method} {url}", url = request.url);

        let mut builder = self
            .client
            .request(method, request.url.clone())
            .basic_auth(&self.username, self.password.as_deref())
            .header(ACCEPT, "application/json");
        if let Some(content_type) = &request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(CatalogError::transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(CatalogError::transport)?;
        Ok(RawResponse { status, body })
    }
}
