use std::sync::LazyLock;

use gscatalog_core::{Binding, CatalogError, CatalogResult, Remote, ResourceKind, ResourceProxy};
use regex::Regex;
use url::Url;

use super::{CatalogEntity, entity_common, text_field};
use crate::paths;

static SLD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:\w+:)?Name[^>]*>\s*([^<]*?)\s*</(?:\w+:)?Name>").expect("static regex"));
static SLD_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:\w+:)?Title[^>]*>\s*([^<]*?)\s*</(?:\w+:)?Title>").expect("static regex"));

/// A style's catalog metadata.
///
/// The style body itself is a separate SLD document served from its own
/// address; [`Style::sld_body`] fetches it independently of the metadata
/// document, and [`Style::sld_name`]/[`Style::sld_title`] expose the first
/// name/title element found in it.
#[derive(Debug, Clone)]
pub struct Style {
    pub(crate) proxy: ResourceProxy,
    sld_url: Url,
}

impl Style {
    pub(crate) fn bound(remote: Remote, base: &Url, name: &str) -> CatalogResult<Self> {
        let url = paths::style(base, name)?;
        let sld_url = paths::style_sld(base, name)?;
        Ok(Self {
            proxy: ResourceProxy::bound(remote, ResourceKind::Style, name, url),
            sld_url,
        })
    }

    entity_common!();

    text_field!(
        /// The file the server stores the style body under.
        "filename", filename, set_filename
    );

    /// The style-body (SLD) document.
    pub async fn sld_body(&mut self) -> CatalogResult<String> {
        if self.proxy.binding() == Binding::Deleted {
            return Err(CatalogError::NotFound(self.sld_url.clone()));
        }
        let text = self.proxy.remote().text(&self.sld_url).await?;
        Ok(text.to_string())
    }

    /// The first name element of the style body.
    pub async fn sld_name(&mut self) -> CatalogResult<Option<String>> {
        let body = self.sld_body().await?;
        Ok(first_capture(&SLD_NAME, &body))
    }

    /// The first title element of the style body.
    pub async fn sld_title(&mut self) -> CatalogResult<Option<String>> {
        let body = self.sld_body().await?;
        Ok(first_capture(&SLD_TITLE, &body))
    }
}

fn first_capture(pattern: &Regex, body: &str) -> Option<String> {
    pattern
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

impl CatalogEntity for Style {
    fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    fn proxy_mut(&mut self) -> &mut ResourceProxy {
        &mut self.proxy
    }

    fn collection_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::styles_collection(base)
    }

    fn canonical_url(&self, base: &Url) -> CatalogResult<Url> {
        paths::style(base, self.proxy.name())
    }
}
