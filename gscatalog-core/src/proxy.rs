use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::LazyLock;

use log::trace;
use serde_json::Value;
use url::Url;

use crate::codec::{ResourceKind, decode_field, encode_dirty};
use crate::document::{Document, as_text, lookup};
use crate::error::{CatalogError, CatalogResult};
use crate::remote::Remote;
use crate::value::FieldValue;

// Fallback address for the impossible deleted-while-unbound state.
static ORPHAN_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("urn:gscatalog:orphan").expect("static URL"));

/// Where an entity stands in its creation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Client-constructed; no confirmed catalog address yet.
    Unbound,
    /// A create call has been issued but not confirmed.
    PendingCreate,
    /// The address is confirmed; the entity may be loaded, saved, deleted.
    Bound,
    /// Terminal; every further operation fails with `NotFound`.
    Deleted,
}

/// The lazy dirty-tracking proxy every entity kind wraps.
///
/// A field read returns the locally set ("dirty") value if one exists, else
/// decodes the backing document, fetching it on first use. A field write
/// only touches the dirty set; nothing reaches the network until the catalog
/// saves the entity. Exclusive access (`&mut self`) serializes all dirty-set
/// mutation.
#[derive(Debug, Clone)]
pub struct ResourceProxy {
    kind: ResourceKind,
    name: String,
    url: Option<Url>,
    binding: Binding,
    remote: Remote,
    backing: Option<Arc<Document>>,
    loaded_epoch: u64,
    dirty: BTreeMap<&'static str, FieldValue>,
}

impl ResourceProxy {
    /// A proxy bound to a confirmed catalog address.
    #[must_use]
    pub fn bound(remote: Remote, kind: ResourceKind, name: impl Into<String>, url: Url) -> Self {
        Self {
            kind,
            name: name.into(),
            url: Some(url),
            binding: Binding::Bound,
            remote,
            backing: None,
            loaded_epoch: 0,
            dirty: BTreeMap::new(),
        }
    }

    /// A client-constructed proxy with no confirmed address.
    ///
    /// The name is seeded into the dirty set so a write-only creation flow
    /// serializes a valid document without ever reading from the server.
    #[must_use]
    pub fn unbound(remote: Remote, kind: ResourceKind, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut dirty = BTreeMap::new();
        dirty.insert("name", FieldValue::Text(name.clone()));
        Self {
            kind,
            name,
            url: None,
            binding: Binding::Unbound,
            remote,
            backing: None,
            loaded_epoch: 0,
            dirty,
        }
    }

    /// The entity kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The entity name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The confirmed catalog address, if the entity has one.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The lifecycle state.
    #[must_use]
    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// The shared remote gateway.
    #[must_use]
    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    /// Whether any field has been locally modified.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// The names of the locally modified fields.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dirty.keys().copied()
    }

    /// Reads a logical field.
    ///
    /// Returns the dirty value if one is set; otherwise loads the backing
    /// document on first use and decodes the field from it, resolving to
    /// `None` when the document lacks it. Reading an undeclared field fails
    /// with [`CatalogError::UnsupportedField`]; reading a deleted entity
    /// fails with [`CatalogError::NotFound`].
    pub async fn get(&mut self, field: &str) -> CatalogResult<Option<FieldValue>> {
        let spec = self
            .kind
            .codec()
            .field(field)
            .ok_or_else(|| self.unsupported(field))?;
        if self.binding == Binding::Deleted {
            return Err(self.gone());
        }
        if let Some(value) = self.dirty.get(spec.name) {
            trace!("Dirty hit for {field} on {kind}", kind = self.kind.label());
            return Ok(Some(value.clone()));
        }
        if self.url.is_none() {
            // Unbound entities have nothing remote to read from.
            return Ok(None);
        }
        self.ensure_loaded().await?;
        Ok(self
            .backing
            .as_ref()
            .and_then(|doc| doc.root(self.kind.codec().root))
            .and_then(|root| decode_field(root, spec)))
    }

    /// Records a local modification.
    ///
    /// Never touches the network and performs no cross-field validation. An
    /// undeclared field or a value of the wrong shape is rejected without
    /// changing the dirty set.
    pub fn set(&mut self, field: &str, value: FieldValue) -> CatalogResult<()> {
        let spec = self
            .kind
            .codec()
            .field(field)
            .ok_or_else(|| self.unsupported(field))?;
        if !spec.kind.accepts(&value) {
            return Err(CatalogError::FieldType {
                kind: self.kind.label(),
                field: field.to_string(),
                expected: spec.kind.expected(),
            });
        }
        if self.binding == Binding::Deleted {
            return Err(self.gone());
        }
        self.dirty.insert(spec.name, value);
        Ok(())
    }

    /// Fetches and validates the backing document if it is absent or stale.
    ///
    /// Idempotent: at most one fetch per entity per cache-invalidation
    /// epoch. Fails with [`CatalogError::NotFound`] when the server reports
    /// no such resource and [`CatalogError::MalformedResponse`] when the
    /// document lacks the expected root element or its mandatory name.
    pub async fn ensure_loaded(&mut self) -> CatalogResult<()> {
        if self.binding == Binding::Deleted {
            return Err(self.gone());
        }
        let Some(url) = self.url.clone() else {
            return Ok(());
        };
        let epoch = self.remote.epoch();
        if self.backing.is_some() && self.loaded_epoch == epoch {
            return Ok(());
        }
        let document = self.remote.document(&url).await?;
        let codec = self.kind.codec();
        let root = document.root(codec.root).ok_or_else(|| {
            CatalogError::MalformedResponse {
                url: url.clone(),
                reason: format!("missing root element {:?}", codec.root),
            }
        })?;
        // Identity is mandatory; its absence is fatal where any other
        // field's absence is not.
        let name = lookup(root, &["name"]).and_then(as_text).ok_or_else(|| {
            CatalogError::MalformedResponse {
                url: url.clone(),
                reason: "missing mandatory name field".to_string(),
            }
        })?;
        self.name = name;
        self.backing = Some(Arc::clone(&document));
        self.loaded_epoch = epoch;
        Ok(())
    }

    /// Emits the minimal update document covering only the dirty fields.
    ///
    /// Well-formed even when nothing is dirty; the caller decides whether an
    /// empty update is worth sending.
    #[must_use]
    pub fn serialize_for_save(&self) -> Value {
        encode_dirty(self.kind.codec(), &self.dirty)
    }

    /// Drops the dirty set and the backing document.
    ///
    /// Called after a successful save so subsequent reads re-fetch the
    /// server's confirmed state.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
        self.backing = None;
    }

    /// Confirms the entity's catalog address after a successful create.
    pub fn bind(&mut self, url: Url) {
        self.url = Some(url);
        self.binding = Binding::Bound;
    }

    /// Records that a create call is in flight.
    ///
    /// An entity stays in this state until the server confirms the create;
    /// a failed create never promotes it to `Bound`.
    pub fn mark_pending(&mut self) {
        if matches!(self.binding, Binding::Unbound | Binding::PendingCreate) {
            self.binding = Binding::PendingCreate;
        }
    }

    /// Marks the entity as removed from the catalog. Terminal.
    pub fn mark_deleted(&mut self) {
        self.binding = Binding::Deleted;
    }

    fn unsupported(&self, field: &str) -> CatalogError {
        CatalogError::UnsupportedField {
            kind: self.kind.label(),
            field: field.to_string(),
        }
    }

    fn gone(&self) -> CatalogError {
        let url = self.url.clone().unwrap_or_else(|| ORPHAN_URL.clone());
        CatalogError::NotFound(url)
    }
}
