//! Per-kind field tables and the decode/encode rules between logical fields
//! and the wire documents.
//!
//! Encoding is deliberately partial: only the fields present in an entity's
//! dirty set are emitted, which is what makes diff saves possible without a
//! prior read of the full resource.

use std::collections::BTreeMap;

use log::debug;
use serde_json::{Map, Value, json};

use crate::document::{as_flag, as_items, as_text, lookup};
use crate::value::{Attribution, Bounds, FieldValue};

/// The closed set of entity kinds, each with its own codec table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A named container of stores.
    Workspace,
    /// A vector data store.
    DataStore,
    /// A raster data store.
    CoverageStore,
    /// A vector resource within a data store.
    FeatureType,
    /// A raster resource within a coverage store.
    Coverage,
    /// A published map layer.
    Layer,
    /// An ordered, index-styled grouping of layers.
    LayerGroup,
    /// A styling document's metadata.
    Style,
}

impl ResourceKind {
    /// The codec table for this kind.
    #[must_use]
    pub fn codec(self) -> &'static Codec {
        match self {
            Self::Workspace => &WORKSPACE,
            Self::DataStore => &DATA_STORE,
            Self::CoverageStore => &COVERAGE_STORE,
            Self::FeatureType => &FEATURE_TYPE,
            Self::Coverage => &COVERAGE,
            Self::Layer => &LAYER,
            Self::LayerGroup => &LAYER_GROUP,
            Self::Style => &STYLE,
        }
    }

    /// Human-readable kind name used in error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::DataStore => "data store",
            Self::CoverageStore => "coverage store",
            Self::FeatureType => "feature type",
            Self::Coverage => "coverage",
            Self::Layer => "layer",
            Self::LayerGroup => "layer group",
            Self::Style => "style",
        }
    }
}

/// The shape a field's values must take, driving both directions of the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// `true`/`false`, rendered as a JSON boolean on write and accepted as
    /// either a boolean or a string on read.
    Flag,
    /// A bounding box object (`minx`/`miny`/`maxx`/`maxy`/`crs`).
    Bounds,
    /// A bare string list.
    List,
    /// A list of `{"name": …}` objects, exposed as the list of names.
    NameList,
    /// A flat string-to-string map.
    Entries,
    /// A layer attribution object.
    Attribution,
}

impl FieldKind {
    /// Whether `value` has the shape this kind declares.
    #[must_use]
    pub fn accepts(self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Self::Text, FieldValue::Text(_))
                | (Self::Flag, FieldValue::Flag(_))
                | (Self::Bounds, FieldValue::Bounds(_))
                | (Self::List | Self::NameList, FieldValue::List(_))
                | (Self::Entries, FieldValue::Entries(_))
                | (Self::Attribution, FieldValue::Attribution(_))
        )
    }

    /// The shape name used in [`CatalogError::FieldType`] messages.
    ///
    /// [`CatalogError::FieldType`]: crate::error::CatalogError::FieldType
    #[must_use]
    pub fn expected(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Flag => "flag",
            Self::Bounds => "bounding box",
            Self::List | Self::NameList => "name list",
            Self::Entries => "key/value entries",
            Self::Attribution => "attribution",
        }
    }
}

/// One logical field: its name, its path into the wire document, and its
/// value shape.
#[derive(Debug)]
pub struct FieldSpec {
    /// The logical field name used by `get`/`set`.
    pub name: &'static str,
    /// Member path below the document's root element.
    pub path: &'static [&'static str],
    /// The declared value shape.
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(name: &'static str, path: &'static [&'static str], kind: FieldKind) -> Self {
        Self { name, path, kind }
    }
}

/// The codec table of one entity kind.
#[derive(Debug)]
pub struct Codec {
    /// Root member wrapping the entity document, e.g. `featureType`.
    pub root: &'static str,
    /// The declared fields.
    pub fields: &'static [FieldSpec],
}

impl Codec {
    /// Looks a field up by its logical name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

use FieldKind::{Attribution as AttributionKind, Bounds as BoundsKind, Entries, Flag, List,
                NameList, Text};

static WORKSPACE: Codec = Codec {
    root: "workspace",
    fields: &[FieldSpec::new("name", &["name"], Text)],
};

static DATA_STORE: Codec = Codec {
    root: "dataStore",
    fields: &[
        FieldSpec::new("name", &["name"], Text),
        FieldSpec::new("enabled", &["enabled"], Flag),
        FieldSpec::new("connection_parameters", &["connectionParameters"], Entries),
    ],
};

static COVERAGE_STORE: Codec = Codec {
    root: "coverageStore",
    fields: &[
        FieldSpec::new("name", &["name"], Text),
        FieldSpec::new("enabled", &["enabled"], Flag),
        FieldSpec::new("type", &["type"], Text),
        FieldSpec::new("url", &["url"], Text),
        FieldSpec::new("description", &["description"], Text),
    ],
};

static FEATURE_TYPE: Codec = Codec {
    root: "featureType",
    fields: &[
        FieldSpec::new("name", &["name"], Text),
        FieldSpec::new("title", &["title"], Text),
        FieldSpec::new("abstract", &["abstract"], Text),
        FieldSpec::new("keywords", &["keywords", "string"], List),
        FieldSpec::new("native_bbox", &["nativeBoundingBox"], BoundsKind),
        FieldSpec::new("latlon_bbox", &["latLonBoundingBox"], BoundsKind),
        FieldSpec::new("projection", &["srs"], Text),
        FieldSpec::new("projection_policy", &["projectionPolicy"], Text),
        FieldSpec::new("enabled", &["enabled"], Flag),
        FieldSpec::new("metadata", &["metadata"], Entries),
        FieldSpec::new("attributes", &["attributes", "attribute"], NameList),
    ],
};

static COVERAGE: Codec = Codec {
    root: "coverage",
    fields: &[
        FieldSpec::new("name", &["name"], Text),
        FieldSpec::new("title", &["title"], Text),
        // The raster family calls its abstract a description.
        FieldSpec::new("abstract", &["description"], Text),
        FieldSpec::new("keywords", &["keywords", "string"], List),
        FieldSpec::new("native_bbox", &["nativeBoundingBox"], BoundsKind),
        FieldSpec::new("latlon_bbox", &["latLonBoundingBox"], BoundsKind),
        FieldSpec::new("projection", &["srs"], Text),
        FieldSpec::new("projection_policy", &["projectionPolicy"], Text),
        FieldSpec::new("enabled", &["enabled"], Flag),
        FieldSpec::new("metadata", &["metadata"], Entries),
        FieldSpec::new("dimensions", &["dimensions", "coverageDimension"], NameList),
    ],
};

static LAYER: Codec = Codec {
    root: "layer",
    fields: &[
        FieldSpec::new("name", &["name"], Text),
        FieldSpec::new("enabled", &["enabled"], Flag),
        FieldSpec::new("default_style", &["defaultStyle", "name"], Text),
        FieldSpec::new("styles", &["styles", "style"], NameList),
        FieldSpec::new("resource", &["resource", "href"], Text),
        FieldSpec::new("attribution", &["attribution"], AttributionKind),
    ],
};

static LAYER_GROUP: Codec = Codec {
    root: "layerGroup",
    fields: &[
        FieldSpec::new("name", &["name"], Text),
        FieldSpec::new("layers", &["layers", "layer"], NameList),
        FieldSpec::new("styles", &["styles", "style"], NameList),
        FieldSpec::new("bounds", &["bounds"], BoundsKind),
    ],
};

static STYLE: Codec = Codec {
    root: "style",
    fields: &[
        FieldSpec::new("name", &["name"], Text),
        FieldSpec::new("filename", &["filename"], Text),
    ],
};

/// Decodes one field from an entity's root element.
///
/// Missing or unparseable optional sub-elements resolve to `None`; the
/// mandatory `name` field is checked separately when the document is loaded.
#[must_use]
pub fn decode_field(root: &Value, spec: &FieldSpec) -> Option<FieldValue> {
    let value = lookup(root, spec.path)?;
    match spec.kind {
        FieldKind::Text => as_text(value).map(FieldValue::Text),
        FieldKind::Flag => as_flag(value).map(FieldValue::Flag),
        FieldKind::Bounds => decode_bounds(value).map(FieldValue::Bounds),
        FieldKind::List => Some(FieldValue::List(
            as_items(value).into_iter().filter_map(as_text).collect(),
        )),
        FieldKind::NameList => Some(FieldValue::List(
            as_items(value)
                .into_iter()
                .filter_map(|item| item.get("name").and_then(as_text))
                .collect(),
        )),
        FieldKind::Entries => decode_entries(value).map(FieldValue::Entries),
        FieldKind::Attribution => decode_attribution(value).map(FieldValue::Attribution),
    }
}

/// Encodes the dirty fields of an entity into a minimal update document.
///
/// The result always carries the kind's root member, even when the dirty set
/// is empty: an empty update is well-formed and the decision to skip the save
/// belongs to the caller.
#[must_use]
pub fn encode_dirty(codec: &Codec, dirty: &BTreeMap<&'static str, FieldValue>) -> Value {
    let mut root = Map::new();
    for (name, value) in dirty {
        let Some(spec) = codec.field(name) else {
            continue;
        };
        let Some(encoded) = encode_value(spec.kind, value) else {
            debug!("Skipping incomplete value for field {name} of {root_el}", root_el = codec.root);
            continue;
        };
        insert_at(&mut root, spec.path, encoded);
    }
    let mut doc = Map::new();
    doc.insert(codec.root.to_string(), Value::Object(root));
    Value::Object(doc)
}

fn insert_at(target: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            target.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = target
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = entry {
                insert_at(inner, rest, value);
            }
        }
    }
}

fn encode_value(kind: FieldKind, value: &FieldValue) -> Option<Value> {
    match (kind, value) {
        (FieldKind::Text, FieldValue::Text(s)) => Some(Value::String(s.clone())),
        (FieldKind::Flag, FieldValue::Flag(b)) => Some(Value::Bool(*b)),
        (FieldKind::Bounds, FieldValue::Bounds(b)) => encode_bounds(b),
        (FieldKind::List, FieldValue::List(items)) => Some(json!(items)),
        (FieldKind::NameList, FieldValue::List(items)) => Some(Value::Array(
            items.iter().map(|name| json!({ "name": name })).collect(),
        )),
        (FieldKind::Entries, FieldValue::Entries(map)) => Some(json!(map)),
        (FieldKind::Attribution, FieldValue::Attribution(a)) => Some(encode_attribution(a)),
        _ => None,
    }
}

fn decode_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn decode_bounds(value: &Value) -> Option<Bounds> {
    value.as_object().map(|obj| Bounds {
        min_x: obj.get("minx").and_then(decode_number),
        min_y: obj.get("miny").and_then(decode_number),
        max_x: obj.get("maxx").and_then(decode_number),
        max_y: obj.get("maxy").and_then(decode_number),
        crs: obj.get("crs").and_then(as_text),
    })
}

fn encode_bounds(bounds: &Bounds) -> Option<Value> {
    // A partially specified box encodes as absent.
    if !bounds.is_complete() {
        return None;
    }
    let mut obj = Map::new();
    obj.insert("minx".to_string(), json!(bounds.min_x));
    obj.insert("miny".to_string(), json!(bounds.min_y));
    obj.insert("maxx".to_string(), json!(bounds.max_x));
    obj.insert("maxy".to_string(), json!(bounds.max_y));
    if let Some(crs) = &bounds.crs {
        obj.insert("crs".to_string(), json!(crs));
    }
    Some(Value::Object(obj))
}

fn decode_entries(value: &Value) -> Option<BTreeMap<String, String>> {
    value.as_object().map(|obj| {
        obj.iter()
            .filter_map(|(k, v)| as_text(v).map(|v| (k.clone(), v)))
            .collect()
    })
}

fn decode_attribution(value: &Value) -> Option<Attribution> {
    value.as_object().map(|obj| Attribution {
        title: obj.get("title").and_then(as_text),
        href: obj.get("href").and_then(as_text),
        logo_url: obj.get("logoURL").and_then(as_text),
        logo_width: obj.get("logoWidth").and_then(decode_dimension),
        logo_height: obj.get("logoHeight").and_then(decode_dimension),
        logo_type: obj.get("logoType").and_then(as_text),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn decode_dimension(value: &Value) -> Option<u32> {
    decode_number(value).filter(|n| *n >= 0.0).map(|n| n as u32)
}

fn encode_attribution(attribution: &Attribution) -> Value {
    let mut obj = Map::new();
    if let Some(title) = &attribution.title {
        obj.insert("title".to_string(), json!(title));
    }
    if let Some(href) = &attribution.href {
        obj.insert("href".to_string(), json!(href));
    }
    if let Some(logo_url) = &attribution.logo_url {
        obj.insert("logoURL".to_string(), json!(logo_url));
    }
    if let Some(width) = attribution.logo_width {
        obj.insert("logoWidth".to_string(), json!(width));
    }
    if let Some(height) = attribution.logo_height {
        obj.insert("logoHeight".to_string(), json!(height));
    }
    if let Some(logo_type) = &attribution.logo_type {
        obj.insert("logoType".to_string(), json!(logo_type));
    }
    Value::Object(obj)
}
