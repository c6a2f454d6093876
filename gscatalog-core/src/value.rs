use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A geographic extent with an optional CRS identifier.
///
/// Components may be set independently; a box is only written back to the
/// server once all four corners are present (see [`Bounds::is_complete`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Western edge.
    pub min_x: Option<f64>,
    /// Southern edge.
    pub min_y: Option<f64>,
    /// Eastern edge.
    pub max_x: Option<f64>,
    /// Northern edge.
    pub max_y: Option<f64>,
    /// Coordinate reference system, e.g. `EPSG:4326`.
    pub crs: Option<String>,
}

impl Bounds {
    /// A fully specified box without a CRS.
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: Some(min_x),
            min_y: Some(min_y),
            max_x: Some(max_x),
            max_y: Some(max_y),
            crs: None,
        }
    }

    /// Sets the CRS identifier.
    #[must_use]
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    /// Whether all four corners are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.min_x.is_some() && self.min_y.is_some() && self.max_x.is_some() && self.max_y.is_some()
    }
}

/// Data-provider attribution attached to a layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Natural-language identification of the provider.
    pub title: Option<String>,
    /// A URL with more information about the provider.
    pub href: Option<String>,
    /// The URL of the provider's logo image.
    pub logo_url: Option<String>,
    /// Logo width in pixels.
    pub logo_width: Option<u32>,
    /// Logo height in pixels.
    pub logo_height: Option<u32>,
    /// MIME type of the logo image.
    pub logo_type: Option<String>,
}

/// A value of one logical entity field.
///
/// The set of shapes is closed: every field an entity kind declares maps to
/// exactly one of these variants, and `set` rejects values of any other
/// shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text (titles, abstracts, projection identifiers, references).
    Text(String),
    /// A boolean toggle.
    Flag(bool),
    /// A bounding box.
    Bounds(Bounds),
    /// An ordered list of names or keywords.
    List(Vec<String>),
    /// An open-ended string-to-string map.
    Entries(BTreeMap<String, String>),
    /// A layer attribution record.
    Attribution(Attribution),
}

impl FieldValue {
    /// A [`FieldValue::Text`] from anything string-like.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// A [`FieldValue::List`] from an iterator of names.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Borrows the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes into text.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes into a flag.
    #[must_use]
    pub fn into_flag(self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(b),
            _ => None,
        }
    }

    /// Consumes into a bounding box.
    #[must_use]
    pub fn into_bounds(self) -> Option<Bounds> {
        match self {
            Self::Bounds(b) => Some(b),
            _ => None,
        }
    }

    /// Consumes into a name list.
    #[must_use]
    pub fn into_list(self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Consumes into a key/value map.
    #[must_use]
    pub fn into_entries(self) -> Option<BTreeMap<String, String>> {
        match self {
            Self::Entries(map) => Some(map),
            _ => None,
        }
    }

    /// Consumes into an attribution record.
    #[must_use]
    pub fn into_attribution(self) -> Option<Attribution> {
        match self {
            Self::Attribution(a) => Some(a),
            _ => None,
        }
    }
}
