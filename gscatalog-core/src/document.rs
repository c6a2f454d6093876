use serde_json::Value;

/// A parsed catalog response.
///
/// The remote service wraps every entity and listing in a single root member
/// named after the resource kind (`{"featureType": {…}}`). This wrapper keeps
/// the raw [`Value`] and provides the tolerant accessors the rest of the
/// crate decodes through.
#[derive(Debug, Clone, PartialEq)]
pub struct Document(Value);

impl Document {
    /// Wraps an already-parsed JSON value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parses a raw response body.
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body).map(Self)
    }

    /// The document's root member of the given name, if present.
    #[must_use]
    pub fn root(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The raw JSON value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// Walks `path` member-by-member from `value`.
#[must_use]
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(key))
}

/// Views a value as a sequence of items.
///
/// The remote JSON renderer collapses single-element arrays to a bare object
/// and renders empty collections as `""`, so every sequence decode goes
/// through this tolerance.
#[must_use]
pub fn as_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        other => vec![other],
    }
}

/// Views a value as a string, stringifying bare scalars.
#[must_use]
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Views a value as a boolean, accepting the `"true"`/`"false"` strings the
/// remote uses interchangeably with JSON booleans.
#[must_use]
pub fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lookup_walks_nested_members() {
        let doc = json!({"a": {"b": {"c": 3}}});
        assert_eq!(lookup(&doc, &["a", "b", "c"]), Some(&json!(3)));
        assert_eq!(lookup(&doc, &["a", "missing"]), None);
    }

    #[test]
    fn items_tolerates_collapsed_and_empty_shapes() {
        assert_eq!(as_items(&json!([1, 2])).len(), 2);
        assert_eq!(as_items(&json!({"name": "x"})).len(), 1);
        assert!(as_items(&json!("")).is_empty());
        assert!(as_items(&Value::Null).is_empty());
    }

    #[test]
    fn flags_accept_both_renderings() {
        assert_eq!(as_flag(&json!(true)), Some(true));
        assert_eq!(as_flag(&json!("false")), Some(false));
        assert_eq!(as_flag(&json!("yes")), None);
    }
}
