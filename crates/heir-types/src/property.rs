//! Loosely-typed manifest values.
//!
//! Manifest documents are dynamic, so a [`PropertySet`] keeps every field as
//! a tagged variant instead of reflecting into a fixed struct. The merge
//! engine decides what each key means; this module only stores values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

// ---------------------------------------------------------------------------
// ScalarValue
// ---------------------------------------------------------------------------

/// A single scalar value as it appeared in a manifest.
///
/// `Null` is a *present* value (the manifest said `key: null`), which is
/// different from the key being absent from the [`PropertySet`].
///
/// Number literals that no `Int` or `Float` holds exactly (integers wider
/// than 64 bits, floats with more digits than an `f64` keeps) are loaded as
/// `Text` carrying the literal digits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "number",
            Self::Text(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical text form of the value.
    ///
    /// Integers and booleans use their decimal / `true`/`false` spelling.
    /// Floats use the shortest representation that parses back to the same
    /// `f64`, so `123456789.12345678` stays `123456789.12345678`. Null and
    /// non-finite floats have no lossless text form and are rejected.
    pub fn canonical_text(&self) -> Result<String, TypeError> {
        match self {
            Self::Null => Err(TypeError::NotRepresentable("null".into())),
            Self::Bool(b) => Ok(b.to_string()),
            Self::Int(i) => Ok(i.to_string()),
            Self::Float(f) if !f.is_finite() => {
                Err(TypeError::NotRepresentable(format!("non-finite number {f}")))
            }
            Self::Float(f) => Ok(format!("{f}")),
            Self::Text(s) => Ok(s.clone()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// The value stored under one field key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Scalar(ScalarValue),
    List(Vec<String>),
    Map(BTreeMap<String, ScalarValue>),
}

impl FieldValue {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

// ---------------------------------------------------------------------------
// PropertySet
// ---------------------------------------------------------------------------

/// Mapping from field key to value for one segment of a manifest.
///
/// Keys are kept as raw strings (`memory`, `docker.image`, ...) so that
/// unknown keys survive loading and can be reported by the merge engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    fields: BTreeMap<String, FieldValue>,
}

impl PropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(key.into(), value)
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ---- Builder helpers ----

    /// Builder-style scalar insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.insert(key, FieldValue::Scalar(value.into()));
        self
    }

    /// Builder-style list insert.
    pub fn with_list<I, S>(mut self, key: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(
            key,
            FieldValue::List(items.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Builder-style map insert.
    pub fn with_map<I, K, V>(mut self, key: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ScalarValue>,
    {
        self.insert(
            key,
            FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        );
        self
    }
}

impl FromIterator<(String, FieldValue)> for PropertySet {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_text_of_long_float_keeps_all_digits() {
        let v = ScalarValue::Float(123456789.12345678);
        assert_eq!(v.canonical_text().unwrap(), "123456789.12345678");
    }

    #[test]
    fn canonical_text_of_whole_float_has_no_fraction() {
        assert_eq!(ScalarValue::Float(2.0).canonical_text().unwrap(), "2");
    }

    #[test]
    fn canonical_text_of_int_and_bool() {
        assert_eq!(ScalarValue::Int(-42).canonical_text().unwrap(), "-42");
        assert_eq!(ScalarValue::Bool(true).canonical_text().unwrap(), "true");
        assert_eq!(ScalarValue::Bool(false).canonical_text().unwrap(), "false");
    }

    #[test]
    fn canonical_text_rejects_null_and_nan() {
        assert!(ScalarValue::Null.canonical_text().is_err());
        assert!(ScalarValue::Float(f64::NAN).canonical_text().is_err());
        assert!(ScalarValue::Float(f64::INFINITY).canonical_text().is_err());
    }

    #[test]
    fn empty_text_is_present_not_absent() {
        let props = PropertySet::new().with("command", "");
        assert!(props.contains("command"));
        assert_eq!(
            props.get("command"),
            Some(&FieldValue::Scalar(ScalarValue::Text(String::new())))
        );
        assert!(!props.contains("memory"));
    }

    #[test]
    fn builder_helpers_produce_expected_variants() {
        let props = PropertySet::new()
            .with("instances", 2i64)
            .with_list("routes", ["a.example.com", "b.example.com"])
            .with_map("env", [("FOO", "bar")]);

        assert_eq!(props.len(), 3);
        assert_eq!(props.get("instances").unwrap().kind_name(), "scalar");
        assert_eq!(props.get("routes").unwrap().kind_name(), "list");
        assert_eq!(props.get("env").unwrap().kind_name(), "map");
    }

    #[test]
    fn iteration_is_key_ordered() {
        let props = PropertySet::new().with("z", "1").with("a", "2").with("m", "3");
        let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "m", "z"]);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn finite_float_text_parses_back_exactly(f in proptest::num::f64::NORMAL) {
                let text = ScalarValue::Float(f).canonical_text().unwrap();
                let parsed: f64 = text.parse().unwrap();
                prop_assert_eq!(parsed.to_bits(), f.to_bits());
            }

            #[test]
            fn int_text_parses_back_exactly(i in any::<i64>()) {
                let text = ScalarValue::Int(i).canonical_text().unwrap();
                prop_assert_eq!(text.parse::<i64>().unwrap(), i);
            }
        }
    }
}
