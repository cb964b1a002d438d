//! YAML document tree with exact number literals.
//!
//! `serde_yaml::Value` keeps floats only as `f64` and refuses integers
//! wider than 64 bits. Manifests need both exactly, so documents are read
//! into a [`Node`] tree instead: integers of any width keep their digits,
//! and a second pass over the same text records the literal spelling of
//! every float.

use std::fmt;

use serde::de::{
    self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor,
};
use serde::Deserialize;

/// One YAML value.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    /// Integer literal outside the `i64` range, in decimal.
    BigInt(String),
    /// Float with the literal it was written as.
    Float { value: f64, literal: String },
    Str(String),
    Seq(Vec<Node>),
    /// Entries in document order. Keys are unique.
    Map(Vec<(Node, Node)>),
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the YAML type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::BigInt(_) | Self::Float { .. } => "number",
            Self::Str(_) => "string",
            Self::Seq(_) => "list",
            Self::Map(_) => "mapping",
        }
    }

    /// Look up a mapping entry by string key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    fn contains_float(&self) -> bool {
        match self {
            Self::Float { .. } => true,
            Self::Seq(items) => items.iter().any(Node::contains_float),
            Self::Map(entries) => entries.iter().any(|(_, v)| v.contains_float()),
            _ => false,
        }
    }
}

/// Parse one YAML document.
pub fn parse_document(text: &str) -> Result<Node, serde_yaml::Error> {
    let mut node = Node::deserialize(serde_yaml::Deserializer::from_str(text))?;
    if node.contains_float() {
        Literals(&mut node).deserialize(serde_yaml::Deserializer::from_str(text))?;
    }
    Ok(node)
}

// ---------------------------------------------------------------------------
// Tree pass
// ---------------------------------------------------------------------------

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(i64::try_from(v).map_or_else(|_| Node::BigInt(v.to_string()), Node::Int))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Node, E> {
        Ok(i64::try_from(v).map_or_else(|_| Node::BigInt(v.to_string()), Node::Int))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Node, E> {
        Ok(i64::try_from(v).map_or_else(|_| Node::BigInt(v.to_string()), Node::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Float {
            value: v,
            literal: String::new(),
        })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut entries: Vec<(Node, Node)> = Vec::new();
        while let Some((key, value)) = map.next_entry::<Node, Node>()? {
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(de::Error::custom(format!(
                    "duplicate key {}",
                    key.as_str().unwrap_or("in mapping")
                )));
            }
            entries.push((key, value));
        }
        Ok(Node::Map(entries))
    }
}

// ---------------------------------------------------------------------------
// Literal pass
// ---------------------------------------------------------------------------

/// Walks a second event stream of the same text alongside an existing tree
/// and fills in the literal of every float.
struct Literals<'a>(&'a mut Node);

impl<'de> DeserializeSeed<'de> for Literals<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        match self.0 {
            Node::Float { literal, .. } => {
                *literal = String::deserialize(deserializer)?;
                Ok(())
            }
            Node::Seq(items) => deserializer.deserialize_seq(SeqLiterals(items)),
            Node::Map(entries) => deserializer.deserialize_map(MapLiterals(entries)),
            _ => deserializer.deserialize_ignored_any(IgnoredAny).map(|_| ()),
        }
    }
}

struct SeqLiterals<'a>(&'a mut [Node]);

impl<'de> Visitor<'de> for SeqLiterals<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        for item in self.0.iter_mut() {
            seq.next_element_seed(Literals(item))?;
        }
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(())
    }
}

struct MapLiterals<'a>(&'a mut [(Node, Node)]);

impl<'de> Visitor<'de> for MapLiterals<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        for (_, value) in self.0.iter_mut() {
            map.next_key::<IgnoredAny>()?;
            map.next_value_seed(Literals(value))?;
        }
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decimal comparison
// ---------------------------------------------------------------------------

/// Whether `literal` denotes exactly the decimal number that `value`
/// prints as. False when either side is not a plain decimal.
pub fn is_exact_float(literal: &str, value: f64) -> bool {
    match (decimal(literal), decimal(&value.to_string())) {
        (Some(written), Some(printed)) => written == printed,
        _ => false,
    }
}

/// Normalized `(negative, significant digits, point position)` of a decimal
/// such as `-12.50e3`. Zero normalizes to `(false, "", 0)`.
fn decimal(text: &str) -> Option<(bool, String, i64)> {
    let (negative, rest) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (mantissa, exponent) = match rest.find(['e', 'E']) {
        Some(i) => (&rest[..i], rest[i + 1..].parse::<i64>().ok()?),
        None => (rest, 0),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{int}{frac}");
    let leading = digits.bytes().take_while(|b| *b == b'0').count();
    let significant = digits[leading..].trim_end_matches('0');
    if significant.is_empty() {
        return Some((false, String::new(), 0));
    }
    let point = i64::try_from(int.len()).ok()? + exponent - i64::try_from(leading).ok()?;
    Some((negative, significant.to_string(), point))
}
