//! YAML manifest → [`ManifestDocument`] conversion.
//!
//! Recognized document-level keys are `inherit` and `applications`; every
//! other top-level key is a global property. Field keys are *not* checked
//! here: unknown keys are carried through so the merge engine can reject
//! them with full context.
//!
//! Number literals that neither `i64` nor `f64` hold exactly (wide integers,
//! floats with more significant digits than `f64` keeps) are stored as text
//! with their original digits.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use heir_types::{ApplicationBlock, FieldValue, ManifestDocument, PropertySet, ScalarValue};

use crate::error::{LoaderError, LoaderResult};
use crate::expand::{expand_properties, WordSource};
use crate::yaml::{self, Node};

const INHERIT_KEY: &str = "inherit";
const APPLICATIONS_KEY: &str = "applications";
const NAME_KEY: &str = "name";
const DOCKER_KEY: &str = "docker";
const ROUTES_KEY: &str = "routes";
const ROUTE_KEY: &str = "route";
/// List fields whose items are integers.
const INTEGER_LIST_KEYS: &[&str] = &["app_ports", "app-ports"];

/// Parse YAML text into a manifest document located at `location`.
///
/// An empty document parses to an empty manifest.
pub fn parse_manifest(
    location: &Path,
    text: &str,
    words: &dyn WordSource,
) -> LoaderResult<ManifestDocument> {
    let raw = yaml::parse_document(text).map_err(|e| LoaderError::parse(location, e.to_string()))?;

    let expanded = expand_properties(raw, words).map_err(|property| {
        LoaderError::UnsupportedProperty {
            path: location.to_path_buf(),
            property,
        }
    })?;

    let top = match expanded {
        Node::Null => Vec::new(),
        Node::Map(entries) => entries,
        other => {
            return Err(LoaderError::parse(
                location,
                format!("expected a mapping at the top level, found {}", other.type_name()),
            ))
        }
    };

    let mut doc = ManifestDocument::new(location);
    let mut global = PropertySet::new();
    let mut blocks: Option<Vec<ApplicationBlock>> = None;
    let mut global_name: Option<String> = None;

    for (key, value) in top {
        let key = key_string(location, &key)?;
        match key.as_str() {
            INHERIT_KEY => {
                let parent = value.as_str().ok_or_else(|| {
                    LoaderError::parse(location, "'inherit' must be a path string")
                })?;
                doc = doc.with_parent(parent);
            }
            APPLICATIONS_KEY => blocks = Some(parse_applications(location, value)?),
            NAME_KEY => {
                let name = value.as_str().ok_or_else(|| {
                    LoaderError::parse(location, "'name' must be a string value")
                })?;
                global_name = Some(name.to_string());
            }
            _ => insert_field(location, &mut global, &key, value)?,
        }
    }

    let blocks = match (blocks, global_name) {
        (Some(_), Some(_)) => {
            return Err(LoaderError::parse(
                location,
                "'name' must be declared inside 'applications' when an applications list is present",
            ))
        }
        (Some(blocks), None) => blocks,
        (None, Some(name)) => vec![ApplicationBlock::name_only(name)],
        (None, None) => Vec::new(),
    };

    debug!(
        manifest = %location.display(),
        applications = blocks.len(),
        global_fields = global.len(),
        "parsed manifest"
    );

    doc = doc.with_global(global);
    for block in blocks {
        doc = doc.with_block(block);
    }
    Ok(doc)
}

fn parse_applications(location: &Path, value: Node) -> LoaderResult<Vec<ApplicationBlock>> {
    let Node::Seq(entries) = value else {
        return Err(LoaderError::parse(location, "expected applications to be a list"));
    };

    entries
        .into_iter()
        .map(|entry| match entry {
            Node::Str(name) => Ok(ApplicationBlock::name_only(name)),
            Node::Map(entries) => parse_application(location, entries),
            other => Err(LoaderError::parse(
                location,
                format!(
                    "expected application to be a list of key/value pairs, found {}",
                    other.type_name()
                ),
            )),
        })
        .collect()
}

fn parse_application(location: &Path, entries: Vec<(Node, Node)>) -> LoaderResult<ApplicationBlock> {
    let mut name = String::new();
    let mut properties = PropertySet::new();

    for (key, value) in entries {
        let key = key_string(location, &key)?;
        match key.as_str() {
            NAME_KEY => {
                name = value
                    .as_str()
                    .ok_or_else(|| LoaderError::parse(location, "'name' must be a string value"))?
                    .to_string();
            }
            INHERIT_KEY | APPLICATIONS_KEY => {
                return Err(LoaderError::parse(
                    location,
                    format!("'{key}' is only allowed at the top level of a manifest"),
                ))
            }
            _ => insert_field(location, &mut properties, &key, value)?,
        }
    }

    Ok(ApplicationBlock::new(name, properties))
}

/// Convert one `key: value` pair and add it to `props`.
///
/// `docker` is flattened into `docker.<sub-key>` scalars; other mappings
/// become map fields; sequences become lists.
fn insert_field(
    location: &Path,
    props: &mut PropertySet,
    key: &str,
    value: Node,
) -> LoaderResult<()> {
    match value {
        Node::Map(entries) if key == DOCKER_KEY => {
            for (sub, v) in entries {
                let sub = key_string(location, &sub)?;
                let full = format!("{DOCKER_KEY}.{sub}");
                let scalar = scalar(location, &full, v)?;
                props.insert(full, FieldValue::Scalar(scalar));
            }
        }
        Node::Map(entries) => {
            let mut map = BTreeMap::new();
            for (k, v) in entries {
                let k = key_string(location, &k)?;
                let scalar = scalar(location, &format!("{key}.{k}"), v)?;
                map.insert(k, scalar);
            }
            props.insert(key, FieldValue::Map(map));
        }
        Node::Seq(items) => {
            let list = items
                .into_iter()
                .map(|item| list_item(location, key, item))
                .collect::<LoaderResult<Vec<_>>>()?;
            props.insert(key, FieldValue::List(list));
        }
        other => {
            let scalar = scalar(location, key, other)?;
            props.insert(key, FieldValue::Scalar(scalar));
        }
    }
    Ok(())
}

/// One list entry as text.
///
/// `routes` entries may be `{route: ...}` mappings; integer list fields
/// take integers, kept as their decimal digits.
fn list_item(location: &Path, key: &str, item: Node) -> LoaderResult<String> {
    match item {
        Node::Str(s) => Ok(s),
        Node::Map(entries) if key == ROUTES_KEY => match entries.as_slice() {
            [(k, Node::Str(route))] if k.as_str() == Some(ROUTE_KEY) => Ok(route.clone()),
            _ => Err(LoaderError::parse(
                location,
                format!("each entry in '{key}' must have a single string '{ROUTE_KEY}' property"),
            )),
        },
        Node::Int(n) if INTEGER_LIST_KEYS.contains(&key) => Ok(n.to_string()),
        Node::BigInt(digits) if INTEGER_LIST_KEYS.contains(&key) => Ok(digits),
        other => Err(LoaderError::parse(
            location,
            format!(
                "expected '{key}' to be a list of {}, found {}",
                if INTEGER_LIST_KEYS.contains(&key) { "integers" } else { "strings" },
                other.type_name()
            ),
        )),
    }
}

fn scalar(location: &Path, key: &str, value: Node) -> LoaderResult<ScalarValue> {
    match value {
        Node::Null => Ok(ScalarValue::Null),
        Node::Bool(b) => Ok(ScalarValue::Bool(b)),
        Node::Str(s) => Ok(ScalarValue::Text(s)),
        Node::Int(i) => Ok(ScalarValue::Int(i)),
        Node::BigInt(digits) => Ok(ScalarValue::Text(digits)),
        Node::Float { value, literal } => {
            if value.is_finite() && !yaml::is_exact_float(&literal, value) {
                Ok(ScalarValue::Text(literal))
            } else {
                Ok(ScalarValue::Float(value))
            }
        }
        other => Err(LoaderError::parse(
            location,
            format!("'{key}' must be a scalar value, found {}", other.type_name()),
        )),
    }
}

fn key_string(location: &Path, key: &Node) -> LoaderResult<String> {
    key.as_str().map(str::to_string).ok_or_else(|| {
        LoaderError::parse(
            location,
            format!("mapping keys must be strings, found {}", key.type_name()),
        )
    })
}
