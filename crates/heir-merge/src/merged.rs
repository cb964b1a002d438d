//! Accumulated field values while folding segments.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use heir_types::{FieldValue, ScalarValue};
use serde::Serialize;

use crate::engine::{Scope, Segment};
use crate::error::{MergeError, MergeResult};
use crate::policy::{MergeKind, PolicyTable};

/// Where a winning value was declared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub document: PathBuf,
    pub scope: Scope,
}

impl Origin {
    pub fn document(&self) -> &Path {
        &self.document
    }
}

/// Field values after folding every segment, before projection into a
/// typed [`ResolvedApplication`](heir_types::ResolvedApplication).
///
/// Values are kept untyped so that only the winning value of each scalar
/// is checked against its type hint; a bad value that gets overridden
/// never surfaces.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MergedProperties {
    scalars: BTreeMap<String, (ScalarValue, Origin)>,
    lists: BTreeMap<String, Vec<(String, Origin)>>,
    maps: BTreeMap<String, BTreeMap<String, (ScalarValue, Origin)>>,
}

impl MergedProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one segment in. Later segments take precedence.
    ///
    /// Values land under the policy's canonical key, whichever spelling the
    /// segment used. A present `null` on a list or map field contributes
    /// nothing.
    pub fn apply(
        &mut self,
        table: &PolicyTable,
        application: &str,
        segment: &Segment<'_>,
    ) -> MergeResult<()> {
        let location = segment.document.location();
        let origin = || Origin {
            document: location.to_path_buf(),
            scope: segment.scope,
        };

        for (key, value) in segment.properties.iter() {
            let policy = table.get(key).ok_or_else(|| MergeError::UnknownField {
                application: application.to_string(),
                field: key.to_string(),
                document: location.to_path_buf(),
            })?;
            if key != policy.key && segment.properties.contains(policy.key) {
                return Err(MergeError::DuplicateField {
                    application: application.to_string(),
                    field: policy.key.to_string(),
                    spelling: key.to_string(),
                    document: location.to_path_buf(),
                });
            }
            let field = policy.key;

            match (policy.kind, value) {
                (MergeKind::Override, FieldValue::Scalar(v)) => {
                    self.scalars.insert(field.to_string(), (v.clone(), origin()));
                }
                (MergeKind::Append, FieldValue::List(items)) => {
                    self.lists
                        .entry(field.to_string())
                        .or_default()
                        .extend(items.iter().map(|item| (item.clone(), origin())));
                }
                (MergeKind::KeyMerge, FieldValue::Map(entries)) => {
                    let map = self.maps.entry(field.to_string()).or_default();
                    for (name, v) in entries {
                        map.insert(name.clone(), (v.clone(), origin()));
                    }
                }
                (MergeKind::Append | MergeKind::KeyMerge, FieldValue::Scalar(ScalarValue::Null)) => {}
                (expected, other) => {
                    return Err(MergeError::KindMismatch {
                        application: application.to_string(),
                        field: key.to_string(),
                        expected,
                        found: other.kind_name(),
                        document: location.to_path_buf(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The winning value of a scalar field and where it came from.
    pub fn scalar(&self, key: &str) -> Option<(&ScalarValue, &Origin)> {
        self.scalars.get(key).map(|(v, o)| (v, o))
    }

    /// Items of the concatenated list for `key`, each with the document
    /// that declared it. Empty if no segment declared the list.
    pub fn list(&self, key: &str) -> impl Iterator<Item = (&str, &Origin)> {
        self.lists
            .get(key)
            .into_iter()
            .flat_map(|items| items.iter().map(|(v, o)| (v.as_str(), o)))
    }

    /// Entries of the merged map for `key`, in entry-key order.
    pub fn map(&self, key: &str) -> impl Iterator<Item = (&str, &ScalarValue, &Origin)> {
        self.maps
            .get(key)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, (v, o))| (k.as_str(), v, o)))
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.lists.is_empty() && self.maps.is_empty()
    }
}
