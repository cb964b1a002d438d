use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use heir_types::{normalize_path, ManifestDocument};

use crate::error::{ChainError, ChainResult};

/// Ordered manifests from the most distant ancestor to the leaf.
///
/// Index 0 is the root, the last index is the leaf. The chain is immutable
/// after construction and can be shared across threads for concurrent
/// resolution of different applications.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InheritanceChain {
    documents: Vec<ManifestDocument>,
}

impl InheritanceChain {
    /// A chain consisting of a single manifest with no parent.
    pub fn single(document: ManifestDocument) -> Self {
        Self {
            documents: vec![document],
        }
    }

    /// Build a chain from documents already in root-first order.
    ///
    /// Fails with [`ChainError::CycleDetected`] if two documents share a
    /// normalized location, or [`ChainError::Empty`] if `documents` is empty.
    pub fn try_from_root_first(documents: Vec<ManifestDocument>) -> ChainResult<Self> {
        if documents.is_empty() {
            return Err(ChainError::Empty);
        }
        let mut seen = HashSet::new();
        for (i, doc) in documents.iter().enumerate() {
            let path = normalize_path(doc.location());
            if !seen.insert(path.clone()) {
                let referenced_by = documents
                    .get(i + 1)
                    .map(|d| d.location().to_path_buf())
                    .unwrap_or_else(|| path.clone());
                return Err(ChainError::CycleDetected {
                    path,
                    referenced_by,
                });
            }
        }
        Ok(Self { documents })
    }

    /// Construct without re-checking invariants (builder-internal).
    pub(crate) fn from_verified(documents: Vec<ManifestDocument>) -> Self {
        Self { documents }
    }

    /// Number of documents in the chain (always at least one).
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The most distant ancestor.
    pub fn root(&self) -> &ManifestDocument {
        &self.documents[0]
    }

    /// The manifest that was handed to the deploy command.
    pub fn leaf(&self) -> &ManifestDocument {
        &self.documents[self.documents.len() - 1]
    }

    /// Documents in root-first order.
    pub fn documents(&self) -> &[ManifestDocument] {
        &self.documents
    }

    /// Iterate documents root-first.
    pub fn iter(&self) -> std::slice::Iter<'_, ManifestDocument> {
        self.documents.iter()
    }

    /// Document locations in root-first order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.documents
            .iter()
            .map(|d| d.location().to_path_buf())
            .collect()
    }

    /// Returns `true` if a document at `path` is part of the chain.
    pub fn contains(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        self.documents
            .iter()
            .any(|d| normalize_path(d.location()) == path)
    }
}

impl<'a> IntoIterator for &'a InheritanceChain {
    type Item = &'a ManifestDocument;
    type IntoIter = std::slice::Iter<'a, ManifestDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
