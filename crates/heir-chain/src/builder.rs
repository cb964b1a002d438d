//! Iterative parent-following chain construction.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use tracing::debug;

use heir_loader::{LoaderError, LoaderResult, ManifestLoader};
use heir_types::{normalize_path, ManifestDocument};

use crate::chain::InheritanceChain;
use crate::error::{ChainError, ChainResult};

/// Default limit on the number of documents in one chain.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Builds [`InheritanceChain`]s by following `inherit` references.
#[derive(Clone, Copy, Debug)]
pub struct ChainBuilder {
    max_depth: usize,
}

impl ChainBuilder {
    /// Create a builder with [`DEFAULT_MAX_DEPTH`].
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit chains to at most `max_depth` documents (minimum 1).
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    /// Maximum number of documents in a chain, leaf included.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Build the chain for `leaf`, loading each parent with `resolve_parent`.
    ///
    /// Parent references are resolved relative to the referencing
    /// document's location, and each resolved path is visited at most once.
    /// The result is root-first.
    pub fn build<F>(&self, leaf: ManifestDocument, mut resolve_parent: F) -> ChainResult<InheritanceChain>
    where
        F: FnMut(&Path) -> LoaderResult<ManifestDocument>,
    {
        let leaf_path = normalize_path(leaf.location());
        let mut visited: HashSet<PathBuf> = HashSet::new();
        visited.insert(leaf_path.clone());

        let mut next = leaf.resolved_parent().map(|p| (p, leaf_path.clone()));
        let mut documents: VecDeque<ManifestDocument> = VecDeque::new();
        documents.push_front(leaf);

        while let Some((parent_path, referenced_by)) = next.take() {
            if !visited.insert(parent_path.clone()) {
                return Err(ChainError::CycleDetected {
                    path: parent_path,
                    referenced_by,
                });
            }

            if documents.len() >= self.max_depth {
                return Err(ChainError::TooDeep {
                    leaf: leaf_path,
                    max_depth: self.max_depth,
                });
            }

            let parent = resolve_parent(&parent_path).map_err(|e| match e {
                LoaderError::NotFound(_) => ChainError::ParentManifestNotFound {
                    path: parent_path.clone(),
                    referenced_by: referenced_by.clone(),
                },
                other => ChainError::Load {
                    path: parent_path.clone(),
                    referenced_by: referenced_by.clone(),
                    source: other,
                },
            })?;

            debug!(
                parent = %parent_path.display(),
                child = %referenced_by.display(),
                depth = documents.len() + 1,
                "followed inherit reference"
            );

            next = parent
                .resolved_parent()
                .map(|p| (p, normalize_path(parent.location())));
            documents.push_front(parent);
        }

        Ok(InheritanceChain::from_verified(documents.into()))
    }

    /// Build the chain for an already-loaded leaf using `loader` for parents.
    pub fn build_with_loader<L>(&self, leaf: ManifestDocument, loader: &L) -> ChainResult<InheritanceChain>
    where
        L: ManifestLoader + ?Sized,
    {
        self.build(leaf, |path| loader.load(path))
    }

    /// Load the leaf at `leaf_path` and build its chain.
    pub fn load<L>(&self, leaf_path: &Path, loader: &L) -> ChainResult<InheritanceChain>
    where
        L: ManifestLoader + ?Sized,
    {
        let leaf = loader.load(leaf_path).map_err(|source| ChainError::LeafLoad {
            path: normalize_path(leaf_path),
            source,
        })?;
        self.build_with_loader(leaf, loader)
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
