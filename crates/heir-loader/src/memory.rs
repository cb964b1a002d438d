use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use heir_types::{normalize_path, ManifestDocument};

use crate::error::{LoaderError, LoaderResult};
use crate::expand::{RandomWords, WordSource};
use crate::parse::parse_manifest;
use crate::traits::ManifestLoader;

/// In-memory, HashMap-based manifest loader.
///
/// Intended for tests and embedding. Documents are keyed by their
/// normalized location and cloned on load.
pub struct InMemoryManifestLoader {
    documents: RwLock<HashMap<PathBuf, ManifestDocument>>,
    words: Box<dyn WordSource>,
}

impl InMemoryManifestLoader {
    /// Create a new empty loader.
    pub fn new() -> Self {
        Self::with_word_source(Box::new(RandomWords))
    }

    /// Create a loader that expands `${random-word}` using `words`.
    pub fn with_word_source(words: Box<dyn WordSource>) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            words,
        }
    }

    /// Register an already-parsed document under its own location.
    ///
    /// Replaces any document previously registered at the same location.
    pub fn insert(&self, document: ManifestDocument) {
        let key = normalize_path(document.location());
        self.documents
            .write()
            .expect("lock poisoned")
            .insert(key, document);
    }

    /// Parse `yaml` as a manifest located at `path` and register it.
    pub fn insert_yaml(&self, path: impl AsRef<Path>, yaml: &str) -> LoaderResult<()> {
        let location = normalize_path(path.as_ref());
        let document = parse_manifest(&location, yaml, self.words.as_ref())?;
        self.insert(document);
        Ok(())
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no documents are registered.
    pub fn is_empty(&self) -> bool {
        self.documents.read().expect("lock poisoned").is_empty()
    }

    /// Sorted list of registered locations.
    pub fn paths(&self) -> Vec<PathBuf> {
        let map = self.documents.read().expect("lock poisoned");
        let mut paths: Vec<PathBuf> = map.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Default for InMemoryManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestLoader for InMemoryManifestLoader {
    fn load(&self, path: &Path) -> LoaderResult<ManifestDocument> {
        let key = normalize_path(path);
        let map = self.documents.read().expect("lock poisoned");
        map.get(&key)
            .cloned()
            .ok_or(LoaderError::NotFound(key))
    }
}

impl std::fmt::Debug for InMemoryManifestLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryManifestLoader")
            .field("document_count", &self.len())
            .finish()
    }
}
