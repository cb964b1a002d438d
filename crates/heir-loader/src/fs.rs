use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use heir_types::{normalize_path, ManifestDocument};

use crate::error::{LoaderError, LoaderResult};
use crate::expand::{RandomWords, WordSource};
use crate::parse::parse_manifest;
use crate::traits::ManifestLoader;

/// Loads YAML manifests from the local filesystem.
///
/// Each `load` is a single blocking read. Paths are normalized lexically
/// before reading; the returned document's location is that normalized
/// path.
pub struct FsManifestLoader {
    words: Box<dyn WordSource>,
}

impl FsManifestLoader {
    pub fn new() -> Self {
        Self::with_word_source(Box::new(RandomWords))
    }

    /// Create a loader that expands `${random-word}` using `words`.
    pub fn with_word_source(words: Box<dyn WordSource>) -> Self {
        Self { words }
    }
}

impl Default for FsManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestLoader for FsManifestLoader {
    fn load(&self, path: &Path) -> LoaderResult<ManifestDocument> {
        let location = normalize_path(path);
        let text = std::fs::read_to_string(&location).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoaderError::NotFound(location.clone()),
            _ => LoaderError::Io {
                path: location.clone(),
                source: e,
            },
        })?;
        debug!(manifest = %location.display(), bytes = text.len(), "read manifest");
        parse_manifest(&location, &text, self.words.as_ref())
    }
}

impl std::fmt::Debug for FsManifestLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsManifestLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::FixedWord;
    use std::fs;

    #[test]
    fn loads_manifest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yml");
        fs::write(&path, "inherit: base.yml\napplications:\n- name: web\n").unwrap();

        let doc = FsManifestLoader::new().load(&path).unwrap();
        assert_eq!(doc.location(), path.as_path());
        assert_eq!(doc.resolved_parent(), Some(dir.path().join("base.yml")));
        assert_eq!(doc.applications()[0].name, "web");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsManifestLoader::new()
            .load(&dir.path().join("absent.yml"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn directory_is_io_error_not_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsManifestLoader::new().load(dir.path()).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn uses_configured_word_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.yml");
        fs::write(&path, "name: app-${random-word}\n").unwrap();

        let loader = FsManifestLoader::with_word_source(Box::new(FixedWord("Calm-Lynx".into())));
        let doc = loader.load(&path).unwrap();
        assert_eq!(doc.applications()[0].name, "app-calm-lynx");
    }
}
