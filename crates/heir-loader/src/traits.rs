use std::path::Path;

use heir_types::ManifestDocument;

use crate::error::LoaderResult;

/// Source of parsed manifest documents.
///
/// All implementations must satisfy these invariants:
/// - A missing manifest is reported as [`LoaderError::NotFound`], never as a
///   generic I/O error, so the chain builder can name the referencing
///   manifest.
/// - The returned document's location is the normalized `path` it was
///   loaded from.
/// - Documents are returned by value; the loader keeps no handle on them.
///
/// [`LoaderError::NotFound`]: crate::LoaderError::NotFound
pub trait ManifestLoader: Send + Sync {
    /// Load and parse the manifest at `path`.
    fn load(&self, path: &Path) -> LoaderResult<ManifestDocument>;
}

impl<L: ManifestLoader + ?Sized> ManifestLoader for &L {
    fn load(&self, path: &Path) -> LoaderResult<ManifestDocument> {
        (**self).load(path)
    }
}

impl<L: ManifestLoader + ?Sized> ManifestLoader for Box<L> {
    fn load(&self, path: &Path) -> LoaderResult<ManifestDocument> {
        (**self).load(path)
    }
}
