use std::path::PathBuf;

/// Errors from manifest loading.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// No manifest exists at the requested path.
    #[error("manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The manifest exists but is not a valid manifest document.
    #[error("invalid manifest {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The manifest uses a `${...}` property other than `${random-word}`.
    #[error(
        "property '{property}' found in manifest {}; this feature is no longer supported, please remove it and try again",
        path.display()
    )]
    UnsupportedProperty { path: PathBuf, property: String },

    /// I/O error reading the manifest.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoaderError {
    /// Create a parse error for `path`.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the manifest simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
