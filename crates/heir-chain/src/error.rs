//! Error types for chain construction.

use std::path::PathBuf;

use heir_loader::LoaderError;

/// Errors that can occur while following parent references.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A parent manifest named by `inherit` does not exist.
    #[error("parent manifest {} not found (inherited by {})", path.display(), referenced_by.display())]
    ParentManifestNotFound {
        /// The missing parent.
        path: PathBuf,
        /// The manifest whose `inherit` named it.
        referenced_by: PathBuf,
    },

    /// Following parent references revisited a manifest.
    #[error("inheritance cycle detected: {} is inherited again by {}", path.display(), referenced_by.display())]
    CycleDetected {
        /// The manifest that was reached a second time.
        path: PathBuf,
        /// The manifest whose `inherit` closed the cycle.
        referenced_by: PathBuf,
    },

    /// The chain grew beyond the configured maximum depth.
    #[error("inheritance chain starting at {} exceeds the maximum depth of {max_depth}", leaf.display())]
    TooDeep {
        /// The leaf manifest.
        leaf: PathBuf,
        /// The configured limit.
        max_depth: usize,
    },

    /// A chain must contain at least the leaf manifest.
    #[error("inheritance chain is empty")]
    Empty,

    /// The leaf manifest itself could not be loaded.
    #[error("failed to load manifest {}: {source}", path.display())]
    LeafLoad {
        path: PathBuf,
        #[source]
        source: LoaderError,
    },

    /// A parent manifest exists but could not be loaded.
    #[error("failed to load parent manifest {} (inherited by {}): {source}", path.display(), referenced_by.display())]
    Load {
        path: PathBuf,
        referenced_by: PathBuf,
        #[source]
        source: LoaderError,
    },
}

/// Convenience alias for chain results.
pub type ChainResult<T> = Result<T, ChainError>;
