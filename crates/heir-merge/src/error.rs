//! Error types for merging.

use std::path::PathBuf;

use crate::policy::MergeKind;

/// Errors that can occur while resolving one application.
///
/// Every variant names the application being resolved, so callers
/// resolving many applications can report each failure on its own.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MergeError {
    /// A manifest declared a key the policy table does not know.
    #[error("application '{application}': unknown field '{field}' in {}", document.display())]
    UnknownField {
        application: String,
        field: String,
        document: PathBuf,
    },

    /// A field's value has the wrong shape for its merge kind.
    #[error(
        "application '{application}': field '{field}' in {} must be a {expected}, found a {found}",
        document.display()
    )]
    KindMismatch {
        application: String,
        field: String,
        expected: MergeKind,
        found: &'static str,
        document: PathBuf,
    },

    /// One manifest section sets a field under both its key and its alias.
    #[error(
        "application '{application}': field '{field}' is also set as '{spelling}' in {}",
        document.display()
    )]
    DuplicateField {
        application: String,
        field: String,
        spelling: String,
        document: PathBuf,
    },

    /// An environment value has no canonical text form.
    #[error(
        "application '{application}': environment variable '{variable}' in {} is invalid: {reason}",
        document.display()
    )]
    InvalidEnvironmentValue {
        application: String,
        variable: String,
        document: PathBuf,
        reason: String,
    },

    /// The winning value of a scalar field, or a list item, does not match
    /// its type.
    #[error(
        "application '{application}': invalid value for '{field}' in {}: {reason}",
        document.display()
    )]
    InvalidFieldValue {
        application: String,
        field: String,
        document: PathBuf,
        reason: String,
    },
}

impl MergeError {
    /// The application this error belongs to.
    pub fn application(&self) -> &str {
        match self {
            Self::UnknownField { application, .. }
            | Self::KindMismatch { application, .. }
            | Self::DuplicateField { application, .. }
            | Self::InvalidEnvironmentValue { application, .. }
            | Self::InvalidFieldValue { application, .. } => application,
        }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
